//! Authentication port. Session issuance is handled by an external
//! collaborator; this system only resolves an incoming bearer credential
//! into an identity and role.

use uuid::Uuid;

/// Claims carried by a validated token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub name: String,
    pub role: String,
    pub exp: i64,
}

/// Token validation service.
pub trait TokenService: Send + Sync {
    /// Generate a token for a user. Used by tests and tooling; issuance in
    /// production belongs to the auth collaborator sharing the secret.
    fn generate_token(&self, user_id: Uuid, name: &str, role: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
