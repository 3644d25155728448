//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;

use actix_web::{HttpResponse, web};
use serde_json::json;

use quill_shared::ApiResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    // Public routes; literal segments registered before `{id}`
                    .route("", web::get().to(posts::list_posts))
                    .route("/search", web::get().to(posts::search_posts))
                    .route("/slug/{slug}", web::get().to(posts::get_post_by_slug))
                    .route("/category/{slug}", web::get().to(posts::list_posts_by_category))
                    .route("/{id}", web::get().to(posts::get_post_by_id))
                    // Protected routes
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/comments", web::post().to(posts::add_comment)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list_categories))
                    .route("/{slug}", web::get().to(categories::get_category_by_slug)),
            ),
    );
}

/// GET / - API banner.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Quill blog API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::failure("Route not found"))
}
