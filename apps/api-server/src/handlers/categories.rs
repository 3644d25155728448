//! Category lookup handlers. Categories are reference data managed
//! elsewhere; this surface is read-only.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::CategoryDto;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.all().await?;
    let dtos: Vec<CategoryDto> = categories.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(dtos)))
}

/// GET /api/categories/{slug}
pub async fn get_category_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .find_by_slug(&path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryDto::from(category))))
}
