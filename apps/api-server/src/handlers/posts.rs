//! Post handlers - the post lifecycle and access-control surface.
//!
//! Validation and authorization run before the store is touched; store
//! failures are mapped to the error taxonomy at the boundary.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::authz::ensure_can_mutate;
use quill_core::domain::{Post, PostDraft, PostFilter, PostPatch, validate_comment_content};
use quill_core::page::{Page, PageRequest};
use quill_core::slug::parse_tags;
use quill_shared::ApiResponse;
use quill_shared::dto::PostDto;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<u64>,
    limit: Option<u64>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
}

/// Multipart form for create and update. On update every field is optional;
/// empty submitted text fields are treated as "skip".
#[derive(Debug, MultipartForm)]
pub struct PostForm {
    title: Option<Text<String>>,
    content: Option<Text<String>>,
    excerpt: Option<Text<String>>,
    category: Option<Text<Uuid>>,
    /// Comma-separated tag list.
    tags: Option<Text<String>>,
    #[multipart(rename = "isPublished")]
    is_published: Option<Text<bool>>,
    #[multipart(rename = "featuredImage")]
    featured_image: Option<TempFile>,
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list(&PostFilter::Published, query.request())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paged(page, PostDto::from)))
}

/// GET /api/posts/{id}
pub async fn get_post_by_id(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(post_not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(count_view(&state, post).await)))
}

/// GET /api/posts/slug/{slug}
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_slug(&path.into_inner())
        .await?
        .ok_or_else(post_not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(count_view(&state, post).await)))
}

/// GET /api/posts/search?q=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(PageRequest::DEFAULT_LIMIT),
    );

    // An empty query is an empty result set, not an error.
    let q = query.q.clone().unwrap_or_default();
    if q.is_empty() {
        let empty: Page<Post> = Page::empty(request);
        return Ok(HttpResponse::Ok().json(ApiResponse::paged(empty, PostDto::from)));
    }

    let page = state.posts.list(&PostFilter::Search(q), request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paged(page, PostDto::from)))
}

/// GET /api/posts/category/{slug}
pub async fn list_posts_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .find_by_slug(&path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let page = state
        .posts
        .list(&PostFilter::PublishedInCategory(category.id), query.request())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paged(page, PostDto::from)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let (Some(title), Some(content), Some(category)) = (
        non_empty(form.title),
        non_empty(form.content),
        form.category,
    ) else {
        return Err(AppError::BadRequest(
            "Title, content, and category are required".to_string(),
        ));
    };

    let mut draft = PostDraft {
        title,
        content,
        excerpt: non_empty(form.excerpt),
        category_id: category.into_inner(),
        tags: non_empty(form.tags)
            .map(|raw| parse_tags(&raw))
            .unwrap_or_default(),
        is_published: form.is_published.map(Text::into_inner).unwrap_or(false),
        featured_image: None,
    };
    draft.validate()?;

    // Persist the upload only once validation has passed; a rejected
    // request leaves nothing on disk.
    if let Some(file) = form.featured_image {
        draft.featured_image = Some(store_upload(&state, file).await?);
    }

    let post = state.posts.create(identity.user_id, draft).await?;
    tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(PostDto::from(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(post_not_found)?;

    // Gate before anything touches the store
    ensure_can_mutate(&identity.actor(), &post)?;

    let mut patch = PostPatch {
        title: non_empty(form.title),
        content: non_empty(form.content),
        excerpt: non_empty(form.excerpt),
        category_id: form.category.map(Text::into_inner),
        tags: non_empty(form.tags).map(|raw| parse_tags(&raw)),
        is_published: form.is_published.map(Text::into_inner),
        featured_image: None,
    };
    patch.validate()?;

    if let Some(file) = form.featured_image {
        patch.featured_image = Some(store_upload(&state, file).await?);
    }

    let updated = state
        .posts
        .update(id, patch)
        .await?
        .ok_or_else(post_not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDto::from(updated))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(post_not_found)?;

    ensure_can_mutate(&identity.actor(), &post)?;

    if !state.posts.delete(id).await? {
        return Err(post_not_found());
    }
    tracing::info!(post_id = %id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    content: String,
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    validate_comment_content(&body.content)?;

    let post = state
        .posts
        .add_comment(path.into_inner(), identity.user_id, &body.content)
        .await?
        .ok_or_else(post_not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDto::from(post))))
}

/// Best-effort view increment after a successful detail read. The read
/// never fails because of the counter; failures are logged and swallowed.
async fn count_view(state: &web::Data<AppState>, post: Post) -> PostDto {
    let mut dto = PostDto::from(post);
    match state.posts.increment_views(dto.id).await {
        Ok(count) => dto.view_count = count,
        Err(e) => {
            tracing::warn!(post_id = %dto.id, error = %e, "Failed to increment view count");
        }
    }
    dto
}

async fn store_upload(state: &web::Data<AppState>, file: TempFile) -> AppResult<String> {
    let original_name = file.file_name.clone().unwrap_or_default();
    let data = tokio::fs::read(file.file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read upload: {e}")))?;
    Ok(state.files.store(&original_name, data).await?)
}

/// Empty submitted text fields count as "not provided".
fn non_empty(field: Option<Text<String>>) -> Option<String> {
    field.map(Text::into_inner).filter(|s| !s.is_empty())
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use uuid::Uuid;

    use quill_core::domain::{Post, PostDraft, PostFilter, PostPatch};
    use quill_core::error::StoreError;
    use quill_core::page::{Page, PageRequest};
    use quill_core::ports::{PostStore, TokenService};
    use quill_infra::{JwtConfig, JwtTokenService, LocalFileStore, MemoryStore};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    /// Store whose view counter always fails; everything else delegates.
    struct BrokenCounterStore(MemoryStore);

    #[async_trait]
    impl PostStore for BrokenCounterStore {
        async fn list(
            &self,
            filter: &PostFilter,
            page: PageRequest,
        ) -> Result<Page<Post>, StoreError> {
            self.0.list(filter, page).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
            self.0.find_by_id(id).await
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
            self.0.find_by_slug(slug).await
        }

        async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, StoreError> {
            self.0.create(author_id, draft).await
        }

        async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, StoreError> {
            self.0.update(id, patch).await
        }

        async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }

        async fn increment_views(&self, _id: Uuid) -> Result<i64, StoreError> {
            Err(StoreError::Query("view counter unavailable".to_string()))
        }

        async fn add_comment(
            &self,
            post_id: Uuid,
            author_id: Uuid,
            content: &str,
        ) -> Result<Option<Post>, StoreError> {
            self.0.add_comment(post_id, author_id, content).await
        }
    }

    fn draft(title: &str, category_id: Uuid) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: format!("Content of {title}"),
            excerpt: None,
            category_id,
            tags: vec![],
            is_published: true,
            featured_image: None,
        }
    }

    fn app_state(posts: Arc<dyn PostStore>, store: &MemoryStore, uploads: &Path) -> AppState {
        AppState {
            posts,
            categories: Arc::new(store.categories()),
            files: Arc::new(LocalFileStore::new(uploads)),
        }
    }

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "quill-api".to_string(),
        }))
    }

    #[actix_web::test]
    async fn search_with_empty_query_is_an_empty_page() {
        let store = MemoryStore::new();
        let category = store.seed_category("General").await;
        store
            .create(Uuid::new_v4(), draft("Visible Post", category.id))
            .await
            .unwrap();

        let state = app_state(Arc::new(store.clone()), &store, &std::env::temp_dir());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/posts/search?q=")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert_eq!(body["pagination"]["total"], 0);
    }

    #[actix_web::test]
    async fn detail_read_survives_a_failing_view_counter() {
        let store = MemoryStore::new();
        let category = store.seed_category("General").await;
        let post = store
            .create(Uuid::new_v4(), draft("Resilient", category.id))
            .await
            .unwrap();

        let state = app_state(
            Arc::new(BrokenCounterStore(store.clone())),
            &store,
            &std::env::temp_dir(),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["viewCount"], 0);
    }

    #[actix_web::test]
    async fn rejected_create_stores_no_upload() {
        let store = MemoryStore::new();
        let category = store.seed_category("General").await;

        let uploads = std::env::temp_dir().join(format!("quill-test-{}", Uuid::new_v4()));
        let state = app_state(Arc::new(store.clone()), &store, &uploads);

        let tokens = token_service();
        let token = tokens
            .generate_token(Uuid::new_v4(), "Ada", "user")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(tokens))
                .configure(configure_routes),
        )
        .await;

        // Title over the length limit plus an image part
        let boundary = "XBOUNDARY";
        let title = "x".repeat(101);
        let category_id = category.id.to_string();
        let mut body = String::new();
        for (name, value) in [
            ("title", title.as_str()),
            ("content", "Body"),
            ("category", category_id.as_str()),
        ] {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"featuredImage\"; \
             filename=\"pic.png\"\r\nContent-Type: image/png\r\n\r\nnot-really-a-png\r\n\
             --{boundary}--\r\n"
        ));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let untouched =
            !uploads.exists() || std::fs::read_dir(&uploads).unwrap().next().is_none();
        assert!(untouched);
    }
}
