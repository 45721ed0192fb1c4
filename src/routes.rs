use std::path::{Path, PathBuf};

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::error::JsonPayloadError;
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::filter::{visible, CatalogFilter, ListParams};
use crate::payload::CreateIngredientRequest;
use crate::query;

/// Request bodies above this are rejected before reaching a handler.
pub(crate) const JSON_LIMIT: usize = 10 * 1024 * 1024;

/// Records that matched a filtered listing, before `page`/`limit` truncation.
pub(crate) const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

#[derive(Serialize)]
struct Created {
    id: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
}

#[get("/api/posts")]
async fn list_posts(
    pool: web::Data<DbPool>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    const FAILURE: &str = "Failed to fetch posts";

    let records = web::block(move || {
        let conn = pool.get()?;
        query::list_ingredients(&conn)
    })
    .await
    .map_err(|e| ApiError::internal(FAILURE, e))?
    .map_err(|e| ApiError::internal(FAILURE, e))?;

    let params = params.into_inner();
    if params.is_empty() {
        return Ok(HttpResponse::Ok().json(records));
    }

    let matched = CatalogFilter::from_params(&params).apply(records);
    let total = matched.len();
    let shown = match params.visible_limit() {
        Some(limit) => visible(matched, limit),
        None => matched,
    };
    Ok(HttpResponse::Ok()
        .insert_header((TOTAL_COUNT_HEADER, total.to_string()))
        .json(shown))
}

#[post("/api/posts")]
async fn create_post(
    pool: web::Data<DbPool>,
    body: web::Json<CreateIngredientRequest>,
) -> Result<HttpResponse, ApiError> {
    const FAILURE: &str = "Failed to create post";

    let new = body.into_inner().validate()?;
    let id = web::block(move || {
        let conn = pool.get()?;
        query::create_ingredient(&new, &conn)
    })
    .await
    .map_err(|e| ApiError::internal(FAILURE, e))?
    .map_err(|e| ApiError::internal(FAILURE, e))?;

    log::info!("created post {id}");
    Ok(HttpResponse::Ok().json(Created { id }))
}

#[delete("/api/posts/{id}")]
async fn delete_post(
    post_id: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    const FAILURE: &str = "Failed to delete post";

    let post_id = post_id.into_inner();
    web::block(move || {
        let conn = pool.get()?;
        query::delete_ingredient(post_id, &conn)
    })
    .await
    .map_err(|e| ApiError::internal(FAILURE, e))?
    .map_err(|e| ApiError::internal(FAILURE, e))?;

    Ok(HttpResponse::Ok().json(Deleted { success: true }))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ApiError::PayloadTooLarge(err.to_string()).into()
        }
        _ => ApiError::BadRequest(err.to_string()).into(),
    }
}

/// Registers the catalog API. The pool is expected as `web::Data<DbPool>`.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req: &HttpRequest| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req: &HttpRequest| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(list_posts)
    .service(create_post)
    .service(delete_post);
}

/// Serves the built client from `root`; unknown paths get `index.html` so
/// client-side routes survive a reload.
pub(crate) fn static_assets(root: &Path) -> Files {
    let index: PathBuf = root.join("index.html");

    Files::new("/", root)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(index).await?;
                let res = file.into_response(&req);
                Ok(ServiceResponse::new(req, res))
            }
        }))
}
