//! Product handlers.
//!
//! ```text
//! GET    /api/v1/products?limit=20
//! POST   /api/v1/products {"name":"iPhone 15 Pro","model":"A2848","release_date":"2023-09-22"}
//! GET    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};

use crate::domain::{ProductDraft, ProductId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue_dto::{ProductBody, ProductRequest};
use crate::inbound::http::contacts::PageQuery;
use crate::inbound::http::paging::{envelope, window};
use crate::inbound::http::schemas::{ErrorSchema, ProductPageSchema};
use crate::inbound::http::staff_guard::StaffCaller;
use crate::inbound::http::state::HttpState;

/// Register the product routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_products)
        .service(create_product)
        .service(get_product)
        .service(delete_product);
}

/// List products ascending by id.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductPageSchema),
        (status = 400, description = "Invalid cursor", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security(("SessionCookie" = []))
)]
#[get("")]
pub async fn list_products(
    req: HttpRequest,
    caller: StaffCaller,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let window = window(&query.into_inner().into_params())?;
    let page = state.products.list_products(&caller.0, window).await?;
    let body = envelope(
        &req,
        page.items.into_iter().map(ProductBody::from).collect(),
        window,
        page.has_more,
    )?;
    Ok(HttpResponse::Ok().json(body))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Created product", body = ProductBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("SessionCookie" = []))
)]
#[post("")]
pub async fn create_product(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ProductDraft::try_from(payload.into_inner())?;
    let product = state.products.create_product(&caller.0, draft).await?;
    Ok(HttpResponse::Created().json(ProductBody::from(product)))
}

/// Fetch one product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductBody),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security(("SessionCookie" = []))
)]
#[get("/{id}")]
pub async fn get_product(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ProductBody>> {
    let product = state
        .products
        .get_product(&caller.0, ProductId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ProductBody::from(product)))
}

/// Delete a product and drop it from every node catalogue.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "deleteProduct",
    security(("SessionCookie" = []))
)]
#[delete("/{id}")]
pub async fn delete_product(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .products
        .delete_product(&caller.0, ProductId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
