//! Contact handlers.
//!
//! ```text
//! GET    /api/v1/contacts?limit=20
//! POST   /api/v1/contacts {"email":"shop@example.com","country":"Japan",...}
//! GET    /api/v1/contacts/{id}
//! DELETE /api/v1/contacts/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{ContactDraft, ContactId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue_dto::{ContactBody, ContactRequest};
use crate::inbound::http::paging::{envelope, window};
use crate::inbound::http::schemas::{ContactPageSchema, ErrorSchema};
use crate::inbound::http::staff_guard::StaffCaller;
use crate::inbound::http::state::HttpState;
use pagination::PageParams;

/// Paging parameters for the catalogue listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size, default 20, maximum 100.
    pub limit: Option<usize>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
}

impl PageQuery {
    /// Convert into shared paging parameters.
    #[must_use]
    pub fn into_params(self) -> PageParams {
        PageParams::new(self.cursor, self.limit)
    }
}

/// Register the contact routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_contacts)
        .service(create_contact)
        .service(get_contact)
        .service(delete_contact);
}

/// List contacts ascending by id.
#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of contacts", body = ContactPageSchema),
        (status = 400, description = "Invalid cursor", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "listContacts",
    security(("SessionCookie" = []))
)]
#[get("")]
pub async fn list_contacts(
    req: HttpRequest,
    caller: StaffCaller,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let window = window(&query.into_inner().into_params())?;
    let page = state.contacts.list_contacts(&caller.0, window).await?;
    let body = envelope(
        &req,
        page.items.into_iter().map(ContactBody::from).collect(),
        window,
        page.has_more,
    )?;
    Ok(HttpResponse::Ok().json(body))
}

/// Create a contact.
#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Created contact", body = ContactBody),
        (status = 400, description = "Invalid request or duplicate email", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "createContact",
    security(("SessionCookie" = []))
)]
#[post("")]
pub async fn create_contact(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ContactDraft::try_from(payload.into_inner())?;
    let contact = state.contacts.create_contact(&caller.0, draft).await?;
    Ok(HttpResponse::Created().json(ContactBody::from(contact)))
}

/// Fetch one contact.
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact", body = ContactBody),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "getContact",
    security(("SessionCookie" = []))
)]
#[get("/{id}")]
pub async fn get_contact(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ContactBody>> {
    let contact = state
        .contacts
        .get_contact(&caller.0, ContactId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ContactBody::from(contact)))
}

/// Delete a contact together with the nodes it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact",
    security(("SessionCookie" = []))
)]
#[delete("/{id}")]
pub async fn delete_contact(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .contacts
        .delete_contact(&caller.0, ContactId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
