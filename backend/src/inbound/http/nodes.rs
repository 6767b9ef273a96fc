//! Network node handlers.
//!
//! ```text
//! GET    /api/v1/nodes?country=germ&level=1&ordering=-debt&limit=20
//! POST   /api/v1/nodes {"name":"Shop","contact_id":3,"products_ids":[1],"supplier_id":2}
//! GET    /api/v1/nodes/factories | retailers | retails | entrepreneurs
//! POST   /api/v1/nodes/clear-debt {"ids":[4,5]}
//! GET    /api/v1/nodes/{id}
//! PUT    /api/v1/nodes/{id}
//! PATCH  /api/v1/nodes/{id} {"supplier_id":null}
//! DELETE /api/v1/nodes/{id}
//! GET    /api/v1/nodes/{id}/debt-info
//! ```
//!
//! Every handler runs behind [`RequireStaff`](super::staff_guard::RequireStaff)
//! and receives the minted token through [`StaffCaller`].

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};

use crate::domain::{NodeDraft, NodeId, NodeLevel, NodePatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::nodes_dto::{
    ClearDebtRequest, ClearDebtResponse, DebtInfoBody, NodeBody, NodeListParams,
    NodePatchRequest, NodeRequest,
};
use crate::inbound::http::paging::{envelope, window};
use crate::inbound::http::schemas::{ErrorSchema, NodePageSchema};
use crate::inbound::http::staff_guard::StaffCaller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field;

/// Register the node routes on a scope.
///
/// Fixed segments precede `/{id}` so they are not parsed as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_nodes)
        .service(create_node)
        .service(list_factories)
        .service(list_retailers)
        .service(list_retails)
        .service(list_entrepreneurs)
        .service(clear_debt)
        .service(get_node)
        .service(replace_node)
        .service(patch_node)
        .service(delete_node)
        .service(debt_info);
}

/// List nodes with filters, ordering, and cursor paging.
#[utoipa::path(
    get,
    path = "/api/v1/nodes",
    params(NodeListParams),
    responses(
        (status = 200, description = "Page of nodes", body = NodePageSchema),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "listNodes",
    security(("SessionCookie" = []))
)]
#[get("")]
pub async fn list_nodes(
    req: HttpRequest,
    caller: StaffCaller,
    state: web::Data<HttpState>,
    params: web::Query<NodeListParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let window = window(&params.page_params())?;
    let query = params.into_query(window)?;
    let page = state.network_query.list_nodes(&caller.0, query).await?;
    let body = envelope(
        &req,
        page.nodes.into_iter().map(NodeBody::from).collect(),
        window,
        page.has_more,
    )?;
    Ok(HttpResponse::Ok().json(body))
}

/// Create a node. Debt starts at zero; level follows the supplier.
#[utoipa::path(
    post,
    path = "/api/v1/nodes",
    request_body = NodeRequest,
    responses(
        (status = 201, description = "Created node", body = NodeBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Referenced contact, product, or supplier missing", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "createNode",
    security(("SessionCookie" = []))
)]
#[post("")]
pub async fn create_node(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    payload: web::Json<NodeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = NodeDraft::try_from(payload.into_inner())?;
    let node = state.network.create_node(&caller.0, draft).await?;
    Ok(HttpResponse::Created().json(NodeBody::from(node)))
}

async fn nodes_at(
    caller: &StaffCaller,
    state: &HttpState,
    level: NodeLevel,
) -> ApiResult<web::Json<Vec<NodeBody>>> {
    let nodes = state.network_query.nodes_at_level(&caller.0, level).await?;
    Ok(web::Json(nodes.into_iter().map(NodeBody::from).collect()))
}

/// Level 0 nodes, ascending by name.
#[utoipa::path(
    get,
    path = "/api/v1/nodes/factories",
    responses(
        (status = 200, description = "Factories", body = [NodeBody]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "listFactories",
    security(("SessionCookie" = []))
)]
#[get("/factories")]
pub async fn list_factories(
    caller: StaffCaller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<NodeBody>>> {
    nodes_at(&caller, &state, NodeLevel::FACTORY).await
}

/// Level 1 nodes, ascending by name.
#[utoipa::path(
    get,
    path = "/api/v1/nodes/retailers",
    responses(
        (status = 200, description = "Retail networks", body = [NodeBody]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "listRetailers",
    security(("SessionCookie" = []))
)]
#[get("/retailers")]
pub async fn list_retailers(
    caller: StaffCaller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<NodeBody>>> {
    nodes_at(&caller, &state, NodeLevel::RETAIL).await
}

/// Alias of `/nodes/retailers`.
#[utoipa::path(
    get,
    path = "/api/v1/nodes/retails",
    responses(
        (status = 200, description = "Retail networks", body = [NodeBody]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "listRetails",
    security(("SessionCookie" = []))
)]
#[get("/retails")]
pub async fn list_retails(
    caller: StaffCaller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<NodeBody>>> {
    nodes_at(&caller, &state, NodeLevel::RETAIL).await
}

/// Level 2 nodes, ascending by name.
#[utoipa::path(
    get,
    path = "/api/v1/nodes/entrepreneurs",
    responses(
        (status = 200, description = "Sole proprietors", body = [NodeBody]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "listEntrepreneurs",
    security(("SessionCookie" = []))
)]
#[get("/entrepreneurs")]
pub async fn list_entrepreneurs(
    caller: StaffCaller,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<NodeBody>>> {
    nodes_at(&caller, &state, NodeLevel::SOLE_PROPRIETOR).await
}

/// Zero the debt of the listed nodes. Unknown ids are skipped.
#[utoipa::path(
    post,
    path = "/api/v1/nodes/clear-debt",
    request_body = ClearDebtRequest,
    responses(
        (status = 200, description = "Number of nodes cleared", body = ClearDebtResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "clearDebt",
    security(("SessionCookie" = []))
)]
#[post("/clear-debt")]
pub async fn clear_debt(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    payload: web::Json<ClearDebtRequest>,
) -> ApiResult<web::Json<ClearDebtResponse>> {
    let ids = payload.into_inner().ids.ok_or_else(|| missing_field("ids"))?;
    let cleared = state
        .network
        .clear_debt(&caller.0, ids.into_iter().map(NodeId::new).collect())
        .await?;
    Ok(web::Json(ClearDebtResponse { cleared }))
}

/// Fetch one node.
#[utoipa::path(
    get,
    path = "/api/v1/nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Node", body = NodeBody),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "getNode",
    security(("SessionCookie" = []))
)]
#[get("/{id}")]
pub async fn get_node(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<NodeBody>> {
    let id = NodeId::new(path.into_inner());
    let node = state.network_query.get_node(&caller.0, id).await?;
    Ok(web::Json(NodeBody::from(node)))
}

/// Replace every writable field of a node.
#[utoipa::path(
    put,
    path = "/api/v1/nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    request_body = NodeRequest,
    responses(
        (status = 200, description = "Updated node", body = NodeBody),
        (status = 400, description = "Invalid request or supplier cycle", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Node or reference missing", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "replaceNode",
    security(("SessionCookie" = []))
)]
#[put("/{id}")]
pub async fn replace_node(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<NodeRequest>,
) -> ApiResult<web::Json<NodeBody>> {
    let id = NodeId::new(path.into_inner());
    let draft = NodeDraft::try_from(payload.into_inner())?;
    let node = state.network.replace_node(&caller.0, id, draft).await?;
    Ok(web::Json(NodeBody::from(node)))
}

/// Update the supplied fields of a node.
#[utoipa::path(
    patch,
    path = "/api/v1/nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    request_body = NodePatchRequest,
    responses(
        (status = 200, description = "Updated node", body = NodeBody),
        (status = 400, description = "Invalid request or supplier cycle", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Node or reference missing", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "patchNode",
    security(("SessionCookie" = []))
)]
#[patch("/{id}")]
pub async fn patch_node(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<NodePatchRequest>,
) -> ApiResult<web::Json<NodeBody>> {
    let id = NodeId::new(path.into_inner());
    let patch = NodePatch::try_from(payload.into_inner())?;
    let node = state.network.patch_node(&caller.0, id, patch).await?;
    Ok(web::Json(NodeBody::from(node)))
}

/// Delete a node. Dependents lose their supplier and become factories.
#[utoipa::path(
    delete,
    path = "/api/v1/nodes/{id}",
    params(("id" = i64, Path, description = "Node id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "deleteNode",
    security(("SessionCookie" = []))
)]
#[delete("/{id}")]
pub async fn delete_node(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = NodeId::new(path.into_inner());
    state.network.delete_node(&caller.0, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// What a node owes and to whom.
#[utoipa::path(
    get,
    path = "/api/v1/nodes/{id}/debt-info",
    params(("id" = i64, Path, description = "Node id")),
    responses(
        (status = 200, description = "Debt summary", body = DebtInfoBody),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["nodes"],
    operation_id = "nodeDebtInfo",
    security(("SessionCookie" = []))
)]
#[get("/{id}/debt-info")]
pub async fn debt_info(
    caller: StaffCaller,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DebtInfoBody>> {
    let id = NodeId::new(path.into_inner());
    let info = state.network_query.debt_info(&caller.0, id).await?;
    Ok(web::Json(DebtInfoBody::from(info)))
}

#[cfg(test)]
#[path = "nodes_tests.rs"]
mod tests;
