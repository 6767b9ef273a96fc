//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound layer, the schema
//! wrappers that describe domain types without coupling them to utoipa, and
//! the session cookie security scheme.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::{LoginRequest, SessionAccountBody};
use crate::inbound::http::catalogue_dto::{
    ContactBody, ContactRequest, ProductBody, ProductRequest,
};
use crate::inbound::http::nodes_dto::{
    ClearDebtRequest, ClearDebtResponse, DebtInfoBody, NodeBody, NodePatchRequest, NodeRequest,
};
use crate::inbound::http::schemas::{
    ContactPageSchema, ErrorCodeSchema, ErrorSchema, NodePageSchema, PaginationLinksSchema,
    ProductPageSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Electronics distribution network API",
        description = "Staff-only management of a factory, retailer, and sole proprietor supply hierarchy."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::nodes::list_nodes,
        crate::inbound::http::nodes::create_node,
        crate::inbound::http::nodes::list_factories,
        crate::inbound::http::nodes::list_retailers,
        crate::inbound::http::nodes::list_retails,
        crate::inbound::http::nodes::list_entrepreneurs,
        crate::inbound::http::nodes::clear_debt,
        crate::inbound::http::nodes::get_node,
        crate::inbound::http::nodes::replace_node,
        crate::inbound::http::nodes::patch_node,
        crate::inbound::http::nodes::delete_node,
        crate::inbound::http::nodes::debt_info,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PaginationLinksSchema,
        NodePageSchema,
        ContactPageSchema,
        ProductPageSchema,
        NodeBody,
        NodeRequest,
        NodePatchRequest,
        DebtInfoBody,
        ClearDebtRequest,
        ClearDebtResponse,
        ContactBody,
        ContactRequest,
        ProductBody,
        ProductRequest,
        LoginRequest,
        SessionAccountBody,
    )),
    tags(
        (name = "auth", description = "Staff session management"),
        (name = "nodes", description = "Supply hierarchy nodes, level views, and debts"),
        (name = "contacts", description = "Node contact details"),
        (name = "products", description = "Product catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
