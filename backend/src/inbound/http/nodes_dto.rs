//! Request and response bodies for the node endpoints.
//!
//! Writable fields are `name`, `contact_id`, `products_ids`, and
//! `supplier_id`. Request bodies do not deny unknown fields, so a client that
//! echoes `debt`, `level`, or `created_at` back has those values ignored.

use chrono::SecondsFormat;
use pagination::PageParams;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ContactId, DebtInfo, Error, ListWindow, NetworkNode, NodeDraft, NodeFilter, NodeId,
    NodeLevel, NodeListQuery, NodeName, NodeOrdering, NodePatch, ProductId, parse_date,
    text_term,
};
use crate::inbound::http::catalogue_dto::{ContactBody, ProductBody};
use crate::inbound::http::validation::missing_field;

/// Distinguish an explicit `null` from an absent field.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Node as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NodeBody {
    /// Node id.
    pub id: i64,
    /// Display name.
    #[schema(example = "TechnoWorld")]
    pub name: String,
    /// Owning contact.
    pub contact: ContactBody,
    /// Stocked products.
    pub products: Vec<ProductBody>,
    /// Supplier id, if any.
    pub supplier_id: Option<i64>,
    /// Supplier name, if any.
    pub supplier: Option<String>,
    /// Debt to the supplier with two fractional digits.
    #[schema(example = "1500000.50")]
    pub debt: String,
    /// Derived hierarchy level.
    pub level: u32,
    /// Level label.
    #[schema(example = "Retail network")]
    pub level_display: String,
    /// Creation time (RFC 3339, UTC).
    #[schema(example = "2026-01-01T00:00:00Z")]
    pub created_at: String,
}

impl From<NetworkNode> for NodeBody {
    fn from(node: NetworkNode) -> Self {
        let (supplier_id, supplier) = match node.supplier {
            Some(supplier) => (Some(supplier.id.value()), Some(supplier.name)),
            None => (None, None),
        };
        Self {
            id: node.id.value(),
            name: node.name,
            contact: ContactBody::from(node.contact),
            products: node.products.into_iter().map(ProductBody::from).collect(),
            supplier_id,
            supplier,
            debt: node.debt.to_string(),
            level: node.level.value(),
            level_display: node.level.label().to_owned(),
            created_at: node.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Body of `POST /api/v1/nodes` and `PUT /api/v1/nodes/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NodeRequest {
    /// Display name.
    pub name: Option<String>,
    /// Owning contact id.
    pub contact_id: Option<i64>,
    /// Stocked product ids.
    #[serde(default)]
    pub products_ids: Vec<i64>,
    /// Supplier id; `null` or absent for a factory.
    pub supplier_id: Option<i64>,
}

impl TryFrom<NodeRequest> for NodeDraft {
    type Error = Error;

    fn try_from(value: NodeRequest) -> Result<Self, Self::Error> {
        let raw_name = value.name.ok_or_else(|| missing_field("name"))?;
        let name = NodeName::parse(&raw_name)?;
        let contact_id = value.contact_id.ok_or_else(|| missing_field("contact_id"))?;
        Ok(Self::new(
            name,
            ContactId::new(contact_id),
            value.products_ids.into_iter().map(ProductId::new).collect(),
            value.supplier_id.map(NodeId::new),
        ))
    }
}

/// Body of `PATCH /api/v1/nodes/{id}`.
///
/// Absent fields keep their stored value. `supplier_id: null` detaches the
/// node from its supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NodePatchRequest {
    /// New display name.
    pub name: Option<String>,
    /// New owning contact id.
    pub contact_id: Option<i64>,
    /// Replacement product ids.
    pub products_ids: Option<Vec<i64>>,
    /// New supplier id, or `null` to detach.
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i64>)]
    pub supplier_id: Option<Option<i64>>,
}

impl TryFrom<NodePatchRequest> for NodePatch {
    type Error = Error;

    fn try_from(value: NodePatchRequest) -> Result<Self, Self::Error> {
        let name = value
            .name
            .as_deref()
            .map(NodeName::parse)
            .transpose()?;
        Ok(Self {
            name,
            contact_id: value.contact_id.map(ContactId::new),
            product_ids: value
                .products_ids
                .map(|ids| ids.into_iter().map(ProductId::new).collect()),
            supplier_id: value.supplier_id.map(|id| id.map(NodeId::new)),
        }
        .normalised())
    }
}

/// Query string of `GET /api/v1/nodes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NodeListParams {
    /// Case-insensitive substring of the contact country.
    pub country: Option<String>,
    /// Case-insensitive substring of the contact city.
    pub city: Option<String>,
    /// Exact level.
    pub level: Option<String>,
    /// Inclusive lower creation date bound, `YYYY-MM-DD`.
    pub created_after: Option<String>,
    /// Inclusive upper creation date bound, `YYYY-MM-DD`.
    pub created_before: Option<String>,
    /// Substring of node name, contact city, or contact country.
    pub search: Option<String>,
    /// `name`, `level`, `debt`, or `created_at`, optionally prefixed with `-`.
    pub ordering: Option<String>,
    /// Page size, default 20, maximum 100.
    pub limit: Option<usize>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
}

impl NodeListParams {
    /// Paging part of the query.
    #[must_use]
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.cursor.clone(), self.limit)
    }

    /// Validate the filters and combine them with a resolved window.
    ///
    /// # Errors
    /// Returns a violation naming the first invalid parameter.
    pub fn into_query(self, window: ListWindow) -> Result<NodeListQuery, Error> {
        let level = text_term(self.level.as_deref())
            .map(|raw| raw.parse::<NodeLevel>())
            .transpose()?;
        let created_after = text_term(self.created_after.as_deref())
            .map(|raw| parse_date("created_after", &raw))
            .transpose()?;
        let created_before = text_term(self.created_before.as_deref())
            .map(|raw| parse_date("created_before", &raw))
            .transpose()?;
        let ordering = text_term(self.ordering.as_deref())
            .map(|raw| raw.parse::<NodeOrdering>())
            .transpose()?
            .unwrap_or_default();
        Ok(NodeListQuery {
            filter: NodeFilter {
                country: text_term(self.country.as_deref()),
                city: text_term(self.city.as_deref()),
                level,
                created_after,
                created_before,
                search: text_term(self.search.as_deref()),
            },
            ordering,
            offset: window.offset,
            limit: window.limit,
        })
    }
}

/// Response of `GET /api/v1/nodes/{id}/debt-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DebtInfoBody {
    /// Node name.
    pub node_name: String,
    /// Debt with two fractional digits.
    #[schema(example = "250000.00")]
    pub debt: String,
    /// Supplier name, if any.
    pub supplier: Option<String>,
    /// Node level.
    pub level: u32,
    /// Level label.
    pub level_display: String,
}

impl From<DebtInfo> for DebtInfoBody {
    fn from(info: DebtInfo) -> Self {
        Self {
            node_name: info.node_name,
            debt: info.debt.to_string(),
            supplier: info.supplier,
            level: info.level.value(),
            level_display: info.level.label().to_owned(),
        }
    }
}

/// Body of `POST /api/v1/nodes/clear-debt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ClearDebtRequest {
    /// Nodes whose debt is set to zero.
    pub ids: Option<Vec<i64>>,
}

/// Response of `POST /api/v1/nodes/clear-debt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClearDebtResponse {
    /// Number of nodes updated.
    pub cleared: u64,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{Contact, Debt, OrderField, SupplierRef};

    fn node() -> NetworkNode {
        NetworkNode {
            id: NodeId::new(4),
            name: "TechnoWorld".to_owned(),
            contact: Contact {
                id: ContactId::new(2),
                email: "shop@example.com".to_owned(),
                country: "Germany".to_owned(),
                city: "Berlin".to_owned(),
                street: "Unter den Linden".to_owned(),
                house_number: "7".to_owned(),
            },
            products: Vec::new(),
            supplier: Some(SupplierRef {
                id: NodeId::new(1),
                name: "Apple Factory".to_owned(),
            }),
            debt: Debt::try_new(rust_decimal::Decimal::new(150_000_050, 2)).expect("debt"),
            level: NodeLevel::RETAIL,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("time"),
        }
    }

    #[rstest]
    fn nodes_render_with_labels_and_string_debt() {
        let body = serde_json::to_value(NodeBody::from(node())).expect("json");
        assert_eq!(body["debt"], "1500000.50");
        assert_eq!(body["level_display"], "Retail network");
        assert_eq!(body["supplier"], "Apple Factory");
        assert_eq!(body["supplier_id"], 1);
        assert_eq!(body["created_at"], "2026-01-01T00:00:00Z");
    }

    #[rstest]
    fn read_only_fields_are_ignored_on_write() {
        let request: NodeRequest = serde_json::from_value(json!({
            "name": "Shop",
            "contact_id": 3,
            "products_ids": [5, 2, 5],
            "debt": "999.00",
            "level": 7,
            "created_at": "2020-01-01T00:00:00Z"
        }))
        .expect("body");
        let draft = NodeDraft::try_from(request).expect("draft");
        assert_eq!(draft.product_ids, vec![ProductId::new(2), ProductId::new(5)]);
        assert_eq!(draft.supplier_id, None);
    }

    #[rstest]
    #[case(json!({"contact_id": 1}), "name")]
    #[case(json!({"name": "Shop"}), "contact_id")]
    fn drafts_require_name_and_contact(#[case] body: serde_json::Value, #[case] field: &str) {
        let request: NodeRequest = serde_json::from_value(body).expect("body");
        let error = NodeDraft::try_from(request).expect_err("rejected");
        assert_eq!(error.details().expect("details")["field"], field);
    }

    #[rstest]
    #[case(json!({}), None)]
    #[case(json!({"supplier_id": null}), Some(None))]
    #[case(json!({"supplier_id": 9}), Some(Some(NodeId::new(9))))]
    fn patches_distinguish_null_from_absent(
        #[case] body: serde_json::Value,
        #[case] expected: Option<Option<NodeId>>,
    ) {
        let request: NodePatchRequest = serde_json::from_value(body).expect("body");
        let patch = NodePatch::try_from(request).expect("patch");
        assert_eq!(patch.supplier_id, expected);
    }

    #[rstest]
    fn list_params_build_a_query() {
        let params = NodeListParams {
            country: Some(" germ ".to_owned()),
            level: Some("1".to_owned()),
            created_after: Some("2026-01-01".to_owned()),
            ordering: Some("-debt".to_owned()),
            search: Some("   ".to_owned()),
            ..NodeListParams::default()
        };
        let query = params
            .into_query(ListWindow { offset: 20, limit: 10 })
            .expect("query");
        assert_eq!(query.filter.country.as_deref(), Some("germ"));
        assert_eq!(query.filter.level, Some(NodeLevel::RETAIL));
        assert_eq!(
            query.filter.created_after,
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
        assert_eq!(query.filter.search, None);
        assert_eq!(query.ordering.field, OrderField::Debt);
        assert!(query.ordering.descending);
        assert_eq!((query.offset, query.limit), (20, 10));
    }

    #[rstest]
    #[case(NodeListParams { level: Some("two".to_owned()), ..NodeListParams::default() }, "level", "invalid_level")]
    #[case(NodeListParams { created_before: Some("01/02/2026".to_owned()), ..NodeListParams::default() }, "created_before", "invalid_date")]
    #[case(NodeListParams { ordering: Some("price".to_owned()), ..NodeListParams::default() }, "ordering", "invalid_ordering")]
    fn invalid_filters_name_the_parameter(
        #[case] params: NodeListParams,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = params
            .into_query(ListWindow { offset: 0, limit: 20 })
            .expect_err("rejected");
        let details = error.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }
}
