//! Shared SQL for node hydration and hierarchy maintenance.
//!
//! Repositories that add, move, or remove nodes load the supplier links of the
//! whole network into a [`SupplyHierarchy`], apply the change there, and write
//! the resulting level changes back inside the same transaction.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{
    Contact, Debt, LevelChange, NetworkNode, NodeId, NodeLevel, Product, SupplierLink,
    SupplierRef,
};

use super::models::{ContactRow, NodeRow, ProductRow};
use super::schema::{contacts, network_node_products, network_nodes, products};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct CorruptRow(String);

fn corrupt(message: String) -> DieselError {
    DieselError::DeserializationError(Box::new(CorruptRow(message)))
}

/// Convert a domain level into its column value.
pub(crate) fn level_column(level: NodeLevel) -> QueryResult<i32> {
    i32::try_from(level).map_err(|err| DieselError::SerializationError(Box::new(err)))
}

/// Offset and fetch size for a window, over-fetching one row to detect more.
pub(crate) fn sql_window(offset: usize, limit: usize) -> (i64, i64) {
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let fetch = i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX);
    (offset, fetch)
}

/// Load every stored supplier link.
pub(crate) async fn load_links(conn: &mut AsyncPgConnection) -> QueryResult<Vec<SupplierLink>> {
    let rows: Vec<(i64, Option<i64>)> = network_nodes::table
        .select((network_nodes::id, network_nodes::supplier_id))
        .load(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(node, supplier)| SupplierLink {
            node: NodeId::new(node),
            supplier: supplier.map(NodeId::new),
        })
        .collect())
}

/// Persist recomputed levels.
pub(crate) async fn write_levels(
    conn: &mut AsyncPgConnection,
    changes: &[LevelChange],
) -> QueryResult<()> {
    for change in changes {
        diesel::update(network_nodes::table.find(change.node.value()))
            .set(network_nodes::level.eq(level_column(change.to)?))
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Replace the product set of a node.
pub(crate) async fn replace_products(
    conn: &mut AsyncPgConnection,
    node_id: i64,
    product_ids: &[i64],
) -> QueryResult<()> {
    diesel::delete(network_node_products::table.filter(network_node_products::node_id.eq(node_id)))
        .execute(conn)
        .await?;
    if product_ids.is_empty() {
        return Ok(());
    }
    let rows: Vec<_> = product_ids
        .iter()
        .map(|&product_id| super::models::NodeProductRow {
            node_id,
            product_id,
        })
        .collect();
    diesel::insert_into(network_node_products::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

/// Attach contacts, products, and supplier names to node rows.
///
/// The output keeps the input order.
pub(crate) async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<NodeRow>,
) -> QueryResult<Vec<NetworkNode>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let contact_ids: Vec<i64> = rows.iter().map(|row| row.contact_id).collect();
    let node_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let supplier_ids: Vec<i64> = rows.iter().filter_map(|row| row.supplier_id).collect();

    let contacts: HashMap<i64, Contact> = contacts::table
        .filter(contacts::id.eq_any(contact_ids))
        .select(ContactRow::as_select())
        .load::<ContactRow>(conn)
        .await?
        .into_iter()
        .map(|row| (row.id, Contact::from(row)))
        .collect();

    let stocked: Vec<(i64, ProductRow)> = network_node_products::table
        .inner_join(products::table)
        .filter(network_node_products::node_id.eq_any(node_ids))
        .order((network_node_products::node_id.asc(), products::id.asc()))
        .select((network_node_products::node_id, ProductRow::as_select()))
        .load(conn)
        .await?;
    let mut catalogues: HashMap<i64, Vec<Product>> = HashMap::new();
    for (node_id, product) in stocked {
        catalogues
            .entry(node_id)
            .or_default()
            .push(Product::from(product));
    }

    let suppliers: HashMap<i64, String> = network_nodes::table
        .filter(network_nodes::id.eq_any(supplier_ids))
        .select((network_nodes::id, network_nodes::name))
        .load::<(i64, String)>(conn)
        .await?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| {
            let contact = contacts.get(&row.contact_id).cloned().ok_or_else(|| {
                corrupt(format!(
                    "node {} references missing contact {}",
                    row.id, row.contact_id
                ))
            })?;
            let level = NodeLevel::try_from(row.level)
                .map_err(|_| corrupt(format!("node {} has level {}", row.id, row.level)))?;
            let debt = Debt::try_new(row.debt)
                .map_err(|err| corrupt(format!("node {} debt: {err}", row.id)))?;
            let supplier = row.supplier_id.map(|id| SupplierRef {
                id: NodeId::new(id),
                name: suppliers.get(&id).cloned().unwrap_or_default(),
            });
            Ok(NetworkNode {
                id: NodeId::new(row.id),
                name: row.name,
                contact,
                products: catalogues.remove(&row.id).unwrap_or_default(),
                supplier,
                debt,
                level,
                created_at: row.created_at,
            })
        })
        .collect()
}

/// Load and hydrate one node.
pub(crate) async fn find_node(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> QueryResult<Option<NetworkNode>> {
    let row = network_nodes::table
        .find(id)
        .select(NodeRow::as_select())
        .first::<NodeRow>(conn)
        .await
        .optional()?;
    match row {
        Some(row) => Ok(hydrate(conn, vec![row]).await?.into_iter().next()),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn levels_fit_the_column() {
        assert_eq!(level_column(NodeLevel::SOLE_PROPRIETOR).expect("fits"), 2);
        assert!(level_column(NodeLevel::new(u32::MAX)).is_err());
    }

    #[rstest]
    fn windows_overfetch_by_one() {
        assert_eq!(sql_window(40, 20), (40, 21));
        assert_eq!(sql_window(0, usize::MAX), (0, i64::MAX));
    }

    #[rstest]
    fn corrupt_rows_surface_as_deserialisation_errors() {
        let error = corrupt("node 1 has level -1".to_owned());
        assert!(matches!(error, DieselError::DeserializationError(_)));
        assert!(error.to_string().contains("level -1"));
    }
}
