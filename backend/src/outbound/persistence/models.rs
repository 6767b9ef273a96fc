//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{Contact, ContactId, Product, ProductId, StaffAccount, StaffId};

use super::schema::{contacts, network_node_products, network_nodes, products, staff_accounts};

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: i64,
    pub email: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactId::new(row.id),
            email: row.email,
            country: row.country,
            city: row.city,
            street: row.street,
            house_number: row.house_number,
        }
    }
}

/// Insertable struct for creating contacts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub email: &'a str,
    pub country: &'a str,
    pub city: &'a str,
    pub street: &'a str,
    pub house_number: &'a str,
}

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            model: row.model,
            release_date: row.release_date,
        }
    }
}

/// Insertable struct for creating products.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub name: &'a str,
    pub model: &'a str,
    pub release_date: NaiveDate,
}

/// Row struct for reading from the network_nodes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = network_nodes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NodeRow {
    pub id: i64,
    pub name: String,
    pub contact_id: i64,
    pub supplier_id: Option<i64>,
    pub debt: Decimal,
    pub level: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating network nodes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = network_nodes)]
pub(crate) struct NewNodeRow<'a> {
    pub name: &'a str,
    pub contact_id: i64,
    pub supplier_id: Option<i64>,
    pub debt: Decimal,
    pub level: i32,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the directly writable node columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = network_nodes)]
pub(crate) struct NodeChangeset<'a> {
    pub name: Option<&'a str>,
    pub contact_id: Option<i64>,
}

/// Join row linking a node to a stocked product.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = network_node_products)]
pub(crate) struct NodeProductRow {
    pub node_id: i64,
    pub product_id: i64,
}

/// Row struct for reading staff accounts, including the password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staff_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StaffRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl StaffRow {
    pub(crate) fn account(&self) -> StaffAccount {
        StaffAccount {
            id: StaffId::new(self.id),
            username: self.username.clone(),
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}

/// Insertable struct for provisioning staff accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = staff_accounts)]
pub(crate) struct NewStaffRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_staff: bool,
    pub is_superuser: bool,
}
