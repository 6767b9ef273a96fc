//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Contact details owned by network nodes.
    contacts (id) {
        id -> Int8,
        /// Unique address.
        email -> Varchar,
        country -> Varchar,
        city -> Varchar,
        street -> Varchar,
        house_number -> Varchar,
    }
}

diesel::table! {
    /// Product catalogue.
    products (id) {
        id -> Int8,
        name -> Varchar,
        model -> Varchar,
        release_date -> Date,
    }
}

diesel::table! {
    /// Distribution network nodes.
    ///
    /// `supplier_id` references this table with `ON DELETE SET NULL`;
    /// `contact_id` cascades deletes from `contacts`.
    network_nodes (id) {
        id -> Int8,
        name -> Varchar,
        contact_id -> Int8,
        supplier_id -> Nullable<Int8>,
        /// `NUMERIC(10,2)`, never negative.
        debt -> Numeric,
        /// Derived depth in the supplier chain.
        level -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many link between nodes and the products they stock.
    network_node_products (node_id, product_id) {
        node_id -> Int8,
        product_id -> Int8,
    }
}

diesel::table! {
    /// Operators allowed to manage the network.
    staff_accounts (id) {
        id -> Int8,
        username -> Varchar,
        /// PHC-formatted argon2 hash.
        password_hash -> Text,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(network_nodes -> contacts (contact_id));
diesel::joinable!(network_node_products -> network_nodes (node_id));
diesel::joinable!(network_node_products -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    contacts,
    products,
    network_nodes,
    network_node_products,
    staff_accounts,
);
