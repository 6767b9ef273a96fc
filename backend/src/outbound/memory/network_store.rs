//! In-memory contacts, products, and network nodes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{
    ContactRemoval, ContactRepository, ContactRepositoryError, NetworkNodeRepository,
    NetworkNodeRepositoryError, NetworkSeedRepository, NetworkSeedRepositoryError,
    NetworkSeedRequest, ProductRepository, ProductRepositoryError, SeedMode, SeedOutcome,
};
use crate::domain::{
    Contact, ContactDraft, ContactId, Debt, Detachment, ListWindow, NetworkNode, NewNetworkNode,
    NodeId, NodeLevel, NodeListQuery, NodeOrdering, NodePage, NodePatch, NodeUpdate, Page,
    Product, ProductDraft, ProductId, SupplierRef, SupplyHierarchy,
};

#[derive(Debug, Clone)]
struct StoredNode {
    name: String,
    contact: ContactId,
    products: Vec<ProductId>,
    debt: Debt,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct NetworkState {
    contacts: BTreeMap<ContactId, Contact>,
    products: BTreeMap<ProductId, Product>,
    nodes: BTreeMap<NodeId, StoredNode>,
    hierarchy: SupplyHierarchy,
    last_contact: i64,
    last_product: i64,
    last_node: i64,
}

fn next_id(last: i64) -> i64 {
    last.saturating_add(1)
}

impl NetworkState {
    fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.products.is_empty() && self.nodes.is_empty()
    }

    fn email_taken(&self, email: &str) -> bool {
        self.contacts.values().any(|c| c.email == email)
    }

    fn insert_contact(&mut self, draft: ContactDraft) -> Contact {
        self.last_contact = next_id(self.last_contact);
        let contact = Contact::from_draft(ContactId::new(self.last_contact), draft);
        self.contacts.insert(contact.id, contact.clone());
        contact
    }

    fn insert_product(&mut self, draft: ProductDraft) -> Product {
        self.last_product = next_id(self.last_product);
        let product = Product::from_draft(ProductId::new(self.last_product), draft);
        self.products.insert(product.id, product.clone());
        product
    }

    fn check_references(
        &self,
        contact: Option<ContactId>,
        products: Option<&[ProductId]>,
    ) -> Result<(), NetworkNodeRepositoryError> {
        if let Some(id) = contact.filter(|id| !self.contacts.contains_key(id)) {
            return Err(NetworkNodeRepositoryError::ContactNotFound { id });
        }
        let missing = products
            .unwrap_or_default()
            .iter()
            .find(|id| !self.products.contains_key(id));
        match missing {
            Some(&id) => Err(NetworkNodeRepositoryError::ProductNotFound { id }),
            None => Ok(()),
        }
    }

    fn hydrate(&self, id: NodeId) -> Result<Option<NetworkNode>, NetworkNodeRepositoryError> {
        let Some(stored) = self.nodes.get(&id) else {
            return Ok(None);
        };
        let contact = self.contacts.get(&stored.contact).cloned().ok_or_else(|| {
            NetworkNodeRepositoryError::query(format!(
                "node {id} references missing contact {}",
                stored.contact
            ))
        })?;
        let products = stored
            .products
            .iter()
            .filter_map(|pid| self.products.get(pid).cloned())
            .collect();
        let supplier = self
            .hierarchy
            .supplier_of(id)
            .flatten()
            .map(|sid| SupplierRef {
                id: sid,
                name: self
                    .nodes
                    .get(&sid)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
            });
        let level = self.hierarchy.level_of(id).ok_or_else(|| {
            NetworkNodeRepositoryError::query(format!("node {id} missing from hierarchy"))
        })?;
        Ok(Some(NetworkNode {
            id,
            name: stored.name.clone(),
            contact,
            products,
            supplier,
            debt: stored.debt,
            level,
            created_at: stored.created_at,
        }))
    }

    fn hydrate_all(
        &self,
        ids: impl IntoIterator<Item = NodeId>,
    ) -> Result<Vec<NetworkNode>, NetworkNodeRepositoryError> {
        let mut nodes = Vec::new();
        for id in ids {
            if let Some(node) = self.hydrate(id)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    fn remove_nodes(&mut self, ids: &[NodeId]) -> Detachment {
        let detachment = self.hierarchy.remove(ids);
        for id in &detachment.removed {
            self.nodes.remove(id);
        }
        detachment
    }
}

/// Process-local store implementing the contact, product, node, and seeding
/// ports over one shared state.
///
/// # Examples
/// ```
/// use network_backend::outbound::memory::InMemoryNetworkStore;
///
/// let store = InMemoryNetworkStore::new();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryNetworkStore {
    state: Mutex<NetworkState>,
}

impl InMemoryNetworkStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryNetworkStore {
    async fn create(&self, draft: ContactDraft) -> Result<Contact, ContactRepositoryError> {
        let mut state = self.state.lock().await;
        if state.email_taken(draft.email.as_str()) {
            return Err(ContactRepositoryError::duplicate_email(draft.email.as_str()));
        }
        Ok(state.insert_contact(draft))
    }

    async fn find(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self.state.lock().await.contacts.get(&id).cloned())
    }

    async fn list(&self, window: ListWindow) -> Result<Page<Contact>, ContactRepositoryError> {
        let state = self.state.lock().await;
        Ok(Page::slice(state.contacts.values().cloned(), window))
    }

    async fn delete(
        &self,
        id: ContactId,
    ) -> Result<Option<ContactRemoval>, ContactRepositoryError> {
        let mut state = self.state.lock().await;
        if state.contacts.remove(&id).is_none() {
            return Ok(None);
        }
        let owned: Vec<NodeId> = state
            .nodes
            .iter()
            .filter(|(_, node)| node.contact == id)
            .map(|(&node_id, _)| node_id)
            .collect();
        let detachment = state.remove_nodes(&owned);
        Ok(Some(ContactRemoval {
            removed_nodes: detachment.removed,
            detached_nodes: detachment.detached,
            relevelled: detachment.relevelled.len(),
        }))
    }
}

#[async_trait]
impl ProductRepository for InMemoryNetworkStore {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductRepositoryError> {
        Ok(self.state.lock().await.insert_product(draft))
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn list(&self, window: ListWindow) -> Result<Page<Product>, ProductRepositoryError> {
        let state = self.state.lock().await;
        Ok(Page::slice(state.products.values().cloned(), window))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, ProductRepositoryError> {
        let mut state = self.state.lock().await;
        if state.products.remove(&id).is_none() {
            return Ok(false);
        }
        for node in state.nodes.values_mut() {
            node.products.retain(|pid| *pid != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl NetworkNodeRepository for InMemoryNetworkStore {
    async fn create(&self, node: NewNetworkNode) -> Result<NetworkNode, NetworkNodeRepositoryError> {
        let mut state = self.state.lock().await;
        let NewNetworkNode {
            draft,
            debt,
            created_at,
        } = node;
        state.check_references(Some(draft.contact_id), Some(&draft.product_ids))?;

        let id = NodeId::new(next_id(state.last_node));
        state.hierarchy.insert(id, draft.supplier_id)?;
        state.last_node = id.value();
        state.nodes.insert(
            id,
            StoredNode {
                name: draft.name.into_inner(),
                contact: draft.contact_id,
                products: draft.product_ids,
                debt,
                created_at,
            },
        );
        state
            .hydrate(id)?
            .ok_or(NetworkNodeRepositoryError::NodeNotFound { id })
    }

    async fn update(
        &self,
        id: NodeId,
        patch: NodePatch,
    ) -> Result<NodeUpdate, NetworkNodeRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.nodes.contains_key(&id) {
            return Err(NetworkNodeRepositoryError::NodeNotFound { id });
        }
        state.check_references(patch.contact_id, patch.product_ids.as_deref())?;

        let level_changes = match patch.supplier_id {
            Some(supplier) => state.hierarchy.reparent(id, supplier)?,
            None => Vec::new(),
        };
        if let Some(stored) = state.nodes.get_mut(&id) {
            if let Some(name) = patch.name {
                stored.name = name.into_inner();
            }
            if let Some(contact) = patch.contact_id {
                stored.contact = contact;
            }
            if let Some(products) = patch.product_ids {
                stored.products = products;
            }
        }
        let node = state
            .hydrate(id)?
            .ok_or(NetworkNodeRepositoryError::NodeNotFound { id })?;
        Ok(NodeUpdate {
            node,
            level_changes,
        })
    }

    async fn delete(&self, id: NodeId) -> Result<Option<Detachment>, NetworkNodeRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.nodes.contains_key(&id) {
            return Ok(None);
        }
        Ok(Some(state.remove_nodes(&[id])))
    }

    async fn find(&self, id: NodeId) -> Result<Option<NetworkNode>, NetworkNodeRepositoryError> {
        self.state.lock().await.hydrate(id)
    }

    async fn list(&self, query: NodeListQuery) -> Result<NodePage, NetworkNodeRepositoryError> {
        let state = self.state.lock().await;
        let nodes = state.hydrate_all(state.nodes.keys().copied())?;
        Ok(query.page(nodes))
    }

    async fn list_by_level(
        &self,
        level: NodeLevel,
    ) -> Result<Vec<NetworkNode>, NetworkNodeRepositoryError> {
        let state = self.state.lock().await;
        let mut nodes = state.hydrate_all(state.hierarchy.nodes_at(level))?;
        let ordering = NodeOrdering::default();
        nodes.sort_by(|a, b| ordering.compare(a, b));
        Ok(nodes)
    }

    async fn clear_debt(&self, ids: Vec<NodeId>) -> Result<u64, NetworkNodeRepositoryError> {
        let mut state = self.state.lock().await;
        let mut cleared: u64 = 0;
        for id in ids {
            if let Some(node) = state.nodes.get_mut(&id) {
                node.debt = Debt::ZERO;
                cleared = cleared.saturating_add(1);
            }
        }
        Ok(cleared)
    }
}

#[async_trait]
impl NetworkSeedRepository for InMemoryNetworkStore {
    async fn seed_network(
        &self,
        request: NetworkSeedRequest,
    ) -> Result<SeedOutcome, NetworkSeedRepositoryError> {
        let mut state = self.state.lock().await;
        if request.mode == SeedMode::IfEmpty && !state.is_empty() {
            return Ok(SeedOutcome::SkippedNonEmpty);
        }

        let mut seeded = NetworkState::default();
        let mut contact_ids = Vec::with_capacity(request.contacts.len());
        for draft in request.contacts {
            if seeded.email_taken(draft.email.as_str()) {
                return Err(NetworkSeedRepositoryError::invalid_reference(format!(
                    "duplicate contact email {}",
                    draft.email
                )));
            }
            contact_ids.push(seeded.insert_contact(draft).id);
        }
        let product_ids: Vec<ProductId> = request
            .products
            .into_iter()
            .map(|draft| seeded.insert_product(draft).id)
            .collect();

        let mut node_ids: Vec<NodeId> = Vec::with_capacity(request.nodes.len());
        for seed in request.nodes {
            let invalid = |what: &str, index: usize| {
                NetworkSeedRepositoryError::invalid_reference(format!(
                    "node '{}' references unknown {what} #{index}",
                    seed.name.as_str()
                ))
            };
            let contact = *contact_ids
                .get(seed.contact)
                .ok_or_else(|| invalid("contact", seed.contact))?;
            let supplier = match seed.supplier {
                Some(index) => Some(*node_ids.get(index).ok_or_else(|| invalid("supplier", index))?),
                None => None,
            };
            let products = seed
                .products
                .iter()
                .map(|&index| {
                    product_ids
                        .get(index)
                        .copied()
                        .ok_or_else(|| invalid("product", index))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let id = NodeId::new(next_id(seeded.last_node));
            let level = seeded
                .hierarchy
                .insert(id, supplier)
                .map_err(|err| NetworkSeedRepositoryError::invalid_reference(err.to_string()))?;
            if level != seed.level {
                return Err(NetworkSeedRepositoryError::invalid_reference(format!(
                    "node '{}' declared level {} but its chain gives {}",
                    seed.name.as_str(),
                    seed.level,
                    level
                )));
            }
            seeded.last_node = id.value();
            seeded.nodes.insert(
                id,
                StoredNode {
                    name: seed.name.into_inner(),
                    contact,
                    products,
                    debt: seed.debt,
                    created_at: request.created_at,
                },
            );
            node_ids.push(id);
        }

        let outcome = SeedOutcome::Applied {
            contacts: seeded.contacts.len(),
            products: seeded.products.len(),
            nodes: seeded.nodes.len(),
        };
        *state = seeded;
        Ok(outcome)
    }
}
