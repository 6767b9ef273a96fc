//! Supplier hierarchy engine.
//!
//! [`SupplyHierarchy`] is an arena of nodes keyed by [`NodeId`]. Each entry
//! holds an optional supplier key and its derived level; a reverse index of
//! dependents drives cascading level updates. No entry ever points at a live
//! object, so cycles in the data cannot become reference cycles in memory.
//!
//! Persistence adapters load the links for the whole network, apply the
//! requested change here, and write back the returned [`LevelChange`]s in the
//! same transaction.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::{NodeId, NodeLevel};
use crate::domain::validation::{FieldViolation, ViolationKind};

/// Supplier link of one node, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplierLink {
    /// The supplied node.
    pub node: NodeId,
    /// Its supplier, if any.
    pub supplier: Option<NodeId>,
}

/// Level of `node` moved from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Affected node.
    pub node: NodeId,
    /// Level before the change.
    pub from: NodeLevel,
    /// Level after the change.
    pub to: NodeLevel,
}

/// Outcome of removing nodes from the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detachment {
    /// Nodes that were present and are now gone.
    pub removed: Vec<NodeId>,
    /// Surviving nodes whose supplier was removed; they are now roots.
    pub detached: Vec<NodeId>,
    /// Level changes across the detached subtrees.
    pub relevelled: Vec<LevelChange>,
}

/// Supplier-chain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// A node named itself as supplier.
    #[error("node {node} cannot be its own supplier")]
    SelfSupply {
        /// Offending node.
        node: NodeId,
    },
    /// A referenced node is not in the hierarchy.
    #[error("network node {id} does not exist")]
    UnknownNode {
        /// Missing node.
        id: NodeId,
    },
    /// The supplier already has the node somewhere in its own chain.
    #[error("node {supplier} cannot supply node {node}: node {node} is already in its supply chain")]
    CyclicSupplierChain {
        /// Node being re-parented.
        node: NodeId,
        /// Rejected supplier.
        supplier: NodeId,
    },
    /// A node was inserted twice.
    #[error("network node {id} already exists")]
    DuplicateNode {
        /// Repeated node.
        id: NodeId,
    },
    /// Stored links already contain a loop or dangle.
    #[error("stored supplier chain through node {node} is corrupt")]
    CorruptChain {
        /// A node on the corrupt chain.
        node: NodeId,
    },
}

impl HierarchyError {
    /// Field-level form of the errors a caller can fix by changing input.
    ///
    /// Returns `None` for conditions that indicate missing records or
    /// corrupt storage.
    #[must_use]
    pub fn violation(&self) -> Option<FieldViolation> {
        match self {
            Self::SelfSupply { node } => Some(
                FieldViolation::new("supplier_id", ViolationKind::SelfSupply)
                    .with_value(node.to_string()),
            ),
            Self::CyclicSupplierChain { supplier, .. } => Some(
                FieldViolation::new("supplier_id", ViolationKind::CyclicSupplierChain)
                    .with_value(supplier.to_string()),
            ),
            Self::UnknownNode { .. } | Self::DuplicateNode { .. } | Self::CorruptChain { .. } => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    supplier: Option<NodeId>,
    level: NodeLevel,
}

/// Arena of supplier links with derived levels.
///
/// ## Invariants
/// - Every supplier key refers to a node in the arena.
/// - Supplier chains are acyclic.
/// - `level(n) == 0` when `n` has no supplier, otherwise
///   `level(supplier(n)) + 1`.
///
/// # Examples
/// ```
/// use network_backend::domain::{NodeId, NodeLevel, SupplyHierarchy};
///
/// let (f, r, e) = (NodeId::new(1), NodeId::new(2), NodeId::new(3));
/// let mut hierarchy = SupplyHierarchy::default();
/// hierarchy.insert(f, None).expect("factory");
/// hierarchy.insert(r, Some(f)).expect("retailer");
/// hierarchy.insert(e, Some(r)).expect("entrepreneur");
///
/// let changes = hierarchy.reparent(r, None).expect("detach retailer");
/// assert_eq!(changes.len(), 2);
/// assert_eq!(hierarchy.level_of(e), Some(NodeLevel::RETAIL));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SupplyHierarchy {
    nodes: HashMap<NodeId, Slot>,
    dependents: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl SupplyHierarchy {
    /// Build the arena from stored links and derive every level.
    ///
    /// # Errors
    /// Returns [`HierarchyError::UnknownNode`] for a dangling supplier,
    /// [`HierarchyError::DuplicateNode`] for repeated nodes, and
    /// [`HierarchyError::CorruptChain`] when links form a loop.
    pub fn from_links(links: impl IntoIterator<Item = SupplierLink>) -> Result<Self, HierarchyError> {
        let mut hierarchy = Self::default();
        for link in links {
            if hierarchy.nodes.contains_key(&link.node) {
                return Err(HierarchyError::DuplicateNode { id: link.node });
            }
            hierarchy.nodes.insert(
                link.node,
                Slot {
                    supplier: link.supplier,
                    level: NodeLevel::FACTORY,
                },
            );
        }

        for (&node, slot) in &hierarchy.nodes {
            if let Some(supplier) = slot.supplier {
                if !hierarchy.nodes.contains_key(&supplier) {
                    return Err(HierarchyError::UnknownNode { id: supplier });
                }
                hierarchy.dependents.entry(supplier).or_default().insert(node);
            }
        }

        let roots: Vec<NodeId> = hierarchy
            .nodes
            .iter()
            .filter(|(_, slot)| slot.supplier.is_none())
            .map(|(&id, _)| id)
            .collect();
        let mut reached = 0_usize;
        for root in roots {
            reached = reached.saturating_add(hierarchy.assign_levels(root, NodeLevel::FACTORY).1);
        }
        if reached != hierarchy.nodes.len() {
            if let Some(node) = hierarchy.first_unrooted() {
                return Err(HierarchyError::CorruptChain { node });
            }
        }
        Ok(hierarchy)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` is in the arena.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Derived level of `id`.
    #[must_use]
    pub fn level_of(&self, id: NodeId) -> Option<NodeLevel> {
        self.nodes.get(&id).map(|slot| slot.level)
    }

    /// Supplier of `id`; `None` when the node is unknown.
    #[must_use]
    pub fn supplier_of(&self, id: NodeId) -> Option<Option<NodeId>> {
        self.nodes.get(&id).map(|slot| slot.supplier)
    }

    /// Supplier chain of `id` from its direct supplier up to the root.
    ///
    /// The walk is bounded by the number of nodes.
    ///
    /// # Errors
    /// Returns [`HierarchyError::UnknownNode`] if `id` is absent and
    /// [`HierarchyError::CorruptChain`] if the walk does not reach a root.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        let mut current = self
            .nodes
            .get(&id)
            .ok_or(HierarchyError::UnknownNode { id })?
            .supplier;
        let mut chain = Vec::new();
        while let Some(next) = current {
            if chain.len() >= self.nodes.len() {
                return Err(HierarchyError::CorruptChain { node: id });
            }
            chain.push(next);
            current = self
                .nodes
                .get(&next)
                .ok_or(HierarchyError::CorruptChain { node: next })?
                .supplier;
        }
        Ok(chain)
    }

    /// Level a node would take under `supplier`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::UnknownNode`] if the supplier is absent.
    pub fn level_under(&self, supplier: Option<NodeId>) -> Result<NodeLevel, HierarchyError> {
        match supplier {
            None => Ok(NodeLevel::FACTORY),
            Some(id) => self
                .level_of(id)
                .map(NodeLevel::below)
                .ok_or(HierarchyError::UnknownNode { id }),
        }
    }

    /// Add a new node and return its level.
    ///
    /// # Errors
    /// Rejects duplicates, self-supply, and unknown suppliers.
    pub fn insert(&mut self, id: NodeId, supplier: Option<NodeId>) -> Result<NodeLevel, HierarchyError> {
        if self.nodes.contains_key(&id) {
            return Err(HierarchyError::DuplicateNode { id });
        }
        if supplier == Some(id) {
            return Err(HierarchyError::SelfSupply { node: id });
        }
        let level = self.level_under(supplier)?;
        self.nodes.insert(id, Slot { supplier, level });
        if let Some(parent) = supplier {
            self.dependents.entry(parent).or_default().insert(id);
        }
        Ok(level)
    }

    /// Change the supplier of `id` and cascade levels through its subtree.
    ///
    /// Returns every level that changed, starting with `id` itself.
    ///
    /// # Errors
    /// Rejects unknown nodes, self-supply, and suppliers that already have
    /// `id` in their chain. The arena is untouched on error.
    pub fn reparent(
        &mut self,
        id: NodeId,
        supplier: Option<NodeId>,
    ) -> Result<Vec<LevelChange>, HierarchyError> {
        let previous = self
            .nodes
            .get(&id)
            .ok_or(HierarchyError::UnknownNode { id })?
            .supplier;
        if let Some(candidate) = supplier {
            self.check_candidate(id, candidate)?;
        }
        let level = self.level_under(supplier)?;

        if previous != supplier {
            if let Some(old) = previous {
                self.unlink(old, id);
            }
            if let Some(new) = supplier {
                self.dependents.entry(new).or_default().insert(id);
            }
            if let Some(slot) = self.nodes.get_mut(&id) {
                slot.supplier = supplier;
            }
        }
        Ok(self.assign_levels(id, level).0)
    }

    /// Remove nodes, detaching surviving dependents into roots.
    ///
    /// Unknown ids are skipped.
    pub fn remove(&mut self, ids: &[NodeId]) -> Detachment {
        let doomed: BTreeSet<NodeId> = ids.iter().copied().filter(|id| self.contains(*id)).collect();
        let mut detached = BTreeSet::new();

        for id in &doomed {
            if let Some(slot) = self.nodes.remove(id) {
                if let Some(parent) = slot.supplier {
                    self.unlink(parent, *id);
                }
            }
            for dependent in self.dependents.remove(id).unwrap_or_default() {
                if !doomed.contains(&dependent) {
                    detached.insert(dependent);
                }
            }
        }

        let mut relevelled = Vec::new();
        for dependent in &detached {
            if let Some(slot) = self.nodes.get_mut(dependent) {
                slot.supplier = None;
            }
            relevelled.extend(self.assign_levels(*dependent, NodeLevel::FACTORY).0);
        }

        Detachment {
            removed: doomed.into_iter().collect(),
            detached: detached.into_iter().collect(),
            relevelled,
        }
    }

    /// Every transitive dependent of `id`, breadth first.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        let mut found = Vec::new();
        while let Some(current) = queue.pop_front() {
            for &child in self.dependents.get(&current).into_iter().flatten() {
                if seen.insert(child) {
                    found.push(child);
                    queue.push_back(child);
                }
            }
        }
        found
    }

    /// Nodes at exactly `level`, ascending by id.
    #[must_use]
    pub fn nodes_at(&self, level: NodeLevel) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, slot)| slot.level == level)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn check_candidate(&self, id: NodeId, candidate: NodeId) -> Result<(), HierarchyError> {
        if candidate == id {
            return Err(HierarchyError::SelfSupply { node: id });
        }
        if !self.nodes.contains_key(&candidate) {
            return Err(HierarchyError::UnknownNode { id: candidate });
        }
        if self.ancestors(candidate)?.contains(&id) {
            return Err(HierarchyError::CyclicSupplierChain {
                node: id,
                supplier: candidate,
            });
        }
        Ok(())
    }

    fn unlink(&mut self, supplier: NodeId, dependent: NodeId) {
        if let Some(children) = self.dependents.get_mut(&supplier) {
            children.remove(&dependent);
            if children.is_empty() {
                self.dependents.remove(&supplier);
            }
        }
    }

    /// Set `start` to `level` and push levels down its subtree.
    ///
    /// Returns the changes made and the number of nodes visited.
    fn assign_levels(&mut self, start: NodeId, level: NodeLevel) -> (Vec<LevelChange>, usize) {
        let mut changes = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(start, level)]);
        while let Some((node, wanted)) = queue.pop_front() {
            if !seen.insert(node) {
                continue;
            }
            if let Some(slot) = self.nodes.get_mut(&node) {
                if slot.level != wanted {
                    changes.push(LevelChange {
                        node,
                        from: slot.level,
                        to: wanted,
                    });
                    slot.level = wanted;
                }
            }
            for &child in self.dependents.get(&node).into_iter().flatten() {
                queue.push_back((child, wanted.below()));
            }
        }
        (changes, seen.len())
    }

    fn first_unrooted(&self) -> Option<NodeId> {
        self.nodes
            .keys()
            .copied()
            .find(|&id| self.ancestors(id).is_err())
    }
}
