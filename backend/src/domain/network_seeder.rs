//! Example network seeding.
//!
//! Converts a deterministic [`NetworkBlueprint`] into validated domain drafts,
//! derives each node's level with the hierarchy engine, and hands the whole
//! network to the [`NetworkSeedRepository`] port in one request.

use std::sync::Arc;

use example_data::{GenerationError, NetworkBlueprint, generate_network};
use mockable::Clock;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::ports::{
    NetworkSeedRepository, NetworkSeedRepositoryError, NetworkSeedRequest, SeedMode, SeedNode,
    SeedOutcome,
};
use crate::domain::{
    ContactDraft, Debt, FieldViolation, HierarchyError, NodeId, NodeLevel, NodeName,
    ProductDraft, SupplyHierarchy,
};

/// Errors raised while preparing or applying an example network.
#[derive(Debug, Error)]
pub enum NetworkSeedingError {
    /// Blueprint generation failed.
    #[error("example network generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated contact failed validation.
    #[error("example contact #{index} is invalid: {source}")]
    InvalidContact {
        /// Contact index in the blueprint.
        index: usize,
        /// Validation failure.
        #[source]
        source: FieldViolation,
    },
    /// A generated product failed validation.
    #[error("example product #{index} is invalid: {source}")]
    InvalidProduct {
        /// Product index in the blueprint.
        index: usize,
        /// Validation failure.
        #[source]
        source: FieldViolation,
    },
    /// A generated node failed validation.
    #[error("example node '{name}' is invalid: {source}")]
    InvalidNode {
        /// Node name as generated.
        name: String,
        /// Validation failure.
        #[source]
        source: FieldViolation,
    },
    /// The blueprint's supplier links break a hierarchy rule.
    #[error("example network hierarchy is invalid: {0}")]
    Hierarchy(#[from] HierarchyError),
    /// The blueprint has more nodes than identifiers can address.
    #[error("example network has too many nodes: {count}")]
    TooManyNodes {
        /// Node count.
        count: usize,
    },
    /// Persistence failed.
    #[error("example network persistence error: {0}")]
    Persistence(#[from] NetworkSeedRepositoryError),
}

/// Summary of a seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSeedReport {
    /// Persistence outcome.
    pub outcome: SeedOutcome,
    /// Level 0 nodes in the blueprint.
    pub factories: usize,
    /// Level 1 nodes in the blueprint.
    pub retailers: usize,
    /// Level 2 nodes in the blueprint.
    pub entrepreneurs: usize,
    /// Nodes below level 2.
    pub deeper: usize,
    /// Sum of opening debts.
    pub total_debt: Decimal,
    /// Mean catalogue size, rounded to two places.
    pub average_products: Decimal,
}

impl NetworkSeedReport {
    fn describe(request: &NetworkSeedRequest, outcome: SeedOutcome) -> Self {
        let count_at = |level: NodeLevel| request.nodes.iter().filter(|n| n.level == level).count();
        let factories = count_at(NodeLevel::FACTORY);
        let retailers = count_at(NodeLevel::RETAIL);
        let entrepreneurs = count_at(NodeLevel::SOLE_PROPRIETOR);
        let deeper = request
            .nodes
            .len()
            .saturating_sub(factories)
            .saturating_sub(retailers)
            .saturating_sub(entrepreneurs);
        let total_debt = request.nodes.iter().map(|n| n.debt.amount()).sum();
        let stocked: usize = request.nodes.iter().map(|n| n.products.len()).sum();
        let average_products = Decimal::from(stocked)
            .checked_div(Decimal::from(request.nodes.len()))
            .map_or(Decimal::ZERO, |avg| avg.round_dp(2));
        Self {
            outcome,
            factories,
            retailers,
            entrepreneurs,
            deeper,
            total_debt,
            average_products,
        }
    }
}

/// Service that loads the example network.
#[derive(Clone)]
pub struct NetworkSeeder<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> NetworkSeeder<R> {
    /// Create a seeder over a persistence adapter.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> NetworkSeeder<R>
where
    R: NetworkSeedRepository,
{
    /// Generate the network for `seed` and apply it.
    ///
    /// # Errors
    /// Returns [`NetworkSeedingError`] if generation, validation, or
    /// persistence fails.
    pub async fn seed(
        &self,
        seed: u64,
        mode: SeedMode,
    ) -> Result<NetworkSeedReport, NetworkSeedingError> {
        let blueprint = generate_network(seed)?;
        self.apply(&blueprint, mode).await
    }

    /// Apply an already generated blueprint.
    ///
    /// # Errors
    /// Returns [`NetworkSeedingError`] if validation or persistence fails.
    pub async fn apply(
        &self,
        blueprint: &NetworkBlueprint,
        mode: SeedMode,
    ) -> Result<NetworkSeedReport, NetworkSeedingError> {
        let request = prepare_request(blueprint, mode, self.clock.utc())?;
        let summary = NetworkSeedReport::describe(&request, SeedOutcome::SkippedNonEmpty);
        let outcome = self.repository.seed_network(request).await?;
        Ok(NetworkSeedReport { outcome, ..summary })
    }
}

fn prepare_request(
    blueprint: &NetworkBlueprint,
    mode: SeedMode,
    created_at: chrono::DateTime<chrono::Utc>,
) -> Result<NetworkSeedRequest, NetworkSeedingError> {
    let contacts = blueprint
        .contacts
        .iter()
        .enumerate()
        .map(|(index, c)| {
            ContactDraft::try_new(&c.email, &c.country, &c.city, &c.street, &c.house_number)
                .map_err(|source| NetworkSeedingError::InvalidContact { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let products = blueprint
        .products
        .iter()
        .enumerate()
        .map(|(index, p)| {
            ProductDraft::try_new(&p.name, &p.model, p.release_date)
                .map_err(|source| NetworkSeedingError::InvalidProduct { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut hierarchy = SupplyHierarchy::default();
    let mut nodes = Vec::with_capacity(blueprint.nodes.len());
    for (index, seed) in blueprint.nodes.iter().enumerate() {
        let invalid = |source| NetworkSeedingError::InvalidNode {
            name: seed.name.clone(),
            source,
        };
        let name = NodeName::parse(&seed.name).map_err(invalid)?;
        let debt = Debt::try_new(seed.debt).map_err(invalid)?;
        let supplier = seed.supplier.map(arena_id).transpose()?;
        let level = hierarchy.insert(arena_id(index)?, supplier)?;
        nodes.push(SeedNode {
            name,
            contact: seed.contact,
            supplier: seed.supplier,
            products: seed.products.clone(),
            debt,
            level,
        });
    }

    Ok(NetworkSeedRequest {
        mode,
        contacts,
        products,
        nodes,
        created_at,
    })
}

fn arena_id(index: usize) -> Result<NodeId, NetworkSeedingError> {
    i64::try_from(index)
        .map(NodeId::new)
        .map_err(|_| NetworkSeedingError::TooManyNodes { count: index })
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::ports::MockNetworkSeedRepository;
    use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp};

    #[fixture]
    fn blueprint() -> NetworkBlueprint {
        generate_network(example_data::DEFAULT_SEED).expect("blueprint")
    }

    #[rstest]
    fn request_levels_follow_supplier_chain(blueprint: NetworkBlueprint) {
        let request =
            prepare_request(&blueprint, SeedMode::Replace, fixture_timestamp()).expect("request");
        for node in &request.nodes {
            let expected = match node.supplier {
                None => NodeLevel::FACTORY,
                Some(index) => request
                    .nodes
                    .get(index)
                    .map(|s| s.level.below())
                    .expect("supplier precedes node"),
            };
            assert_eq!(node.level, expected, "{}", node.name);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn report_summarises_the_network(blueprint: NetworkBlueprint) {
        let mut repo = MockNetworkSeedRepository::new();
        repo.expect_seed_network()
            .withf(|request| {
                request.mode == SeedMode::Replace
                    && request.contacts.len() == 17
                    && request.products.len() == 20
                    && request.created_at == fixture_timestamp()
            })
            .times(1)
            .return_once(|request| {
                Ok(SeedOutcome::Applied {
                    contacts: request.contacts.len(),
                    products: request.products.len(),
                    nodes: request.nodes.len(),
                })
            });

        let seeder = NetworkSeeder::new(Arc::new(repo), fixture_clock());
        let report = seeder
            .apply(&blueprint, SeedMode::Replace)
            .await
            .expect("seeded");

        assert_eq!(
            (report.factories, report.retailers, report.entrepreneurs, report.deeper),
            (3, 5, 7, 0)
        );
        assert_eq!(report.total_debt, dec!(11175004.45));
        assert_eq!(
            report.outcome,
            SeedOutcome::Applied {
                contacts: 17,
                products: 20,
                nodes: 15,
            }
        );
        assert!(report.average_products > Decimal::ZERO);
    }

    #[rstest]
    #[tokio::test]
    async fn skipped_runs_still_report_the_blueprint(blueprint: NetworkBlueprint) {
        let mut repo = MockNetworkSeedRepository::new();
        repo.expect_seed_network()
            .times(1)
            .return_once(|_| Ok(SeedOutcome::SkippedNonEmpty));

        let seeder = NetworkSeeder::new(Arc::new(repo), fixture_clock());
        let report = seeder
            .apply(&blueprint, SeedMode::IfEmpty)
            .await
            .expect("skipped");

        assert_eq!(report.outcome, SeedOutcome::SkippedNonEmpty);
        assert_eq!(report.factories, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn persistence_errors_propagate(blueprint: NetworkBlueprint) {
        let mut repo = MockNetworkSeedRepository::new();
        repo.expect_seed_network()
            .times(1)
            .return_once(|_| Err(NetworkSeedRepositoryError::connection("refused")));

        let seeder = NetworkSeeder::new(Arc::new(repo), fixture_clock());
        let error = seeder
            .apply(&blueprint, SeedMode::Replace)
            .await
            .expect_err("fails");

        assert!(matches!(error, NetworkSeedingError::Persistence(_)));
    }

    #[rstest]
    fn invalid_blueprint_names_the_node(mut blueprint: NetworkBlueprint) {
        if let Some(node) = blueprint.nodes.first_mut() {
            node.debt = dec!(-5);
        }
        let error = prepare_request(&blueprint, SeedMode::Replace, fixture_timestamp())
            .expect_err("negative debt");
        assert!(matches!(
            error,
            NetworkSeedingError::InvalidNode { ref name, .. } if name == "Xiaomi Manufacturing Plant"
        ));
    }
}
