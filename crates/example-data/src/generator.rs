//! Deterministic network generation.
//!
//! Contacts, products, factories, and the tier links are fixed. The only
//! random choice is which part of its supplier's catalogue each sole
//! proprietor stocks; that choice comes from a `ChaCha8Rng` seeded with the
//! caller's seed so output is reproducible.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

use crate::catalogue::{CONTACTS, DownstreamRow, ENTREPRENEURS, FACTORIES, PRODUCTS, RETAILERS};
use crate::error::GenerationError;
use crate::seed::{ContactSeed, NetworkBlueprint, NodeSeed, ProductSeed};

/// Seed used when callers have no preference.
pub const DEFAULT_SEED: u64 = 42;

/// Fewest products an entrepreneur stocks (capped by the supplier catalogue).
const MIN_ENTREPRENEUR_PRODUCTS: usize = 3;

/// Most products an entrepreneur stocks.
const MAX_ENTREPRENEUR_PRODUCTS: usize = 6;

/// Scale of monetary amounts.
const MONEY_SCALE: u32 = 2;

/// Build the example network.
///
/// Factories come first, then retailers (each stocking its factory's full
/// catalogue), then entrepreneurs (each stocking a random subset of its
/// retailer's catalogue).
///
/// # Errors
///
/// Returns [`GenerationError`] if the built-in tables are inconsistent.
///
/// # Example
///
/// ```
/// use example_data::generate_network;
///
/// let blueprint = generate_network(7).expect("generated");
/// assert_eq!(blueprint.nodes_at_depth(0).len(), 3);
/// assert_eq!(blueprint.nodes_at_depth(1).len(), 5);
/// assert_eq!(blueprint.nodes_at_depth(2).len(), 7);
/// ```
pub fn generate_network(seed: u64) -> Result<NetworkBlueprint, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let contacts = CONTACTS
        .iter()
        .map(|&(email, country, city, street, house_number)| ContactSeed {
            email: email.to_owned(),
            country: country.to_owned(),
            city: city.to_owned(),
            street: street.to_owned(),
            house_number: house_number.to_owned(),
        })
        .collect();

    let products = PRODUCTS
        .iter()
        .map(|&(name, model, (year, month, day))| {
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|release_date| ProductSeed {
                    name: name.to_owned(),
                    model: model.to_owned(),
                    release_date,
                })
                .ok_or_else(|| GenerationError::InvalidReleaseDate {
                    product: name.to_owned(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut nodes: Vec<NodeSeed> = FACTORIES
        .iter()
        .map(|factory| NodeSeed {
            name: factory.name.to_owned(),
            contact: factory.contact,
            supplier: None,
            debt: Decimal::ZERO,
            products: factory.products.to_vec(),
        })
        .collect();

    let retailer_offset = nodes.len();
    for row in &RETAILERS {
        let catalogue = catalogue_of(&nodes, row.supplier);
        nodes.push(downstream_node(row, row.supplier, catalogue));
    }

    for row in &ENTREPRENEURS {
        let supplier = retailer_offset.saturating_add(row.supplier);
        let catalogue = pick_subset(&mut rng, &catalogue_of(&nodes, supplier));
        nodes.push(downstream_node(row, supplier, catalogue));
    }

    let blueprint = NetworkBlueprint {
        contacts,
        products,
        nodes,
    };
    blueprint.validate()?;
    Ok(blueprint)
}

fn catalogue_of(nodes: &[NodeSeed], index: usize) -> Vec<usize> {
    nodes
        .get(index)
        .map(|node| node.products.clone())
        .unwrap_or_default()
}

fn downstream_node(row: &DownstreamRow, supplier: usize, products: Vec<usize>) -> NodeSeed {
    NodeSeed {
        name: row.name.to_owned(),
        contact: row.contact,
        supplier: Some(supplier),
        debt: Decimal::new(row.debt_minor, MONEY_SCALE),
        products,
    }
}

/// Shuffle the supplier catalogue and keep between three and six entries.
fn pick_subset(rng: &mut ChaCha8Rng, catalogue: &[usize]) -> Vec<usize> {
    let wanted = rng.random_range(MIN_ENTREPRENEUR_PRODUCTS..=MAX_ENTREPRENEUR_PRODUCTS);
    let mut shuffled = catalogue.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(wanted.min(catalogue.len()));
    shuffled.sort_unstable();
    shuffled
}
