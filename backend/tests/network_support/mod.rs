//! Harness and shared steps for the network behaviour suites.

pub(crate) mod steps;
pub(crate) mod world;
