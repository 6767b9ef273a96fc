//! Hierarchy depth of a node.

use std::fmt;
use std::str::FromStr;

use crate::domain::validation::{FieldViolation, ViolationKind};

/// Distance from the root of a supply chain.
///
/// `0` is a factory, `1` a retail network, `2` a sole proprietor. Deeper
/// chains are allowed and carry the "Unknown level" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeLevel(u32);

impl NodeLevel {
    /// Root of a chain.
    pub const FACTORY: Self = Self(0);
    /// Supplied directly by a factory.
    pub const RETAIL: Self = Self(1);
    /// Supplied by a retail network.
    pub const SOLE_PROPRIETOR: Self = Self(2);

    /// Wrap a raw depth.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw depth.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Level of a node supplied by a node at this level.
    #[must_use]
    pub const fn below(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Display label.
    ///
    /// # Examples
    /// ```
    /// use network_backend::domain::NodeLevel;
    ///
    /// assert_eq!(NodeLevel::RETAIL.label(), "Retail network");
    /// assert_eq!(NodeLevel::new(5).label(), "Unknown level");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            0 => "Factory",
            1 => "Retail network",
            2 => "Sole proprietor",
            _ => "Unknown level",
        }
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeLevel {
    type Err = FieldViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Stored levels are INTEGER columns, so anything past i32::MAX is invalid.
        s.trim()
            .parse::<i32>()
            .ok()
            .and_then(|raw| u32::try_from(raw).ok())
            .map(Self)
            .ok_or_else(|| FieldViolation::new("level", ViolationKind::InvalidLevel).with_value(s))
    }
}

impl TryFrom<i32> for NodeLevel {
    type Error = std::num::TryFromIntError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Self)
    }
}

impl TryFrom<NodeLevel> for i32 {
    type Error = std::num::TryFromIntError;

    fn try_from(value: NodeLevel) -> Result<Self, Self::Error> {
        Self::try_from(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Factory")]
    #[case(1, "Retail network")]
    #[case(2, "Sole proprietor")]
    #[case(3, "Unknown level")]
    fn labels(#[case] raw: u32, #[case] label: &str) {
        assert_eq!(NodeLevel::new(raw).label(), label);
    }

    #[rstest]
    #[case("2", Some(2))]
    #[case(" 0 ", Some(0))]
    #[case("-1", None)]
    #[case("two", None)]
    #[case("2147483647", Some(2_147_483_647))]
    #[case("3000000000", None)]
    fn parses_query_values(#[case] raw: &str, #[case] expected: Option<u32>) {
        assert_eq!(raw.parse::<NodeLevel>().ok().map(NodeLevel::value), expected);
    }

    #[rstest]
    fn below_increments() {
        assert_eq!(NodeLevel::FACTORY.below(), NodeLevel::RETAIL);
        assert_eq!(NodeLevel::RETAIL.below(), NodeLevel::SOLE_PROPRIETOR);
    }
}
