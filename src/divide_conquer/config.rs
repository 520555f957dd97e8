//! Divide-and-conquer configuration.

use crate::rank_query::RankQueryKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the divide-and-conquer sweep engine.
///
/// # Defaults
///
/// ```
/// use u_ndsort::divide_conquer::DivideConquerConfig;
/// use u_ndsort::rank_query::RankQueryKind;
///
/// let config = DivideConquerConfig::default();
/// assert_eq!(config.rank_query, RankQueryKind::Fenwick);
/// assert!((config.three_way_threshold - 0.5).abs() < 1e-12);
/// assert!(config.binary_search_2d);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DivideConquerConfig {
    /// Structure answering "best rank at keys `<=` k" in the 2-objective sweep.
    pub rank_query: RankQueryKind,

    /// Fraction of median-valued points above which a range is split three
    /// ways (less / equal / greater) instead of two ways (0.0–1.0).
    ///
    /// 0.0 always splits three ways; 1.0 never does.
    pub three_way_threshold: f64,

    /// Solve two-objective inputs by binary search over front boundaries
    /// instead of the generic sweep.
    pub binary_search_2d: bool,
}

impl Default for DivideConquerConfig {
    fn default() -> Self {
        Self {
            rank_query: RankQueryKind::Fenwick,
            three_way_threshold: 0.5,
            binary_search_2d: true,
        }
    }
}

impl DivideConquerConfig {
    /// Sets the rank-query realization.
    pub fn with_rank_query(mut self, kind: RankQueryKind) -> Self {
        self.rank_query = kind;
        self
    }

    /// Sets the three-way split threshold.
    pub fn with_three_way_threshold(mut self, threshold: f64) -> Self {
        self.three_way_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables the two-objective binary search.
    pub fn with_binary_search_2d(mut self, enabled: bool) -> Self {
        self.binary_search_2d = enabled;
        self
    }

    /// Display name of this configuration.
    pub fn name(&self) -> String {
        let mut name = format!(
            "Divide-and-conquer sweep ({}, three-way split above {}",
            self.rank_query.name(),
            self.three_way_threshold
        );
        if !self.binary_search_2d {
            name.push_str(", no 2-D binary search");
        }
        name.push(')');
        name
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.three_way_threshold) {
            return Err("three_way_threshold must be within [0, 1]".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let config = DivideConquerConfig::default()
            .with_rank_query(RankQueryKind::BalancedTree)
            .with_three_way_threshold(0.25)
            .with_binary_search_2d(false);
        assert_eq!(config.rank_query, RankQueryKind::BalancedTree);
        assert!((config.three_way_threshold - 0.25).abs() < 1e-12);
        assert!(!config.binary_search_2d);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_clamped() {
        let config = DivideConquerConfig::default().with_three_way_threshold(3.0);
        assert!((config.three_way_threshold - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let config = DivideConquerConfig {
            three_way_threshold: f64::NAN,
            ..DivideConquerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_names_are_distinct() {
        let a = DivideConquerConfig::default().name();
        let b = DivideConquerConfig::default()
            .with_rank_query(RankQueryKind::BalancedTree)
            .name();
        let c = DivideConquerConfig::default()
            .with_binary_search_2d(false)
            .name();
        assert_eq!(a, "Divide-and-conquer sweep (Fenwick tree, three-way split above 0.5)");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
