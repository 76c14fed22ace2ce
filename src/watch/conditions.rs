use rust_decimal::Decimal;

use super::traits::Condition;
use crate::common::types::{Snapshot, BID_TOP};

/// Direction of a threshold comparison (both strict)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// Holds when the value is strictly greater than the threshold
    #[default]
    Above,
    /// Holds when the value is strictly less than the threshold
    Below,
}

impl Comparison {
    pub fn holds(self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparison::Above => value > threshold,
            Comparison::Below => value < threshold,
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::Above => write!(f, ">"),
            Comparison::Below => write!(f, "<"),
        }
    }
}

/// Compares one field of one pair against a fixed threshold.
///
/// Defaults to `bid_top` and [`Comparison::Above`]. The chat command that
/// creates these has always fired on a price above the threshold even
/// though it was introduced as a "price dropped" alarm; callers who want
/// the drop semantics ask for [`ThresholdCondition::below`] explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCondition {
    pair: String,
    field: String,
    threshold: Decimal,
    comparison: Comparison,
}

impl ThresholdCondition {
    pub fn new(pair: impl Into<String>, threshold: Decimal) -> Self {
        Self {
            pair: pair.into(),
            field: BID_TOP.to_string(),
            threshold,
            comparison: Comparison::Above,
        }
    }

    /// Fire when the value drops under the threshold instead
    pub fn below(mut self) -> Self {
        self.comparison = Comparison::Below;
        self
    }

    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Compare a different record field, e.g. `price` on the trade tape
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
}

impl Condition for ThresholdCondition {
    fn check(&self, snapshot: &Snapshot) -> bool {
        snapshot
            .instrument(&self.pair)
            .and_then(|record| record.decimal(&self.field))
            .map(|value| self.comparison.holds(value, self.threshold))
            .unwrap_or(false)
    }
}
