// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type ModuleId = String;
pub type OfferId = String;

/// Signed point quantity. Balances are never negative; transaction amounts are.
pub type Points = i64;

/// Learning module difficulty tier. Each tier scales the module's base award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Beginner => 1.0,
            Difficulty::Intermediate => 1.5,
            Difficulty::Advanced => 2.0,
            Difficulty::Expert => 2.5,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        };
        f.write_str(label)
    }
}

/// Kind of balance-changing event recorded in the points log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointsTransactionType {
    EarnedLearning,
    SpentStock,
    Bonus,
    Refund,
}

impl PointsTransactionType {
    /// Credits add to lifetime earnings; debits add to lifetime spending.
    pub fn is_credit(self) -> bool {
        match self {
            PointsTransactionType::EarnedLearning
            | PointsTransactionType::Bonus
            | PointsTransactionType::Refund => true,
            PointsTransactionType::SpentStock => false,
        }
    }
}

impl fmt::Display for PointsTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PointsTransactionType::EarnedLearning => "earned_learning",
            PointsTransactionType::SpentStock => "spent_stock",
            PointsTransactionType::Bonus => "bonus",
            PointsTransactionType::Refund => "refund",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_scale_by_tier() {
        assert_eq!(Difficulty::Beginner.multiplier(), 1.0);
        assert_eq!(Difficulty::Intermediate.multiplier(), 1.5);
        assert_eq!(Difficulty::Advanced.multiplier(), 2.0);
        assert_eq!(Difficulty::Expert.multiplier(), 2.5);
    }

    #[test]
    fn enums_serialize_as_upper_snake() {
        let json = serde_json::to_string(&PointsTransactionType::EarnedLearning).unwrap();
        assert_eq!(json, "\"EARNED_LEARNING\"");
        let parsed: Difficulty = serde_json::from_str("\"EXPERT\"").unwrap();
        assert_eq!(parsed, Difficulty::Expert);
    }

    #[test]
    fn only_spend_is_a_debit() {
        assert!(PointsTransactionType::Refund.is_credit());
        assert!(!PointsTransactionType::SpentStock.is_credit());
    }
}
