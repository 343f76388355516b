use chrono::{DateTime, Utc};
use core_types::types::{ModuleId, OfferId, Points, PointsTransactionType, UserId};
use serde::{Deserialize, Serialize};

/// Per-user points aggregate.
///
/// `available_points == lifetime_earned - lifetime_spent` holds after every mutation;
/// `total_points` mirrors `lifetime_earned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPoints {
    pub user_id: UserId,
    pub total_points: Points,
    pub available_points: Points,
    pub lifetime_earned: Points,
    pub lifetime_spent: Points,
    pub last_updated: DateTime<Utc>,
}

impl UserPoints {
    pub fn zero(user_id: impl Into<UserId>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            total_points: 0,
            available_points: 0,
            lifetime_earned: 0,
            lifetime_spent: 0,
            last_updated: now,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.available_points == self.lifetime_earned - self.lifetime_spent
            && self.total_points == self.lifetime_earned
            && self.available_points >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    pub user_id: UserId,
    pub module_id: ModuleId,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub points_earned: Points,
    pub progress_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPurchase {
    pub id: String,
    pub user_id: UserId,
    pub stock_offer_id: OfferId,
    pub shares_amount: f64,
    pub points_spent: Points,
    pub stock_value_at_purchase: f64,
    pub purchased_at: DateTime<Utc>,
}

/// Append-only audit entry. Credits carry positive amounts, debits negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTransaction {
    pub id: String,
    pub user_id: UserId,
    pub transaction_type: PointsTransactionType,
    pub amount: Points,
    pub description: String,
    pub related_item_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a successful module completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCompletion {
    pub module_id: ModuleId,
    pub points_awarded: Points,
    pub new_total_points: Points,
    pub achievement_unlocked: bool,
    pub transaction: PointsTransaction,
}

/// Result of a successful stock redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRedemption {
    pub purchase: StockPurchase,
    pub remaining_points: Points,
    pub transaction: PointsTransaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsHistory {
    pub transactions: Vec<PointsTransaction>,
    pub balance: UserPoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub user_id: UserId,
    pub purchase_count: usize,
    pub total_shares: f64,
    pub total_stock_value: f64,
    pub total_points_spent: Points,
}

/// Aggregate balance next to the balance rebuilt by replaying the transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAudit {
    pub user_id: UserId,
    pub transaction_count: usize,
    pub replayed_earned: Points,
    pub replayed_spent: Points,
    pub replayed_available: Points,
    pub recorded: UserPoints,
    pub consistent: bool,
}
