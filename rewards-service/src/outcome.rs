use core_types::types::{ModuleId, Points};
use points_ledger::{ModuleCompletion, PointsError, StockPurchase, StockRedemption};
use serde::{Deserialize, Serialize};

/// Use-case level failure category surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    NotFound,
    AlreadyCompleted,
    InsufficientBalance,
    ValidationError,
    Internal,
}

impl From<&PointsError> for FailureKind {
    fn from(err: &PointsError) -> Self {
        match err {
            PointsError::ModuleNotFound { .. } | PointsError::OfferNotFound { .. } => {
                FailureKind::NotFound
            }
            PointsError::AlreadyCompleted { .. } => FailureKind::AlreadyCompleted,
            PointsError::InsufficientBalance { .. } => FailureKind::InsufficientBalance,
            PointsError::Validation { .. } => FailureKind::ValidationError,
            PointsError::Snapshot(_) => FailureKind::Internal,
        }
    }
}

/// Display text for a ledger failure.
pub fn user_message(err: &PointsError) -> String {
    match err {
        PointsError::ModuleNotFound { .. } => "Learning module not found".to_string(),
        PointsError::OfferNotFound { .. } => "Stock offer not found".to_string(),
        PointsError::AlreadyCompleted { .. } => "Module already completed".to_string(),
        PointsError::InsufficientBalance {
            required,
            available,
        } => format!("Insufficient points. Need {required}, have {available}"),
        PointsError::Validation { field, reason } => format!("Invalid {field}: {reason}"),
        PointsError::Snapshot(_) => "Points service is temporarily unavailable".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteModuleOutcome {
    pub success: bool,
    pub message: String,
    pub module_id: ModuleId,
    pub points_awarded: Points,
    pub new_total_points: Points,
    pub achievement_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl CompleteModuleOutcome {
    pub fn completed(completion: ModuleCompletion) -> Self {
        let message = if completion.achievement_unlocked {
            format!(
                "Achievement unlocked! You earned {} points",
                completion.points_awarded
            )
        } else {
            format!("You earned {} points", completion.points_awarded)
        };
        Self {
            success: true,
            message,
            module_id: completion.module_id,
            points_awarded: completion.points_awarded,
            new_total_points: completion.new_total_points,
            achievement_unlocked: completion.achievement_unlocked,
            failure: None,
        }
    }

    pub fn failed(module_id: &str, current_total: Points, err: &PointsError) -> Self {
        Self {
            success: false,
            message: user_message(err),
            module_id: module_id.to_string(),
            points_awarded: 0,
            new_total_points: current_total,
            achievement_unlocked: false,
            failure: Some(err.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStockOutcome {
    pub success: bool,
    pub message: String,
    pub purchase: Option<StockPurchase>,
    pub remaining_points: Points,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_points: Option<Points>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl PurchaseStockOutcome {
    pub fn purchased(redemption: StockRedemption) -> Self {
        Self {
            success: true,
            message: format!(
                "Purchased {} shares for {} points",
                redemption.purchase.shares_amount, redemption.purchase.points_spent
            ),
            purchase: Some(redemption.purchase),
            remaining_points: redemption.remaining_points,
            required_points: None,
            failure: None,
        }
    }

    pub fn failed(available: Points, err: &PointsError) -> Self {
        let required_points = match err {
            PointsError::InsufficientBalance { required, .. } => Some(*required),
            _ => None,
        };
        Self {
            success: false,
            message: user_message(err),
            purchase: None,
            remaining_points: available,
            required_points,
            failure: Some(err.into()),
        }
    }
}
