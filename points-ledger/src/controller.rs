use std::sync::Arc;

use chrono::Utc;
use core_types::types::Points;
use log::{debug, error, info, warn};

use crate::{
    catalog::{Catalog, GKashStockOffer, LearningReward},
    config::LedgerConfig,
    error::{PointsError, Result},
    model::{
        BalanceAudit, LearningProgress, ModuleCompletion, PointsHistory, PortfolioSummary,
        StockPurchase, StockRedemption, UserPoints,
    },
    snapshot::{SnapshotStats, SnapshotStore},
    store::LedgerStore,
};

pub const DEFAULT_COMPLETION_SCORE: f64 = 1.0;

/// High-level points ledger API: catalog lookups, per-user award/spend bookkeeping, and
/// optional snapshot persistence after each successful mutation.
pub struct PointsController {
    config: LedgerConfig,
    catalog: Arc<Catalog>,
    store: LedgerStore,
    snapshots: Option<SnapshotStore>,
}

impl PointsController {
    pub fn bootstrap(config: LedgerConfig) -> Result<(Self, Option<SnapshotStats>)> {
        Self::bootstrap_with_catalog(config, Arc::new(Catalog::seeded()))
    }

    pub fn bootstrap_with_catalog(
        config: LedgerConfig,
        catalog: Arc<Catalog>,
    ) -> Result<(Self, Option<SnapshotStats>)> {
        config.ensure_dirs()?;
        let (store, snapshots, stats) = match config.snapshot_path() {
            Some(path) => {
                let snapshots = SnapshotStore::new(path);
                let (accounts, stats) = snapshots.load()?;
                (
                    LedgerStore::from_accounts(accounts),
                    Some(snapshots),
                    Some(stats),
                )
            }
            None => (LedgerStore::new(), None, None),
        };
        if let Some(stats) = &stats {
            info!(
                "points ledger snapshot {} (loaded={}, accounts={})",
                stats.path.display(),
                stats.loaded,
                stats.accounts
            );
            if stats.inconsistent > 0 {
                error!(
                    "points ledger snapshot {} holds {} accounts with inconsistent balances",
                    stats.path.display(),
                    stats.inconsistent
                );
            }
        }
        Ok((
            Self {
                config,
                catalog,
                store,
                snapshots,
            },
            stats,
        ))
    }

    /// Purely in-memory controller over the seeded catalog.
    pub fn in_memory() -> Self {
        Self {
            config: LedgerConfig::in_memory(),
            catalog: Arc::new(Catalog::seeded()),
            store: LedgerStore::new(),
            snapshots: None,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn get_balance(&self, user_id: &str) -> UserPoints {
        self.store.read(user_id, |account| account.points().clone())
    }

    pub fn complete_module(
        &self,
        user_id: &str,
        module_id: &str,
        completion_score: Option<f64>,
    ) -> Result<ModuleCompletion> {
        require_id("user_id", user_id)?;
        require_id("module_id", module_id)?;
        let score = validate_score(completion_score)?;
        let reward = self
            .catalog
            .reward(module_id)
            .ok_or_else(|| PointsError::ModuleNotFound {
                module_id: module_id.to_string(),
            })?;

        let result = self.store.mutate(user_id, |account| {
            let transaction = account.complete_module(reward, score, Utc::now())?;
            Ok((transaction, account.points().total_points))
        });
        let (transaction, new_total_points) = match result {
            Ok(value) => value,
            Err(err) => {
                warn!("module completion rejected for {user_id}/{module_id}: {err}");
                return Err(err);
            }
        };

        let points_awarded = transaction.amount;
        let achievement_unlocked = points_awarded >= self.config.achievement_threshold;
        info!(
            "{user_id} completed {module_id}: +{points_awarded} points (total {new_total_points}, achievement={achievement_unlocked})"
        );
        self.persist();

        Ok(ModuleCompletion {
            module_id: module_id.to_string(),
            points_awarded,
            new_total_points,
            achievement_unlocked,
            transaction,
        })
    }

    pub fn purchase_stock(&self, user_id: &str, stock_offer_id: &str) -> Result<StockRedemption> {
        require_id("user_id", user_id)?;
        require_id("stock_offer_id", stock_offer_id)?;
        let offer = self
            .catalog
            .offer(stock_offer_id)
            .ok_or_else(|| PointsError::OfferNotFound {
                offer_id: stock_offer_id.to_string(),
            })?;

        let result = self.store.mutate(user_id, |account| {
            let (purchase, transaction) = account.purchase_stock(offer, Utc::now())?;
            Ok((purchase, transaction, account.points().available_points))
        });
        let (purchase, transaction, remaining_points) = match result {
            Ok(value) => value,
            Err(err) => {
                warn!("stock purchase rejected for {user_id}/{stock_offer_id}: {err}");
                return Err(err);
            }
        };

        info!(
            "{user_id} redeemed {} points for {} ({} shares, {remaining_points} remaining)",
            offer.points_cost, offer.id, offer.shares_amount
        );
        self.persist();

        Ok(StockRedemption {
            purchase,
            remaining_points,
            transaction,
        })
    }

    pub fn get_history(&self, user_id: &str) -> PointsHistory {
        self.store.read(user_id, |account| PointsHistory {
            transactions: account.history().cloned().collect(),
            balance: account.points().clone(),
        })
    }

    pub fn get_learning_progress(&self, user_id: &str) -> Vec<LearningProgress> {
        self.store
            .read(user_id, |account| account.progress().cloned().collect())
    }

    pub fn get_stock_purchases(&self, user_id: &str) -> Vec<StockPurchase> {
        self.store
            .read(user_id, |account| account.purchases().cloned().collect())
    }

    pub fn list_rewards(&self) -> Vec<LearningReward> {
        self.catalog.rewards().cloned().collect()
    }

    pub fn list_catalog(&self) -> Vec<GKashStockOffer> {
        self.catalog.offers().cloned().collect()
    }

    pub fn rewards_by_category(&self, category: &str) -> Vec<LearningReward> {
        self.catalog.rewards_in_category(category).cloned().collect()
    }

    pub fn portfolio_summary(&self, user_id: &str) -> PortfolioSummary {
        self.store.read(user_id, |account| {
            let mut summary = PortfolioSummary {
                user_id: user_id.to_string(),
                purchase_count: 0,
                total_shares: 0.0,
                total_stock_value: 0.0,
                total_points_spent: 0,
            };
            for purchase in account.purchases() {
                summary.purchase_count += 1;
                summary.total_shares += purchase.shares_amount;
                summary.total_stock_value += purchase.stock_value_at_purchase;
                summary.total_points_spent += purchase.points_spent;
            }
            summary
        })
    }

    /// Replay the user's log from zero and compare with the stored aggregate.
    pub fn audit_user(&self, user_id: &str) -> BalanceAudit {
        self.store.read(user_id, |account| {
            let (replayed_earned, replayed_spent) = account.replay();
            let replayed_available: Points = replayed_earned - replayed_spent;
            let recorded = account.points().clone();
            let consistent = recorded.is_consistent()
                && recorded.lifetime_earned == replayed_earned
                && recorded.lifetime_spent == replayed_spent
                && recorded.available_points == replayed_available;
            if !consistent {
                error!("points audit mismatch for {user_id}: {recorded:?}");
            }
            BalanceAudit {
                user_id: user_id.to_string(),
                transaction_count: account.transaction_count(),
                replayed_earned,
                replayed_spent,
                replayed_available,
                recorded,
                consistent,
            }
        })
    }

    pub fn user_count(&self) -> usize {
        self.store.len()
    }

    fn persist(&self) {
        let Some(snapshots) = &self.snapshots else {
            return;
        };
        match snapshots.persist(&self.store) {
            Ok(count) => debug!(
                "persisted {count} accounts to {}",
                snapshots.path().display()
            ),
            Err(err) => error!(
                "failed to persist points ledger to {}: {err}",
                snapshots.path().display()
            ),
        }
    }
}

fn require_id(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PointsError::blank(field));
    }
    Ok(())
}

fn validate_score(score: Option<f64>) -> Result<f64> {
    let score = score.unwrap_or(DEFAULT_COMPLETION_SCORE);
    if !score.is_finite() || score < 0.0 {
        return Err(PointsError::Validation {
            field: "completion_score",
            reason: format!("{score} is not a finite non-negative number"),
        });
    }
    Ok(score)
}
