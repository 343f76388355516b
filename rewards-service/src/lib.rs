//! Async use-case boundary over the points ledger.
//!
//! Every call waits out the configured backend latency, runs the ledger operation, and
//! converts ledger failures into `success = false` outcome records.

mod outcome;

pub use outcome::{CompleteModuleOutcome, FailureKind, PurchaseStockOutcome, user_message};

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use core_types::config::ServiceSettings;
use log::{debug, warn};
use points_ledger::{
    GKashStockOffer, LearningProgress, LearningReward, PointsController, PointsHistory,
    StockPurchase, UserPoints,
};

/// Call signatures consumed by the presentation layer.
#[async_trait]
pub trait PointsUseCases: Send + Sync {
    async fn complete_module(
        &self,
        user_id: &str,
        module_id: &str,
        completion_score: Option<f64>,
    ) -> CompleteModuleOutcome;
    async fn purchase_stock(&self, user_id: &str, stock_offer_id: &str) -> PurchaseStockOutcome;
    async fn get_user_points(&self, user_id: &str) -> UserPoints;
    async fn get_learning_progress(&self, user_id: &str) -> Vec<LearningProgress>;
    async fn get_available_rewards(&self) -> Vec<LearningReward>;
    async fn get_available_stocks(&self) -> Vec<GKashStockOffer>;
    async fn get_user_stock_purchases(&self, user_id: &str) -> Vec<StockPurchase>;
    async fn get_points_history(&self, user_id: &str) -> PointsHistory;
}

#[derive(Clone, Debug, Default)]
pub struct ServiceConfig {
    pub simulated_latency: Duration,
}

impl From<&ServiceSettings> for ServiceConfig {
    fn from(settings: &ServiceSettings) -> Self {
        Self {
            simulated_latency: Duration::from_millis(settings.simulated_latency_ms),
        }
    }
}

#[derive(Clone)]
pub struct PointsService {
    controller: Arc<PointsController>,
    config: ServiceConfig,
}

impl PointsService {
    pub fn new(controller: Arc<PointsController>, config: ServiceConfig) -> Self {
        Self { controller, config }
    }

    pub fn controller(&self) -> Arc<PointsController> {
        Arc::clone(&self.controller)
    }

    async fn simulate_latency(&self) {
        if !self.config.simulated_latency.is_zero() {
            tokio::time::sleep(self.config.simulated_latency).await;
        }
    }
}

#[async_trait]
impl PointsUseCases for PointsService {
    async fn complete_module(
        &self,
        user_id: &str,
        module_id: &str,
        completion_score: Option<f64>,
    ) -> CompleteModuleOutcome {
        self.simulate_latency().await;
        match self
            .controller
            .complete_module(user_id, module_id, completion_score)
        {
            Ok(completion) => CompleteModuleOutcome::completed(completion),
            Err(err) => {
                warn!("complete_module({user_id}, {module_id}) failed: {err}");
                let total = self.controller.get_balance(user_id).total_points;
                CompleteModuleOutcome::failed(module_id, total, &err)
            }
        }
    }

    async fn purchase_stock(&self, user_id: &str, stock_offer_id: &str) -> PurchaseStockOutcome {
        self.simulate_latency().await;
        match self.controller.purchase_stock(user_id, stock_offer_id) {
            Ok(redemption) => PurchaseStockOutcome::purchased(redemption),
            Err(err) => {
                warn!("purchase_stock({user_id}, {stock_offer_id}) failed: {err}");
                let available = self.controller.get_balance(user_id).available_points;
                PurchaseStockOutcome::failed(available, &err)
            }
        }
    }

    async fn get_user_points(&self, user_id: &str) -> UserPoints {
        self.simulate_latency().await;
        debug!("get_user_points({user_id})");
        self.controller.get_balance(user_id)
    }

    async fn get_learning_progress(&self, user_id: &str) -> Vec<LearningProgress> {
        self.simulate_latency().await;
        self.controller.get_learning_progress(user_id)
    }

    async fn get_available_rewards(&self) -> Vec<LearningReward> {
        self.simulate_latency().await;
        self.controller.list_rewards()
    }

    async fn get_available_stocks(&self) -> Vec<GKashStockOffer> {
        self.simulate_latency().await;
        self.controller.list_catalog()
    }

    async fn get_user_stock_purchases(&self, user_id: &str) -> Vec<StockPurchase> {
        self.simulate_latency().await;
        self.controller.get_stock_purchases(user_id)
    }

    async fn get_points_history(&self, user_id: &str) -> PointsHistory {
        self.simulate_latency().await;
        self.controller.get_history(user_id)
    }
}
