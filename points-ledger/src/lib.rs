//! Points & rewards ledger.
//!
//! The crate exposes:
//! - [`PointsController`]: high-level API for awarding, redeeming, and querying points.
//! - [`Catalog`]: immutable reward-module and stock-offer lookup tables.
//! - [`LedgerStore`]: per-user single-writer account table backing the controller.
//! - [`SnapshotStore`]: optional json persistence of the whole ledger.

pub mod account;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;

pub use account::UserAccount;
pub use catalog::{Catalog, GKashStockOffer, LearningReward};
pub use config::LedgerConfig;
pub use controller::{DEFAULT_COMPLETION_SCORE, PointsController};
pub use error::{PointsError, Result, SnapshotError};
pub use model::{
    BalanceAudit, LearningProgress, ModuleCompletion, PointsHistory, PointsTransaction,
    PortfolioSummary, StockPurchase, StockRedemption, UserPoints,
};
pub use snapshot::{SnapshotStats, SnapshotStore};
pub use store::LedgerStore;
