use std::collections::BTreeMap;

use core_types::types::{Difficulty, ModuleId, OfferId, Points};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningReward {
    pub module_id: ModuleId,
    pub module_name: String,
    pub description: String,
    pub points_awarded: Points,
    pub category: String,
    pub difficulty: Difficulty,
}

impl LearningReward {
    /// `round(base * multiplier * score)`; rounds half away from zero.
    pub fn award_for(&self, completion_score: f64) -> Points {
        (self.points_awarded as f64 * self.difficulty.multiplier() * completion_score).round()
            as Points
    }
}

/// Points redemption SKU granting a fractional stock allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GKashStockOffer {
    pub id: OfferId,
    pub name: String,
    pub description: String,
    pub points_cost: Points,
    pub stock_value: f64,
    pub shares_amount: f64,
    pub is_available: bool,
    /// Carried for display; purchases do not enforce it.
    pub limit_per_user: Option<u32>,
}

/// Immutable lookup tables for reward modules and stock offers.
#[derive(Debug, Clone)]
pub struct Catalog {
    rewards: BTreeMap<ModuleId, LearningReward>,
    offers: BTreeMap<OfferId, GKashStockOffer>,
}

impl Catalog {
    pub fn new(rewards: Vec<LearningReward>, offers: Vec<GKashStockOffer>) -> Self {
        Self {
            rewards: rewards
                .into_iter()
                .map(|r| (r.module_id.clone(), r))
                .collect(),
            offers: offers.into_iter().map(|o| (o.id.clone(), o)).collect(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_rewards(), seed_offers())
    }

    pub fn reward(&self, module_id: &str) -> Option<&LearningReward> {
        self.rewards.get(module_id)
    }

    pub fn offer(&self, offer_id: &str) -> Option<&GKashStockOffer> {
        self.offers.get(offer_id)
    }

    pub fn rewards(&self) -> impl Iterator<Item = &LearningReward> {
        self.rewards.values()
    }

    pub fn offers(&self) -> impl Iterator<Item = &GKashStockOffer> {
        self.offers.values()
    }

    pub fn rewards_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a LearningReward> + 'a {
        self.rewards
            .values()
            .filter(move |r| r.category.eq_ignore_ascii_case(category))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

fn reward(
    module_id: &str,
    module_name: &str,
    description: &str,
    points_awarded: Points,
    category: &str,
    difficulty: Difficulty,
) -> LearningReward {
    LearningReward {
        module_id: module_id.to_string(),
        module_name: module_name.to_string(),
        description: description.to_string(),
        points_awarded,
        category: category.to_string(),
        difficulty,
    }
}

fn offer(
    id: &str,
    name: &str,
    description: &str,
    points_cost: Points,
    stock_value: f64,
    shares_amount: f64,
    is_available: bool,
    limit_per_user: Option<u32>,
) -> GKashStockOffer {
    GKashStockOffer {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        points_cost,
        stock_value,
        shares_amount,
        is_available,
        limit_per_user,
    }
}

fn seed_rewards() -> Vec<LearningReward> {
    vec![
        reward(
            "module_budgeting_101",
            "Budgeting 101",
            "Build a monthly budget and track spending",
            50,
            "Budgeting",
            Difficulty::Beginner,
        ),
        reward(
            "module_saving_basics",
            "Saving Basics",
            "Emergency funds and automatic savings",
            40,
            "Saving",
            Difficulty::Beginner,
        ),
        reward(
            "module_credit_scores",
            "Understanding Credit Scores",
            "How credit scores are calculated and improved",
            75,
            "Credit",
            Difficulty::Intermediate,
        ),
        reward(
            "module_investing_101",
            "Investing 101",
            "Risk, return, and diversification",
            100,
            "Investing",
            Difficulty::Intermediate,
        ),
        reward(
            "module_stock_market",
            "How the Stock Market Works",
            "Exchanges, orders, and market prices",
            120,
            "Investing",
            Difficulty::Advanced,
        ),
        reward(
            "module_portfolio_strategy",
            "Portfolio Strategy",
            "Asset allocation and rebalancing",
            100,
            "Investing",
            Difficulty::Expert,
        ),
    ]
}

fn seed_offers() -> Vec<GKashStockOffer> {
    vec![
        offer(
            "gkash_starter",
            "GKash Starter",
            "A first slice of GKash stock",
            100,
            1.00,
            0.01,
            true,
            None,
        ),
        offer(
            "gkash_basic",
            "GKash Basic",
            "Fractional GKash share",
            250,
            2.50,
            0.025,
            true,
            Some(10),
        ),
        offer(
            "gkash_premium",
            "GKash Premium",
            "Larger fractional GKash share",
            500,
            5.50,
            0.055,
            true,
            Some(5),
        ),
        offer(
            "gkash_elite",
            "GKash Elite",
            "Limited GKash allocation",
            1000,
            12.00,
            0.12,
            false,
            Some(1),
        ),
    ]
}
