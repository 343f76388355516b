use std::{sync::Arc, thread};

use core_types::types::{Difficulty, PointsTransactionType};
use points_ledger::{
    Catalog, GKashStockOffer, LearningReward, LedgerConfig, PointsController, PointsError,
};

fn reward(module_id: &str, points_awarded: i64, difficulty: Difficulty) -> LearningReward {
    LearningReward {
        module_id: module_id.to_string(),
        module_name: module_id.to_string(),
        description: String::new(),
        points_awarded,
        category: "Test".to_string(),
        difficulty,
    }
}

fn offer(id: &str, points_cost: i64) -> GKashStockOffer {
    GKashStockOffer {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        points_cost,
        stock_value: points_cost as f64 / 100.0,
        shares_amount: points_cost as f64 / 10_000.0,
        is_available: true,
        limit_per_user: None,
    }
}

fn controller() -> PointsController {
    let catalog = Catalog::new(
        vec![
            reward("module_budgeting_101", 50, Difficulty::Beginner),
            reward("module_grant_80", 80, Difficulty::Beginner),
            reward("module_grant_300", 300, Difficulty::Beginner),
            reward("module_expert_100", 100, Difficulty::Expert),
            reward("module_grant_1000", 1000, Difficulty::Beginner),
        ],
        vec![offer("gkash_starter", 100), offer("gkash_basic", 250)],
    );
    let (controller, stats) =
        PointsController::bootstrap_with_catalog(LedgerConfig::in_memory(), Arc::new(catalog))
            .unwrap();
    assert!(stats.is_none());
    controller
}

#[test]
fn fresh_user_has_zero_balance() {
    let controller = controller();
    let balance = controller.get_balance("nobody");
    assert_eq!(balance.available_points, 0);
    assert_eq!(balance.lifetime_earned, 0);
    assert_eq!(balance.lifetime_spent, 0);
    assert!(controller.get_history("nobody").transactions.is_empty());
}

#[test]
fn expert_module_with_full_score_awards_250() {
    let controller = controller();
    let outcome = controller
        .complete_module("u1", "module_expert_100", Some(1.0))
        .unwrap();
    assert_eq!(outcome.points_awarded, 250);
    assert!(outcome.achievement_unlocked);
}

#[test]
fn partial_score_is_rounded() {
    let controller = controller();
    // 100 * 2.5 * 0.333 = 83.25
    let outcome = controller
        .complete_module("u1", "module_expert_100", Some(0.333))
        .unwrap();
    assert_eq!(outcome.points_awarded, 83);
    assert!(!outcome.achievement_unlocked);
}

#[test]
fn insufficient_balance_carries_required_and_available() {
    let controller = controller();
    controller
        .complete_module("u1", "module_grant_80", None)
        .unwrap();
    let err = controller.purchase_stock("u1", "gkash_starter").unwrap_err();
    match err {
        PointsError::InsufficientBalance {
            required,
            available,
        } => {
            assert_eq!(required, 100);
            assert_eq!(available, 80);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(controller.get_balance("u1").available_points, 80);
    assert!(controller.get_stock_purchases("u1").is_empty());
}

#[test]
fn purchase_from_300_leaves_50() {
    let controller = controller();
    controller
        .complete_module("u1", "module_grant_300", None)
        .unwrap();
    let redemption = controller.purchase_stock("u1", "gkash_basic").unwrap();
    assert_eq!(redemption.remaining_points, 50);

    let purchases = controller.get_stock_purchases("u1");
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].stock_offer_id, "gkash_basic");

    let history = controller.get_history("u1");
    assert_eq!(history.transactions.len(), 2);
    let newest = &history.transactions[0];
    assert_eq!(newest.transaction_type, PointsTransactionType::SpentStock);
    assert_eq!(newest.amount, -250);
    assert_eq!(newest.related_item_id.as_deref(), Some("gkash_basic"));
    assert_eq!(history.balance.available_points, 50);
    assert_eq!(history.balance.lifetime_spent, 250);
    assert_eq!(history.balance.total_points, 300);
}

#[test]
fn transaction_log_replays_to_the_aggregate() {
    let controller = controller();
    controller
        .complete_module("u1", "module_grant_300", None)
        .unwrap();
    controller
        .complete_module("u1", "module_budgeting_101", None)
        .unwrap();
    controller.purchase_stock("u1", "gkash_starter").unwrap();
    controller.purchase_stock("u1", "gkash_starter").unwrap();
    let _ = controller.purchase_stock("u1", "gkash_basic");

    let audit = controller.audit_user("u1");
    assert!(audit.consistent);
    assert_eq!(audit.transaction_count, 4);
    assert_eq!(audit.replayed_earned, 350);
    assert_eq!(audit.replayed_spent, 200);
    assert_eq!(audit.recorded.available_points, 150);

    let sum: i64 = controller
        .get_history("u1")
        .transactions
        .iter()
        .map(|t| t.amount)
        .sum();
    assert_eq!(sum, audit.recorded.available_points);
}

#[test]
fn progress_records_completion() {
    let controller = controller();
    controller
        .complete_module("u1", "module_budgeting_101", None)
        .unwrap();
    let progress = controller.get_learning_progress("u1");
    assert_eq!(progress.len(), 1);
    assert!(progress[0].completed);
    assert_eq!(progress[0].points_earned, 50);
    assert_eq!(progress[0].progress_percentage, 100);
    assert!(progress[0].completed_at.is_some());
}

#[test]
fn concurrent_purchases_never_overdraw() {
    let controller = Arc::new(controller());
    controller
        .complete_module("u1", "module_grant_1000", None)
        .unwrap();

    let successes: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let controller = Arc::clone(&controller);
                scope.spawn(move || controller.purchase_stock("u1", "gkash_basic").is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(successes, 4);
    let balance = controller.get_balance("u1");
    assert_eq!(balance.available_points, 0);
    assert_eq!(balance.lifetime_spent, 1000);
    assert!(controller.audit_user("u1").consistent);
}

#[test]
fn concurrent_completions_of_one_module_award_once() {
    let controller = Arc::new(controller());
    thread::scope(|scope| {
        for _ in 0..8 {
            let controller = Arc::clone(&controller);
            scope.spawn(move || {
                let _ = controller.complete_module("u1", "module_budgeting_101", None);
            });
        }
    });
    assert_eq!(controller.get_balance("u1").available_points, 50);
    assert_eq!(controller.get_history("u1").transactions.len(), 1);
}
