//! End-to-end checks of each unit against small fixed scenarios.
//!
//! Run with: `cargo test --test scenarios`

use tally::auth::{hasher_for, Authenticator};
use tally::inventory::{Inventory, StockChange};
use tally::sales::{aggregate, Sale};
use tally::tasks::TaskBoard;
use tally::text::analyze;
use tally::types::{EntityKind, HashAlgorithm, TaskStatus};
use tally::TrackerError;

#[test]
fn test_repeated_word_is_frequent() {
    let result = analyze("a a a a b b");
    let counts: Vec<(&str, u64)> = result
        .counts
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(counts, vec![("a", 4), ("b", 2)]);
    assert_eq!(result.frequent, vec!["a"]);
}

#[test]
fn test_emptied_product_cannot_be_reduced() {
    let mut inv = Inventory::from_snapshot([("apples", 10)]);
    assert_eq!(inv.update("apples", -10), Ok(StockChange::Removed));
    assert_eq!(inv.quantity("apples"), None);

    let err = inv.update("apples", -1).unwrap_err();
    assert!(matches!(err, TrackerError::UnknownProduct { ref product, delta: -1 } if product == "apples"));
    assert!(inv.is_empty());
}

#[test]
fn test_small_sales_are_not_high_revenue() {
    let records = [Sale::new("X", 10, 2.0), Sale::new("X", 5, 2.0)];
    let report = aggregate(&records);
    assert_eq!(report.totals.get("X"), Some(&30.0));
    assert!(report.high_revenue.is_empty());
}

#[test]
fn test_task_added_once() {
    let mut board = TaskBoard::new();
    board.add_pending("T").unwrap();
    assert_eq!(board.status("T"), Some(TaskStatus::Pending));

    let err = board.add_pending("T").unwrap_err();
    assert_eq!(
        err,
        TrackerError::AlreadyExists {
            kind: EntityKind::Task,
            name: "T".to_string(),
        }
    );
}

#[test]
fn test_register_and_verify() {
    let mut auth = Authenticator::default();
    auth.register("u", "pw", "Name").unwrap();
    assert!(auth.verify("u", "pw"));
    assert!(!auth.verify("u", "wrong"));
    assert!(!auth.verify("v", "pw"));
    assert_eq!(auth.len(), 1);
}

#[test]
fn test_inventory_walkthrough() {
    let mut inv = Inventory::from_snapshot([("apples", 10), ("bananas", 20), ("milk", 5), ("bread", 15)]);

    inv.update("apples", 5).unwrap();
    inv.update("oranges", 12).unwrap();
    inv.update("bananas", -8).unwrap();
    assert_eq!(inv.update("milk", -7), Ok(StockChange::Negative(-2)));
    assert!(inv.update("cookies", -3).is_err());

    let state: Vec<_> = inv.iter().collect();
    assert_eq!(
        state,
        vec![
            ("apples", 15),
            ("bananas", 12),
            ("milk", -2),
            ("bread", 15),
            ("oranges", 12),
        ]
    );
    assert_eq!(inv.low_stock_default(), vec!["milk"]);
}

#[test]
fn test_rejections_leave_board_unchanged() {
    let mut board = TaskBoard::from_snapshot([
        ("Clean room", TaskStatus::Done),
        ("Write report", TaskStatus::InProgress),
    ]);
    let before = board.clone();

    assert!(board.add("Read a book", "new").is_err());
    assert!(board.change_status("Water plants", "done").is_err());
    assert!(board.change_status("Clean room", "maybe").is_err());
    assert!(board.remove("Water plants").is_err());

    assert_eq!(board, before);
}

#[test]
fn test_authenticators_with_different_digests_disagree() {
    let mut md5 = Authenticator::new(hasher_for(HashAlgorithm::Md5));
    let mut sha = Authenticator::new(hasher_for(HashAlgorithm::Sha256));
    md5.register("u", "pw", "Name").unwrap();
    sha.register("u", "pw", "Name").unwrap();

    assert_ne!(
        md5.user("u").unwrap().password_hash,
        sha.user("u").unwrap().password_hash
    );
    assert!(md5.verify("u", "pw"));
    assert!(sha.verify("u", "pw"));
}
