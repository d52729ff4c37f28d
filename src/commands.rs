use std::io::Read;

use anyhow::{Context, Result};
use serde::Serialize;

use tally::auth::{hasher_for, Authenticator};
use tally::config::Settings;
use tally::inventory::{Inventory, StockChange};
use tally::sales::{self, Sale, SalesReport};
use tally::tasks::TaskBoard;
use tally::text::{analyze_with_threshold, TextAnalysis};
use tally::types::{HashAlgorithm, TaskStatus};

/// Print `data` as pretty JSON if `json` is true, otherwise call `human_fmt`.
fn output<T: Serialize>(data: &T, json: bool, human_fmt: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        human_fmt(data);
    }
    Ok(())
}

/// Result of one requested mutation. Rejections are reported, not fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub action: &'static str,
    pub target: String,
    pub ok: bool,
    pub detail: String,
}

impl Outcome {
    fn from_result<T, E: std::fmt::Display>(
        action: &'static str,
        target: &str,
        result: std::result::Result<T, E>,
        describe: impl FnOnce(T) -> String,
    ) -> Self {
        let (ok, detail) = match result {
            Ok(v) => (true, describe(v)),
            Err(e) => (false, e.to_string()),
        };
        Self {
            action,
            target: target.to_string(),
            ok,
            detail,
        }
    }
}

fn print_outcomes(outcomes: &[Outcome]) {
    for o in outcomes {
        let mark = if o.ok { "ok" } else { "rejected" };
        println!(
            "{mark:>8}  {action} {target}: {detail}",
            action = o.action,
            target = o.target,
            detail = o.detail
        );
    }
}

fn print_list(label: &str, items: &[impl AsRef<str>]) {
    if items.is_empty() {
        println!("{label}: none");
    } else {
        let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        println!("{label}: {}", joined.join(", "));
    }
}

// ── Text ──

pub fn run_analyze(text: &str, min_count: u64) -> TextAnalysis {
    analyze_with_threshold(text, min_count)
}

fn print_analysis(analysis: &TextAnalysis, min_count: u64) {
    if analysis.counts.is_empty() {
        println!("No words found");
    }
    for (word, count) in &analysis.counts {
        println!("  {word}: {count}");
    }
    print_list(
        &format!("Words seen more than {min_count} times"),
        &analysis.frequent,
    );
}

/// Count word frequency in `text`, or in stdin when no text is given.
pub fn cmd_analyze(
    text: Option<&str>,
    min_count: Option<u64>,
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let owned;
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            owned = buf;
            &owned
        }
    };
    let min_count = min_count.unwrap_or(settings.frequent_word_min);
    let analysis = run_analyze(text, min_count);

    output(&analysis, json, |a| print_analysis(a, min_count))
}

// ── Inventory ──

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub changes: Vec<Outcome>,
    pub inventory: Inventory,
    pub threshold: i64,
    pub low_stock: Vec<String>,
}

fn describe_stock_change(change: StockChange) -> String {
    match change {
        StockChange::Created(q) => format!("added with quantity {q}"),
        StockChange::Adjusted(q) => format!("quantity now {q}"),
        StockChange::Negative(q) => format!("quantity now {q} (negative)"),
        StockChange::Removed => "quantity reached zero, removed".to_string(),
    }
}

pub fn run_inventory(
    stock: &[(String, i64)],
    changes: &[(String, i64)],
    threshold: i64,
) -> InventoryReport {
    let mut inventory = Inventory::from_snapshot(stock.iter().cloned());
    let changes = changes
        .iter()
        .map(|(product, delta)| {
            Outcome::from_result(
                "change",
                product,
                inventory.update(product, *delta),
                describe_stock_change,
            )
        })
        .collect();
    let low_stock = inventory
        .low_stock(threshold)
        .into_iter()
        .map(str::to_string)
        .collect();

    InventoryReport {
        changes,
        inventory,
        threshold,
        low_stock,
    }
}

fn print_inventory(r: &InventoryReport) {
    print_outcomes(&r.changes);
    println!("Inventory:");
    print!("{}", r.inventory);
    print_list(&format!("Low stock (below {})", r.threshold), &r.low_stock);
}

/// Apply stock changes and list low-stock products.
pub fn cmd_inventory(
    stock: &[(String, i64)],
    changes: &[(String, i64)],
    low_stock: Option<i64>,
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let threshold = low_stock.unwrap_or(settings.low_stock_threshold);
    let report = run_inventory(stock, changes, threshold);
    output(&report, json, print_inventory)
}

// ── Sales ──

#[derive(Debug, Serialize)]
pub struct SalesSummary {
    #[serde(flatten)]
    pub report: SalesReport,
    pub threshold: f64,
    pub grand_total: f64,
}

pub fn run_sales(records: &[Sale], threshold: f64) -> SalesSummary {
    let report = sales::aggregate_with_threshold(records, threshold);
    let grand_total = report.grand_total();
    SalesSummary {
        report,
        threshold,
        grand_total,
    }
}

fn print_sales(s: &SalesSummary) {
    if s.report.totals.is_empty() {
        println!("No sales");
    }
    for (product, total) in &s.report.totals {
        println!("  {product}: {total:.2}");
    }
    println!("Total: {:.2}", s.grand_total);
    print_list(&format!("Revenue above {}", s.threshold), &s.report.high_revenue);
}

/// Sum revenue per product.
pub fn cmd_sales(
    records: &[Sale],
    threshold: Option<f64>,
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let threshold = threshold.unwrap_or(settings.high_revenue_threshold);
    let summary = run_sales(records, threshold);
    output(&summary, json, print_sales)
}

// ── Tasks ──

#[derive(Debug, Serialize)]
pub struct TasksReport {
    pub operations: Vec<Outcome>,
    pub tasks: TaskBoard,
    pub pending: Vec<String>,
}

pub fn run_tasks(
    seed: &[(String, TaskStatus)],
    add: &[(String, Option<String>)],
    remove: &[String],
    set: &[(String, String)],
) -> TasksReport {
    let mut board = TaskBoard::from_snapshot(seed.iter().cloned());
    let mut operations = Vec::with_capacity(add.len() + remove.len() + set.len());

    for (name, status) in add {
        let result = match status {
            Some(status) => board.add(name, status),
            None => board.add_pending(name),
        };
        operations.push(Outcome::from_result("add", name, result, |s| {
            format!("added as {s}")
        }));
    }
    for name in remove {
        let result = board.remove(name);
        operations.push(Outcome::from_result("remove", name, result, |_| {
            "removed".to_string()
        }));
    }
    for (name, status) in set {
        let result = board.change_status(name, status);
        operations.push(Outcome::from_result("set", name, result, |prev| {
            format!("{prev} -> {status}")
        }));
    }

    let pending = board.pending().into_iter().map(str::to_string).collect();
    TasksReport {
        operations,
        tasks: board,
        pending,
    }
}

fn print_tasks(r: &TasksReport) {
    print_outcomes(&r.operations);
    println!("Tasks:");
    print!("{}", r.tasks);
    print_list("Pending", &r.pending);
}

/// Add, remove and update tasks, then list pending ones.
pub fn cmd_tasks(
    seed: &[(String, TaskStatus)],
    add: &[(String, Option<String>)],
    remove: &[String],
    set: &[(String, String)],
    json: bool,
) -> Result<()> {
    let report = run_tasks(seed, add, remove, set);
    output(&report, json, print_tasks)
}

// ── Auth ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub login: String,
    pub verified: bool,
    pub full_name: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthReport {
    pub algorithm: HashAlgorithm,
    pub registrations: Vec<Outcome>,
    pub checks: Vec<CheckResult>,
}

pub fn run_auth(
    users: &[(String, String, String)],
    checks: &[(String, String)],
    algorithm: HashAlgorithm,
) -> AuthReport {
    let mut auth = Authenticator::new(hasher_for(algorithm));

    let registrations = users
        .iter()
        .map(|(login, password, full_name)| {
            Outcome::from_result(
                "register",
                login,
                auth.register(login, password, full_name),
                |_| format!("registered as {full_name}"),
            )
        })
        .collect();

    let checks = checks
        .iter()
        .map(|(login, password)| match auth.authenticate(login, password) {
            Ok(record) => CheckResult {
                login: login.clone(),
                verified: true,
                full_name: Some(record.full_name.clone()),
                error: None,
            },
            Err(e) => CheckResult {
                login: login.clone(),
                verified: false,
                full_name: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    AuthReport {
        algorithm,
        registrations,
        checks,
    }
}

fn print_auth(r: &AuthReport) {
    print_outcomes(&r.registrations);
    for check in &r.checks {
        match (&check.full_name, &check.error) {
            (Some(name), _) => println!("{}: verified ({name})", check.login),
            (None, Some(err)) => println!("{}: not verified, {err}", check.login),
            (None, None) => println!("{}: not verified", check.login),
        }
    }
}

/// Register users and check passwords.
pub fn cmd_auth(
    users: &[(String, String, String)],
    checks: &[(String, String)],
    algorithm: Option<HashAlgorithm>,
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let algorithm = algorithm.unwrap_or(settings.hash_algorithm);
    let report = run_auth(users, checks, algorithm);
    output(&report, json, print_auth)
}

// ── Demo ──

const DEMO_TEXT: &str = "This is an example of text, in which the word example shows up several times. \
     The word text also shows up here. And once more the word example, example.";

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub text: TextAnalysis,
    pub inventory: InventoryReport,
    pub sales: SalesSummary,
    pub tasks: TasksReport,
    pub auth: AuthReport,
}

fn owned_pairs<T: Clone>(pairs: &[(&str, T)]) -> Vec<(String, T)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

pub fn run_demo(settings: &Settings) -> DemoReport {
    let text = run_analyze(DEMO_TEXT, settings.frequent_word_min);

    let inventory = run_inventory(
        &owned_pairs::<i64>(&[("apples", 10), ("bananas", 20), ("milk", 5), ("bread", 15)]),
        &owned_pairs::<i64>(&[
            ("apples", 5),
            ("oranges", 12),
            ("bananas", -8),
            ("milk", -7),
            ("cookies", -3),
        ]),
        settings.low_stock_threshold,
    );

    let records = [
        Sale::new("apples", 50, 25.50),
        Sale::new("bananas", 100, 12.00),
        Sale::new("apples", 30, 25.50),
        Sale::new("milk", 20, 40.00),
        Sale::new("bread", 150, 8.75),
        Sale::new("bananas", 80, 12.00),
        Sale::new("coffee", 10, 120.00),
        Sale::new("tea", 25, 55.00),
        Sale::new("apples", 60, 26.00),
    ];
    let sales = run_sales(&records, settings.high_revenue_threshold);

    let tasks = run_tasks(
        &owned_pairs(&[
            ("Clean room", TaskStatus::Done),
            ("Write report", TaskStatus::InProgress),
        ]),
        &[
            ("Buy groceries".to_string(), None),
            ("Call client".to_string(), Some("in-progress".to_string())),
            ("Prepare slides".to_string(), Some("pending".to_string())),
            ("Read a book".to_string(), Some("new".to_string())),
        ],
        &["Buy groceries".to_string()],
        &owned_pairs(&[
            ("Write report", "done".to_string()),
            ("Prepare slides", "in-progress".to_string()),
            ("Water plants", "done".to_string()),
        ]),
    );

    let auth = run_auth(
        &[
            ("jane_doe".into(), "password123".into(), "Jane Doe".into()),
            ("johnny".into(), "securePass".into(), "Johnny D.".into()),
            ("jane_doe".into(), "anotherPass".into(), "Jane Doe Jr.".into()),
        ],
        &owned_pairs(&[
            ("jane_doe", "password123".to_string()),
            ("johnny", "securePass".to_string()),
            ("jane_doe", "wrong".to_string()),
            ("lemmy", "password123".to_string()),
        ]),
        settings.hash_algorithm,
    );

    DemoReport {
        text,
        inventory,
        sales,
        tasks,
        auth,
    }
}

/// Run every unit against built-in sample data.
pub fn cmd_demo(settings: &Settings, json: bool) -> Result<()> {
    let report = run_demo(settings);
    output(&report, json, |r| {
        println!("== Text");
        print_analysis(&r.text, settings.frequent_word_min);
        println!("\n== Inventory");
        print_inventory(&r.inventory);
        println!("\n== Sales");
        print_sales(&r.sales);
        println!("\n== Tasks");
        print_tasks(&r.tasks);
        println!("\n== Auth");
        print_auth(&r.auth);
    })
}
