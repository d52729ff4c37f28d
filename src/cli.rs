use clap::{Parser, Subcommand, ValueEnum};

use tally::sales::Sale;
use tally::types::{HashAlgorithm, TaskStatus};

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(about = "Count words, track stock, sum sales, manage tasks, check passwords.")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Password digest choice for the auth command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlgorithmArg {
    Md5,
    Sha256,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(a: AlgorithmArg) -> Self {
        match a {
            AlgorithmArg::Md5 => HashAlgorithm::Md5,
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Count word frequency in a text
    Analyze {
        /// Text to analyze (reads stdin when omitted)
        text: Option<String>,

        /// Report words seen more than this many times [env: TALLY_FREQUENT_MIN, default: 3]
        #[arg(long)]
        min_count: Option<u64>,
    },

    /// Apply stock changes and list low-stock products
    Inventory {
        /// Initial stock entry, `name=quantity` (repeatable)
        #[arg(long = "stock", value_parser = parse_quantity)]
        stock: Vec<(String, i64)>,

        /// Relative change, `name=delta` (repeatable, applied in order)
        #[arg(long = "change", value_parser = parse_quantity, allow_hyphen_values = true)]
        changes: Vec<(String, i64)>,

        /// Low-stock threshold [env: TALLY_LOW_STOCK, default: 5]
        #[arg(long, allow_hyphen_values = true)]
        low_stock: Option<i64>,
    },

    /// Sum revenue per product
    Sales {
        /// Sale line, `product:quantity:price` (repeatable)
        #[arg(long = "sale", value_parser = parse_sale, allow_hyphen_values = true)]
        sales: Vec<Sale>,

        /// Flag products with revenue above this [env: TALLY_HIGH_REVENUE, default: 1000]
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<f64>,
    },

    /// Add, remove and update tasks
    ///
    /// Operations run in this order: --add, --remove, --set.
    Tasks {
        /// Initial task, `name=status` (repeatable)
        #[arg(long = "task", value_parser = parse_task)]
        tasks: Vec<(String, TaskStatus)>,

        /// Add a task, `name` or `name=status` (repeatable)
        #[arg(long = "add", value_parser = parse_add)]
        add: Vec<(String, Option<String>)>,

        /// Remove a task by name (repeatable)
        #[arg(long = "remove")]
        remove: Vec<String>,

        /// Change a task's status, `name=status` (repeatable)
        #[arg(long = "set", value_parser = parse_status_change)]
        set: Vec<(String, String)>,
    },

    /// Register users and check passwords
    Auth {
        /// Register a user, `login:password:full name` (repeatable)
        #[arg(long = "user", value_parser = parse_user)]
        users: Vec<(String, String, String)>,

        /// Check a password, `login:password` (repeatable)
        #[arg(long = "check", value_parser = parse_check)]
        checks: Vec<(String, String)>,

        /// Password digest [env: TALLY_HASH, default: md5]
        #[arg(long)]
        algorithm: Option<AlgorithmArg>,
    },

    /// Run every unit against built-in sample data
    Demo,
}

fn split_pair<'a>(s: &'a str, sep: char, expected: &str) -> Result<(&'a str, &'a str), String> {
    let (key, value) = s
        .rsplit_once(sep)
        .ok_or_else(|| format!("expected {expected}, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((key, value))
}

fn parse_quantity(s: &str) -> Result<(String, i64), String> {
    let (name, qty) = split_pair(s, '=', "name=quantity")?;
    let qty = qty
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{qty}': {e}"))?;
    Ok((name.to_string(), qty))
}

fn parse_sale(s: &str) -> Result<Sale, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_task(s: &str) -> Result<(String, TaskStatus), String> {
    let (name, status) = split_pair(s, '=', "name=status")?;
    let status = status.parse().map_err(|e: tally::TrackerError| e.to_string())?;
    Ok((name.to_string(), status))
}

fn parse_add(s: &str) -> Result<(String, Option<String>), String> {
    match s.rsplit_once('=') {
        Some((name, status)) if !name.is_empty() => Ok((name.to_string(), Some(status.to_string()))),
        Some(_) => Err(format!("missing name in '{s}'")),
        None => Ok((s.to_string(), None)),
    }
}

fn parse_status_change(s: &str) -> Result<(String, String), String> {
    let (name, status) = split_pair(s, '=', "name=status")?;
    Ok((name.to_string(), status.to_string()))
}

fn parse_user(s: &str) -> Result<(String, String, String), String> {
    let mut parts = s.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(login), Some(password), Some(full_name)) if !login.is_empty() => Ok((
            login.to_string(),
            password.to_string(),
            full_name.to_string(),
        )),
        _ => Err(format!("expected login:password:full name, got '{s}'")),
    }
}

fn parse_check(s: &str) -> Result<(String, String), String> {
    let (login, password) = s
        .split_once(':')
        .ok_or_else(|| format!("expected login:password, got '{s}'"))?;
    if login.is_empty() {
        return Err(format!("missing login in '{s}'"));
    }
    Ok((login.to_string(), password.to_string()))
}
