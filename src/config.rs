use tracing::warn;

use crate::inventory::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::sales::HIGH_REVENUE_THRESHOLD;
use crate::text::FREQUENT_WORD_MIN;
use crate::types::HashAlgorithm;

pub const ENV_LOW_STOCK: &str = "TALLY_LOW_STOCK";
pub const ENV_FREQUENT_MIN: &str = "TALLY_FREQUENT_MIN";
pub const ENV_HIGH_REVENUE: &str = "TALLY_HIGH_REVENUE";
pub const ENV_HASH: &str = "TALLY_HASH";

/// Thresholds and the password digest used by the commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub low_stock_threshold: i64,
    pub frequent_word_min: u64,
    pub high_revenue_threshold: f64,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            frequent_word_min: FREQUENT_WORD_MIN,
            high_revenue_threshold: HIGH_REVENUE_THRESHOLD,
            hash_algorithm: HashAlgorithm::Md5,
        }
    }
}

impl Settings {
    /// Defaults, overridden by any `TALLY_*` environment variables.
    ///
    /// Precedence (highest first):
    /// 1. command-line flags, applied by the caller afterwards
    /// 2. `TALLY_LOW_STOCK`, `TALLY_FREQUENT_MIN`, `TALLY_HIGH_REVENUE`, `TALLY_HASH`
    /// 3. built-in defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(v) = parse_var(&lookup, ENV_LOW_STOCK) {
            settings.low_stock_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_FREQUENT_MIN) {
            settings.frequent_word_min = v;
        }
        if let Some(v) = parse_var::<f64>(&lookup, ENV_HIGH_REVENUE) {
            if v.is_finite() {
                settings.high_revenue_threshold = v;
            } else {
                warn!(var = ENV_HIGH_REVENUE, "ignoring non-finite threshold");
            }
        }
        if let Some(v) = parse_var(&lookup, ENV_HASH) {
            settings.hash_algorithm = v;
        }
        settings
    }
}

/// Parse an environment value, ignoring (with a warning) values that don't parse.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(var = key, value = %raw, error = %e, "ignoring invalid setting");
            None
        }
    }
}
