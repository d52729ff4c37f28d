use indexmap::IndexMap;
use serde::Serialize;

/// Products whose total revenue is above this are flagged.
pub const HIGH_REVENUE_THRESHOLD: f64 = 1000.0;

/// Revenue per product, in order of first appearance.
pub type RevenueTotals = IndexMap<String, f64>;

/// A single sale line.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub product: String,
    pub quantity: u32,
    pub price: f64,
}

impl Sale {
    pub fn new(product: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            product: product.into(),
            quantity,
            price,
        }
    }

    pub fn revenue(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// Parses `product:quantity:price`. The product name may itself contain `:`.
impl std::str::FromStr for Sale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(price), Some(quantity), Some(product)) = (parts.next(), parts.next(), parts.next())
        else {
            anyhow::bail!("expected product:quantity:price, got '{s}'");
        };
        if product.is_empty() {
            anyhow::bail!("missing product name in '{s}'");
        }
        let quantity = quantity
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid quantity '{quantity}': {e}"))?;
        let price = price
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid price '{price}': {e}"))?;
        Ok(Self::new(product, quantity, price))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesReport {
    pub totals: RevenueTotals,
    pub high_revenue: Vec<String>,
}

impl SalesReport {
    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Sum revenue per product and flag totals above [`HIGH_REVENUE_THRESHOLD`].
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Sale>) -> SalesReport {
    aggregate_with_threshold(records, HIGH_REVENUE_THRESHOLD)
}

/// Like [`aggregate`], flagging totals strictly above `threshold`.
///
/// Values are not validated: a negative price simply lowers the total.
pub fn aggregate_with_threshold<'a>(
    records: impl IntoIterator<Item = &'a Sale>,
    threshold: f64,
) -> SalesReport {
    let mut totals = RevenueTotals::new();
    for sale in records {
        *totals.entry(sale.product.clone()).or_insert(0.0) += sale.revenue();
    }

    let high_revenue = totals
        .iter()
        .filter(|(_, total)| **total > threshold)
        .map(|(product, _)| product.clone())
        .collect();

    SalesReport {
        totals,
        high_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Sale> {
        vec![
            Sale::new("apples", 50, 25.50),
            Sale::new("bananas", 100, 12.00),
            Sale::new("apples", 30, 25.50),
            Sale::new("milk", 20, 40.00),
            Sale::new("bread", 150, 8.75),
            Sale::new("bananas", 80, 12.00),
            Sale::new("coffee", 10, 120.00),
            Sale::new("tea", 25, 55.00),
            Sale::new("apples", 60, 26.00),
        ]
    }

    #[test]
    fn test_aggregate_groups_by_product() {
        let records = vec![Sale::new("X", 10, 2.0), Sale::new("X", 5, 2.0)];
        let report = aggregate(&records);
        assert_eq!(report.totals.get("X"), Some(&30.0));
        assert_eq!(report.totals.len(), 1);
        assert!(report.high_revenue.is_empty());
    }

    #[test]
    fn test_aggregate_sample() {
        let report = aggregate(&sample());
        assert_eq!(report.totals.get("apples"), Some(&3600.0));
        assert_eq!(report.totals.get("bananas"), Some(&2160.0));
        assert_eq!(report.totals.get("milk"), Some(&800.0));
        assert_eq!(report.totals.get("bread"), Some(&1312.5));
        assert_eq!(report.totals.get("coffee"), Some(&1200.0));
        assert_eq!(report.totals.get("tea"), Some(&1375.0));
        assert_eq!(
            report.high_revenue,
            vec!["apples", "bananas", "bread", "coffee", "tea"]
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let records = vec![Sale::new("exact", 10, 100.0)];
        assert!(aggregate(&records).high_revenue.is_empty());
        let report = aggregate_with_threshold(&records, 999.99);
        assert_eq!(report.high_revenue, vec!["exact"]);
    }

    #[test]
    fn test_fractional_prices_are_not_rounded() {
        let records = vec![Sale::new("pen", 3, 0.25), Sale::new("pen", 1, 0.125)];
        let report = aggregate(&records);
        assert_eq!(report.totals.get("pen"), Some(&0.875));
    }

    #[test]
    fn test_negative_price_passes_through() {
        let records = vec![Sale::new("refund", 2, -5.0)];
        assert_eq!(aggregate(&records).totals.get("refund"), Some(&-10.0));
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate(&[]);
        assert!(report.totals.is_empty());
        assert_eq!(report.grand_total(), 0.0);
    }

    #[test]
    fn test_grand_total() {
        let report = aggregate(&sample());
        assert!((report.grand_total() - 10447.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_sale() {
        let sale: Sale = "apples:50:25.5".parse().unwrap();
        assert_eq!(sale, Sale::new("apples", 50, 25.5));

        let sale: Sale = "ns:item:2:1".parse().unwrap();
        assert_eq!(sale.product, "ns:item");

        assert!("apples:50".parse::<Sale>().is_err());
        assert!("apples:-1:2.0".parse::<Sale>().is_err());
        assert!(":1:2.0".parse::<Sale>().is_err());
        assert!("apples:1:cheap".parse::<Sale>().is_err());
    }
}
