use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::SourceConfig;

/// A single sales receipt line from the supermarket workbook
///
/// The categorical fields (`city`, `customer_type`, `gender`,
/// `product_line`) drive filtering and grouping. `hour` is always the hour
/// component of `time`; build records through [`Transaction::new`] to keep
/// the two in sync.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub invoice_id: Option<String>,
    pub branch: Option<String>,
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub product_line: String,
    pub unit_price: Option<f64>,
    pub quantity: Option<i64>,
    pub tax: Option<f64>,
    /// Unit price times quantity plus tax
    pub total: f64,
    pub date: Option<NaiveDate>,
    pub time: NaiveTime,
    /// Hour of day (0-23) derived from `time`
    pub hour: u32,
    pub payment: Option<String>,
    pub cogs: Option<f64>,
    pub gross_margin_percentage: Option<f64>,
    pub gross_income: Option<f64>,
    /// Customer rating, 0 to 10
    pub rating: f64,
}

impl Transaction {
    /// Create a record from the fields the dashboard needs; everything else
    /// starts out empty.
    pub fn new(
        city: impl Into<String>,
        customer_type: impl Into<String>,
        gender: impl Into<String>,
        product_line: impl Into<String>,
        total: f64,
        rating: f64,
        time: NaiveTime,
    ) -> Self {
        Transaction {
            invoice_id: None,
            branch: None,
            city: city.into(),
            customer_type: customer_type.into(),
            gender: gender.into(),
            product_line: product_line.into(),
            unit_price: None,
            quantity: None,
            tax: None,
            total,
            date: None,
            time,
            hour: time.hour(),
            payment: None,
            cogs: None,
            gross_margin_percentage: None,
            gross_income: None,
            rating,
        }
    }
}

/// The loaded transactions, in workbook order
///
/// Never modified after construction; the web layer shares one instance
/// across requests behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
    source: Option<SourceConfig>,
}

impl TransactionTable {
    /// Wrap rows that did not come from a workbook
    pub fn new(rows: Vec<Transaction>) -> Self {
        TransactionTable { rows, source: None }
    }

    pub(crate) fn from_source(rows: Vec<Transaction>, source: SourceConfig) -> Self {
        TransactionTable {
            rows,
            source: Some(source),
        }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The workbook this table was read from, if it came from one
    pub fn source(&self) -> Option<&SourceConfig> {
        self.source.as_ref()
    }

    /// Distinct cities in order of first appearance
    pub fn cities(&self) -> Vec<String> {
        self.distinct(|t| &t.city)
    }

    /// Distinct customer types in order of first appearance
    pub fn customer_types(&self) -> Vec<String> {
        self.distinct(|t| &t.customer_type)
    }

    /// Distinct genders in order of first appearance
    pub fn genders(&self) -> Vec<String> {
        self.distinct(|t| &t.gender)
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&Transaction) -> &String,
    {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            let value = field(row);
            if !seen.iter().any(|s| s == value) {
                seen.push(value.clone());
            }
        }
        seen
    }
}
