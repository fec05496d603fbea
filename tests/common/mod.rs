#![allow(dead_code)]

use chrono::NaiveTime;
use rust_xlsxwriter::Workbook;
use sales_dashboard::config::SourceConfig;
use sales_dashboard::transaction::{Transaction, TransactionTable};
use std::path::PathBuf;
use tempfile::TempDir;

/// Header row of the supermarket workbook, columns B to R
pub const HEADERS: [&str; 17] = [
    "Invoice ID",
    "Branch",
    "City",
    "Customer_type",
    "Gender",
    "Product line",
    "Unit price",
    "Quantity",
    "Tax 5%",
    "Total",
    "Date",
    "Time",
    "Payment",
    "cogs",
    "gross margin percentage",
    "gross income",
    "Rating",
];

/// A value written into one fixture cell
#[derive(Clone, Debug)]
pub enum Value {
    Text(String),
    Number(f64),
    Blank,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// One row of the four-transaction scenario used across the tests
pub struct Sale {
    pub city: &'static str,
    pub customer_type: &'static str,
    pub gender: &'static str,
    pub product_line: &'static str,
    pub total: f64,
    pub rating: f64,
    pub time: &'static str,
}

pub fn scenario_sales() -> Vec<Sale> {
    vec![
        Sale {
            city: "A",
            customer_type: "Member",
            gender: "Female",
            product_line: "Food",
            total: 100.0,
            rating: 8.0,
            time: "09:15:00",
        },
        Sale {
            city: "A",
            customer_type: "Normal",
            gender: "Male",
            product_line: "Food",
            total: 50.0,
            rating: 6.0,
            time: "09:45:00",
        },
        Sale {
            city: "B",
            customer_type: "Member",
            gender: "Female",
            product_line: "Electronics",
            total: 200.0,
            rating: 9.0,
            time: "14:00:00",
        },
        Sale {
            city: "B",
            customer_type: "Member",
            gender: "Male",
            product_line: "Food",
            total: 30.0,
            rating: 5.0,
            time: "09:05:00",
        },
    ]
}

/// The scenario as an in-memory table, no workbook involved
pub fn scenario_table() -> TransactionTable {
    TransactionTable::new(
        scenario_sales()
            .iter()
            .map(|s| {
                Transaction::new(
                    s.city,
                    s.customer_type,
                    s.gender,
                    s.product_line,
                    s.total,
                    s.rating,
                    NaiveTime::parse_from_str(s.time, "%H:%M:%S").unwrap(),
                )
            })
            .collect(),
    )
}

/// A full 17-column workbook row for a sale
pub fn full_row(index: usize, sale: &Sale) -> Vec<Value> {
    let tax = sale.total / 21.0;
    let cogs = sale.total - tax;
    vec![
        Value::Text(format!("750-67-{:04}", index)),
        "A".into(),
        sale.city.into(),
        sale.customer_type.into(),
        sale.gender.into(),
        sale.product_line.into(),
        (cogs / 2.0).into(),
        2.0.into(),
        tax.into(),
        sale.total.into(),
        "1/5/2019".into(),
        sale.time.into(),
        "Ewallet".into(),
        cogs.into(),
        4.761904762.into(),
        tax.into(),
        sale.rating.into(),
    ]
}

/// A workbook on disk, removed when dropped
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn config(&self) -> SourceConfig {
        SourceConfig {
            path: self.path.clone(),
            ..SourceConfig::default()
        }
    }
}

/// Write a workbook laid out like the supermarket one: a title in B1, the
/// header on row 4 and the data below it, starting in column B
pub fn write_workbook(sheet: &str, headers: &[&str], rows: &[Vec<Value>]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supermarkt_sales.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    worksheet.write_string(0, 1, "Supermarket sales").unwrap();

    for (c, header) in headers.iter().enumerate() {
        worksheet.write_string(3, 1 + c as u16, *header).unwrap();
    }

    for (r, row) in rows.iter().enumerate() {
        let row_num = 4 + r as u32;
        for (c, value) in row.iter().enumerate() {
            let col = 1 + c as u16;
            match value {
                Value::Text(s) => {
                    worksheet.write_string(row_num, col, s.as_str()).unwrap();
                }
                Value::Number(n) => {
                    worksheet.write_number(row_num, col, *n).unwrap();
                }
                Value::Blank => {}
            }
        }
    }

    workbook.save(&path).unwrap();
    Fixture { dir, path }
}

/// The scenario written as a complete supermarket workbook
pub fn scenario_workbook() -> Fixture {
    let rows: Vec<Vec<Value>> = scenario_sales()
        .iter()
        .enumerate()
        .map(|(i, sale)| full_row(i, sale))
        .collect();
    write_workbook("Sales", &HEADERS, &rows)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}
