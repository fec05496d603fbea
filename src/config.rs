use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Where the transaction workbook lives and which part of it holds data
///
/// The defaults describe the supermarket workbook the dashboard ships with:
/// the `Sales` sheet, three banner rows above the header, data in columns
/// `B` through `R` and at most 1000 transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the `.xlsx` workbook, relative to the working directory
    pub path: PathBuf,

    /// Name of the worksheet holding the transactions
    pub sheet: String,

    /// Number of rows above the header row
    pub skip_rows: u32,

    /// First column of the table, as a column letter
    pub first_column: String,

    /// Last column of the table (inclusive), as a column letter
    pub last_column: String,

    /// Maximum number of data rows read below the header
    pub max_rows: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("supermarkt_sales.xlsx"),
            sheet: "Sales".to_string(),
            skip_rows: 3,
            first_column: "B".to_string(),
            last_column: "R".to_string(),
            max_rows: 1000,
        }
    }
}

impl SourceConfig {
    /// Zero-based column indices of the configured range, or `None` when
    /// either bound is not a column letter or the range is reversed.
    pub fn column_span(&self) -> Option<(u32, u32)> {
        let first = letter_to_column(&self.first_column)?;
        let last = letter_to_column(&self.last_column)?;
        if first > last {
            return None;
        }
        Some((first - 1, last - 1))
    }
}

/// Settings for the dashboard server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub source: SourceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            source: SourceConfig::default(),
        }
    }
}

/// Convert column letters to a 1-based column number (A=1, Z=26, AA=27)
pub fn letter_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Convert a 1-based column number to its letters (1=A, 27=AA)
pub fn column_to_letter(col: u32) -> String {
    let mut name = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    name
}
