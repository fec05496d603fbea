#![cfg(not(tarpaulin_include))]

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate, NaiveTime};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{SourceConfig, column_to_letter};
use crate::transaction::{Transaction, TransactionTable};

/// Format every textual `Time` cell must match
pub const TIME_FORMAT: &str = "%H:%M:%S";

const SECONDS_PER_DAY: f64 = 86_400.0;

static TABLE_CACHE: OnceCell<Arc<TransactionTable>> = OnceCell::new();
static EMPTY: Data = Data::Empty;

/// Errors raised while reading the transaction workbook
///
/// Every variant is fatal: the dashboard has nothing to show without its
/// data, so no partially read table is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("workbook not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("invalid column range {first}:{last}")]
    InvalidColumnRange { first: String, last: String },

    #[error("required column '{column}' missing from the header row")]
    MissingColumn { column: String },

    #[error("row {row}: '{value}' is not a time of day in HH:MM:SS format")]
    InvalidTime { row: u32, value: String },

    #[error("row {row}: column '{column}' holds '{value}', expected a number")]
    InvalidNumber {
        row: u32,
        column: String,
        value: String,
    },
}

/// Coarse classification of a [`LoadError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// The workbook or the requested sheet does not exist
    ResourceNotFound,
    /// The workbook exists but its content does not match the expected layout
    Parse,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::ResourceNotFound { .. } | LoadError::SheetNotFound { .. } => {
                LoadErrorKind::ResourceNotFound
            }
            LoadError::Workbook { .. }
            | LoadError::InvalidColumnRange { .. }
            | LoadError::MissingColumn { .. }
            | LoadError::InvalidTime { .. }
            | LoadError::InvalidNumber { .. } => LoadErrorKind::Parse,
        }
    }
}

/// Load the transaction table once per process
///
/// The first successful call reads the workbook; every later call returns
/// the same shared table without touching the file, whatever `config` it
/// passes. A failed read is not cached, so a later call retries.
///
/// # Examples
/// ```no_run
/// use sales_dashboard::config::SourceConfig;
/// use sales_dashboard::loader::load;
///
/// match load(&SourceConfig::default()) {
///     Ok(table) => println!("Loaded {} transactions", table.len()),
///     Err(e) => eprintln!("Error loading workbook: {}", e),
/// }
/// ```
pub fn load(config: &SourceConfig) -> Result<Arc<TransactionTable>, LoadError> {
    let table = TABLE_CACHE.get_or_try_init(|| read_table(config).map(Arc::new))?;

    if table.source() != Some(config) {
        warn!(
            "ignoring source {}: transactions already loaded from {}",
            config.path.display(),
            table
                .source()
                .map(|s| s.path.display().to_string())
                .unwrap_or_default()
        );
    }

    Ok(Arc::clone(table))
}

/// Whether [`load`] has already populated the process-wide table
pub fn is_loaded() -> bool {
    TABLE_CACHE.get().is_some()
}

/// Read the transaction table from the workbook, bypassing the cache
///
/// Supports every format calamine detects from the extension (xlsx, xlsm,
/// xls, ods).
pub fn read_table(config: &SourceConfig) -> Result<TransactionTable, LoadError> {
    let path = &config.path;
    if !path.exists() {
        return Err(LoadError::ResourceNotFound { path: path.clone() });
    }

    let (first_col, last_col) =
        config
            .column_span()
            .ok_or_else(|| LoadError::InvalidColumnRange {
                first: config.first_column.clone(),
                last: config.last_column.clone(),
            })?;

    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Workbook {
        path: path.clone(),
        source,
    })?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == &config.sheet) {
        return Err(LoadError::SheetNotFound {
            sheet: config.sheet.clone(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(&config.sheet)
        .map_err(|source| LoadError::Workbook {
            path: path.clone(),
            source,
        })?;

    let header_row = config.skip_rows;
    let columns = Columns::locate(&range, header_row, first_col, last_col)?;

    let last_row = match range.end() {
        Some((row, _)) => row,
        None => header_row,
    };
    let data_end = last_row.min(header_row.saturating_add(config.max_rows as u32));

    let mut rows = Vec::new();
    for row in (header_row + 1)..=data_end {
        if is_blank_row(&range, row, first_col, last_col) {
            debug!("skipping blank row {}", row + 1);
            continue;
        }
        rows.push(columns.read_row(&range, row)?);
    }

    info!(
        "loaded {} transactions from {} (sheet '{}', columns {}:{})",
        rows.len(),
        path.display(),
        config.sheet,
        column_to_letter(first_col + 1),
        column_to_letter(last_col + 1)
    );

    Ok(TransactionTable::from_source(rows, config.clone()))
}

/// Absolute column positions of each known header
struct Columns {
    city: u32,
    customer_type: u32,
    gender: u32,
    product_line: u32,
    total: u32,
    rating: u32,
    time: u32,
    invoice_id: Option<u32>,
    branch: Option<u32>,
    unit_price: Option<u32>,
    quantity: Option<u32>,
    tax: Option<u32>,
    date: Option<u32>,
    payment: Option<u32>,
    cogs: Option<u32>,
    gross_margin_percentage: Option<u32>,
    gross_income: Option<u32>,
}

impl Columns {
    fn locate(
        range: &Range<Data>,
        header_row: u32,
        first_col: u32,
        last_col: u32,
    ) -> Result<Self, LoadError> {
        let headers: Vec<(u32, String)> = (first_col..=last_col)
            .filter_map(|col| text(cell(range, header_row, col)).map(|name| (col, name)))
            .collect();

        let find = |name: &str| {
            headers
                .iter()
                .find(|(_, header)| header.trim() == name)
                .map(|(col, _)| *col)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Columns {
            city: require("City")?,
            customer_type: require("Customer_type")?,
            gender: require("Gender")?,
            product_line: require("Product line")?,
            total: require("Total")?,
            rating: require("Rating")?,
            time: require("Time")?,
            invoice_id: find("Invoice ID"),
            branch: find("Branch"),
            unit_price: find("Unit price"),
            quantity: find("Quantity"),
            tax: find("Tax 5%"),
            date: find("Date"),
            payment: find("Payment"),
            cogs: find("cogs"),
            gross_margin_percentage: find("gross margin percentage"),
            gross_income: find("gross income"),
        })
    }

    fn read_row(&self, range: &Range<Data>, row: u32) -> Result<Transaction, LoadError> {
        let label = row + 1;
        let optional_text = |col: Option<u32>| col.and_then(|c| text(cell(range, row, c)));
        let optional_number = |col: Option<u32>, name: &str| match col {
            Some(c) => number(cell(range, row, c), label, name),
            None => Ok(None),
        };

        let time = time_of_day(cell(range, row, self.time), label)?;

        let mut transaction = Transaction::new(
            text(cell(range, row, self.city)).unwrap_or_default(),
            text(cell(range, row, self.customer_type)).unwrap_or_default(),
            text(cell(range, row, self.gender)).unwrap_or_default(),
            text(cell(range, row, self.product_line)).unwrap_or_default(),
            required_number(cell(range, row, self.total), label, "Total")?,
            required_number(cell(range, row, self.rating), label, "Rating")?,
            time,
        );

        transaction.invoice_id = optional_text(self.invoice_id);
        transaction.branch = optional_text(self.branch);
        transaction.payment = optional_text(self.payment);
        transaction.unit_price = optional_number(self.unit_price, "Unit price")?;
        transaction.quantity = optional_number(self.quantity, "Quantity")?.map(|q| q as i64);
        transaction.tax = optional_number(self.tax, "Tax 5%")?;
        transaction.cogs = optional_number(self.cogs, "cogs")?;
        transaction.gross_margin_percentage =
            optional_number(self.gross_margin_percentage, "gross margin percentage")?;
        transaction.gross_income = optional_number(self.gross_income, "gross income")?;
        transaction.date = self.date.and_then(|c| calendar_date(cell(range, row, c), label));

        Ok(transaction)
    }
}

fn cell(range: &Range<Data>, row: u32, col: u32) -> &Data {
    range.get_value((row, col)).unwrap_or(&EMPTY)
}

fn is_blank_row(range: &Range<Data>, row: u32, first_col: u32, last_col: u32) -> bool {
    (first_col..=last_col).all(|col| text(cell(range, row, col)).is_none())
}

// Cell as text; `None` for empty cells and blank strings
fn text(value: &Data) -> Option<String> {
    let s = match value {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{:.0}", f)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    };
    if s.trim().is_empty() { None } else { Some(s) }
}

fn number(value: &Data, row: u32, column: &str) -> Result<Option<f64>, LoadError> {
    match value {
        Data::Empty => Ok(None),
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| LoadError::InvalidNumber {
                row,
                column: column.to_string(),
                value: s.clone(),
            }),
        other => Err(LoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: text(other).unwrap_or_default(),
        }),
    }
}

fn required_number(value: &Data, row: u32, column: &str) -> Result<f64, LoadError> {
    number(value, row, column)?.ok_or_else(|| LoadError::InvalidNumber {
        row,
        column: column.to_string(),
        value: String::new(),
    })
}

/// Time of day from a `Time` cell
///
/// Text must match [`TIME_FORMAT`]; Excel stores native times as a
/// fraction of a day, which is converted to whole seconds.
fn time_of_day(value: &Data, row: u32) -> Result<NaiveTime, LoadError> {
    let invalid = |value: String| LoadError::InvalidTime { row, value };

    match value {
        Data::String(s) => {
            NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|_| invalid(s.clone()))
        }
        Data::DateTimeIso(s) => {
            let clock = s.rsplit('T').next().unwrap_or(s.as_str());
            NaiveTime::parse_from_str(clock, TIME_FORMAT).map_err(|_| invalid(s.clone()))
        }
        Data::DateTime(dt) => serial_to_time(dt.as_f64()).ok_or_else(|| invalid(dt.to_string())),
        Data::Float(f) => serial_to_time(*f).ok_or_else(|| invalid(f.to_string())),
        other => Err(invalid(text(other).unwrap_or_default())),
    }
}

fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let secs = ((serial - serial.floor()) * SECONDS_PER_DAY).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
}

// Dates are informational only, so an unreadable one is dropped rather than
// failing the load.
fn calendar_date(value: &Data, row: u32) -> Option<NaiveDate> {
    let parsed = match value {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::Float(f) => serial_to_date(*f),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        Data::String(s) => ["%m/%d/%Y", "%Y-%m-%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok()),
        _ => None,
    };
    if parsed.is_none() && !matches!(value, Data::Empty) {
        debug!("row {}: unreadable date {:?}", row, value);
    }
    parsed
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Serial 0 is 1899-12-30 for every date after the 1900 leap-year bug
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
