use log::debug;
use serde::Serialize;

use crate::filter::FilterSelection;
use crate::summary::{GroupedAggregate, Kpis, summarize};
use crate::transaction::TransactionTable;

pub const CURRENCY_SYMBOL: &str = "R$";
pub const STAR_GLYPH: char = '★';
/// Shown in place of an average when no transaction is selected
pub const NO_DATA: &str = "n/a";

/// Choices offered by one multi-select input
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterOptions {
    pub name: &'static str,
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

/// KPI values ready for display
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiDisplay {
    pub total_sales: String,
    pub average_rating: String,
    pub stars: String,
    pub average_sale: String,
}

/// Everything a renderer needs for one filter selection
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewModel {
    pub filters: Vec<FilterOptions>,
    pub selection: FilterSelection,
    pub total_rows: usize,
    pub selected_rows: usize,
    pub kpis: Kpis,
    pub display: KpiDisplay,
    pub by_product_line: GroupedAggregate<String>,
    pub by_hour: GroupedAggregate<u32>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.selected_rows == 0
    }
}

/// Run the whole pipeline for one selection: filter, summarize, format
///
/// Called once per filter change; the table is only read.
pub fn render(table: &TransactionTable, selection: &FilterSelection) -> ViewModel {
    let view = selection.apply(table);
    let summary = summarize(&view);

    debug!(
        "selection matched {} of {} transactions",
        view.len(),
        table.len()
    );

    let display = KpiDisplay {
        total_sales: format_currency_whole(summary.kpis.total_sales),
        average_rating: format_rating(summary.kpis.average_rating),
        stars: star_glyphs(summary.kpis.star_count),
        average_sale: format_currency_cents(summary.kpis.average_sale),
    };

    ViewModel {
        filters: vec![
            filter_options("city", "City", table.cities(), &selection.cities),
            filter_options(
                "customer_type",
                "Customer type",
                table.customer_types(),
                &selection.customer_types,
            ),
            filter_options("gender", "Gender", table.genders(), &selection.genders),
        ],
        selection: selection.clone(),
        total_rows: table.len(),
        selected_rows: view.len(),
        kpis: summary.kpis,
        display,
        by_product_line: summary.by_product_line,
        by_hour: summary.by_hour,
    }
}

fn filter_options(
    name: &'static str,
    label: &'static str,
    values: Vec<String>,
    selected: &std::collections::BTreeSet<String>,
) -> FilterOptions {
    FilterOptions {
        name,
        label,
        options: values
            .into_iter()
            .map(|value| FilterOption {
                selected: selected.contains(&value),
                value,
            })
            .collect(),
    }
}

/// Whole currency amount with thousands separators, e.g. `R$ 322,966`
pub fn format_currency_whole(amount: i64) -> String {
    format!("{} {}", CURRENCY_SYMBOL, group_thousands(amount))
}

/// Currency amount with two decimals, e.g. `R$ 322.97`
pub fn format_currency_cents(amount: Option<f64>) -> String {
    match amount {
        Some(value) => format!("{} {:.2}", CURRENCY_SYMBOL, value),
        None => NO_DATA.to_string(),
    }
}

/// Average rating with one decimal, or `n/a`
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) => format!("{:.1}", value),
        None => NO_DATA.to_string(),
    }
}

/// A run of `count` star glyphs
pub fn star_glyphs(count: u8) -> String {
    std::iter::repeat_n(STAR_GLYPH, count as usize).collect()
}

fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if amount < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
