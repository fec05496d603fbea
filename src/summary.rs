use serde::Serialize;
use std::collections::BTreeMap;

use crate::filter::FilteredView;

/// Highest star count shown next to the average rating
pub const MAX_STARS: u8 = 10;

/// The three headline numbers of the dashboard
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Kpis {
    /// Sum of `total`, truncated toward zero
    pub total_sales: i64,
    /// Mean rating rounded to one decimal; `None` when nothing is selected
    pub average_rating: Option<f64>,
    /// Number of star glyphs shown next to the average rating
    pub star_count: u8,
    /// Mean `total` per transaction rounded to two decimals; `None` when
    /// nothing is selected
    pub average_sale: Option<f64>,
}

/// Summed totals per group key, in presentation order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupedAggregate<K> {
    entries: Vec<(K, f64)>,
}

impl<K> GroupedAggregate<K> {
    pub fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Sum of every group, equal to the untruncated total of the view
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }
}

impl<K: PartialEq> GroupedAggregate<K> {
    pub fn get(&self, key: &K) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// Everything computed from one filtered view
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub kpis: Kpis,
    /// Sales per product line, ascending by total
    pub by_product_line: GroupedAggregate<String>,
    /// Sales per hour of day, ascending by hour, only hours with sales
    pub by_hour: GroupedAggregate<u32>,
}

/// Compute the KPIs and both breakdowns of a filtered view
///
/// # Arguments
/// * `view` - The rows that survived filtering
///
/// # Returns
/// * The KPIs, sales per product line and sales per hour
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    Summary {
        kpis: kpis(view),
        by_product_line: sales_by_product_line(view),
        by_hour: sales_by_hour(view),
    }
}

/// Headline numbers of a filtered view
///
/// Averages are rounded half to even and are `None` for an empty view, in
/// which case the total is 0 and no stars are shown.
pub fn kpis(view: &FilteredView<'_>) -> Kpis {
    let total: f64 = view.iter().map(|t| t.total).sum();
    let average_rating = mean(view.iter().map(|t| t.rating)).map(|m| round_to(m, 1));
    let average_sale = mean(view.iter().map(|t| t.total)).map(|m| round_to(m, 2));

    Kpis {
        total_sales: total.trunc() as i64,
        average_rating,
        star_count: average_rating.map(star_count).unwrap_or(0),
        average_sale,
    }
}

/// Group by product line and sort ascending by summed total
///
/// Ties keep product lines in name order.
pub fn sales_by_product_line(view: &FilteredView<'_>) -> GroupedAggregate<String> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for t in view.iter() {
        *groups.entry(t.product_line.as_str()).or_insert(0.0) += t.total;
    }

    let mut entries: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(line, total)| (line.to_string(), total))
        .collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));

    GroupedAggregate { entries }
}

/// Group by hour of day, ascending by hour; hours without sales are absent
pub fn sales_by_hour(view: &FilteredView<'_>) -> GroupedAggregate<u32> {
    let mut groups: BTreeMap<u32, f64> = BTreeMap::new();
    for t in view.iter() {
        *groups.entry(t.hour).or_insert(0.0) += t.total;
    }

    GroupedAggregate {
        entries: groups.into_iter().collect(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// Half-to-even, so 7.25 shows as 7.2
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// Half-to-even, so 6.5 shows six stars and 7.5 shows eight
fn star_count(average_rating: f64) -> u8 {
    average_rating
        .round_ties_even()
        .clamp(0.0, MAX_STARS as f64) as u8
}
