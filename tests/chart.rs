mod common;

use common::scenario_table;
use sales_dashboard::chart::{
    BarChartOptions, Orientation, render_bar_chart, render_category_chart, render_hourly_chart,
};
use sales_dashboard::filter::FilterSelection;
use sales_dashboard::summary::summarize;

#[test]
fn category_chart_labels_every_product_line() {
    let table = scenario_table();
    let summary = summarize(&FilterSelection::all(&table).apply(&table));

    let svg = render_category_chart(&summary.by_product_line).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Sales by Product Line"));
    assert!(svg.contains("Food"));
    assert!(svg.contains("Electronics"));
    println!("✓ Category chart rendered: {} bytes", svg.len());
}

#[test]
fn hourly_chart_labels_each_hour_present() {
    let table = scenario_table();
    let summary = summarize(&FilterSelection::all(&table).apply(&table));

    let svg = render_hourly_chart(&summary.by_hour).unwrap();
    let texts = text_nodes(&svg);
    assert!(texts.iter().any(|t| t == "Sales by Hour"));
    assert_eq!(texts.iter().filter(|t| *t == "9").count(), 1);
    assert_eq!(texts.iter().filter(|t| *t == "14").count(), 1);
    assert!(texts.iter().all(|t| !t.is_empty()), "blank label in {:?}", texts);
}

#[test]
fn category_chart_has_one_slot_per_product_line() {
    let table = scenario_table();
    let summary = summarize(&FilterSelection::all(&table).apply(&table));

    let svg = render_category_chart(&summary.by_product_line).unwrap();
    let texts = text_nodes(&svg);
    for line in summary.by_product_line.keys() {
        assert_eq!(texts.iter().filter(|t| *t == line).count(), 1);
    }
    assert!(texts.iter().all(|t| !t.is_empty()), "blank label in {:?}", texts);
    println!("✓ {} category labels", summary.by_product_line.len());
}

#[test]
fn single_entry_chart_draws_one_labelled_bar() {
    let entries = vec![("Only".to_string(), 42.0)];

    let svg = render_bar_chart(&entries, &BarChartOptions::default()).unwrap();
    let texts = text_nodes(&svg);
    assert_eq!(texts.iter().filter(|t| *t == "Only").count(), 1);
    assert!(texts.iter().all(|t| !t.is_empty()), "blank label in {:?}", texts);
}

/// Trimmed contents of every `<text>` element
fn text_nodes(svg: &str) -> Vec<String> {
    svg.split("<text")
        .skip(1)
        .filter_map(|chunk| {
            let start = chunk.find('>')? + 1;
            let end = chunk.find("</text>")?;
            Some(chunk[start..end].trim().to_string())
        })
        .collect()
}

#[test]
fn empty_breakdown_renders_a_no_data_panel() {
    let table = scenario_table();
    let summary = summarize(&FilterSelection::default().apply(&table));

    let svg = render_category_chart(&summary.by_product_line).unwrap();
    assert!(svg.contains("No data for the current selection"));

    let svg = render_hourly_chart(&summary.by_hour).unwrap();
    assert!(svg.contains("No data for the current selection"));
}

#[test]
fn custom_options_set_size_and_title() {
    let options = BarChartOptions {
        title: "Custom".to_string(),
        width: 320,
        height: 200,
        orientation: Orientation::Horizontal,
        ..BarChartOptions::default()
    };
    let entries = vec![("One".to_string(), 1.0), ("Two".to_string(), 2.0)];

    let svg = render_bar_chart(&entries, &options).unwrap();
    assert!(svg.contains("width=\"320\""));
    assert!(svg.contains("height=\"200\""));
    assert!(svg.contains("Custom"));
}
