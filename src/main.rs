use clap::Parser;
use log::info;
use std::collections::BTreeSet;
use std::path::PathBuf;

use sales_dashboard::config::SourceConfig;
use sales_dashboard::filter::FilterSelection;
use sales_dashboard::loader;
use sales_dashboard::view::{ViewModel, format_currency_cents, render};

/// Print the sales dashboard KPIs and breakdowns for a selection
#[derive(Parser, Debug)]
#[command(name = "sales-report", version)]
struct Args {
    /// Transaction workbook
    #[arg(long, default_value = "supermarkt_sales.xlsx")]
    workbook: PathBuf,

    /// Worksheet holding the transactions
    #[arg(long, default_value = "Sales")]
    sheet: String,

    /// Cities to include (repeatable); all when omitted
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Customer types to include (repeatable); all when omitted
    #[arg(long = "customer-type")]
    customer_types: Vec<String>,

    /// Genders to include (repeatable); all when omitted
    #[arg(long = "gender")]
    genders: Vec<String>,

    /// Print the view model as JSON instead of a text report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let source = SourceConfig {
        path: args.workbook,
        sheet: args.sheet,
        ..SourceConfig::default()
    };

    let table = loader::load(&source)?;

    let all = FilterSelection::all(&table);
    let pick = |chosen: Vec<String>, all: BTreeSet<String>| -> BTreeSet<String> {
        if chosen.is_empty() {
            all
        } else {
            chosen.into_iter().collect()
        }
    };
    let selection = FilterSelection {
        cities: pick(args.cities, all.cities),
        customer_types: pick(args.customer_types, all.customer_types),
        genders: pick(args.genders, all.genders),
    };
    info!("rendering report for {:?}", selection);

    let view = render(&table, &selection);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_report(&view);
    }

    Ok(())
}

fn print_report(view: &ViewModel) {
    println!("Sales Dashboard");
    println!(
        "{} of {} transactions selected",
        view.selected_rows, view.total_rows
    );
    println!();
    println!("Total Sales:                  {}", view.display.total_sales);
    println!(
        "Average Rating:               {} {}",
        view.display.average_rating, view.display.stars
    );
    println!("Average Sale per Transaction: {}", view.display.average_sale);

    println!();
    println!("Sales by Hour");
    if view.by_hour.is_empty() {
        println!("  (no data)");
    }
    for (hour, total) in view.by_hour.entries() {
        println!("  {:02}:00  {:>14}", hour, format_currency_cents(Some(*total)));
    }

    println!();
    println!("Sales by Product Line");
    if view.by_product_line.is_empty() {
        println!("  (no data)");
    }
    for (line, total) in view.by_product_line.entries() {
        println!("  {:<24}{:>14}", line, format_currency_cents(Some(*total)));
    }
}
