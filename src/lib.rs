/*!
# Sales Dashboard

An interactive sales report for a fictional supermarket, built in Rust.

## Overview

The dashboard loads a spreadsheet of supermarket transactions once, lets the
viewer narrow it down by city, customer type and gender, and summarizes the
selection with three KPIs and two bar charts.

## Architecture

The data pipeline runs in three stages, each a plain function over
immutable data:

### Loader
- Reads the `Sales` sheet of `supermarkt_sales.xlsx` (three banner rows,
  columns B to R, at most 1000 transactions) with calamine
- Derives the hour of day from the `HH:MM:SS` time column
- Memoizes the table for the lifetime of the process

### Filter Engine
- Keeps the rows whose city, customer type and gender are all selected
- Preserves workbook order; an empty selection yields an empty view

### Aggregator
- Total sales (truncated), average rating with stars, average sale per
  transaction
- Sales per product line (ascending by total) and per hour (ascending by
  hour)

### Presentation (feature `web`)
- Bar charts rendered to SVG with plotters
- The dashboard page rendered with handlebars
- An axum server that re-runs the pipeline for every filter change

## Modules

- **config**: workbook location and server settings
- **transaction**: transaction record and table
- **loader**: workbook reading and the process-wide cache
- **filter**: filter selection and filtered view
- **summary**: KPIs and grouped aggregates
- **view**: the pipeline entry point and display formatting
- **chart**: bar chart rendering
- **report**: page rendering
- **app**: routing and server startup

## REST API Endpoints

- `/` - The dashboard page
- `/api/summary` - The view model as JSON
- `/charts/product_line.svg`, `/charts/hourly.svg` - The two charts

Every endpoint takes the selection as repeated `city`, `customer_type` and
`gender` query keys.
*/

pub mod config;
pub mod filter;
pub mod loader;
pub mod summary;
pub mod transaction;
pub mod view;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod chart;
#[cfg(feature = "web")]
pub mod report;

/// Re-export the pipeline types to make them easier to use
pub use config::*;
pub use filter::*;
pub use loader::*;
pub use summary::*;
pub use transaction::*;
pub use view::*;
