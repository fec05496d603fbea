#![cfg(not(tarpaulin_include))]

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::summary::GroupedAggregate;

/// Bar colour of both dashboard charts (#0083B8)
pub const BAR_COLOR: RGBColor = RGBColor(0x00, 0x83, 0xB8);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

/// Direction the bars grow in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Categories on the Y-axis, bars grow to the right
    Horizontal,
    /// Categories on the X-axis, bars grow upwards
    Vertical,
}

/// Configuration options for bar chart generation
#[derive(Clone, Debug)]
pub struct BarChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,

    pub orientation: Orientation,

    pub color: RGBColor,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            width: 600,
            height: 400,
            orientation: Orientation::Vertical,
            color: BAR_COLOR,
        }
    }
}

/// Sales by product line as horizontal bars, smallest total at the bottom
pub fn render_category_chart(
    aggregate: &GroupedAggregate<String>,
) -> Result<String, ChartError> {
    let options = BarChartOptions {
        title: "Sales by Product Line".to_string(),
        x_label: "Total".to_string(),
        y_label: "Product line".to_string(),
        orientation: Orientation::Horizontal,
        ..BarChartOptions::default()
    };
    render_bar_chart(aggregate.entries(), &options)
}

/// Sales by hour of day as vertical bars, one labelled bar per hour present
pub fn render_hourly_chart(aggregate: &GroupedAggregate<u32>) -> Result<String, ChartError> {
    let options = BarChartOptions {
        title: "Sales by Hour".to_string(),
        x_label: "Hour".to_string(),
        y_label: "Total".to_string(),
        orientation: Orientation::Vertical,
        ..BarChartOptions::default()
    };
    let entries: Vec<(String, f64)> = aggregate
        .entries()
        .iter()
        .map(|(hour, total)| (hour.to_string(), *total))
        .collect();
    render_bar_chart(&entries, &options)
}

/// Draw one bar per entry and return the SVG document
///
/// Entries are drawn in the order given. With no entries the chart is an
/// empty captioned panel.
pub fn render_bar_chart(
    entries: &[(String, f64)],
    options: &BarChartOptions,
) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        if entries.is_empty() {
            draw_no_data(&root, options)?;
        } else {
            match options.orientation {
                Orientation::Horizontal => draw_horizontal(&root, entries, options)?,
                Orientation::Vertical => draw_vertical(&root, entries, options)?,
            }
        }

        root.present()?;
    }
    Ok(svg)
}

fn value_axis_end(entries: &[(String, f64)]) -> f64 {
    let max = entries.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

fn category_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_horizontal(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    entries: &[(String, f64)],
    options: &BarChartOptions,
) -> Result<(), ChartError> {
    let labels: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();
    // Integer axes include their end, so the last category index is the end
    let last = entries.len() as u32 - 1;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(150)
        .build_cartesian_2d(0f64..value_axis_end(entries), (0u32..last).into_segmented())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_labels(entries.len())
        .y_label_formatter(&|v| category_label(&labels, v))
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(options.color.filled())
            .margin(6)
            .data(
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, (_, total))| (i as u32, *total)),
            ),
    )?;

    Ok(())
}

fn draw_vertical(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    entries: &[(String, f64)],
    options: &BarChartOptions,
) -> Result<(), ChartError> {
    let labels: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();
    let last = entries.len() as u32 - 1;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..last).into_segmented(), 0f64..value_axis_end(entries))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(entries.len())
        .x_label_formatter(&|v| category_label(&labels, v))
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(options.color.filled())
            .margin(4)
            .data(
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, (_, total))| (i as u32, *total)),
            ),
    )?;

    Ok(())
}

fn draw_no_data(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    options: &BarChartOptions,
) -> Result<(), ChartError> {
    let area = root.titled(&options.title, ("sans-serif", 24).into_font())?;
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data for the current selection",
        (width as i32 / 2 - 140, height as i32 / 2),
        ("sans-serif", 18).into_font().color(&BLACK.mix(0.6)),
    ))?;
    Ok(())
}
