use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use crate::chart::{ChartError, render_category_chart, render_hourly_chart};
use crate::view::{ViewModel, format_currency_cents};

const DASHBOARD_TEMPLATE: &str = "dashboard";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Both chart images of the page, as inline SVG documents
#[derive(Clone, Debug, Serialize)]
pub struct ChartImages {
    pub product_line: String,
    pub hourly: String,
}

impl ChartImages {
    pub fn render(view: &ViewModel) -> Result<Self, ChartError> {
        Ok(ChartImages {
            product_line: render_category_chart(&view.by_product_line)?,
            hourly: render_hourly_chart(&view.by_hour)?,
        })
    }
}

#[derive(Serialize)]
struct BreakdownRow {
    label: String,
    amount: String,
}

#[derive(Serialize)]
struct PageContext<'a> {
    view: &'a ViewModel,
    charts: &'a ChartImages,
    product_line_rows: Vec<BreakdownRow>,
    hourly_rows: Vec<BreakdownRow>,
}

/// The handlebars registry holding the dashboard page
pub struct DashboardTemplates {
    registry: Handlebars<'static>,
}

impl DashboardTemplates {
    pub fn new() -> Result<Self, ReportError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(
                DASHBOARD_TEMPLATE,
                include_str!("./templates/dashboard.hbs"),
            )
            .map_err(Box::new)?;
        Ok(DashboardTemplates { registry })
    }

    /// Render the full page for one view
    pub fn render_page(&self, view: &ViewModel, charts: &ChartImages) -> Result<String, ReportError> {
        let context = PageContext {
            view,
            charts,
            product_line_rows: view
                .by_product_line
                .entries()
                .iter()
                .map(|(line, total)| BreakdownRow {
                    label: line.clone(),
                    amount: format_currency_cents(Some(*total)),
                })
                .collect(),
            hourly_rows: view
                .by_hour
                .entries()
                .iter()
                .map(|(hour, total)| BreakdownRow {
                    label: format!("{:02}:00", hour),
                    amount: format_currency_cents(Some(*total)),
                })
                .collect(),
        };

        Ok(self.registry.render(DASHBOARD_TEMPLATE, &context)?)
    }

    /// Render the charts and the page in one go
    pub fn render_view(&self, view: &ViewModel) -> Result<String, ReportError> {
        let charts = ChartImages::render(view)?;
        self.render_page(view, &charts)
    }
}
