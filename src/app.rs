#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::Query;
use log::{error, info};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::chart::{ChartError, render_category_chart, render_hourly_chart};
use crate::config::ServerConfig;
use crate::filter::FilterSelection;
use crate::loader;
use crate::report::{DashboardTemplates, ReportError};
use crate::transaction::TransactionTable;
use crate::view::{ViewModel, render};

/// Shared, read-only state of the dashboard server
pub struct AppState {
    table: Arc<TransactionTable>,
    templates: DashboardTemplates,
}

impl AppState {
    pub fn new(table: Arc<TransactionTable>) -> Result<Self, ReportError> {
        Ok(AppState {
            table,
            templates: DashboardTemplates::new()?,
        })
    }
}

/// Filter selection carried in the query string
///
/// Values repeat per key (`?city=Yangon&city=Mandalay`). The sidebar form
/// always sends `applied`; once it is present a missing key means nothing
/// is selected for that input. Without it, a missing key selects every
/// value, which is what a first visit shows.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub applied: Option<String>,
    #[serde(default)]
    pub city: Vec<String>,
    #[serde(default)]
    pub customer_type: Vec<String>,
    #[serde(default)]
    pub gender: Vec<String>,
}

impl FilterQuery {
    pub fn selection(&self, table: &TransactionTable) -> FilterSelection {
        let chosen = |values: &[String], all: Vec<String>| -> BTreeSet<String> {
            if values.is_empty() && self.applied.is_none() {
                all.into_iter().collect()
            } else {
                values.iter().cloned().collect()
            }
        };

        FilterSelection {
            cities: chosen(&self.city, table.cities()),
            customer_types: chosen(&self.customer_type, table.customer_types()),
            genders: chosen(&self.gender, table.genders()),
        }
    }
}

enum AppError {
    Report(ReportError),
    Chart(ChartError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::Report(err)
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        AppError::Chart(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Report(e) => e.to_string(),
            AppError::Chart(e) => e.to_string(),
        };
        error!("{}", message);
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

/// Build the dashboard routes over an already loaded table
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/summary", get(get_summary))
        .route("/charts/product_line.svg", get(get_product_line_chart))
        .route("/charts/hourly.svg", get(get_hourly_chart))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

/// Load the transactions and serve the dashboard until the process stops
pub async fn run(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let table = loader::load(&config.source)?;
    let state = Arc::new(AppState::new(table)?);

    let app = router(state);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

fn view_for(state: &AppState, query: &FilterQuery) -> ViewModel {
    let selection = query.selection(&state.table);
    render(&state.table, &selection)
}

async fn serve_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Html<String>, AppError> {
    let view = view_for(&state, &query);
    Ok(Html(state.templates.render_view(&view)?))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Json<ViewModel> {
    Json(view_for(&state, &query))
}

async fn get_product_line_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let view = view_for(&state, &query);
    Ok(svg_response(render_category_chart(&view.by_product_line)?))
}

async fn get_hourly_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let view = view_for(&state, &query);
    Ok(svg_response(render_hourly_chart(&view.by_hour)?))
}

fn svg_response(svg: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
}
