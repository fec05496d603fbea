#![cfg(not(tarpaulin_include))]

use clap::Parser;
use sales_dashboard::app;
use sales_dashboard::config::{ServerConfig, SourceConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Serve the interactive sales dashboard
#[derive(Parser, Debug)]
#[command(name = "dashboard", version)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Transaction workbook
    #[arg(long, default_value = "supermarkt_sales.xlsx")]
    workbook: PathBuf,

    /// Worksheet holding the transactions
    #[arg(long, default_value = "Sales")]
    sheet: String,
}

/// Main entry point for the dashboard server
///
/// Loads the workbook once, then serves the dashboard until interrupted.
/// Set `RUST_LOG` to change the log level (default `info`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig {
        bind: args.bind,
        source: SourceConfig {
            path: args.workbook,
            sheet: args.sheet,
            ..SourceConfig::default()
        },
    };

    app::run(&config).await
}
