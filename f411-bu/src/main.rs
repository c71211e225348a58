//! f411-bu - Flying411 bulk inventory upload CLI
//!
//! Drives an upload session through the backend pipeline from the command
//! line: upload → parse → AI mapping → matching, with optional import, plus
//! inspection commands for existing sessions.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use f411_bu::models::RowStatus;
use f411_bu::review::ImportScope;
use f411_bu::services::intake::{IntakeFile, IntakeSource};
use f411_bu::{ApiClient, BuConfig, UploadContext};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "f411-bu")]
#[command(about = "Flying411 bulk inventory upload")]
#[command(version)]
struct Args {
    /// Base URL of the Flying411 API
    #[arg(long)]
    api_url: Option<String>,

    /// API bearer token
    #[arg(long)]
    token: Option<String>,

    /// Page size for row listings
    #[arg(long)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and run it through parsing, mapping and matching
    Upload {
        /// Spreadsheet or document to upload (.csv, .xlsx, .xls, .pdf, .pages)
        file: PathBuf,

        /// Treat the file as a camera capture (accepts image types too)
        #[arg(long)]
        camera: bool,

        /// Abort when any AI-suggested mapping falls below this confidence
        #[arg(long, default_value_t = 0.5)]
        min_confidence: f64,

        /// Import all matched rows once matching completes
        #[arg(long)]
        auto_import: bool,
    },

    /// List upload sessions
    Sessions,

    /// Show one page of a session's processed rows
    Rows {
        session: Uuid,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Filter by status: matched, partial, unmatched, error
        #[arg(long)]
        status: Option<String>,
    },

    /// Import matched rows into marketplace listings
    Import {
        session: Uuid,

        /// Comma-separated row ids to import (default: all matched)
        #[arg(long, value_delimiter = ',')]
        rows: Vec<Uuid>,
    },
}

fn parse_status(s: &str) -> Result<RowStatus> {
    match s {
        "matched" => Ok(RowStatus::Matched),
        "partial" => Ok(RowStatus::Partial),
        "unmatched" => Ok(RowStatus::Unmatched),
        "error" => Ok(RowStatus::Error),
        other => bail!("Unknown status filter \"{}\"", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = BuConfig::resolve(
        args.api_url.as_deref(),
        args.token.as_deref(),
        args.page_size,
    )?;
    f411_common::logging::init(&config.log_level);

    info!("f411-bu {}", env!("CARGO_PKG_VERSION"));
    info!("API: {}", config.api_base_url);

    match args.command {
        Command::Upload {
            file,
            camera,
            min_confidence,
            auto_import,
        } => run_upload(&config, &file, camera, min_confidence, auto_import).await,
        Command::Sessions => list_sessions(&config).await,
        Command::Rows {
            session,
            page,
            status,
        } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            list_rows(&config, session, page, status).await
        }
        Command::Import { session, rows } => run_import(&config, session, rows).await,
    }
}

async fn run_upload(
    config: &BuConfig,
    path: &Path,
    camera: bool,
    min_confidence: f64,
    auto_import: bool,
) -> Result<()> {
    let source = if camera {
        IntakeSource::Camera
    } else {
        IntakeSource::FilePicker
    };
    let file = IntakeFile::open(path, source)?;
    let mut ctx = UploadContext::from_config(config)?;

    ctx.create_session(&file).await?;
    ctx.parse_file().await?;
    ctx.try_advance()?;

    ctx.get_ai_mappings().await?;

    let weak: Vec<String> = ctx
        .editor()
        .mappings()
        .iter()
        .filter(|m| m.is_mapped() && m.confidence < min_confidence)
        .map(|m| format!("{} ({:.0}%)", m.source_column, m.confidence * 100.0))
        .collect();
    if !weak.is_empty() {
        bail!(
            "AI mapping confidence below {:.0}% for: {}. Re-run with a lower \
             --min-confidence or fix the mapping in the web app.",
            min_confidence * 100.0,
            weak.join(", ")
        );
    }

    ctx.save_current_mapping().await?;
    ctx.run_matching().await?;
    ctx.try_advance()?;

    let session = ctx.session().expect("session active after matching");
    println!("Session {}", session.id);
    println!(
        "  {} rows: {} processed, {} errors",
        session.total_rows, session.processed_rows, session.error_rows
    );

    if auto_import {
        ctx.import_rows(ImportScope::AllMatched).await?;
        ctx.try_advance()?;
        let session = ctx.session().expect("session active after import");
        println!(
            "Imported: {} listings created, {} rows with errors",
            session.processed_rows, session.error_rows
        );
    } else {
        println!("Review the rows, then run: f411-bu import {}", session.id);
    }
    Ok(())
}

async fn list_sessions(config: &BuConfig) -> Result<()> {
    let api = ApiClient::new(config)?;
    let sessions = api.list_sessions().await?;
    if sessions.is_empty() {
        println!("No upload sessions.");
        return Ok(());
    }
    for s in sessions {
        println!(
            "{}  {:?}  {}  ({} rows, {} errors)",
            s.id, s.status, s.filename, s.total_rows, s.error_rows
        );
    }
    Ok(())
}

async fn list_rows(
    config: &BuConfig,
    session: Uuid,
    page: u32,
    status: Option<RowStatus>,
) -> Result<()> {
    let api = ApiClient::new(config)?;
    let row_page = api.fetch_rows(session, page, config.page_size, status).await?;

    for row in &row_page.rows {
        let confidence = row
            .match_confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let part = row
            .mapped_values
            .as_ref()
            .and_then(|f| f.get(f411_bu::models::TargetField::PartNumber))
            .unwrap_or("-");
        println!(
            "#{:<5} {:<9} {:<6} {}{}",
            row.row_number,
            row.status.as_str(),
            confidence,
            part,
            if row.errors.is_empty() {
                String::new()
            } else {
                format!("  [{}]", row.errors.join("; "))
            }
        );
    }
    let p = &row_page.pagination;
    println!("page {}/{} ({} rows total)", p.page, p.total_pages, p.total);
    Ok(())
}


async fn run_import(config: &BuConfig, session: Uuid, rows: Vec<Uuid>) -> Result<()> {
    let api = ApiClient::new(config)?;
    let scope = if rows.is_empty() {
        None
    } else {
        Some(rows.as_slice())
    };
    let updated = api.import_rows(session, scope).await?;
    println!(
        "Imported: {} listings created, {} rows with errors (of {} total)",
        updated.processed_rows, updated.error_rows, updated.total_rows
    );
    Ok(())
}
