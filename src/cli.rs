use crate::config;
use crate::search::client::SerperClient;
use crate::search::{Locale, Row, SearchError, SearchKind, SearchOutput, SearchRequest};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;

/// Widest a table cell is allowed to get before truncation.
const MAX_CELL_WIDTH: usize = 60;

#[derive(Parser)]
#[command(
    name = "serper-hub",
    version,
    about = "Query the Serper.dev search verticals from the terminal",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Search query: free text, a URL (lens/webpage) or a place id (reviews)
    query: Option<String>,

    /// Vertical to query (search, news, images, videos, places, shopping,
    /// scholar, patents, reviews, autocomplete, lens, webpage)
    #[arg(short, long, default_value = "search")]
    kind: SearchKind,

    /// Two-letter country code
    #[arg(long)]
    gl: Option<String>,

    /// Two-letter language code
    #[arg(long)]
    hl: Option<String>,

    /// Location, e.g. "Boston, MA" (omit or "Auto" for provider default)
    #[arg(long)]
    location: Option<String>,

    /// Maximum results, 10-100
    #[arg(short, long)]
    num: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Probe the configured API key with a one-off search
    Check,
}

/// CLI entry point: load config, wire up logging and dispatch.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_or_create_config()?;
    let _log_guard = crate::logging::init(&config)?;

    if !config.has_api_key() {
        anyhow::bail!(
            "No API key configured. Edit {} and set api_key (get one at serper.dev).",
            config::config_path()?.display()
        );
    }

    let client = SerperClient::new(config.api_key.clone());

    match cli.command {
        Some(Command::Check) => check(&client).await,
        None => {
            let Some(query) = cli.query else {
                anyhow::bail!("No query given. Usage: serper-hub <query> [--kind <vertical>]");
            };

            let locale = Locale {
                gl: cli.gl.unwrap_or(config.gl),
                hl: cli.hl.unwrap_or(config.hl),
                location: Some(cli.location.unwrap_or(config.location)),
            };

            let request = SearchRequest::new(cli.kind, query)
                .with_locale(locale)
                .with_num(cli.num.unwrap_or(config.num));

            let output = client.search(&request).await?;
            print_output(cli.kind, &output);
            Ok(())
        }
    }
}

/// One-off probe mirroring the provider's own connectivity check.
async fn check(client: &SerperClient) -> Result<()> {
    let request = SearchRequest::new(SearchKind::Search, "Apple Inc");

    match client.search(&request).await {
        Ok(output) => {
            let sample = output
                .rows
                .first()
                .and_then(|row| row.get("title"))
                .and_then(|v| v.as_str())
                .unwrap_or("(no title)");
            println!("API key is working. Sample result: {sample}");
            Ok(())
        }
        Err(SearchError::Unauthorized) => {
            anyhow::bail!("API key rejected. Check that it was copied correctly.")
        }
        Err(SearchError::Forbidden) => {
            anyhow::bail!("API key refused: invalid or out of credits.")
        }
        Err(e) => Err(e.into()),
    }
}

fn print_output(kind: SearchKind, output: &SearchOutput) {
    if output.rows.is_empty() {
        println!("No results.");
        return;
    }

    // Scraped pages are a single row of page content; a table adds nothing.
    if kind == SearchKind::Webpage {
        if let Some(text) = output.rows[0].get("text").and_then(|v| v.as_str()) {
            println!("{text}");
        }
        return;
    }

    print_table(&output.rows);
    println!("\n{} result(s)", output.rows.len());
}

fn print_table(rows: &[Row]) {
    let columns: Vec<String> = rows
        .iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let cell = row.get(col).map(render_cell).unwrap_or_default();
                    widths[i] = widths[i].max(cell.chars().count());
                    cell
                })
                .collect()
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{:width$}", col, width = widths[i]))
        .collect();
    println!("{}", header.join("  "));

    for row in cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn render_cell(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };

    let flat = text.replace(['\n', '\r'], " ");
    if flat.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{truncated}…")
    } else {
        flat
    }
}
