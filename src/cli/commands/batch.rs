//! Batch command implementation
//!
//! Editor session mode: one JSON request per stdin line, one JSON result per
//! stdout line, in request order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::app::App;
use crate::cli::OutputContext;
use crate::cli::location::SourceInput;
use crate::cli::response::{LocateResponse, VersionResponse};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Stop at the first malformed request line
    #[arg(long)]
    pub fail_fast: bool,
}

/// A single batch command
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BatchCommand {
    /// Inline `source` wins over `file`
    Locate {
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        file: Option<PathBuf>,
        line: u32,
        column: u32,
    },
    Resolve {
        path: String,
    },
    Version,
}

/// Result of one batch line
#[derive(Debug, Serialize)]
struct BatchResult {
    /// Zero-based index of the request line
    index: usize,
    result: serde_json::Value,
}

/// Totals reported once stdin closes
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub malformed: usize,
}

pub async fn execute(args: BatchArgs, app: &App) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let summary = run(app, stdin, &mut stdout, args.fail_fast).await?;
    tracing::debug!(
        "Batch finished: {} request(s), {} malformed",
        summary.total,
        summary.malformed
    );
    Ok(())
}

pub async fn run<R, W>(app: &App, reader: R, writer: &mut W, fail_fast: bool) -> Result<BatchSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let ctx = OutputContext::compact();
    let mut summary = BatchSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let index = summary.total;
        summary.total += 1;

        let result = match serde_json::from_str::<BatchCommand>(&line) {
            Ok(command) => execute_single_command(command, app).await,
            Err(e) => {
                summary.malformed += 1;
                serde_json::json!({ "error": format!("Invalid command: {e}") })
            }
        };

        let mut rendered = ctx.render(&BatchResult { index, result });
        rendered.push('\n');
        writer.write_all(rendered.as_bytes()).await?;
        writer.flush().await?;

        if fail_fast && summary.malformed > 0 {
            break;
        }
    }

    Ok(summary)
}

/// Execute a single batch command; failures become `{"error": ...}` values
async fn execute_single_command(command: BatchCommand, app: &App) -> serde_json::Value {
    let value = match command {
        BatchCommand::Locate {
            source,
            file,
            line,
            column,
        } => {
            let source = match (source, file) {
                (Some(source), _) => Ok(source),
                (None, Some(file)) => SourceInput::File(file).read().await,
                (None, None) => Err(anyhow::anyhow!("locate needs 'source' or 'file'")),
            };
            match source {
                Ok(source) => serde_json::to_value(LocateResponse {
                    kind: app.locate(&source, line, column),
                }),
                Err(e) => return serde_json::json!({ "error": format!("{e:#}") }),
            }
        }
        BatchCommand::Resolve { path } => serde_json::to_value(app.resolve(path.trim()).await),
        BatchCommand::Version => {
            serde_json::to_value(VersionResponse::from(app.registry().runtime()))
        }
    };

    value.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
}
