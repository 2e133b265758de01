//! Locate command implementation

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::location::ParsedLocation;
use crate::cli::response::LocateResponse;

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Python file, `-` for stdin, or `file:line:column`
    pub target: String,

    /// Line number (1-indexed)
    #[arg(short, long)]
    pub line: Option<u32>,

    /// Column number (0-indexed byte offset)
    #[arg(short, long)]
    pub column: Option<u32>,
}

pub async fn execute(args: LocateArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    let location = match ParsedLocation::resolve(&args.target, args.line, args.column) {
        Ok(location) => location,
        Err(e) => {
            ctx.print_error(&e.to_string());
            return Ok(());
        }
    };

    let source = match location.input.read().await {
        Ok(source) => source,
        Err(e) => {
            ctx.print_error(&format!("{e:#}"));
            return Ok(());
        }
    };

    let response = LocateResponse {
        kind: app.locate(&source, location.line, location.column),
    };
    ctx.print(&response);
    Ok(())
}
