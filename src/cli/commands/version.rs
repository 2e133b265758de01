//! Version command implementation

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::response::VersionResponse;

#[derive(Args, Debug)]
pub struct VersionArgs {}

pub fn execute(_args: VersionArgs, app: &App) -> Result<()> {
    app.output
        .print(&VersionResponse::from(app.registry().runtime()));
    Ok(())
}
