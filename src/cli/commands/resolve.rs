//! Resolve command implementation

use anyhow::Result;
use clap::Args;

use crate::app::App;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Dotted path, e.g. `os.path.join` or `list.append`
    pub path: String,
}

pub async fn execute(args: ResolveArgs, app: &App) -> Result<()> {
    let response = app.resolve(args.path.trim()).await;
    app.output.print(&response);
    Ok(())
}
