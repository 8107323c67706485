use anyhow::Result;
use clap::Args;

use super::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Listen address; defaults to server.bind from the configuration
    #[arg(long)]
    pub bind: Option<String>,
}

pub async fn cmd_serve(args: ServeArgs, ctx: &CliContext) -> Result<()> {
    let bind = args
        .bind
        .unwrap_or_else(|| ctx.config().server.bind.clone());
    docgate::server::serve(ctx.shared_core(), &bind).await
}
