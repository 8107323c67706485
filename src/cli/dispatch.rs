use super::allocations::cmd_allocations;
use super::check::cmd_check;
use super::env::CliArgs;
use super::resolve::cmd_resolve;
use super::serve::cmd_serve;
use super::tree::cmd_tree;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Tree => cmd_tree(ctx, cli.output),
        Commands::Allocations(args) => cmd_allocations(args, ctx, cli.output),
        Commands::Check(args) => cmd_check(args, ctx, cli.output),
        Commands::Resolve(args) => cmd_resolve(args, ctx, cli.output),
        Commands::Serve(args) => cmd_serve(args, ctx).await,
    }
}
