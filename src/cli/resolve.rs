use std::collections::HashSet;

use anyhow::Result;
use clap::Args;
use docgate::{Resolution, UserId};

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ResolveArgs {
    /// Department code
    #[arg(long)]
    pub department: String,

    /// Sub-department code
    #[arg(long)]
    pub sub_department: String,

    /// Approver identities (comma separated; duplicates count once)
    #[arg(long, value_delimiter = ',')]
    pub approvals: Vec<String>,

    /// Number of eligible approvers for the document
    #[arg(long)]
    pub total_eligible: u32,
}

pub fn cmd_resolve(args: ResolveArgs, ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let scope = ctx
        .core()
        .scope_by_codes(&args.department, &args.sub_department)?;
    let approvals: HashSet<UserId> = args
        .approvals
        .iter()
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(UserId::new)
        .collect();
    let resolution = ctx
        .core()
        .evaluate_approvals(scope, &approvals, args.total_eligible);
    emit(format, &resolution, render)
}

fn render(resolution: &Resolution) -> String {
    match (resolution.rule, resolution.required) {
        (Some(rule), Some(required)) => format!(
            "{} ({rule}: {}/{required})",
            resolution.status.as_str(),
            resolution.approvals
        ),
        _ => format!("{} (no rule, approval not gated)", resolution.status.as_str()),
    }
}
