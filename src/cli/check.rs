use anyhow::Result;
use clap::Args;
use docgate::{AccessRequest, Action, DocumentScope, FieldKey, UserId};

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// User identity to evaluate
    #[arg(long)]
    pub user: String,

    /// view, add, edit, delete or print
    #[arg(long)]
    pub action: String,

    /// Department code of the document
    #[arg(long)]
    pub department: String,

    /// Sub-department code of the document
    #[arg(long)]
    pub sub_department: String,

    /// The document is confidential
    #[arg(long)]
    pub confidential: bool,

    /// Field the action targets, e.g. text:3 or system:title
    #[arg(long)]
    pub field: Option<String>,
}

pub fn cmd_check(args: CheckArgs, ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let action: Action = args.action.parse()?;
    let scope = ctx
        .core()
        .scope_by_codes(&args.department, &args.sub_department)?;
    let document = DocumentScope::new(scope.department, scope.sub_department, args.confidential);

    let mut request = AccessRequest::new(UserId::new(args.user), action, document);
    if let Some(raw) = args.field {
        let field: FieldKey = raw.parse()?;
        request = request.on_field(field);
    }

    let decision = ctx.core().decide(&request);
    emit(format, &decision, |decision| {
        let verdict = if decision.allowed { "ALLOW" } else { "DENY" };
        format!("{verdict}: {}", decision.reason)
    })
}
