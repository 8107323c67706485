use anyhow::Result;
use clap::Args;
use docgate::{AccessCore, Allocation, DepartmentId, SubDepartmentId, UserId};

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct AllocationsArgs {
    /// Department code
    #[arg(long)]
    pub department: Option<String>,

    /// Sub-department code (requires --department)
    #[arg(long, requires = "department")]
    pub sub_department: Option<String>,

    /// Only rows for this user
    #[arg(long)]
    pub user: Option<String>,
}

pub fn cmd_allocations(
    args: AllocationsArgs,
    ctx: &CliContext,
    format: OutputFormat,
) -> Result<()> {
    let core = ctx.core();
    let (department, sub_department) = scope_filter(core, &args)?;

    let mut rows = core.list_allocations(department, sub_department);
    if let Some(user) = args.user {
        let user = UserId::new(user);
        rows.retain(|row| row.user == user);
    }
    emit(format, &rows, |rows| render(rows))
}

/// Resolve the department / sub-department codes given on the command line to ids.
fn scope_filter(
    core: &AccessCore,
    args: &AllocationsArgs,
) -> Result<(Option<DepartmentId>, Option<SubDepartmentId>)> {
    Ok(match (&args.department, &args.sub_department) {
        (Some(dept), Some(sub)) => {
            let scope = core.scope_by_codes(dept, sub)?;
            (Some(scope.department), Some(scope.sub_department))
        }
        (Some(dept), None) => (Some(core.department_by_code(dept)?.id), None),
        _ => (None, None),
    })
}

fn render(rows: &[Allocation]) -> String {
    if rows.is_empty() {
        return "no allocations".to_string();
    }
    rows.iter()
        .map(|row| {
            let caps: Vec<_> = row
                .capabilities
                .granted()
                .iter()
                .map(|cap| cap.as_str())
                .collect();
            let fields: Vec<_> = row.fields.iter().map(ToString::to_string).collect();
            format!(
                "{} @ {}: [{}] fields [{}]",
                row.user,
                row.scope,
                caps.join(","),
                fields.join(",")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate::{AdministratorPolicy, Seed};

    fn core() -> AccessCore {
        let core = AccessCore::new(AdministratorPolicy::default());
        let seed = Seed::parse(
            "departments:\n  - code: FIN\n    name: Finance\n    sub_departments:\n      - code: AP\n        name: Payables\n",
        )
        .unwrap();
        core.apply_seed(&seed).unwrap();
        core
    }

    fn args(department: Option<&str>, sub_department: Option<&str>) -> AllocationsArgs {
        AllocationsArgs {
            department: department.map(str::to_string),
            sub_department: sub_department.map(str::to_string),
            user: None,
        }
    }

    #[test]
    fn codes_resolve_to_scope_filter() {
        let core = core();
        let scope = core.scope_by_codes("FIN", "AP").unwrap();

        let (dept, sub) = scope_filter(&core, &args(Some("fin"), Some("ap"))).unwrap();
        assert_eq!((dept, sub), (Some(scope.department), Some(scope.sub_department)));

        let (dept, sub) = scope_filter(&core, &args(Some("FIN"), None)).unwrap();
        assert_eq!((dept, sub), (Some(scope.department), None));

        assert_eq!(scope_filter(&core, &args(None, None)).unwrap(), (None, None));
        assert!(scope_filter(&core, &args(Some("OPS"), None)).is_err());
    }
}
