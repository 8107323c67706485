use anyhow::Result;
use docgate_hierarchy_store::DepartmentTree;

use super::context::CliContext;
use super::output::{emit, OutputFormat};

pub fn cmd_tree(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let tree = ctx.core().list_departments();
    emit(format, &tree, |tree| render(tree))
}

fn render(tree: &[DepartmentTree]) -> String {
    if tree.is_empty() {
        return "no departments".to_string();
    }
    let mut lines = Vec::new();
    for node in tree {
        let dept = &node.department;
        lines.push(format!(
            "{} {} ({}){}",
            dept.id,
            dept.code,
            dept.name,
            inactive_marker(dept.active)
        ));
        for sub in &node.sub_departments {
            lines.push(format!(
                "  {} {} ({}){}",
                sub.id,
                sub.code,
                sub.name,
                inactive_marker(sub.active)
            ));
        }
    }
    lines.join("\n")
}

fn inactive_marker(active: bool) -> &'static str {
    if active {
        ""
    } else {
        " [inactive]"
    }
}
