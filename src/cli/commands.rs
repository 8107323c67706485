use clap::Subcommand;

use super::allocations::AllocationsArgs;
use super::check::CheckArgs;
use super::resolve::ResolveArgs;
use super::serve::ServeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Print departments with their sub-departments
    Tree,

    /// List allocations, optionally filtered by scope codes or user
    Allocations(AllocationsArgs),

    /// Decide whether a user may perform an action on a document
    Check(CheckArgs),

    /// Resolve a scope's approval rule against a set of approvers
    Resolve(ResolveArgs),

    /// Serve the HTTP API
    Serve(ServeArgs),
}
