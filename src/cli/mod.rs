pub mod allocations;
pub mod app;
pub mod check;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod resolve;
pub mod runtime;
pub mod serve;
pub mod tree;
