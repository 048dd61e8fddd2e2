//! CLI commands

pub mod context;
pub mod decide;
pub mod run;
pub mod style;
