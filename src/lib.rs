pub mod analysis;
pub mod cli;
pub mod commands;
pub mod common;
pub mod inequality;
pub mod record;
pub mod report;
