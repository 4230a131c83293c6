pub mod commands;
pub mod config;
pub mod issue;
pub mod report;
pub mod validations;
