pub mod classify;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod endpoint;
pub mod http;
pub mod runtime;
pub mod stats;
pub mod ui;
