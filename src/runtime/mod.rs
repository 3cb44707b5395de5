//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the few system
//! operations the dashboard needs, enabling dependency injection and
//! testability.
//!
//! # Structure
//!
//! - `env` - Environment variables
//! - `fs` - Opening and creating files (CSV input and export)
//! - `user` - User interaction (line prompts for the interactive dashboard)

mod env;
mod fs;
mod user;

use anyhow::Result;
use std::env as std_env;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;

    // User interaction
    /// Print `message` and read one line. Returns `None` at end of input.
    /// An empty answer yields `default` when one is given.
    fn prompt(&self, message: &str, default: Option<String>) -> Result<Option<String>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn prompt(&self, message: &str, default: Option<String>) -> Result<Option<String>> {
        self.prompt_impl(message, default.as_deref())
    }
}
