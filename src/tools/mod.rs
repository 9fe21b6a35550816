//! FMP Tools module
//!
//! MCP tool implementations for the Fitness Meal Planner.

use thiserror::Error;

pub mod calendar;
pub mod planning;
pub mod plans;
pub mod profiles;
pub mod status;

/// Failure of a tool that touches storage or the filesystem
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// The caller sent something the tool cannot accept
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    pub fn internal(msg: impl Into<String>) -> Self {
        ToolError::Internal(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ToolError::InvalidInput(_))
    }
}

pub type ToolResult<T> = Result<T, ToolError>;
