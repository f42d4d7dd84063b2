use thiserror::Error;

use crate::range::RangeError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    #[error("host call failed: {0}")]
    Host(String),
    #[error("pipeline node `{0}` has no recognition result")]
    MissingNode(String),
    #[error("node `{node}` detail has no usable `{field}`")]
    MissingField { node: String, field: String },
    #[error("invalid server range: {0}")]
    InvalidRange(#[from] RangeError),
    #[error("no region recorded for server {0}")]
    UnknownServer(u32),
    #[error("popups still present after {passes} passes")]
    PopupsNotCleared { passes: u32 },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
