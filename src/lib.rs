// src/lib.rs

pub mod host;         // host contract: screenshots, recognition, input
pub mod config;
pub mod logging;
pub mod pacing;       // pauses between inputs
pub mod range;        // server range expressions
pub mod cursor;       // server iteration
pub mod regions;      // server button ROI table
pub mod popup;        // login popups
pub mod recognitions; // custom recognitions
pub mod actions;      // custom actions
pub mod registry;

pub use config::AgentConfig;
pub use host::{AgentError, AgentResult, Context, Rect};
pub use registry::{AgentRegistry, AnalyzeArg, RunArg};
