//! serper-hub library
//!
//! This library exports the Serper.dev request dispatcher for testing and
//! reuse by other front-ends.

pub mod cli;
pub mod config;
pub mod logging;
pub mod search;
