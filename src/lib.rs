//! Hosted environment deploy assessment.
//!
//! Bootstraps a controller, deploys a dummy stack into it and into two
//! nested hosted models, checks every stack with a token round-trip and
//! tears everything down in reverse order.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
