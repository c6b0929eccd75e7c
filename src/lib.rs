//! Client-side orchestration for multi-step dry-ice shipping calculations.

pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
pub mod workflow;
