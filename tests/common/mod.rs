//! Common test utilities for the sifter CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project directory with fake `docker`/`apptainer` on PATH
//! - Fixtures: config and tool scripts shared by the scenario tests

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

#[allow(unused_imports)]
pub use env::*;
#[allow(unused_imports)]
pub use fixtures::*;
