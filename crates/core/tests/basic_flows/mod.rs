//! Basic flow tests for the core crate.
//! These tests drive the public API the way the profile and container pages do.

mod container_flows;
mod trust_flows;
