//! Utility modules: config persistence.

pub mod persistence;
