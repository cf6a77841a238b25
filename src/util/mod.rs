//! Test and helper utilities

pub mod testing;
