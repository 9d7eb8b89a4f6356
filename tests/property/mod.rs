//! Property-based tests

pub mod record_proptest;
