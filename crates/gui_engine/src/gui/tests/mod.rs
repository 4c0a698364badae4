//! Widget-level scenario tests and shared test fixtures

pub(crate) mod support;
