//! Shared test helpers for `readydag` integration tests.

pub mod builders;
