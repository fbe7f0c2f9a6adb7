//! Test utilities for tracegen unit tests.
//!
//! Header fixtures live under `tests/fixtures` so the CLI integration tests
//! can point the binary at the same files.

pub mod fixtures;
