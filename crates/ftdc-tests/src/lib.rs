#![warn(clippy::pedantic)]

//! Test harness for the FTDC workspace.
//!
//! The production crates only ever read the format; this crate holds
//! the one writer — [`fixture`] — used by integration tests, benches,
//! the fuzz corpus, and the `make_fixtures` binary.

pub mod fixture;
