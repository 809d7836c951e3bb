//! Boolean song search over concert setlists.
//!
//! A query such as `bathtub-gin AND NOT cavern` is tokenized and parsed
//! into a [`parser::Query`], then evaluated against an immutable
//! [`index::Index`] loaded from its text file.

pub mod config;
pub mod handle;
pub mod index;
pub mod parser;
pub mod server;

#[cfg(test)]
#[path = "tests/base.rs"]
mod tests;
