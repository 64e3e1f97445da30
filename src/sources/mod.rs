//! # Work sources.
//!
//! Helpers that turn an input stream into dispatcher submissions.
//!
//! - [`feed_lines`]: one job per line of an async reader

mod lines;

pub use lines::feed_lines;
