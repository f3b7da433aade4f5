//! Error types, result aliases and diagnostic codes for Mosaic.
//!
//! Errors are values: every fallible operation returns a [`MosaicResult`],
//! and every error maps onto a stable negative integer code so that the
//! filter engine can record it in its diagnostic channel.

mod error;

pub mod codes;

pub use error::{ErrorKind, MosaicError, MosaicResult};
