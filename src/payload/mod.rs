//! Binary layout of performance modules
//!
//! This module provides the byte-level view the parser walks:
//! - [`cursor`]: Monotonic read cursor over a payload
//! - [`record`]: Timestamp counter records (borrowed view + owned stats)
//! - [`module`]: Module slot codec, owned images and [`module::ModuleBuilder`]
//! - [`errors`]: Payload decoding errors
//!
//! # Layout
//!
//! All integers are little-endian and nothing is padded:
//!
//! ```text
//! module slot := descriptor_len: u32 | payload_len: u32 | descriptor | payload
//! TSC record  := start, end, nanos{total, min, avg: f64, max}, cycles{total, min, avg: f64, max}
//! ```
//!
//! Every integer field of a record is an `i64`; the two averages are `f64`.
//! A record is therefore [`TSC_RECORD_SIZE`] bytes and a module slot is
//! [`MODULE_HEADER_SIZE`] bytes plus its descriptor and payload.

pub mod cursor;
pub mod errors;
pub mod module;
pub mod record;

pub use cursor::Cursor;
pub use errors::PayloadError;
pub use module::{ModuleBuilder, ModuleImage, PerfModule};
pub use record::{TscStats, TscView};

/// Size in bytes of one timestamp counter record.
pub const TSC_RECORD_SIZE: usize = 80;

/// Size in bytes of a module slot header (descriptor and payload lengths).
pub const MODULE_HEADER_SIZE: usize = 8;
