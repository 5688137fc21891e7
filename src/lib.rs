//! # Introduction
//!
//! perfmon turns performance-monitor modules into readable reports. A module
//! pairs a small textual *descriptor* with a binary *payload* of timestamp
//! counter records (and possibly nested modules), laid out exactly as the
//! descriptor declares.
//!
//! ## Pipeline
//!
//! ```text
//! Module slot → Descriptor + Payload → Parser (drives Lexer) → Report tree → Renderer → text
//! ```
//!
//! 1. [`payload`] — decodes module slots and borrows counter records out of
//!    the payload without copying.
//! 2. [`parser`] — tokenises the descriptor and builds the report tree while
//!    walking the payload.
//! 3. [`render`] — consumes the tree depth first and produces report lines.
//! 4. [`config`] — defaults and option bundles.
//! 5. [`ui`] — ratatui-based report viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use perfmon::payload::{ModuleBuilder, TscStats};
//! use perfmon::{report, ReportConfig};
//!
//! let image = ModuleBuilder::new("TSC a[1];")
//!     .counter(TscStats { start_count: 10, end_count: 20, ..TscStats::default() })
//!     .image();
//! let report = report(image.module().unwrap(), &ReportConfig::default());
//! assert!(report.text().starts_with("a:0 Count: [10,20]"));
//! ```

pub mod config;
pub mod parser;
pub mod payload;
pub mod render;
pub mod ui;

pub use config::ReportConfig;
pub use parser::parse::{parse, parse_module, ParseError, Parsed, Parser};
pub use render::{render, report, Report, Renderer};
