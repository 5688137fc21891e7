//! Descriptor parser
//!
//! This module turns a descriptor plus its payload into a report tree:
//! - [`lexer`]: Tokenization (descriptor text → tokens)
//! - [`parse`]: State-machine parser (tokens + payload → tree)
//! - [`ast`]: Report tree definitions
//!
//! # Descriptor Language
//!
//! A descriptor is a sequence of `;`-terminated statements, each declaring
//! the next region of the payload:
//! - `TSC name[n];` — `n` consecutive timestamp counter records
//! - `MODULE * name;` — one nested module slot
//!
//! Whitespace between tokens is insignificant.
//!
//! # Parser Implementation
//!
//! Hand-written lexer and state machine. No external parser generator
//! dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
