//! Core infrastructure for mdtokens.
//!
//! This crate is pure and performs no I/O:
//! - Markdown token model (`Token`) with attribute lookup
//! - Token filter engine (`FilterSpec`, `Matcher`, `filter_tokens`)
//! - JSON filter specifications

pub mod filter;
pub mod token;

pub use filter::{filter_tokens, FilterSpec, Matcher};
pub use token::{Align, Token};
