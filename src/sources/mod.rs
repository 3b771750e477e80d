//! Source parsers.
//!
//! Each parser reads exactly one source and produces a standalone
//! [`Config`](crate::Config). They know nothing about precedence or about
//! following `extends` pointers; see [`resolve_chain`](crate::resolve_chain)
//! and [`OcConfigBuilder`](crate::OcConfigBuilder) for that.

pub mod env;
pub mod flags;
pub mod json;
