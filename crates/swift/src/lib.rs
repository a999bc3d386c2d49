//! swo-swift: OpenStack Swift adapter for swo
//!
//! This crate provides the implementation of the ObjectConnection trait
//! over the Swift object API. It is the only crate that knows how Swift
//! authenticates, lists, and transfers objects.

pub mod auth;
pub mod client;
pub mod writer;

pub use client::SwiftConnection;
pub use writer::SwiftWriter;
