#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Attribute catalog and value codec for pool configuration attributes.
//!
//! Layout: `types.rs` (configuration attribute code points), `catalog.rs`
//! (keyword table and lookups), `codec.rs` (value encoding and type
//! resolution), `error.rs` (typed errors).

pub mod catalog;
pub mod codec;
pub mod error;
pub mod types;

pub use catalog::{AttributeDefinition, ValueKind};
pub use codec::{ResolvedAttribute, display_value, resolve};
pub use error::{AttrError, Result as AttrResult};
