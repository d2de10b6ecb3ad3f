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

//! SQLite-backed persistence for pool configuration attributes.

pub mod attributes;
pub mod error;

pub use attributes::{AttributeRecord, AttributeStore, connect};
pub use error::{Result as StoreResult, StoreError};
