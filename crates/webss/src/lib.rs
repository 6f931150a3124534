//! MS-WEBSS conformance suite: content types, XML documents, columns, CSS,
//! files, object ids and webs.
//!
//! Provides the [`WebsAdapter`] and [`SutControlAdapter`] traits a server
//! binding implements, the scenario groups, the `webss_conformance_tests!`
//! macro and [`run_conformance_suite`](suite::run_conformance_suite).

pub mod adapter;
pub mod base;
pub mod fixtures;
pub mod messages;
pub mod suite;
pub mod tests;
pub mod types;

pub use adapter::{AdapterResult, SutControlAdapter, WebsAdapter, WebsServer};
pub use base::WebsSuite;
pub use suite::{run_conformance_suite, SCENARIOS};

#[doc(hidden)]
pub use protocheck_harness as harness;
