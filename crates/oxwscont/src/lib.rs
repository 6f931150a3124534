//! MS-OXWSCONT conformance suite: contacts and user photos.
//!
//! Provides the [`ContactsAdapter`] trait a server binding implements, the
//! scenario groups, the `oxwscont_conformance_tests!` macro and
//! [`run_conformance_suite`](suite::run_conformance_suite).

pub mod adapter;
pub mod base;
pub mod fixtures;
pub mod messages;
pub mod suite;
pub mod tests;
pub mod types;

pub use adapter::{AdapterResult, ContactsAdapter};
pub use base::ContactsSuite;
pub use suite::{run_conformance_suite, SCENARIOS};

#[doc(hidden)]
pub use protocheck_harness as harness;
