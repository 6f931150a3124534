//! In-memory reference servers for the conformance suites.
//!
//! [`InMemoryMailbox`] implements the MS-OXWSCONT adapter and
//! [`InMemorySharePoint`] the MS-WEBSS adapter together with its SUT
//! control channel. Both read their fixture data (mailbox address, site
//! URLs, file names) from the same [`SuiteConfig`](protocheck_harness::SuiteConfig)
//! the suites run with, and a [`ServerProfile`] selects which optional
//! behavior they implement and which quirks they exhibit.

pub mod mailbox;
pub mod profile;
mod session;
pub mod sharepoint;

pub use mailbox::InMemoryMailbox;
pub use profile::{Quirk, ServerProfile};
pub use sharepoint::InMemorySharePoint;
