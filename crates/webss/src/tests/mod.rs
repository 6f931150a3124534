//! Scenario groups. Each function runs one case against a prepared
//! [`WebsSuite`](crate::base::WebsSuite); the caller begins and finishes
//! the case.

pub mod s04_files;
pub mod s09_webs;
