//! Scenario groups. Each function runs one case against a prepared
//! [`ContactsSuite`](crate::base::ContactsSuite); the caller begins and
//! finishes the case.

pub mod s02_update;
pub mod s04_move;
pub mod s07_user_photo;
