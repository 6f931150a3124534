use std::sync::atomic::{AtomicBool, Ordering};

use protocheck_harness::{ProtocolFault, UserAuthentication};

use crate::profile::{Quirk, ServerProfile};

/// Credentials one client connection presents. Each session of a server
/// has its own; the store behind them is shared.
#[derive(Debug)]
pub(crate) struct Credentials {
    authenticated: AtomicBool,
}

impl Credentials {
    pub(crate) fn new() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
        }
    }

    pub(crate) fn set(&self, auth: UserAuthentication) {
        self.authenticated.store(
            auth == UserAuthentication::Authenticated,
            Ordering::SeqCst,
        );
    }

    /// HTTP 401 for an unauthenticated caller.
    pub(crate) fn check(&self, profile: &ServerProfile) -> Result<(), ProtocolFault> {
        if self.authenticated.load(Ordering::SeqCst) || profile.has(Quirk::SkipAuthentication) {
            Ok(())
        } else {
            Err(ProtocolFault::unauthorized())
        }
    }
}
