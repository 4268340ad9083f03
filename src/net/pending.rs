//! In-flight request registry used for duplicate suppression.
//!
//! DESIGN
//! ======
//! At most one request per fingerprint is in flight. Registering a second one
//! aborts the first synchronously and takes over the slot. Each slot carries a
//! ticket id so a superseded request settling late cannot evict its successor.

#[cfg(test)]
#[path = "pending_test.rs"]
mod pending_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{AbortHandle, AbortRegistration};

use super::transport::HttpRequest;

/// Identity of a request for deduplication: method, URL, params and body.
#[must_use]
pub fn fingerprint(request: &HttpRequest) -> String {
    let params = serde_json::to_string(&request.params).unwrap_or_default();
    let body = request
        .body
        .as_ref()
        .map_or_else(|| "null".to_owned(), ToString::to_string);
    format!("{}_{}_{}_{}", request.method.as_str(), request.url, params, body)
}

/// Proof of registration handed back to the request that owns a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub fingerprint: String,
    pub id: u64,
}

/// A held slot. Released explicitly when the call settles, and on drop when
/// the call future is abandoned before that.
pub struct Claim {
    pending: Arc<PendingRequests>,
    ticket: Ticket,
}

impl Claim {
    #[must_use]
    pub fn new(pending: Arc<PendingRequests>, ticket: Ticket) -> Self {
        Self { pending, ticket }
    }

    #[must_use]
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn release(&self) -> bool {
        self.pending.release(&self.ticket)
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
struct Slots {
    next_id: u64,
    entries: HashMap<String, (u64, AbortHandle)>,
}

#[derive(Default)]
pub struct PendingRequests {
    slots: Mutex<Slots>,
}

impl PendingRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `fingerprint`, aborting whichever request held it.
    pub fn register(&self, fingerprint: String) -> (Ticket, AbortRegistration) {
        let (handle, registration) = AbortHandle::new_pair();
        let (id, superseded) = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.next_id += 1;
            let id = slots.next_id;
            let superseded = slots.entries.insert(fingerprint.clone(), (id, handle));
            (id, superseded)
        };
        if let Some((old_id, old_handle)) = superseded {
            log::debug!("cancelling superseded request #{old_id}: {fingerprint}");
            old_handle.abort();
        }
        (Ticket { fingerprint, id }, registration)
    }

    /// Drop the slot if `ticket` still owns it. Returns whether it did.
    pub fn release(&self, ticket: &Ticket) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.entries.get(&ticket.fingerprint) {
            Some((id, _)) if *id == ticket.id => {
                slots.entries.remove(&ticket.fingerprint);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .contains_key(fingerprint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
