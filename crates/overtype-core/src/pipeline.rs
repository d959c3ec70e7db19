//! Last-request-wins ordering for asynchronous page renders.
//!
//! Rendering a page and rebuilding its region list is asynchronous; the
//! user can flip pages or rescale while a render is in flight. Each render
//! request takes a ticket from a monotonically increasing generation
//! counter, and only the newest ticket is allowed to commit its result —
//! a superseded render can never overwrite newer state, regardless of
//! completion order.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Scale;

/// A claim on one render of `(page, scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTicket {
    generation: u64,
    pub page: u32,
    pub scale: Scale,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generation counter handing out and validating render tickets.
#[derive(Debug, Default)]
pub struct RenderSequencer {
    latest: AtomicU64,
}

impl RenderSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a render; every earlier ticket is superseded from this point.
    pub fn begin(&self, page: u32, scale: Scale) -> RenderTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RenderTicket { generation, page, scale }
    }

    /// Whether this ticket is still the newest one issued.
    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        ticket.generation == self.latest.load(Ordering::SeqCst)
    }

    /// Attempt to publish a finished render. Returns false for stale
    /// tickets; the caller must then discard the result.
    pub fn try_commit(&self, ticket: &RenderTicket) -> bool {
        self.is_current(ticket)
    }
}
