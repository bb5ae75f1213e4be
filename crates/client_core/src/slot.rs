//! Lifecycle state holder for one asynchronous augmentation operation.

use shared::error::FetchError;

use crate::error::InvokeError;

/// Opaque tag identifying one issued request. A settlement is applied only
/// when its ticket still matches the slot's most recently issued one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SlotState<T> {
    #[default]
    Idle,
    Pending,
    Succeeded(T),
    Failed(FetchError),
}

/// One independent async operation: Idle -> Pending -> Succeeded | Failed,
/// re-enterable from either terminal state on a fresh user invocation.
///
/// On re-invocation the previous result is cleared immediately, so a stale
/// payload is never displayed as if it belonged to the request in flight.
/// Responses resolving out of issue order (rapid re-invoke after a reset,
/// navigation away) are discarded by ticket comparison rather than
/// cancellation; the network call itself is never interrupted.
#[derive(Debug)]
pub struct OperationSlot<T> {
    state: SlotState<T>,
    issued: u64,
}

impl<T> Default for OperationSlot<T> {
    fn default() -> Self {
        Self {
            state: SlotState::Idle,
            issued: 0,
        }
    }
}

impl<T> OperationSlot<T> {
    pub fn state(&self) -> &SlotState<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SlotState::Pending)
    }

    /// Move to Pending and issue a ticket for the request about to be sent.
    /// Rejected while a previous request is still in flight; the trigger is
    /// expected to be disabled in that window, so there is no queueing.
    pub fn begin(&mut self) -> Result<RequestTicket, InvokeError> {
        if self.is_pending() {
            return Err(InvokeError::Busy);
        }
        Ok(self.issue())
    }

    /// Move to Pending unconditionally, superseding any in-flight request.
    /// Used by navigation, where a new identifier always wins.
    pub fn restart(&mut self) -> RequestTicket {
        self.issue()
    }

    /// Return to Idle and invalidate every outstanding ticket.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.state = SlotState::Idle;
    }

    /// Apply a successful settlement; returns false if the ticket is stale.
    pub fn succeed(&mut self, ticket: RequestTicket, value: T) -> bool {
        self.settle(ticket, SlotState::Succeeded(value))
    }

    /// Apply a failed settlement; returns false if the ticket is stale.
    pub fn fail(&mut self, ticket: RequestTicket, error: FetchError) -> bool {
        self.settle(ticket, SlotState::Failed(error))
    }

    fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        self.state = SlotState::Pending;
        RequestTicket(self.issued)
    }

    fn settle(&mut self, ticket: RequestTicket, next: SlotState<T>) -> bool {
        if ticket != RequestTicket(self.issued) || !self.is_pending() {
            return false;
        }
        self.state = next;
        true
    }
}
