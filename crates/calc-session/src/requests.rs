//! Stale-response guard for collaborator requests.
//!
//! Every load, save or price request gets a ticket. Only the completion of
//! the newest ticket of its kind is applied; anything older is dropped on
//! arrival instead of being merged into current state.

/// Kind of collaborator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Load,
    Save,
    Price,
}

impl RequestKind {
    fn slot(self) -> usize {
        match self {
            RequestKind::Load => 0,
            RequestKind::Save => 1,
            RequestKind::Price => 2,
        }
    }
}

/// Handle returned when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    kind: RequestKind,
    seq: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Whether a completion was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    next_seq: u64,
    pending: [Option<u64>; 3],
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes any pending request of the same kind.
    pub fn begin(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_seq += 1;
        self.pending[kind.slot()] = Some(self.next_seq);
        RequestTicket {
            kind,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.pending[ticket.kind.slot()] == Some(ticket.seq)
    }

    /// Consumes a completion. Returns false for superseded or already
    /// finished tickets.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pending[ticket.kind.slot()] = None;
        true
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending[kind.slot()].is_some()
    }

    /// Forgets the pending request of `kind`; its completion will be dropped.
    pub fn cancel(&mut self, kind: RequestKind) {
        self.pending[kind.slot()] = None;
    }
}
