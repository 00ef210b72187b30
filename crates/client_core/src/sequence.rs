/// Identifies one issued fetch. Tickets from the same sequence are ordered by
/// issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// Per-slice counter used to drop responses that were overtaken by a newer
/// request for the same slice.
#[derive(Debug, Default)]
pub struct FetchSequence {
    latest: u64,
}

impl FetchSequence {
    pub fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket(self.latest)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }
}
