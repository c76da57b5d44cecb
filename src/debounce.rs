/// Trailing-edge debounce driven by an external timer.
///
/// Every `push` supersedes the pending value and hands out a new ticket.
/// The caller arms one timer per push; when a timer fires it calls
/// `take` with its ticket, and only the ticket of the latest push yields
/// the value. A burst of input therefore produces exactly one write, after
/// the burst has been quiet for the timer delay.
#[derive(Debug)]
pub struct Debounce<T> {
    pending: Option<T>,
    ticket: u64,
}

impl<T> Debounce<T> {
    pub fn new() -> Self {
        Debounce { pending: None, ticket: 0 }
    }

    pub fn push(&mut self, value: T) -> u64 {
        self.ticket = self.ticket.wrapping_add(1);
        self.pending = Some(value);
        self.ticket
    }

    pub fn take(&mut self, ticket: u64) -> Option<T> {
        if ticket == self.ticket {
            self.pending.take()
        } else {
            None
        }
    }

    /// Drop whatever is pending (an explicit save already covered it)
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new()
    }
}
