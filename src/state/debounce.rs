/// Quiet period before a search edit counts as stable.
pub(crate) const SEARCH_DEBOUNCE_MS: u32 = 500;

/// Identifies one `push`; only the newest ticket can settle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DebounceTicket(u64);

/// Single-slot debouncer.
///
/// Each `push` replaces the pending value and invalidates every earlier ticket, so a
/// timer started for a superseded value settles to nothing. Values are never queued.
/// Driving the quiet period (a browser timeout) is the caller's job.
#[derive(Debug)]
pub(crate) struct Debouncer<T> {
    delay_ms: u32,
    generation: u64,
    slot: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            generation: 0,
            slot: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn push(&mut self, value: T) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        self.slot = Some(value);
        DebounceTicket(self.generation)
    }

    /// Emits the pending value if `ticket` is still the newest one.
    pub fn settle(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.slot.take()
    }

    #[cfg(test)]
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.slot = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE_MS)
    }
}
