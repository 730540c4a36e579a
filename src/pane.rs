/// Handed out by [`ContentPane::begin`]; only the newest ticket may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    book_id: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Completion signal emitted once per accepted commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLoaded {
    pub book_id: String,
    pub generation: u64,
    pub chapters: usize,
    /// The placeholder document was committed instead of the book.
    pub placeholder: bool,
}

/// Destination of loaded content.
///
/// Every load takes a ticket first; a commit carrying a ticket older than
/// the latest one is discarded, so a slow stale load never overwrites a
/// newer one.
#[derive(Debug, Default)]
pub struct ContentPane {
    generation: u64,
    markup: String,
}

impl ContentPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, book_id: &str) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            book_id: book_id.to_string(),
        }
    }

    /// Store `markup` if `ticket` is still current.
    pub fn commit(
        &mut self,
        ticket: &LoadTicket,
        markup: String,
        chapters: usize,
        placeholder: bool,
    ) -> Option<ContentLoaded> {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale load {} of {} (current is {})",
                ticket.generation,
                ticket.book_id,
                self.generation
            );
            return None;
        }

        self.markup = markup;
        Some(ContentLoaded {
            book_id: ticket.book_id.clone(),
            generation: ticket.generation,
            chapters,
            placeholder,
        })
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_ticket_commits_once() {
        let mut pane = ContentPane::new();
        let ticket = pane.begin("war");
        let event = pane.commit(&ticket, "<p>x</p>".to_string(), 1, false).unwrap();
        assert_eq!(event.book_id, "war");
        assert_eq!(event.generation, 1);
        assert!(!event.placeholder);
        assert_eq!(pane.markup(), "<p>x</p>");
    }

    #[test]
    fn stale_ticket_cannot_overwrite_newer_load() {
        let mut pane = ContentPane::new();
        let first = pane.begin("war");
        let second = pane.begin("war");

        let event = pane.commit(&second, "new".to_string(), 2, false).unwrap();
        assert_eq!(event.generation, second.generation());
        assert!(pane.commit(&first, "old".to_string(), 1, false).is_none());
        assert_eq!(pane.markup(), "new");
    }
}
