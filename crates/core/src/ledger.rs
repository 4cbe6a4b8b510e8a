use crate::model::{Exchange, HistoryEntry};

/// Ordered, append-only log of the exchanges in a guided conversation.
///
/// Entries are only ever removed all at once, by [`ConversationLedger::restart`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLedger {
    entries: Vec<Exchange>,
}

impl ConversationLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, exchange: Exchange) {
        self.entries.push(exchange);
    }

    pub fn restart(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exchange> {
        self.entries.iter()
    }

    /// Question text of the most recent exchange.
    #[must_use]
    pub fn last_question(&self) -> Option<&str> {
        self.entries.last().map(|e| e.question.as_str())
    }

    /// Entries in the shape the question generator expects.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.entries.iter().map(Exchange::history_entry).collect()
    }
}

impl<'a> IntoIterator for &'a ConversationLedger {
    type Item = &'a Exchange;
    type IntoIter = std::slice::Iter<'a, Exchange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
