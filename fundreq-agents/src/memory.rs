use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 5;

/// Rolling window of the most recent user utterances in one session
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    utterances: VecDeque<String>,
    capacity: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            utterances: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an utterance, evicting the oldest once over capacity
    pub fn record(&mut self, utterance: impl Into<String>) {
        self.utterances.push_back(utterance.into());
        while self.utterances.len() > self.capacity {
            self.utterances.pop_front();
        }
    }

    /// Retained utterances joined by single spaces, oldest first
    pub fn context(&self) -> String {
        self.utterances
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Like [`context`](Self::context) but without the newest utterance
    pub fn prior_context(&self) -> String {
        let prior = self.utterances.len().saturating_sub(1);
        self.utterances
            .iter()
            .take(prior)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn clear(&mut self) {
        self.utterances.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.utterances.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
