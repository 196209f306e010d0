use std::collections::VecDeque;

/// Number of generations kept per session.
pub const HISTORY_CAPACITY: usize = 10;

/// Caption width used when listing history entries.
pub const HISTORY_CAPTION_LEN: usize = 25;

/// A QR code generated earlier in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    /// PNG encoded image.
    pub image: Vec<u8>,
    pub settings: String,
}

impl HistoryEntry {
    pub fn caption(&self) -> String {
        caption(&self.url, HISTORY_CAPTION_LEN)
    }
}

/// Most-recent-first list of generated codes, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` at the front, dropping the oldest entry once the cap is
    /// exceeded.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Index 0 is the most recent entry.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// File stem used when saving a history entry.
pub fn history_file_stem(index: usize) -> String {
    format!("qr_code_history_{index}")
}

/// Shortens `text` to `max` characters followed by `...` when it is longer.
pub fn caption(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}
