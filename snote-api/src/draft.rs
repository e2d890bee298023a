/// Draft autosave
///
/// The editor keeps one draft per store. Every keystroke goes through
/// [`DraftAutosave::edit`]; the slot is only written once edits have been
/// quiet for the configured delay, and never when the text is unchanged
/// since the last write.

use crate::DocumentStore;
use snote_core::{now_millis, DraftRecord, KvStore, Result, Timestamp};
use std::time::{Duration, Instant};
use tracing::debug;

/// Trailing-edge debounce over caller-supplied instants
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_touch: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_touch: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiet period at `now`
    pub fn touch(&mut self, now: Instant) {
        self.last_touch = Some(now);
    }

    /// True once the quiet period since the last touch has elapsed
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_touch {
            Some(touched) => now.saturating_duration_since(touched) >= self.delay,
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last_touch.is_some()
    }

    pub fn clear(&mut self) {
        self.last_touch = None;
    }
}

/// Debounced writer for the draft slot
#[derive(Debug, Clone)]
pub struct DraftAutosave {
    debouncer: Debouncer,
    pending: Option<(String, String)>,
    last_saved: Option<DraftRecord>,
}

impl DraftAutosave {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            pending: None,
            last_saved: None,
        }
    }

    /// Autosave using the store's configured delay
    pub fn for_store<S: KvStore>(store: &DocumentStore<S>) -> Self {
        Self::new(store.config().draft_debounce)
    }

    /// Remember `draft` as already persisted, e.g. after restoring it
    pub fn mark_saved(&mut self, draft: DraftRecord) {
        self.last_saved = Some(draft);
    }

    /// Record the latest editor text
    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>, now: Instant) {
        self.pending = Some((title.into(), content.into()));
        self.debouncer.touch(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_saved(&self) -> Option<&DraftRecord> {
        self.last_saved.as_ref()
    }

    /// Write the pending draft if the quiet period has elapsed
    ///
    /// Returns whether the slot was written.
    pub fn tick<S: KvStore>(&mut self, store: &DocumentStore<S>, now: Instant) -> Result<bool> {
        if !self.debouncer.is_due(now) {
            return Ok(false);
        }
        self.commit(store)
    }

    /// Write the pending draft now, ignoring the quiet period
    pub fn flush<S: KvStore>(&mut self, store: &DocumentStore<S>) -> Result<bool> {
        self.commit(store)
    }

    fn commit<S: KvStore>(&mut self, store: &DocumentStore<S>) -> Result<bool> {
        let Some((title, content)) = self.pending.as_ref() else {
            self.debouncer.clear();
            return Ok(false);
        };

        let unchanged = self
            .last_saved
            .as_ref()
            .is_some_and(|saved| saved.title == *title && saved.content == *content);

        if unchanged {
            debug!("Draft unchanged, skipping write");
        } else {
            let saved = store.save_draft(title, content)?;
            self.last_saved = Some(saved);
        }

        // Only dropped once written, so a failed write is retried on the next tick
        self.pending = None;
        self.debouncer.clear();
        Ok(!unchanged)
    }
}

impl<S: KvStore> DocumentStore<S> {
    /// Overwrite the draft slot immediately
    pub fn save_draft(&self, title: &str, content: &str) -> Result<DraftRecord> {
        self.save_draft_at(title, content, now_millis())
    }

    pub fn save_draft_at(&self, title: &str, content: &str, timestamp: Timestamp) -> Result<DraftRecord> {
        let draft = DraftRecord::new(title, content, timestamp);
        let text = serde_json::to_string(&draft)?;
        self.backend().set(&self.config().draft_key, text)?;

        debug!("Saved draft ({} bytes)", draft.content.len());
        Ok(draft)
    }

    /// The current draft, if one was saved
    pub fn load_draft(&self) -> Result<Option<DraftRecord>> {
        let key = &self.config().draft_key;
        match self.backend().get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| snote_core::Error::malformed(key, e)),
            None => Ok(None),
        }
    }

    /// Empty the draft slot; returns whether a draft existed
    pub fn clear_draft(&self) -> Result<bool> {
        self.backend().remove(&self.config().draft_key)
    }
}
