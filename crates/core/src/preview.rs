// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Preview generation tracking.
//!
//! Each edit of a draft starts a new generation. A preview computed for an
//! older generation is discarded instead of published, so a slow render can
//! never overwrite the result of a newer edit.

use std::collections::HashMap;

/// Identifies one preview request for a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// The raw generation number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Tracks the latest preview generation per draft key.
#[derive(Debug, Default)]
pub struct PreviewGenerations {
    next: u64,
    latest: HashMap<String, Generation>,
}

impl PreviewGenerations {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation for a draft, superseding any earlier one.
    pub fn begin(&mut self, draft_key: &str) -> Generation {
        self.next = self.next.saturating_add(1);
        let generation: Generation = Generation(self.next);
        self.latest.insert(draft_key.to_string(), generation);
        generation
    }

    /// Returns whether `generation` is still the latest for the draft.
    #[must_use]
    pub fn is_current(&self, draft_key: &str, generation: Generation) -> bool {
        self.latest.get(draft_key) == Some(&generation)
    }

    /// Publishes a result if its generation is still current.
    ///
    /// The draft is released once its latest preview has been published.
    pub fn publish<T>(&mut self, draft_key: &str, generation: Generation, result: T) -> Option<T> {
        if self.is_current(draft_key, generation) {
            self.latest.remove(draft_key);
            Some(result)
        } else {
            None
        }
    }

    /// Releases a draft whose request was abandoned before publishing.
    ///
    /// Does nothing if a newer generation has started since.
    pub fn release(&mut self, draft_key: &str, generation: Generation) -> bool {
        if self.is_current(draft_key, generation) {
            self.latest.remove(draft_key);
            true
        } else {
            false
        }
    }

    /// Number of drafts with a pending preview.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.latest.len()
    }
}
