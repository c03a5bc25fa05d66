#![forbid(unsafe_code)]

//! Typewriter text cycler.
//!
//! [`TextCycler`] reveals one word (or phrase) at a time, grapheme by
//! grapheme, holds it, deletes it at double speed, then moves on to the next
//! item, wrapping at the end of the list forever.
//!
//! The cycler itself has no notion of time. Each [`TextCycler::tick`] performs
//! exactly one step and returns the delay the caller must wait before the
//! next one, so the pause after a full reveal and the pause before the next
//! word are just longer one-off delays between ticks.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::ContentError;

/// Tick intervals for [`TextCycler`], in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyclerTimings {
    /// Interval between revealed graphemes. Deletion runs at half of this.
    pub type_ms: u64,
    /// Hold once the item is fully revealed.
    pub hold_ms: u64,
    /// Pause after the item is fully deleted, before the next one starts.
    pub advance_ms: u64,
}

impl Default for CyclerTimings {
    fn default() -> Self {
        Self {
            type_ms: 150,
            hold_ms: 2000,
            advance_ms: 500,
        }
    }
}

impl CyclerTimings {
    #[must_use]
    pub fn type_interval(&self) -> Duration {
        Duration::from_millis(self.type_ms)
    }

    #[must_use]
    pub fn delete_interval(&self) -> Duration {
        Duration::from_millis(self.type_ms / 2)
    }

    #[must_use]
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    #[must_use]
    pub fn advance(&self) -> Duration {
        Duration::from_millis(self.advance_ms)
    }
}

/// A string pre-split at grapheme boundaries.
///
/// `prefix(n)` is the first `n` user-perceived characters, so a flag emoji
/// or a combining sequence is revealed and deleted in a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Graphemes {
    text: String,
    // Byte offset of the end of each grapheme.
    ends: Vec<usize>,
}

impl Graphemes {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let ends = text
            .grapheme_indices(true)
            .map(|(start, g)| start + g.len())
            .collect();
        Self { text, ends }
    }

    pub(crate) fn len(&self) -> usize {
        self.ends.len()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    pub(crate) fn prefix(&self, n: usize) -> &str {
        match n.min(self.ends.len()) {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }
}

/// Validate a list of display strings and split them into graphemes.
pub(crate) fn prepare_items(
    field: &'static str,
    items: impl IntoIterator<Item = String>,
) -> Result<Vec<Graphemes>, ContentError> {
    let items: Vec<Graphemes> = items.into_iter().map(Graphemes::new).collect();
    if items.is_empty() {
        return Err(ContentError::Empty { field });
    }
    if let Some(index) = items.iter().position(|item| item.len() == 0) {
        return Err(ContentError::BlankItem { field, index });
    }
    Ok(items)
}

/// Cursor state of a [`TextCycler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CyclerState {
    /// Index of the item being typed or deleted.
    pub item_index: usize,
    /// Number of graphemes of the current item on display.
    pub char_index: usize,
    /// Whether the cycler is currently deleting.
    pub deleting: bool,
}

/// One-item-at-a-time type/delete animator.
#[derive(Debug, Clone)]
pub struct TextCycler {
    items: Vec<Graphemes>,
    timings: CyclerTimings,
    state: CyclerState,
}

impl TextCycler {
    /// Create a cycler over `items`.
    ///
    /// Fails on an empty list or a blank item; neither can be animated.
    pub fn new(
        items: impl IntoIterator<Item = String>,
        timings: CyclerTimings,
    ) -> Result<Self, ContentError> {
        Ok(Self {
            items: prepare_items("roles", items)?,
            timings,
            state: CyclerState::default(),
        })
    }

    /// Perform one animation step and return the delay until the next one.
    ///
    /// Typing grows the displayed prefix by one grapheme per tick. Once the
    /// item is complete the cycler holds, then shrinks the prefix at half the
    /// typing interval; once empty it pauses and wraps to the next item.
    pub fn tick(&mut self) -> Duration {
        let len = self.items[self.state.item_index].len();
        let st = &mut self.state;

        if st.deleting {
            st.char_index = st.char_index.saturating_sub(1);
        } else {
            st.char_index = (st.char_index + 1).min(len);
        }

        if !st.deleting && st.char_index == len {
            st.deleting = true;
            tracing::trace!(item = st.item_index, "cycler item revealed");
            self.timings.hold()
        } else if st.deleting && st.char_index == 0 {
            st.deleting = false;
            st.item_index = (st.item_index + 1) % self.items.len();
            tracing::trace!(next = st.item_index, "cycler advancing");
            self.timings.advance()
        } else if st.deleting {
            self.timings.delete_interval()
        } else {
            self.timings.type_interval()
        }
    }

    /// Text currently on display.
    #[must_use]
    pub fn displayed(&self) -> &str {
        self.items[self.state.item_index].prefix(self.state.char_index)
    }

    /// The full item currently being typed or deleted.
    #[must_use]
    pub fn current_item(&self) -> &str {
        self.items[self.state.item_index].as_str()
    }

    #[must_use]
    pub fn state(&self) -> CyclerState {
        self.state
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn timings(&self) -> CyclerTimings {
        self.timings
    }
}
