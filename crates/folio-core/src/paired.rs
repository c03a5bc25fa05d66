#![forbid(unsafe_code)]

//! Two-field (title + description) typewriter.
//!
//! The paired cycler is an explicit six-phase state machine. Each call to
//! [`PairedCycler::tick`] executes the action of the current phase, picks the
//! next phase, and returns the delay before the following tick:
//!
//! | Phase           | Action                    | Next tick | Exit                              |
//! |-----------------|---------------------------|-----------|-----------------------------------|
//! | `TitleTyping`   | reveal one title grapheme | 200       | full → `TitlePause` after 1500    |
//! | `TitlePause`    | reset description cursor  | 500       | → `DescTyping`                    |
//! | `DescTyping`    | reveal one desc grapheme  | 150       | full → `DescPause` after 2000     |
//! | `DescPause`     | —                         | 500       | → `DescDeleting`                  |
//! | `DescDeleting`  | drop one desc grapheme    | 100       | empty → `TitleDeleting` after 500 |
//! | `TitleDeleting` | drop one title grapheme   | 100       | empty → next item, `TitleTyping` after 1000 |

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ContentError;
use crate::cycler::{Graphemes, prepare_items};

/// Phase of the [`PairedCycler`] state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    TitleTyping,
    TitlePause,
    DescTyping,
    DescPause,
    DescDeleting,
    TitleDeleting,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::TitleTyping,
        Phase::TitlePause,
        Phase::DescTyping,
        Phase::DescPause,
        Phase::DescDeleting,
        Phase::TitleDeleting,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::TitleTyping => "title-typing",
            Phase::TitlePause => "title-pause",
            Phase::DescTyping => "desc-typing",
            Phase::DescPause => "desc-pause",
            Phase::DescDeleting => "desc-deleting",
            Phase::TitleDeleting => "title-deleting",
        }
    }

    /// The phase that follows once this one's exit condition holds.
    #[must_use]
    pub const fn successor(self) -> Phase {
        match self {
            Phase::TitleTyping => Phase::TitlePause,
            Phase::TitlePause => Phase::DescTyping,
            Phase::DescTyping => Phase::DescPause,
            Phase::DescPause => Phase::DescDeleting,
            Phase::DescDeleting => Phase::TitleDeleting,
            Phase::TitleDeleting => Phase::TitleTyping,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tick intervals for [`PairedCycler`], in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairedTimings {
    pub title_type_ms: u64,
    /// Wait after the title is complete.
    pub title_hold_ms: u64,
    pub title_pause_ms: u64,
    pub desc_type_ms: u64,
    /// Wait after the description is complete.
    pub desc_hold_ms: u64,
    pub desc_pause_ms: u64,
    pub delete_ms: u64,
    /// Wait between an emptied description and the first title deletion.
    pub between_deletes_ms: u64,
    /// Wait after the title is gone, before the next item starts typing.
    pub next_item_ms: u64,
}

impl Default for PairedTimings {
    fn default() -> Self {
        Self {
            title_type_ms: 200,
            title_hold_ms: 1500,
            title_pause_ms: 500,
            desc_type_ms: 150,
            desc_hold_ms: 2000,
            desc_pause_ms: 500,
            delete_ms: 100,
            between_deletes_ms: 500,
            next_item_ms: 1000,
        }
    }
}

/// Which display surface a tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
}

/// Result of one [`PairedCycler::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedTick {
    /// Surface whose text changed, if any (pause phases change nothing).
    pub field: Option<Field>,
    /// Delay before the next tick.
    pub delay: Duration,
}

/// Cursor state of a [`PairedCycler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairedCyclerState {
    pub item_index: usize,
    pub title_char_index: usize,
    pub desc_char_index: usize,
    pub phase: Phase,
}

/// Title + description type/delete animator.
#[derive(Debug, Clone)]
pub struct PairedCycler {
    titles: Vec<Graphemes>,
    descriptions: Vec<Graphemes>,
    timings: PairedTimings,
    state: PairedCyclerState,
}

impl PairedCycler {
    /// Create a cycler over parallel `titles` / `descriptions` lists.
    pub fn new(
        titles: impl IntoIterator<Item = String>,
        descriptions: impl IntoIterator<Item = String>,
        timings: PairedTimings,
    ) -> Result<Self, ContentError> {
        let titles = prepare_items("titles", titles)?;
        let descriptions = prepare_items("descriptions", descriptions)?;
        if titles.len() != descriptions.len() {
            return Err(ContentError::LengthMismatch {
                titles: titles.len(),
                descriptions: descriptions.len(),
            });
        }
        Ok(Self {
            titles,
            descriptions,
            timings,
            state: PairedCyclerState::default(),
        })
    }

    /// Run the current phase's action and return what changed and when to
    /// tick again.
    pub fn tick(&mut self) -> PairedTick {
        let t = &self.timings;
        let st = &mut self.state;
        let title_len = self.titles[st.item_index].len();
        let desc_len = self.descriptions[st.item_index].len();
        let from = st.phase;

        let (field, delay_ms) = match st.phase {
            Phase::TitleTyping => {
                st.title_char_index = (st.title_char_index + 1).min(title_len);
                if st.title_char_index == title_len {
                    st.phase = Phase::TitlePause;
                    (Some(Field::Title), t.title_hold_ms)
                } else {
                    (Some(Field::Title), t.title_type_ms)
                }
            }
            Phase::TitlePause => {
                st.desc_char_index = 0;
                st.phase = Phase::DescTyping;
                (None, t.title_pause_ms)
            }
            Phase::DescTyping => {
                st.desc_char_index = (st.desc_char_index + 1).min(desc_len);
                if st.desc_char_index == desc_len {
                    st.phase = Phase::DescPause;
                    (Some(Field::Description), t.desc_hold_ms)
                } else {
                    (Some(Field::Description), t.desc_type_ms)
                }
            }
            Phase::DescPause => {
                st.phase = Phase::DescDeleting;
                (None, t.desc_pause_ms)
            }
            Phase::DescDeleting => {
                st.desc_char_index = st.desc_char_index.saturating_sub(1);
                if st.desc_char_index == 0 {
                    st.phase = Phase::TitleDeleting;
                    (Some(Field::Description), t.between_deletes_ms)
                } else {
                    (Some(Field::Description), t.delete_ms)
                }
            }
            Phase::TitleDeleting => {
                st.title_char_index = st.title_char_index.saturating_sub(1);
                if st.title_char_index == 0 {
                    st.phase = Phase::TitleTyping;
                    st.item_index = (st.item_index + 1) % self.titles.len();
                    (Some(Field::Title), t.next_item_ms)
                } else {
                    (Some(Field::Title), t.delete_ms)
                }
            }
        };

        if st.phase != from {
            tracing::trace!(
                from = from.as_str(),
                to = st.phase.as_str(),
                item = st.item_index,
                "paired cycler phase change"
            );
        }

        PairedTick {
            field,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Title text currently on display.
    #[must_use]
    pub fn title_text(&self) -> &str {
        self.titles[self.state.item_index].prefix(self.state.title_char_index)
    }

    /// Description text currently on display.
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.descriptions[self.state.item_index].prefix(self.state.desc_char_index)
    }

    /// Text currently shown on `field`.
    #[must_use]
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Title => self.title_text(),
            Field::Description => self.description_text(),
        }
    }

    #[must_use]
    pub fn state(&self) -> PairedCyclerState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.titles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn paired(titles: &[&str], descs: &[&str]) -> PairedCycler {
        PairedCycler::new(owned(titles), owned(descs), PairedTimings::default()).unwrap()
    }

    #[test]
    fn rejects_mismatched_lists() {
        let err = PairedCycler::new(
            owned(&["a", "b"]),
            owned(&["x"]),
            PairedTimings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::LengthMismatch {
                titles: 2,
                descriptions: 1
            }
        );
    }

    #[test]
    fn successor_cycles_through_all_phases() {
        let mut phase = Phase::TitleTyping;
        let mut seen = Vec::new();
        for _ in 0..Phase::ALL.len() {
            seen.push(phase);
            phase = phase.successor();
        }
        assert_eq!(seen, Phase::ALL.to_vec());
        assert_eq!(phase, Phase::TitleTyping);
    }

    #[test]
    fn full_cycle_matches_table() {
        let mut c = paired(&["QA", "PM"], &["ok", "go"]);

        let mut trace = Vec::new();
        for _ in 0..12 {
            let before = c.phase();
            let tick = c.tick();
            trace.push((
                before,
                c.title_text().to_owned(),
                c.description_text().to_owned(),
                tick.delay.as_millis() as u64,
            ));
        }

        let expected = vec![
            (Phase::TitleTyping, "Q", "", 200),
            (Phase::TitleTyping, "QA", "", 1500),
            (Phase::TitlePause, "QA", "", 500),
            (Phase::DescTyping, "QA", "o", 150),
            (Phase::DescTyping, "QA", "ok", 2000),
            (Phase::DescPause, "QA", "ok", 500),
            (Phase::DescDeleting, "QA", "o", 100),
            (Phase::DescDeleting, "QA", "", 500),
            (Phase::TitleDeleting, "Q", "", 100),
            (Phase::TitleDeleting, "", "", 1000),
            (Phase::TitleTyping, "P", "", 200),
            (Phase::TitleTyping, "PM", "", 1500),
        ];
        let expected: Vec<_> = expected
            .into_iter()
            .map(|(p, t, d, ms)| (p, t.to_owned(), d.to_owned(), ms))
            .collect();
        assert_eq!(trace, expected);
        assert_eq!(c.state().item_index, 1);
    }

    #[test]
    fn pause_phases_touch_no_surface() {
        let mut c = paired(&["A"], &["B"]);
        assert_eq!(c.tick().field, Some(Field::Title));
        assert_eq!(c.phase(), Phase::TitlePause);
        assert_eq!(c.tick().field, None);
        assert_eq!(c.tick().field, Some(Field::Description));
        assert_eq!(c.phase(), Phase::DescPause);
        assert_eq!(c.tick().field, None);
    }
}
