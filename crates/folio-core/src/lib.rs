#![forbid(unsafe_code)]

//! `folio-core` is the headless behavior layer of a single-page portfolio.
//!
//! Design goals:
//! - **Host-driven time**: nothing sleeps or spawns threads. Animations are
//!   single-shot tasks in a [`timer::TimerQueue`] that the host drains.
//! - **Explicit state**: every cursor, phase and navigation flag lives in an
//!   owned struct; the document is only ever a projection of that state.
//! - **Silent degradation**: a missing element disables the feature that
//!   needs it and nothing else.
//!
//! The browser binding lives in `folio-web`; everything here also runs
//! against [`dom::MemoryDocument`] for tests.

pub mod config;
pub mod cycler;
pub mod dom;
pub mod nav;
pub mod page;
pub mod paired;
pub mod timer;
pub mod widgets;

pub use config::{ConfigError, SiteConfig};
pub use cycler::{CyclerState, CyclerTimings, TextCycler};
pub use dom::{Document, MemoryDocument};
pub use nav::{NavOutcome, NavigationController, PendingReveal};
pub use page::Page;
pub use paired::{PairedCycler, PairedTimings, Phase};

/// Invalid cycler content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The list has no items at all.
    Empty { field: &'static str },
    /// An item has no visible characters.
    BlankItem { field: &'static str, index: usize },
    /// Titles and descriptions must pair up one to one.
    LengthMismatch { titles: usize, descriptions: usize },
}

impl core::fmt::Display for ContentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field}: list is empty"),
            Self::BlankItem { field, index } => write!(f, "{field}[{index}] is blank"),
            Self::LengthMismatch {
                titles,
                descriptions,
            } => write!(
                f,
                "{titles} titles but {descriptions} descriptions; lists must pair up"
            ),
        }
    }
}

impl std::error::Error for ContentError {}
