#![forbid(unsafe_code)]

//! WASM frontend for the portfolio page.
//!
//! This crate is intentionally host-specific (web/WASM). It binds
//! `folio-core` to the browser:
//! - a [`Document`](folio_core::Document) implementation over `web-sys`,
//! - a single `setTimeout` that pumps the page's timer queue,
//! - `load`/`click` listener wiring,
//! - construction of the third-party presentation widgets.

mod options;

pub use options::parse_options;

#[cfg(all(target_arch = "wasm32", feature = "console-log"))]
mod console;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioPage;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioPage;

#[cfg(not(target_arch = "wasm32"))]
impl FolioPage {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
