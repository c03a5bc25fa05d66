#![forbid(unsafe_code)]

//! Third-party presentation widgets.
//!
//! The slider, lightbox, masonry filter, scroll-reveal helper and counters
//! run their own behavior; the page only constructs them. The option structs
//! here serialize to exactly the objects those widgets expect (camelCase
//! keys), while selector fields that only the host needs are kept out of the
//! serialized form.
//!
//! Two small pieces of behavior do live on our side: the portfolio filter bar
//! (which item is highlighted, what value to forward to the masonry widget)
//! and the skill bars, whose width is revealed from `aria-valuenow`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Slider autoplay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Autoplay {
    pub delay: u32,
    pub disable_on_interaction: bool,
}

/// Slider pagination bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub el: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub clickable: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            el: ".swiper-pagination".into(),
            kind: "bullets".into(),
            clickable: true,
        }
    }
}

/// Slides shown at once: a count, or `"auto"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlidesPerView {
    Count(u32),
    Keyword(String),
}

/// Per-viewport-width slider layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub slides_per_view: u32,
    pub space_between: u32,
}

/// Options for one slider instance.
///
/// Fields missing from a deserialized object fall back to the testimonials
/// slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SliderOptions {
    /// Container the slider is mounted on.
    #[serde(skip_serializing)]
    pub selector: String,
    pub speed: u32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub autoplay: Autoplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_per_view: Option<SlidesPerView>,
    pub pagination: Pagination,
    /// Keyed by minimum viewport width in pixels.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub breakpoints: BTreeMap<u32, Breakpoint>,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self::testimonials()
    }
}

impl SliderOptions {
    /// Testimonials carousel: auto width, one slide on phones, three on desktop.
    #[must_use]
    pub fn testimonials() -> Self {
        let mut breakpoints = BTreeMap::new();
        breakpoints.insert(
            320,
            Breakpoint {
                slides_per_view: 1,
                space_between: 20,
            },
        );
        breakpoints.insert(
            1200,
            Breakpoint {
                slides_per_view: 3,
                space_between: 20,
            },
        );
        Self {
            selector: ".testimonials-slider".into(),
            speed: 600,
            looping: true,
            autoplay: Autoplay {
                delay: 5000,
                disable_on_interaction: false,
            },
            slides_per_view: Some(SlidesPerView::Keyword("auto".into())),
            pagination: Pagination::default(),
            breakpoints,
        }
    }

    /// Image slider on portfolio detail pages.
    #[must_use]
    pub fn portfolio_details() -> Self {
        Self {
            selector: ".portfolio-details-slider".into(),
            speed: 400,
            looping: true,
            autoplay: Autoplay {
                delay: 5000,
                disable_on_interaction: false,
            },
            slides_per_view: None,
            pagination: Pagination::default(),
            breakpoints: BTreeMap::new(),
        }
    }
}

/// Options for one lightbox instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightboxOptions {
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl Default for LightboxOptions {
    fn default() -> Self {
        Self::gallery()
    }
}

impl LightboxOptions {
    #[must_use]
    pub fn gallery() -> Self {
        Self {
            selector: ".portfolio-lightbox".into(),
            width: None,
            height: None,
        }
    }

    /// Detail pages open in a near-fullscreen frame.
    #[must_use]
    pub fn details() -> Self {
        Self {
            selector: ".portfolio-details-lightbox".into(),
            width: Some("90%".into()),
            height: Some("90vh".into()),
        }
    }
}

/// Masonry/filter layout options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasonryOptions {
    pub item_selector: String,
    pub layout_mode: String,
}

impl Default for MasonryOptions {
    fn default() -> Self {
        Self {
            item_selector: ".portfolio-item".into(),
            layout_mode: "fitRows".into(),
        }
    }
}

/// Scroll-triggered reveal options; the element and handler are supplied by
/// the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    pub offset: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            offset: "80%".into(),
        }
    }
}

/// Every widget the page constructs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    pub testimonials: SliderOptions,
    pub portfolio_details: SliderOptions,
    pub gallery_lightbox: LightboxOptions,
    pub details_lightbox: LightboxOptions,
    pub masonry: MasonryOptions,
    pub skills_reveal: RevealOptions,
    /// Start the animated counters.
    pub counters: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            testimonials: SliderOptions::testimonials(),
            portfolio_details: SliderOptions::portfolio_details(),
            gallery_lightbox: LightboxOptions::gallery(),
            details_lightbox: LightboxOptions::details(),
            masonry: MasonryOptions::default(),
            skills_reveal: RevealOptions::default(),
            counters: true,
        }
    }
}

/// Highlight state of the portfolio filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioFilter {
    filters: Vec<String>,
    active: Option<usize>,
}

impl PortfolioFilter {
    /// `filters` holds each item's declared filter value (`data-filter`),
    /// `active` the initially highlighted item.
    #[must_use]
    pub fn new(filters: Vec<String>, active: Option<usize>) -> Self {
        Self { filters, active }
    }

    /// Highlight item `index` and return the filter value to forward to the
    /// masonry widget's re-arrange operation.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        let value = self.filters.get(index)?;
        self.active = Some(index);
        Some(value)
    }

    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// CSS width for a skill bar from its `aria-valuenow`, clamped to 0–100%.
#[must_use]
pub fn progress_width(aria_valuenow: &str) -> Option<String> {
    let value: f64 = aria_valuenow.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(format!("{}%", value.clamp(0.0, 100.0)))
}
