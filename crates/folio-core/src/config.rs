#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Every field has a default matching the published page, so an embedder
//! only has to supply what differs. [`SiteConfig::from_json`] accepts a
//! partial JSON object (the shape the web host passes in as `options`).

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ContentError;
use crate::cycler::{CyclerTimings, TextCycler};
use crate::paired::{PairedCycler, PairedTimings};
use crate::widgets::WidgetOptions;

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ContentError> for ConfigError {
    fn from(err: ContentError) -> Self {
        let field = match err {
            ContentError::Empty { field } | ContentError::BlankItem { field, .. } => field,
            ContentError::LengthMismatch { .. } => "descriptions",
        };
        ConfigError::new(field, "", err.to_string())
    }
}

/// Selectors for every element the page drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub typing_text: String,
    pub about_title: String,
    pub about_description: String,
    pub header: String,
    pub navbar: String,
    pub nav_links: String,
    pub sections: String,
    pub mobile_toggle: String,
    pub podcast: String,
    pub portfolio_container: String,
    pub portfolio_filters: String,
    pub skills: String,
    pub progress_bars: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            typing_text: ".typing-text".into(),
            about_title: ".about-title".into(),
            about_description: ".about-description".into(),
            header: "#header".into(),
            navbar: "#navbar".into(),
            nav_links: "#navbar .nav-link".into(),
            sections: "section".into(),
            mobile_toggle: ".mobile-nav-toggle".into(),
            podcast: "#podcast-float".into(),
            portfolio_container: ".portfolio-container".into(),
            portfolio_filters: "#portfolio-flters li".into(),
            skills: ".skills-content".into(),
            progress_bars: ".progress .progress-bar".into(),
        }
    }
}

/// Text fed to the two cyclers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Hero typewriter items.
    pub roles: Vec<String>,
    /// About-section titles, paired index by index with `descriptions`.
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for Content {
    fn default() -> Self {
        Self {
            roles: owned(&[
                "QA Engineer",
                "Scrum Master",
                "Software Trainer",
                "Author of Kill All Bugs",
                "Entrepreneur",
                "Founder @AdParcel",
                "Podcaster",
                "Startup Builder",
                "Automation Enthusiast",
                "Digital Product Innovator",
                "LifeLong Learner",
            ]),
            titles: owned(&[
                "QA Engineer",
                "Scrum Master",
                "Software Trainer",
                "Author of Kill All Bugs",
                "Founder @AdParcel",
                "Entrepreneur",
                "Podcaster",
                "Startup Builder",
                "Automation Enthusiast",
                "Lifelong Learner",
                "Digital Product Innovator",
            ]),
            descriptions: owned(&[
                "Transforming code excellence into exceptional user experiences.",
                "Guiding teams to deliver value with focus and agility.",
                "Turning complex concepts into practical skills for learners.",
                "Sharing my passion for testing through words that stick.",
                "Building the future of digital ownership and online ads.",
                "Exploring opportunities and turning ideas into ventures.",
                "Amplifying voices and stories that inspire the tech world.",
                "Shaping products from scratch into real-world impact.",
                "Empowering efficiency with smart automation.",
                "Always curious, always growing in knowledge and skills.",
                "Reimagining how technology solves everyday challenges.",
            ]),
        }
    }
}

impl Content {
    /// Build the hero cycler.
    pub fn role_cycler(&self, timings: CyclerTimings) -> Result<TextCycler, ContentError> {
        TextCycler::new(self.roles.iter().cloned(), timings)
    }

    /// Build the about-section cycler.
    pub fn about_cycler(&self, timings: PairedTimings) -> Result<PairedCycler, ContentError> {
        PairedCycler::new(
            self.titles.iter().cloned(),
            self.descriptions.iter().cloned(),
            timings,
        )
    }
}

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub selectors: Selectors,
    pub content: Content,
    pub typing: CyclerTimings,
    pub about: PairedTimings,
    /// Delay between collapsing the header and showing a section.
    pub reveal_delay_ms: u64,
    /// Fragment of the home state.
    pub home_fragment: String,
    /// `border-bottom` applied under the hero typewriter, sized to the text.
    /// `None` leaves the element's style alone.
    pub underline: Option<String>,
    pub widgets: WidgetOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            content: Content::default(),
            typing: CyclerTimings::default(),
            about: PairedTimings::default(),
            reveal_delay_ms: 350,
            home_fragment: "#header".into(),
            underline: Some("1px solid #18d26e".into()),
            widgets: WidgetOptions::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON configuration object.
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(src).map_err(|err| {
            ConfigError::new(
                "config",
                format!("line {} column {}", err.line(), err.column()),
                err.to_string(),
            )
        })
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if let Err(err) = self.content.role_cycler(self.typing) {
            errors.push(err.into());
        }
        if let Err(err) = self.content.about_cycler(self.about) {
            errors.push(err.into());
        }

        if !self.home_fragment.starts_with('#') || self.home_fragment.len() < 2 {
            errors.push(ConfigError::new(
                "home_fragment",
                self.home_fragment.clone(),
                "expected a fragment such as #header",
            ));
        }

        // Deleting runs at half the typing interval, so 1ms would be a 0ms tick.
        validate_at_least("typing.type_ms", self.typing.type_ms, 2, &mut errors);
        validate_at_least("typing.hold_ms", self.typing.hold_ms, 1, &mut errors);
        validate_at_least("typing.advance_ms", self.typing.advance_ms, 1, &mut errors);
        let a = &self.about;
        for (field, value) in [
            ("about.title_type_ms", a.title_type_ms),
            ("about.title_hold_ms", a.title_hold_ms),
            ("about.title_pause_ms", a.title_pause_ms),
            ("about.desc_type_ms", a.desc_type_ms),
            ("about.desc_hold_ms", a.desc_hold_ms),
            ("about.desc_pause_ms", a.desc_pause_ms),
            ("about.delete_ms", a.delete_ms),
            ("about.between_deletes_ms", a.between_deletes_ms),
            ("about.next_item_ms", a.next_item_ms),
        ] {
            validate_at_least(field, value, 1, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_at_least(field: &'static str, value: u64, min: u64, errors: &mut Vec<ConfigError>) {
    if value < min {
        errors.push(ConfigError::new(
            field,
            value.to_string(),
            format!("must be at least {min}"),
        ));
    }
}
