#![forbid(unsafe_code)]

//! Page runtime: wires the cyclers and the navigation controller to a
//! [`Document`] and a [`TimerQueue`].
//!
//! The host drives everything:
//!
//! 1. [`Page::new`] resolves every element the page needs.
//! 2. [`Page::start`] kicks off both cyclers (first step runs immediately).
//! 3. Forward DOM events to [`Page::on_load`], [`Page::on_nav_click`],
//!    [`Page::on_mobile_toggle`], [`Page::on_filter_click`] and
//!    [`Page::on_skills_reached`].
//! 4. Call [`Page::advance_to`] whenever [`Page::next_deadline`] is reached.
//!
//! Entry points that schedule work take the host's current time, so every
//! delay is measured from the moment the event happened.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::{MemoryDocument, Page, SiteConfig};
//!
//! let mut doc = MemoryDocument::new();
//! let hero = doc.append(None, "span.typing-text");
//!
//! let mut page = Page::new(doc, SiteConfig::default());
//! page.start(Duration::ZERO);
//! assert_eq!(page.document().text(hero), "Q");
//!
//! page.advance_to(Duration::from_millis(150));
//! assert_eq!(page.document().text(hero), "QA");
//! ```

use core::time::Duration;

use crate::config::SiteConfig;
use crate::cycler::TextCycler;
use crate::dom::{Document, class};
use crate::nav::{NavLink, NavOutcome, NavState, NavigationController, PendingReveal, Section, Surfaces};
use crate::paired::{Field, PairedCycler};
use crate::timer::TimerQueue;
use crate::widgets::{PortfolioFilter, progress_width};

/// Floor for rescheduled ticks; keeps a zero-length timing from spinning
/// `advance_to` forever.
const MIN_TICK: Duration = Duration::from_millis(1);

/// Deferred work owned by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTask {
    RoleTick,
    AboutTick,
    Reveal(PendingReveal),
}

struct RoleAnimation<N> {
    cycler: TextCycler,
    surface: N,
}

struct AboutAnimation<N> {
    cycler: PairedCycler,
    title: N,
    description: N,
}

/// Elements the navigation state is projected onto. `sections` and `links`
/// are index-aligned with [`NavState`].
struct NavNodes<N> {
    header: Option<N>,
    navbar: Option<N>,
    toggle: Option<N>,
    podcast: Option<N>,
    sections: Vec<N>,
    links: Vec<N>,
}

struct FilterBar<N> {
    filter: PortfolioFilter,
    items: Vec<N>,
}

/// The page's behavior layer over a document `D`.
pub struct Page<D: Document> {
    doc: D,
    config: SiteConfig,
    timers: TimerQueue<PageTask>,
    roles: Option<RoleAnimation<D::Node>>,
    about: Option<AboutAnimation<D::Node>>,
    nav: NavigationController,
    nav_nodes: NavNodes<D::Node>,
    filter: Option<FilterBar<D::Node>>,
}

impl<D: Document> Page<D> {
    /// Resolve the page's elements and read the initial navigation flags
    /// from the document.
    pub fn new(doc: D, config: SiteConfig) -> Self {
        let sel = &config.selectors;

        let sections = doc.query_all(&sel.sections);
        let links = doc.query_all(&sel.nav_links);
        let header = doc.query(&sel.header);
        let navbar = doc.query(&sel.navbar);

        let state = NavState {
            sections: sections
                .iter()
                .map(|node| Section {
                    fragment: doc
                        .attribute(node, "id")
                        .map(|id| format!("#{id}"))
                        .unwrap_or_default(),
                    visible: doc.has_class(node, class::SECTION_SHOW),
                })
                .collect(),
            links: links
                .iter()
                .map(|node| NavLink {
                    href: doc.attribute(node, "href").unwrap_or_default(),
                    active: doc.has_class(node, class::ACTIVE),
                })
                .collect(),
            header_top: header
                .as_ref()
                .is_some_and(|h| doc.has_class(h, class::HEADER_TOP)),
            podcast_visible: true,
            mobile_open: navbar
                .as_ref()
                .is_some_and(|n| doc.has_class(n, class::NAVBAR_MOBILE)),
        };
        let nav = NavigationController::new(config.home_fragment.clone(), state);

        let nav_nodes = NavNodes {
            header,
            navbar,
            toggle: doc.query(&sel.mobile_toggle),
            podcast: doc.query(&sel.podcast),
            sections,
            links,
        };

        // The filter bar only matters when there is something to arrange.
        let filter = doc.query(&sel.portfolio_container).map(|_| {
            let items = doc.query_all(&sel.portfolio_filters);
            let values = items
                .iter()
                .map(|n| doc.attribute(n, "data-filter").unwrap_or_default())
                .collect();
            let active = items
                .iter()
                .position(|n| doc.has_class(n, class::FILTER_ACTIVE));
            FilterBar {
                filter: PortfolioFilter::new(values, active),
                items,
            }
        });

        tracing::debug!(
            sections = nav_nodes.sections.len(),
            links = nav_nodes.links.len(),
            filter = filter.is_some(),
            "page resolved"
        );

        Self {
            doc,
            config,
            timers: TimerQueue::new(),
            roles: None,
            about: None,
            nav,
            nav_nodes,
            filter,
        }
    }

    /// Start both text cyclers at host time `now`.
    ///
    /// A cycler whose surface is missing, or whose content is invalid, stays
    /// off. Calling `start` again restarts nothing that is already running.
    pub fn start(&mut self, now: Duration) {
        self.advance_to(now);
        if self.roles.is_none() {
            self.roles = self.build_roles();
            if self.roles.is_some() {
                self.run(PageTask::RoleTick);
            }
        }
        if self.about.is_none() {
            self.about = self.build_about();
            if self.about.is_some() {
                self.run(PageTask::AboutTick);
            }
        }
    }

    fn build_roles(&self) -> Option<RoleAnimation<D::Node>> {
        let Some(surface) = self.doc.query(&self.config.selectors.typing_text) else {
            tracing::debug!("typing surface missing; role cycler off");
            return None;
        };
        match self.config.content.role_cycler(self.config.typing) {
            Ok(cycler) => Some(RoleAnimation { cycler, surface }),
            Err(err) => {
                tracing::warn!(%err, "role cycler off");
                None
            }
        }
    }

    fn build_about(&self) -> Option<AboutAnimation<D::Node>> {
        let sel = &self.config.selectors;
        let (Some(title), Some(description)) = (
            self.doc.query(&sel.about_title),
            self.doc.query(&sel.about_description),
        ) else {
            tracing::debug!("about surfaces missing; paired cycler off");
            return None;
        };
        match self.config.content.about_cycler(self.config.about) {
            Ok(cycler) => Some(AboutAnimation {
                cycler,
                title,
                description,
            }),
            Err(err) => {
                tracing::warn!(%err, "paired cycler off");
                None
            }
        }
    }

    /// The page finished loading at `now`; `fragment` is the location's
    /// hash (with `#`), if any. Returns whether the fragment was acted upon.
    pub fn on_load(&mut self, now: Duration, fragment: Option<&str>) -> bool {
        self.advance_to(now);
        let outcome = self.nav.on_load(fragment);
        self.apply(outcome)
    }

    /// Navigation link `index` (in `selectors.nav_links` order) was clicked
    /// at `now`.
    ///
    /// Returns `true` when the click was handled and the host must suppress
    /// the default navigation.
    pub fn on_nav_click(&mut self, now: Duration, index: usize) -> bool {
        self.advance_to(now);
        let outcome = self.nav.on_link_activate(index);
        self.apply(outcome)
    }

    /// The mobile menu button was clicked.
    pub fn on_mobile_toggle(&mut self) {
        self.nav.toggle_mobile();
        self.project();
    }

    /// Portfolio filter item `index` was clicked. Returns the filter value
    /// to forward to the masonry widget.
    pub fn on_filter_click(&mut self, index: usize) -> Option<String> {
        let bar = self.filter.as_mut()?;
        let value = bar.filter.select(index)?.to_owned();
        self.doc
            .set_class_exclusive(&bar.items, class::FILTER_ACTIVE, Some(index));
        tracing::debug!(index, filter = %value, "portfolio filter");
        Some(value)
    }

    /// The skills block scrolled into view: grow each bar to its value.
    pub fn on_skills_reached(&mut self) {
        for bar in self.doc.query_all(&self.config.selectors.progress_bars) {
            let width = self
                .doc
                .attribute(&bar, "aria-valuenow")
                .and_then(|v| progress_width(&v));
            if let Some(width) = width {
                self.doc.set_style(&bar, "width", &width);
            }
        }
    }

    /// Run every task due at or before `now`, then move page time to `now`.
    ///
    /// A cycler that missed several steps runs one step; its next one is
    /// measured from `now`.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(task) = self.timers.pop_due(now) {
            self.run(task);
        }
    }

    /// When the host should next call [`advance_to`](Self::advance_to).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Current page time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn nav(&self) -> &NavigationController {
        &self.nav
    }

    #[must_use]
    pub fn role_cycler(&self) -> Option<&TextCycler> {
        self.roles.as_ref().map(|r| &r.cycler)
    }

    #[must_use]
    pub fn about_cycler(&self) -> Option<&PairedCycler> {
        self.about.as_ref().map(|a| &a.cycler)
    }

    #[must_use]
    pub fn filter(&self) -> Option<&PortfolioFilter> {
        self.filter.as_ref().map(|f| &f.filter)
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    fn apply(&mut self, outcome: NavOutcome) -> bool {
        let NavOutcome::Handled {
            scroll_to_top,
            reveal,
        } = outcome
        else {
            return false;
        };
        if let Some(reveal) = reveal {
            self.timers
                .schedule_once(PageTask::Reveal(reveal), self.config.reveal_delay());
        }
        if scroll_to_top {
            self.doc.scroll_to_top();
        }
        self.project();
        true
    }

    fn run(&mut self, task: PageTask) {
        match task {
            PageTask::RoleTick => {
                let Some(anim) = self.roles.as_mut() else {
                    return;
                };
                let delay = anim.cycler.tick();
                self.doc.set_text(&anim.surface, anim.cycler.displayed());
                if let Some(underline) = &self.config.underline {
                    let width = self.doc.content_width(&anim.surface);
                    self.doc.set_style(&anim.surface, "border-bottom", underline);
                    self.doc
                        .set_style(&anim.surface, "width", &format!("{width}px"));
                }
                self.timers.schedule_once(task, delay.max(MIN_TICK));
            }
            PageTask::AboutTick => {
                let Some(anim) = self.about.as_mut() else {
                    return;
                };
                let tick = anim.cycler.tick();
                if let Some(field) = tick.field {
                    let node = match field {
                        Field::Title => &anim.title,
                        Field::Description => &anim.description,
                    };
                    self.doc.set_text(node, anim.cycler.text(field));
                }
                self.timers.schedule_once(task, tick.delay.max(MIN_TICK));
            }
            PageTask::Reveal(reveal) => {
                self.nav.reveal(reveal);
                self.project();
            }
        }
    }

    /// Write the navigation flags that changed onto the document.
    fn project(&mut self) {
        let dirty = self.nav.take_dirty();
        let state = self.nav.state();
        let nodes = &self.nav_nodes;
        let doc = &mut self.doc;

        if dirty.contains(Surfaces::SECTIONS) {
            for (node, section) in nodes.sections.iter().zip(&state.sections) {
                doc.set_class(node, class::SECTION_SHOW, section.visible);
            }
        }
        if dirty.contains(Surfaces::LINKS) {
            for (node, link) in nodes.links.iter().zip(&state.links) {
                doc.set_class(node, class::ACTIVE, link.active);
            }
        }
        if dirty.contains(Surfaces::HEADER)
            && let Some(header) = &nodes.header
        {
            doc.set_class(header, class::HEADER_TOP, state.header_top);
        }
        if dirty.contains(Surfaces::PODCAST)
            && let Some(podcast) = &nodes.podcast
        {
            let display = if state.podcast_visible { "block" } else { "none" };
            doc.set_style(podcast, "display", display);
        }
        if dirty.contains(Surfaces::MOBILE) {
            let open = state.mobile_open;
            if let Some(navbar) = &nodes.navbar {
                doc.set_class(navbar, class::NAVBAR_MOBILE, open);
            }
            if let Some(toggle) = &nodes.toggle {
                doc.set_class(toggle, class::ICON_LIST, !open);
                doc.set_class(toggle, class::ICON_CLOSE, open);
            }
        }
    }
}

impl<D: Document + core::fmt::Debug> core::fmt::Debug for Page<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Page")
            .field("doc", &self.doc)
            .field("timers", &self.timers)
            .field("nav", &self.nav)
            .field("roles", &self.roles.is_some())
            .field("about", &self.about.is_some())
            .finish()
    }
}
