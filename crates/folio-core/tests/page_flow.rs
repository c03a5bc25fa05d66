//! End-to-end page behavior against the headless document.

use core::time::Duration;

use folio_core::dom::{Document, MemoryDocument, NodeId, class};
use folio_core::{Page, SiteConfig};
use pretty_assertions::assert_eq;

const HOME: usize = 0;
const ABOUT: usize = 1;
const RESUME: usize = 2;
const CONTACT: usize = 3;
const BLOG: usize = 4;

struct Fixture {
    page: Page<MemoryDocument>,
    header: NodeId,
    navbar: NodeId,
    toggle: NodeId,
    podcast: NodeId,
    links: Vec<NodeId>,
    sections: Vec<NodeId>,
    hero: NodeId,
    title: NodeId,
    description: NodeId,
    filters: Vec<NodeId>,
    bars: Vec<NodeId>,
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn fixture_with(config: SiteConfig) -> Fixture {
    let mut doc = MemoryDocument::new();

    let header = doc.append(None, "header#header");
    let hero = doc.append(Some(header), "span.typing-text");
    let toggle = doc.append(Some(header), "i.mobile-nav-toggle.bi-list");
    let navbar = doc.append(Some(header), "nav#navbar.navbar");
    let ul = doc.append(Some(navbar), "ul");
    let links = [
        ("a.nav-link.active", "#header"),
        ("a.nav-link", "#about"),
        ("a.nav-link", "#resume"),
        ("a.nav-link", "#contact"),
        ("a.nav-link", "https://blog.example.com"),
    ]
    .into_iter()
    .map(|(spec, href)| {
        let li = doc.append(Some(ul), "li");
        let a = doc.append(Some(li), spec);
        doc.set_attribute(a, "href", href);
        a
    })
    .collect();

    let about = doc.append(None, "section#about.about");
    let title = doc.append(Some(about), "h3.about-title");
    let description = doc.append(Some(about), "p.about-description");
    let skills = doc.append(Some(about), "div.skills-content");
    let bars = ["90", "75", "oops"]
        .into_iter()
        .map(|value| {
            let progress = doc.append(Some(skills), "div.progress");
            let bar = doc.append(Some(progress), "div.progress-bar");
            doc.set_attribute(bar, "aria-valuenow", value);
            bar
        })
        .collect();

    let resume = doc.append(None, "section#resume.resume");
    let portfolio = doc.append(Some(resume), "div.portfolio");
    let flters = doc.append(Some(portfolio), "ul#portfolio-flters");
    let filters = [("li.filter-active", "*"), ("li", ".filter-app"), ("li", ".filter-web")]
        .into_iter()
        .map(|(spec, value)| {
            let li = doc.append(Some(flters), spec);
            doc.set_attribute(li, "data-filter", value);
            li
        })
        .collect();
    doc.append(Some(portfolio), "div.portfolio-container");

    let contact = doc.append(None, "section#contact.contact");
    let podcast = doc.append(None, "div#podcast-float");

    Fixture {
        page: Page::new(doc, config),
        header,
        navbar,
        toggle,
        podcast,
        links,
        sections: vec![about, resume, contact],
        hero,
        title,
        description,
        filters,
        bars,
    }
}

fn fixture() -> Fixture {
    fixture_with(SiteConfig::default())
}

impl Fixture {
    fn doc(&self) -> &MemoryDocument {
        self.page.document()
    }

    fn visible_sections(&self) -> Vec<usize> {
        (0..self.sections.len())
            .filter(|&i| self.doc().has_class(&self.sections[i], class::SECTION_SHOW))
            .collect()
    }

    fn active_links(&self) -> Vec<usize> {
        (0..self.links.len())
            .filter(|&i| self.doc().has_class(&self.links[i], class::ACTIVE))
            .collect()
    }

    fn podcast_display(&self) -> Option<&str> {
        self.doc().style(self.podcast, "display")
    }

    fn load(&mut self, fragment: Option<&str>) -> bool {
        let now = self.page.now();
        self.page.on_load(now, fragment)
    }

    fn click(&mut self, link: usize) -> bool {
        let now = self.page.now();
        self.page.on_nav_click(now, link)
    }

    fn start(&mut self) {
        let now = self.page.now();
        self.page.start(now);
    }

    /// Advance like a punctual host: wake at every deadline up to `now + dt`.
    fn advance_by(&mut self, dt: Duration) {
        let target = self.page.now() + dt;
        while let Some(due) = self.page.next_deadline().filter(|&due| due <= target) {
            self.page.advance_to(due);
        }
        self.page.advance_to(target);
    }
}

#[test]
fn load_without_fragment_shows_podcast_only() {
    let mut f = fixture();
    assert!(f.load(None));

    assert_eq!(f.podcast_display(), Some("block"));
    assert_eq!(f.active_links(), vec![HOME]);
    assert!(f.visible_sections().is_empty());
    assert!(!f.doc().has_class(&f.header, class::HEADER_TOP));
    assert_eq!(f.doc().scroll_requests(), 0);
    assert_eq!(f.page.pending_tasks(), 0);
}

#[test]
fn load_with_contact_fragment_reveals_after_delay() {
    let mut f = fixture();
    assert!(f.load(Some("#contact")));

    assert_eq!(f.active_links(), vec![CONTACT]);
    assert!(f.doc().has_class(&f.header, class::HEADER_TOP));
    assert_eq!(f.podcast_display(), Some("none"));
    assert_eq!(f.doc().scroll_requests(), 1);
    assert!(f.visible_sections().is_empty());

    f.advance_by(ms(349));
    assert!(f.visible_sections().is_empty());
    f.advance_by(ms(1));
    assert_eq!(f.visible_sections(), vec![2]);
}

#[test]
fn load_with_unknown_fragment_changes_nothing() {
    let mut f = fixture();
    assert!(!f.load(Some("#missing")));
    assert_eq!(f.podcast_display(), None);
    assert_eq!(f.active_links(), vec![HOME]);
    assert_eq!(f.page.pending_tasks(), 0);
}

#[test]
fn first_click_waits_for_header_then_shows_one_section() {
    let mut f = fixture();
    f.load(None);

    assert!(f.click(ABOUT));
    assert_eq!(f.active_links(), vec![ABOUT]);
    assert!(f.doc().has_class(&f.header, class::HEADER_TOP));
    assert_eq!(f.podcast_display(), Some("none"));
    assert!(f.visible_sections().is_empty());

    f.advance_by(ms(350));
    assert_eq!(f.visible_sections(), vec![0]);
}

#[test]
fn click_in_compact_mode_swaps_without_delay() {
    let mut f = fixture();
    f.click(ABOUT);
    f.advance_by(ms(350));

    assert!(f.click(RESUME));
    assert_eq!(f.visible_sections(), vec![1]);
    assert_eq!(f.active_links(), vec![RESUME]);
    assert_eq!(f.page.pending_tasks(), 0);
}

#[test]
fn home_click_hides_everything() {
    let mut f = fixture();
    f.click(CONTACT);
    f.advance_by(ms(350));
    let scrolls = f.doc().scroll_requests();

    assert!(f.click(HOME));
    assert!(f.visible_sections().is_empty());
    assert_eq!(f.active_links(), vec![HOME]);
    assert!(!f.doc().has_class(&f.header, class::HEADER_TOP));
    assert_eq!(f.podcast_display(), Some("block"));
    assert_eq!(f.doc().scroll_requests(), scrolls);
}

#[test]
fn external_link_falls_through() {
    let mut f = fixture();
    assert!(!f.click(BLOG));
    assert_eq!(f.active_links(), vec![HOME]);
    assert_eq!(f.doc().scroll_requests(), 0);
}

#[test]
fn repeated_click_settles_like_single_click() {
    let mut once = fixture();
    once.click(CONTACT);
    once.advance_by(ms(1000));

    let mut twice = fixture();
    twice.click(CONTACT);
    twice.click(CONTACT);
    twice.advance_by(ms(1000));

    assert_eq!(once.visible_sections(), twice.visible_sections());
    assert_eq!(once.active_links(), twice.active_links());
    assert_eq!(once.page.nav().state(), twice.page.nav().state());
}

#[test]
fn delayed_reveal_wins_over_later_immediate_swap() {
    // A click landing inside the delay window swaps at once; the pending
    // reveal from the first click then fires and shows its own target.
    let mut f = fixture();
    f.click(ABOUT);
    f.advance_by(ms(100));
    f.click(RESUME);
    assert_eq!(f.visible_sections(), vec![1]);

    f.advance_by(ms(250));
    assert_eq!(f.visible_sections(), vec![0]);
    assert_eq!(f.active_links(), vec![RESUME]);
}

#[test]
fn mobile_menu_toggles_and_closes_on_navigation() {
    let mut f = fixture();
    f.page.on_mobile_toggle();
    assert!(f.doc().has_class(&f.navbar, class::NAVBAR_MOBILE));
    assert!(f.doc().has_class(&f.toggle, class::ICON_CLOSE));
    assert!(!f.doc().has_class(&f.toggle, class::ICON_LIST));

    f.click(ABOUT);
    assert!(!f.doc().has_class(&f.navbar, class::NAVBAR_MOBILE));
    assert!(f.doc().has_class(&f.toggle, class::ICON_LIST));
    assert!(!f.doc().has_class(&f.toggle, class::ICON_CLOSE));
}

#[test]
fn cyclers_drive_their_surfaces() {
    let mut f = fixture();
    f.start();
    assert_eq!(f.doc().text(f.hero), "Q");
    assert_eq!(f.doc().text(f.title), "Q");
    assert_eq!(f.doc().style(f.hero, "width"), Some("8px"));
    assert_eq!(
        f.doc().style(f.hero, "border-bottom"),
        Some("1px solid #18d26e")
    );

    // Hero: 150ms/char; about title: 200ms/char.
    f.advance_by(ms(600));
    assert_eq!(f.doc().text(f.hero), "QA En");
    assert_eq!(f.doc().text(f.title), "QA E");
    assert_eq!(f.doc().text(f.description), "");
    assert_eq!(f.doc().style(f.hero, "width"), Some("40px"));
}

#[test]
fn start_is_not_repeated() {
    let mut f = fixture();
    f.start();
    let pending = f.page.pending_tasks();
    f.start();
    assert_eq!(f.page.pending_tasks(), pending);
    assert_eq!(f.doc().text(f.hero), "Q");
}

#[test]
fn missing_surface_keeps_cycler_off() {
    let mut doc = MemoryDocument::new();
    let title = doc.append(None, "h3.about-title");
    let mut page = Page::new(doc, SiteConfig::default());
    page.start(Duration::ZERO);

    assert!(page.role_cycler().is_none());
    assert!(page.about_cycler().is_none());
    assert_eq!(page.pending_tasks(), 0);
    assert_eq!(page.document().text(title), "");
}

#[test]
fn invalid_content_keeps_cycler_off() {
    let mut config = SiteConfig::default();
    config.content.roles.clear();
    let mut f = fixture_with(config);
    f.start();

    assert!(f.page.role_cycler().is_none());
    assert!(f.page.about_cycler().is_some());
    assert_eq!(f.doc().text(f.hero), "");
}

#[test]
fn underline_can_be_disabled() {
    let config = SiteConfig {
        underline: None,
        ..SiteConfig::default()
    };
    let mut f = fixture_with(config);
    f.start();
    assert_eq!(f.doc().text(f.hero), "Q");
    assert_eq!(f.doc().style(f.hero, "width"), None);
}

#[test]
fn filter_click_highlights_and_forwards_value() {
    let mut f = fixture();
    assert_eq!(f.page.on_filter_click(2).as_deref(), Some(".filter-web"));
    assert!(f.doc().has_class(&f.filters[2], class::FILTER_ACTIVE));
    assert!(!f.doc().has_class(&f.filters[0], class::FILTER_ACTIVE));
    assert_eq!(f.page.on_filter_click(9), None);
    assert_eq!(f.page.filter().and_then(|bar| bar.active()), Some(2));
}

#[test]
fn filter_is_inert_without_container() {
    let mut doc = MemoryDocument::new();
    let ul = doc.append(None, "ul#portfolio-flters");
    let li = doc.append(Some(ul), "li");
    doc.set_attribute(li, "data-filter", "*");
    let mut page = Page::new(doc, SiteConfig::default());
    assert_eq!(page.on_filter_click(0), None);
    assert!(page.filter().is_none());
}

#[test]
fn skills_bars_grow_to_their_value() {
    let mut f = fixture();
    f.page.on_skills_reached();
    assert_eq!(f.doc().style(f.bars[0], "width"), Some("90%"));
    assert_eq!(f.doc().style(f.bars[1], "width"), Some("75%"));
    assert_eq!(f.doc().style(f.bars[2], "width"), None);
}

#[test]
fn navigation_never_touches_cycler_surfaces() {
    let mut f = fixture();
    f.start();
    f.advance_by(ms(150));
    let hero = f.doc().text(f.hero).to_owned();

    f.click(ABOUT);
    f.click(HOME);
    assert_eq!(f.doc().text(f.hero), hero);
}

#[test]
fn late_wake_runs_one_step_per_cycler() {
    let mut f = fixture();
    f.start();

    // A throttled tab wakes once after a minute.
    let wake = Duration::from_secs(60);
    f.page.advance_to(wake);
    assert_eq!(f.doc().text(f.hero), "QA");
    assert_eq!(f.doc().text(f.title), "QA");
    assert_eq!(f.page.role_cycler().map(|c| c.state().item_index), Some(0));
    assert_eq!(f.page.now(), wake);
    assert_eq!(f.page.next_deadline(), Some(wake + ms(150)));
}

#[test]
fn click_after_idle_gap_waits_full_reveal_delay() {
    let mut f = fixture();
    f.load(None);

    // Nothing is scheduled, so page time has not moved since load.
    let click = Duration::from_secs(5);
    assert!(f.page.on_nav_click(click, ABOUT));
    assert_eq!(f.page.now(), click);
    assert_eq!(f.page.next_deadline(), Some(click + ms(350)));

    f.page.advance_to(click + ms(349));
    assert!(f.visible_sections().is_empty());
    f.page.advance_to(click + ms(350));
    assert_eq!(f.visible_sections(), vec![0]);
}

#[test]
fn load_after_idle_gap_waits_full_reveal_delay() {
    let mut f = fixture();
    let loaded = Duration::from_secs(3);
    assert!(f.page.on_load(loaded, Some("#contact")));
    assert_eq!(f.page.next_deadline(), Some(loaded + ms(350)));

    f.page.advance_to(loaded + ms(349));
    assert!(f.visible_sections().is_empty());
    f.page.advance_to(loaded + ms(350));
    assert_eq!(f.visible_sections(), vec![2]);
}
