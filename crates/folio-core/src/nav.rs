#![forbid(unsafe_code)]

//! Section navigation controller.
//!
//! Every content section is addressed by its fragment (`#about`). The home
//! fragment (`#header` by default) is special: it is not a section, it is the
//! state in which no section is shown, the header is expanded and the
//! floating podcast player is visible.
//!
//! The controller owns the navigation flags outright. It never touches a
//! document; callers project [`NavState`] onto whatever renders it, using
//! [`NavigationController::take_dirty`] to learn which surfaces changed.

use bitflags::bitflags;

bitflags! {
    /// Navigation surfaces whose projected state may have changed.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Surfaces: u8 {
        const SECTIONS = 0b0_0001;
        const LINKS    = 0b0_0010;
        const HEADER   = 0b0_0100;
        const PODCAST  = 0b0_1000;
        const MOBILE   = 0b1_0000;
    }
}

/// A content section and whether it carries the visible flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub fragment: String,
    pub visible: bool,
}

/// A navigation link and whether it is highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub active: bool,
}

impl NavLink {
    /// Fragment part of the link target (`"#about"` for `"index.html#about"`).
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        fragment_of(&self.href)
    }
}

/// Fragment part of `href`, including the leading `#`. A bare `#` is no
/// fragment at all.
#[must_use]
pub fn fragment_of(href: &str) -> Option<&str> {
    let at = href.find('#')?;
    let fragment = &href[at..];
    (fragment.len() > 1).then_some(fragment)
}

/// Navigation flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub sections: Vec<Section>,
    pub links: Vec<NavLink>,
    /// Header collapsed into its compact "scrolled" mode.
    pub header_top: bool,
    pub podcast_visible: bool,
    /// Mobile menu expanded.
    pub mobile_open: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            links: Vec::new(),
            header_top: false,
            podcast_visible: true,
            mobile_open: false,
        }
    }
}

/// A delayed visibility change produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReveal {
    /// Index into [`NavState::sections`].
    pub section: usize,
    /// Hide every other section first.
    pub exclusive: bool,
}

/// What a navigation entry point did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The target is not ours; the host should let the default action run.
    Ignored,
    Handled {
        /// Jump the viewport back to the top.
        scroll_to_top: bool,
        /// Visibility change to apply after the reveal delay.
        reveal: Option<PendingReveal>,
    },
}

impl NavOutcome {
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, NavOutcome::Handled { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Home,
    Section(usize),
}

/// Owns [`NavState`] and implements the page's navigation transitions.
#[derive(Debug, Clone)]
pub struct NavigationController {
    home: String,
    state: NavState,
    dirty: Surfaces,
}

impl NavigationController {
    /// Create a controller. `home` is the fragment of the home state,
    /// including its `#`.
    #[must_use]
    pub fn new(home: impl Into<String>, state: NavState) -> Self {
        Self {
            home: home.into(),
            state,
            dirty: Surfaces::empty(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &NavState {
        &self.state
    }

    #[must_use]
    pub fn home(&self) -> &str {
        &self.home
    }

    /// Surfaces changed since the last call, clearing the set.
    pub fn take_dirty(&mut self) -> Surfaces {
        core::mem::take(&mut self.dirty)
    }

    /// Index of the first highlighted link.
    #[must_use]
    pub fn active_link(&self) -> Option<usize> {
        self.state.links.iter().position(|l| l.active)
    }

    /// Indices of sections currently flagged visible.
    #[must_use]
    pub fn visible_sections(&self) -> Vec<usize> {
        self.state
            .sections
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.visible.then_some(i))
            .collect()
    }

    fn resolve(&self, fragment: &str) -> Option<Target> {
        if fragment == self.home {
            return Some(Target::Home);
        }
        self.state
            .sections
            .iter()
            .position(|s| s.fragment == fragment)
            .map(Target::Section)
    }

    /// Initial page load with the location's fragment.
    ///
    /// Without a fragment the page is in its home state; only the podcast
    /// player is touched. A fragment naming a known target highlights the
    /// matching links, collapses the header and asks for the target section
    /// to be revealed after the delay. Unknown fragments are ignored.
    pub fn on_load(&mut self, fragment: Option<&str>) -> NavOutcome {
        let Some(fragment) = fragment.filter(|f| f.len() > 1) else {
            self.set_podcast(true);
            tracing::debug!("nav load: no fragment, home state");
            return NavOutcome::Handled {
                scroll_to_top: false,
                reveal: None,
            };
        };
        let Some(target) = self.resolve(fragment) else {
            tracing::debug!(fragment, "nav load: unknown fragment ignored");
            return NavOutcome::Ignored;
        };

        self.set_header_top(true);
        // Only the first link targeting the fragment lights up.
        let chosen = self
            .state
            .links
            .iter()
            .position(|link| link.fragment() == Some(fragment));
        for (i, link) in self.state.links.iter_mut().enumerate() {
            link.active = Some(i) == chosen;
        }
        self.dirty |= Surfaces::LINKS;
        self.set_podcast(target == Target::Home);

        let reveal = match target {
            Target::Home => None,
            Target::Section(section) => Some(PendingReveal {
                section,
                exclusive: false,
            }),
        };
        tracing::debug!(fragment, ?reveal, "nav load");
        NavOutcome::Handled {
            scroll_to_top: true,
            reveal,
        }
    }

    /// A navigation link was clicked.
    ///
    /// Links that point nowhere we know are [`NavOutcome::Ignored`] so normal
    /// links keep working. Otherwise the link becomes the only active one,
    /// the mobile menu closes and the target is shown: immediately if the
    /// header is already compact, after the reveal delay if it first has to
    /// collapse.
    pub fn on_link_activate(&mut self, link: usize) -> NavOutcome {
        let Some(target) = self
            .state
            .links
            .get(link)
            .and_then(NavLink::fragment)
            .and_then(|f| self.resolve(f))
        else {
            return NavOutcome::Ignored;
        };

        for (i, l) in self.state.links.iter_mut().enumerate() {
            l.active = i == link;
        }
        self.dirty |= Surfaces::LINKS;
        if self.state.mobile_open {
            self.state.mobile_open = false;
            self.dirty |= Surfaces::MOBILE;
        }

        let section = match target {
            Target::Home => {
                self.set_header_top(false);
                self.show_only(None);
                self.set_podcast(true);
                tracing::debug!(link, "nav: home");
                return NavOutcome::Handled {
                    scroll_to_top: false,
                    reveal: None,
                };
            }
            Target::Section(section) => section,
        };

        let reveal = if self.state.header_top {
            self.show_only(Some(section));
            None
        } else {
            self.set_header_top(true);
            Some(PendingReveal {
                section,
                exclusive: true,
            })
        };
        self.set_podcast(false);
        tracing::debug!(link, section, deferred = reveal.is_some(), "nav: section");
        NavOutcome::Handled {
            scroll_to_top: true,
            reveal,
        }
    }

    /// Apply a reveal previously returned in a [`NavOutcome`].
    pub fn reveal(&mut self, reveal: PendingReveal) {
        if reveal.section >= self.state.sections.len() {
            return;
        }
        if reveal.exclusive {
            self.show_only(Some(reveal.section));
        } else {
            self.state.sections[reveal.section].visible = true;
            self.dirty |= Surfaces::SECTIONS;
        }
    }

    /// The mobile menu button was pressed.
    pub fn toggle_mobile(&mut self) {
        self.state.mobile_open = !self.state.mobile_open;
        self.dirty |= Surfaces::MOBILE;
    }

    fn show_only(&mut self, section: Option<usize>) {
        for (i, s) in self.state.sections.iter_mut().enumerate() {
            s.visible = Some(i) == section;
        }
        self.dirty |= Surfaces::SECTIONS;
    }

    fn set_header_top(&mut self, on: bool) {
        self.state.header_top = on;
        self.dirty |= Surfaces::HEADER;
    }

    fn set_podcast(&mut self, visible: bool) {
        self.state.podcast_visible = visible;
        self.dirty |= Surfaces::PODCAST;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const HOME: usize = 0;
    const ABOUT: usize = 1;
    const CONTACT: usize = 2;
    const EXTERNAL: usize = 3;

    fn controller() -> NavigationController {
        let sections = ["#about", "#resume", "#contact"]
            .iter()
            .map(|f| Section {
                fragment: (*f).to_owned(),
                visible: false,
            })
            .collect();
        let links = ["#header", "#about", "index.html#contact", "https://blog.example"]
            .iter()
            .enumerate()
            .map(|(i, href)| NavLink {
                href: (*href).to_owned(),
                active: i == 0,
            })
            .collect();
        NavigationController::new(
            "#header",
            NavState {
                sections,
                links,
                ..NavState::default()
            },
        )
    }

    #[test]
    fn fragment_extraction() {
        assert_eq!(fragment_of("#about"), Some("#about"));
        assert_eq!(fragment_of("/index.html#about"), Some("#about"));
        assert_eq!(fragment_of("#"), None);
        assert_eq!(fragment_of("https://example.com"), None);
    }

    #[test]
    fn load_without_fragment_only_shows_podcast() {
        let mut nav = controller();
        let before = nav.state().clone();
        let outcome = nav.on_load(None);
        assert_eq!(
            outcome,
            NavOutcome::Handled {
                scroll_to_top: false,
                reveal: None
            }
        );
        assert_eq!(nav.take_dirty(), Surfaces::PODCAST);
        assert_eq!(nav.state(), &before);
        assert!(nav.state().podcast_visible);
    }

    #[test]
    fn load_with_section_fragment_defers_reveal() {
        let mut nav = controller();
        let outcome = nav.on_load(Some("#about"));
        assert_eq!(
            outcome,
            NavOutcome::Handled {
                scroll_to_top: true,
                reveal: Some(PendingReveal {
                    section: 0,
                    exclusive: false
                }),
            }
        );
        assert!(nav.state().header_top);
        assert_eq!(nav.active_link(), Some(ABOUT));
        assert!(!nav.state().podcast_visible);
        assert!(nav.visible_sections().is_empty());

        nav.reveal(PendingReveal {
            section: 0,
            exclusive: false,
        });
        assert_eq!(nav.visible_sections(), vec![0]);
    }

    #[test]
    fn load_with_home_fragment_keeps_podcast() {
        let mut nav = controller();
        let outcome = nav.on_load(Some("#header"));
        assert_eq!(
            outcome,
            NavOutcome::Handled {
                scroll_to_top: true,
                reveal: None
            }
        );
        assert!(nav.state().podcast_visible);
        assert_eq!(nav.active_link(), Some(HOME));
    }

    #[test]
    fn load_highlights_first_link_sharing_a_fragment() {
        let mut nav = controller();
        nav.state.links.push(NavLink {
            href: "#about".into(),
            active: false,
        });
        nav.on_load(Some("#about"));
        let active: Vec<usize> = (0..nav.state().links.len())
            .filter(|&i| nav.state().links[i].active)
            .collect();
        assert_eq!(active, vec![ABOUT]);
    }

    #[test]
    fn load_with_unknown_fragment_is_ignored() {
        let mut nav = controller();
        assert_eq!(nav.on_load(Some("#nowhere")), NavOutcome::Ignored);
        assert!(nav.take_dirty().is_empty());
    }

    #[test]
    fn first_section_click_collapses_header_then_reveals() {
        let mut nav = controller();
        let outcome = nav.on_link_activate(CONTACT);
        assert_eq!(
            outcome,
            NavOutcome::Handled {
                scroll_to_top: true,
                reveal: Some(PendingReveal {
                    section: 2,
                    exclusive: true
                }),
            }
        );
        assert!(nav.state().header_top);
        assert_eq!(nav.active_link(), Some(CONTACT));
        assert!(!nav.state().podcast_visible);
    }

    #[test]
    fn click_while_compact_swaps_immediately() {
        let mut nav = controller();
        nav.on_link_activate(ABOUT);
        nav.reveal(PendingReveal {
            section: 0,
            exclusive: true,
        });

        let outcome = nav.on_link_activate(CONTACT);
        assert_eq!(
            outcome,
            NavOutcome::Handled {
                scroll_to_top: true,
                reveal: None
            }
        );
        assert_eq!(nav.visible_sections(), vec![2]);
        assert_eq!(nav.active_link(), Some(CONTACT));
    }

    #[test]
    fn home_click_clears_sections_and_expands_header() {
        let mut nav = controller();
        nav.on_link_activate(ABOUT);
        nav.reveal(PendingReveal {
            section: 0,
            exclusive: true,
        });
        nav.take_dirty();

        let outcome = nav.on_link_activate(HOME);
        assert_eq!(
            outcome,
            NavOutcome::Handled {
                scroll_to_top: false,
                reveal: None
            }
        );
        assert!(nav.visible_sections().is_empty());
        assert!(!nav.state().header_top);
        assert!(nav.state().podcast_visible);
        assert_eq!(
            nav.take_dirty(),
            Surfaces::LINKS | Surfaces::HEADER | Surfaces::SECTIONS | Surfaces::PODCAST
        );
    }

    #[test]
    fn external_link_is_ignored() {
        let mut nav = controller();
        assert_eq!(nav.on_link_activate(EXTERNAL), NavOutcome::Ignored);
        assert_eq!(nav.on_link_activate(99), NavOutcome::Ignored);
        assert_eq!(nav.active_link(), Some(HOME));
    }

    #[test]
    fn click_closes_mobile_menu() {
        let mut nav = controller();
        nav.toggle_mobile();
        assert!(nav.state().mobile_open);
        nav.take_dirty();

        nav.on_link_activate(ABOUT);
        assert!(!nav.state().mobile_open);
        assert!(nav.take_dirty().contains(Surfaces::MOBILE));
    }

    #[test]
    fn out_of_range_reveal_is_ignored() {
        let mut nav = controller();
        nav.reveal(PendingReveal {
            section: 42,
            exclusive: true,
        });
        assert!(nav.take_dirty().is_empty());
    }
}
