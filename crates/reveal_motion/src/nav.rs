//! Navigation chrome
//!
//! Two flags drive the page header: `scrolled` (the page is past a small
//! scroll threshold) and `menu_open` (the mobile menu is expanded). There is
//! one chrome per process. [`NavigationChrome::mount`] installs it, subscribes
//! it to scroll and returns a guard that tears both down again.
//!
//! ```ignore
//! let scroll = ScrollDispatcher::new();
//! let _nav = NavigationChrome::new(10.0).mount(&scroll)?;
//!
//! scroll.dispatch(11.0);
//! assert!(nav_state().unwrap().scrolled);
//! ```

use parking_lot::Mutex;
use reveal_core::{Error, NavDefaults, Result};
use serde::{Deserialize, Serialize};

use crate::scroll_signal::{ScrollDispatcher, ScrollSubscription};
use crate::stagger::StaggerGroup;

/// Header flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub scrolled: bool,
    pub menu_open: bool,
}

/// A navigation link and the anchor it jumps to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

impl NavLink {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

/// Scrolled/menu state of the page header
#[derive(Clone, Debug)]
pub struct NavigationChrome {
    scroll_threshold: f32,
    state: NavState,
    links: Vec<NavLink>,
    link_stagger: StaggerGroup,
}

impl NavigationChrome {
    pub fn new(scroll_threshold: f32) -> Self {
        Self {
            scroll_threshold,
            state: NavState::default(),
            links: Vec::new(),
            link_stagger: StaggerGroup::new(0, 100),
        }
    }

    pub fn from_defaults(defaults: &NavDefaults) -> Self {
        Self::new(defaults.scroll_threshold)
            .with_link_stagger(StaggerGroup::new(0, defaults.link_stagger_ms))
    }

    pub fn with_links(mut self, links: impl IntoIterator<Item = NavLink>) -> Self {
        self.links = links.into_iter().collect();
        self
    }

    pub fn with_link_stagger(mut self, stagger: StaggerGroup) -> Self {
        self.link_stagger = stagger;
        self
    }

    /// Update `scrolled` from an absolute offset; returns whether it changed
    ///
    /// The threshold is strict with no hysteresis band, so offsets
    /// oscillating around it flip the flag on every sample.
    pub fn on_scroll(&mut self, offset: f32) -> bool {
        let scrolled = offset > self.scroll_threshold;
        if scrolled == self.state.scrolled {
            return false;
        }
        self.state.scrolled = scrolled;
        tracing::debug!("NavigationChrome: scrolled = {} at {}", scrolled, offset);
        true
    }

    /// Flip the menu; returns the new `menu_open`
    pub fn toggle_menu(&mut self) -> bool {
        self.state.menu_open = !self.state.menu_open;
        tracing::debug!("NavigationChrome: menu_open = {}", self.state.menu_open);
        self.state.menu_open
    }

    /// Force the menu closed; returns whether it was open
    pub fn close_menu(&mut self) -> bool {
        std::mem::replace(&mut self.state.menu_open, false)
    }

    /// Follow a link: the menu closes and the matching link is returned
    pub fn activate_link(&mut self, href: &str) -> Option<NavLink> {
        self.close_menu();
        let link = self.links.iter().find(|link| link.href == href).cloned();
        if link.is_none() {
            tracing::debug!("NavigationChrome: unknown link {}", href);
        }
        link
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn scroll_threshold(&self) -> f32 {
        self.scroll_threshold
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Entry delay of the menu link at `index`
    pub fn link_delay(&self, index: usize) -> u32 {
        self.link_stagger.delay_for_in(index, self.links.len())
    }

    /// Install this chrome as the process-wide instance and subscribe it to
    /// `scroll`
    ///
    /// Fails if a chrome is already mounted. Dropping the returned guard
    /// unmounts it.
    pub fn mount(self, scroll: &ScrollDispatcher) -> Result<NavChromeGuard> {
        {
            let mut global = NAV_CHROME.lock();
            if global.is_some() {
                return Err(Error::NavChromeMounted);
            }
            *global = Some(self);
        }

        let subscription = scroll.subscribe(|offset| {
            if let Some(chrome) = NAV_CHROME.lock().as_mut() {
                chrome.on_scroll(offset);
            }
        });
        tracing::debug!("NavigationChrome: mounted");

        Ok(NavChromeGuard {
            subscription: Some(subscription),
        })
    }
}

impl Default for NavigationChrome {
    fn default() -> Self {
        Self::from_defaults(&NavDefaults::default())
    }
}

// ============================================================================
// Process-wide instance
// ============================================================================

static NAV_CHROME: Mutex<Option<NavigationChrome>> = parking_lot::const_mutex(None);

/// Keeps the navigation chrome mounted
///
/// Dropping it unsubscribes from scroll and clears the process-wide state.
pub struct NavChromeGuard {
    subscription: Option<ScrollSubscription>,
}

impl NavChromeGuard {
    /// Unmount explicitly; same as dropping the guard
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            NAV_CHROME.lock().take();
            tracing::debug!("NavigationChrome: unmounted");
        }
    }
}

impl Drop for NavChromeGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Check if a navigation chrome is mounted
pub fn is_nav_mounted() -> bool {
    NAV_CHROME.lock().is_some()
}

/// Current header flags, if mounted
pub fn nav_state() -> Option<NavState> {
    NAV_CHROME.lock().as_ref().map(NavigationChrome::state)
}

/// Flip the menu of the mounted chrome; returns the new `menu_open`
pub fn toggle_menu() -> Option<bool> {
    NAV_CHROME.lock().as_mut().map(NavigationChrome::toggle_menu)
}

/// Close the menu of the mounted chrome
pub fn close_menu() {
    if let Some(chrome) = NAV_CHROME.lock().as_mut() {
        chrome.close_menu();
    }
}

/// Follow a link on the mounted chrome
pub fn activate_link(href: &str) -> Option<NavLink> {
    NAV_CHROME
        .lock()
        .as_mut()
        .and_then(|chrome| chrome.activate_link(href))
}

/// Run `f` against the mounted chrome
pub fn with_nav<R>(f: impl FnOnce(&NavigationChrome) -> R) -> Option<R> {
    NAV_CHROME.lock().as_ref().map(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests touching the process-wide chrome must not overlap
    static MOUNT_LOCK: Mutex<()> = parking_lot::const_mutex(());

    fn links() -> Vec<NavLink> {
        vec![
            NavLink::new("Home", "#hero"),
            NavLink::new("About", "#about"),
            NavLink::new("Contact", "#contact"),
        ]
    }

    #[test]
    fn test_scroll_threshold_is_strict() {
        let mut chrome = NavigationChrome::new(10.0);
        assert!(!chrome.on_scroll(10.0));
        assert!(!chrome.state().scrolled);

        assert!(chrome.on_scroll(11.0));
        assert!(chrome.state().scrolled);

        assert!(chrome.on_scroll(5.0));
        assert!(!chrome.state().scrolled);
    }

    #[test]
    fn test_no_hysteresis() {
        let mut chrome = NavigationChrome::new(10.0);
        let changes = [9.0, 11.0, 9.5, 10.5, 9.9]
            .iter()
            .filter(|offset| chrome.on_scroll(**offset))
            .count();
        assert_eq!(changes, 4);
    }

    #[test]
    fn test_menu_toggle_and_link() {
        let mut chrome = NavigationChrome::new(10.0).with_links(links());
        assert!(chrome.toggle_menu());
        assert!(!chrome.toggle_menu());

        chrome.toggle_menu();
        let link = chrome.activate_link("#about").unwrap();
        assert_eq!(link.name, "About");
        assert!(!chrome.state().menu_open);

        assert!(chrome.activate_link("#nowhere").is_none());
        assert!(!chrome.close_menu());
    }

    #[test]
    fn test_link_delays() {
        let chrome = NavigationChrome::default().with_links(links());
        assert_eq!(chrome.link_delay(0), 0);
        assert_eq!(chrome.link_delay(2), 200);
    }

    #[test]
    fn test_mount_lifecycle() {
        let _serial = MOUNT_LOCK.lock();
        let scroll = ScrollDispatcher::new();

        assert!(!is_nav_mounted());
        assert_eq!(nav_state(), None);
        assert_eq!(toggle_menu(), None);

        let guard = NavigationChrome::new(10.0)
            .with_links(links())
            .mount(&scroll)
            .unwrap();
        assert!(is_nav_mounted());
        assert!(matches!(
            NavigationChrome::new(10.0).mount(&scroll),
            Err(Error::NavChromeMounted)
        ));

        scroll.dispatch(11.0);
        assert!(nav_state().unwrap().scrolled);
        scroll.dispatch(5.0);
        assert!(!nav_state().unwrap().scrolled);

        assert_eq!(toggle_menu(), Some(true));
        assert_eq!(activate_link("#contact").map(|l| l.name), Some("Contact".into()));
        assert!(!nav_state().unwrap().menu_open);
        assert_eq!(with_nav(|chrome| chrome.links().len()), Some(3));

        drop(guard);
        assert!(!is_nav_mounted());
        assert_eq!(scroll.listener_count(), 0);

        // Mountable again after teardown
        let guard = NavigationChrome::new(10.0).mount(&scroll).unwrap();
        guard.unmount();
        assert!(!is_nav_mounted());
    }
}
