//! Portfolio page composition
//!
//! [`PortfolioPage`] owns the registries (timers, observations, scroll
//! listeners), mounts every section against them and routes host events to
//! the right primitive. State is read back through [`PortfolioPage::snapshot`].
//!
//! The navigation chrome is process-wide, so only one page can be mounted at
//! a time.

use indexmap::IndexMap;
use reveal_core::{Bounds, ElementId, MotionConfig, Viewport};
use reveal_motion::{
    nav_state, FilterKey, FilterTransition, IntersectionObserver, NavChromeGuard, NavLink,
    NavState, NavigationChrome, ScrollDispatcher, TimerScheduler, VisibilityChange,
};
use serde::Serialize;

use crate::content::nav_links;
use crate::error::{PageError, Result};
use crate::event::PageEvent;
use crate::sections::{
    AboutSection, AboutSnapshot, ContactSection, ContactSnapshot, HeroSection, HeroSnapshot,
    ProjectsSection, ProjectsSnapshot, SkillsSection, SkillsSnapshot, ABOUT_SECTION,
};

/// Every derived value of the page at one instant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub time_ms: u64,
    pub scroll_offset: f32,
    pub nav: NavState,
    pub hero: HeroSnapshot,
    pub about: AboutSnapshot,
    pub projects: ProjectsSnapshot,
    pub skills: SkillsSnapshot,
    pub contact: ContactSnapshot,
}

impl PageSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct PortfolioPage {
    config: MotionConfig,
    timers: TimerScheduler,
    observer: IntersectionObserver,
    scroll: ScrollDispatcher,
    viewport: Viewport,
    /// Last known bounds per element, in document coordinates
    layout: IndexMap<ElementId, Bounds>,
    hero: HeroSection,
    about: AboutSection,
    projects: ProjectsSection,
    skills: SkillsSection,
    contact: ContactSection,
    nav: Option<NavChromeGuard>,
}

impl PortfolioPage {
    /// Mount every section and the navigation chrome
    ///
    /// Fails if another page (or any navigation chrome) is mounted.
    pub fn mount(config: MotionConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;

        let timers = TimerScheduler::new();
        let observer = IntersectionObserver::new();
        let scroll = ScrollDispatcher::new();

        let nav = NavigationChrome::from_defaults(&config.nav)
            .with_links(nav_links())
            .mount(&scroll)?;

        let page = Self {
            hero: HeroSection::mount(timers.handle(), &config),
            about: AboutSection::mount(&observer, &config),
            projects: ProjectsSection::mount(&observer, &config),
            skills: SkillsSection::mount(&observer, &config),
            contact: ContactSection::mount(&observer, &config),
            config,
            timers,
            observer,
            scroll,
            viewport,
            layout: IndexMap::new(),
            nav: Some(nav),
        };

        tracing::info!(
            "PortfolioPage mounted: {} observations, viewport {}x{}",
            page.observer.observation_count(),
            page.viewport.width,
            page.viewport.height
        );
        Ok(page)
    }

    /// Route one host event
    pub fn handle(&mut self, event: &PageEvent) -> Result<()> {
        tracing::trace!("PortfolioPage: {} event", event.kind());
        match event {
            PageEvent::Scroll { offset } => self.scroll_to(*offset),
            PageEvent::Resize { width, height } => self.resize(*width, *height)?,
            PageEvent::Layout {
                element,
                x,
                y,
                width,
                height,
            } => self.set_layout(element.clone(), Bounds::new(*x, *y, *width, *height))?,
            PageEvent::Intersection { element, ratio } => {
                self.deliver_intersection(element, *ratio);
            }
            PageEvent::Advance { ms } => self.advance(*ms),
            PageEvent::Filter { key } => {
                self.set_filter(key.clone());
            }
            PageEvent::ToggleMenu => {
                self.toggle_menu();
            }
            PageEvent::Navigate { href } => {
                self.navigate(href);
            }
        }
        Ok(())
    }

    /// Scroll to an absolute vertical offset
    pub fn scroll_to(&mut self, offset: f32) {
        self.viewport = self.viewport.scrolled_to(offset);
        self.scroll.dispatch(offset);
        self.refresh_visibility();
    }

    /// Resize the viewport; on error the page is left unchanged
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let valid = [width, height].iter().all(|v| v.is_finite() && *v >= 0.0);
        if !valid {
            return Err(PageError::InvalidLayout {
                element: "viewport".to_string(),
                reason: format!("size {}x{}", width, height),
            });
        }
        if let Some(bounds) = self.layout.get(ABOUT_SECTION).copied() {
            self.about.layout(&bounds, height)?;
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.refresh_visibility();
        Ok(())
    }

    /// Record an element's geometry and re-evaluate its visibility
    pub fn set_layout(&mut self, element: ElementId, bounds: Bounds) -> Result<()> {
        let valid = [bounds.x, bounds.y, bounds.width, bounds.height]
            .iter()
            .all(|v| v.is_finite())
            && bounds.width >= 0.0
            && bounds.height >= 0.0;
        if !valid {
            return Err(PageError::InvalidLayout {
                element: element.to_string(),
                reason: format!("{:?}", bounds),
            });
        }

        if element.as_str() == ABOUT_SECTION {
            self.about.layout(&bounds, self.viewport.height)?;
        }
        self.observer.deliver_geometry(&element, &bounds, &self.viewport);
        self.layout.insert(element, bounds);
        Ok(())
    }

    /// Deliver a raw intersection ratio for an element
    pub fn deliver_intersection(&self, element: &ElementId, ratio: f32) -> Vec<VisibilityChange> {
        self.observer.deliver(element, ratio)
    }

    /// Advance the page clock
    pub fn advance(&mut self, ms: u64) {
        self.timers.advance(ms);
        self.projects.tick(self.timers.now_ms());
    }

    /// Switch the project filter
    pub fn set_filter(&mut self, key: impl Into<FilterKey>) -> FilterTransition {
        let now = self.timers.now_ms();
        self.projects.set_filter(key.into(), now)
    }

    /// Flip the mobile menu; returns the new `menu_open`
    pub fn toggle_menu(&self) -> bool {
        reveal_motion::toggle_menu().unwrap_or(false)
    }

    /// Follow a navigation link
    ///
    /// The menu closes. If the target section has been laid out the page
    /// scrolls to it.
    pub fn navigate(&mut self, href: &str) -> Option<NavLink> {
        let link = reveal_motion::activate_link(href)?;
        let target = href.trim_start_matches('#');
        if let Some(bounds) = self.layout.get(target).copied() {
            self.scroll_to(bounds.y);
        }
        Some(link)
    }

    fn refresh_visibility(&self) {
        let changes: usize = self
            .layout
            .iter()
            .map(|(element, bounds)| {
                self.observer
                    .deliver_geometry(element, bounds, &self.viewport)
                    .len()
            })
            .sum();
        if changes > 0 {
            tracing::debug!(
                "PortfolioPage: {} visibility change(s) at offset {}",
                changes,
                self.viewport.scroll_y
            );
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            time_ms: self.timers.now_ms(),
            scroll_offset: self.viewport.scroll_y,
            nav: nav_state().unwrap_or_default(),
            hero: self.hero.snapshot(),
            about: self.about.snapshot(self.viewport.scroll_y),
            projects: self.projects.snapshot(),
            skills: self.skills.snapshot(),
            contact: self.contact.snapshot(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn hero(&self) -> &HeroSection {
        &self.hero
    }

    pub fn about(&self) -> &AboutSection {
        &self.about
    }

    pub fn projects(&self) -> &ProjectsSection {
        &self.projects
    }

    pub fn skills(&self) -> &SkillsSection {
        &self.skills
    }

    pub fn observation_count(&self) -> usize {
        self.observer.observation_count()
    }

    /// Tear the page down; same as dropping it
    pub fn unmount(mut self) {
        if let Some(nav) = self.nav.take() {
            nav.unmount();
        }
        tracing::info!("PortfolioPage unmounted");
    }
}
