use super::*;
use crate::widgets::autocomplete::{AutocompleteControl, ControlState};
use crate::widgets::back_link::{BackLink, BackLinkState};

mod assertions;
mod event_dispatch_focus;
mod listener_and_trace;
mod user_actions;
mod widget_bootstrap;

const DEFAULT_URL: &str = "about:blank";

/// Event handling may recurse through focus changes and synthetic events.
const DISPATCH_STACK: usize = 32 * 1024 * 1024;

/// A loaded page: its DOM, session history and the widgets initialised on it.
#[derive(Debug)]
pub struct Harness {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) config: WidgetConfig,
    pub(crate) location_history: LocationHistoryState,
    pub(crate) autocompletes: Vec<AutocompleteControl>,
    pub(crate) back_links: Vec<BackLink>,
    pub(crate) trace_state: TraceState,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::open(PageSetup::new(DEFAULT_URL, html))
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        Self::open(PageSetup::new(url, html))
    }

    pub fn from_html_with_config(html: &str, config: WidgetConfig) -> Result<Self> {
        Self::open(PageSetup::new(DEFAULT_URL, html).with_config(config))
    }

    /// Parses the page and runs module initialisation, as a browser does on load.
    pub fn open(setup: PageSetup) -> Result<Self> {
        stacker::grow(DISPATCH_STACK, || Self::open_impl(setup))
    }

    fn open_impl(setup: PageSetup) -> Result<Self> {
        let PageSetup {
            url,
            referrer,
            previous_pages,
            html: source,
            config,
        } = setup;
        let dom = html::parse_html(&source)?;
        let mut harness = Self {
            dom,
            listeners: ListenerStore::default(),
            config,
            location_history: LocationHistoryState::new(&previous_pages, &url, &referrer),
            autocompletes: Vec::new(),
            back_links: Vec::new(),
            trace_state: TraceState::default(),
        };
        harness.init_all()?;
        Ok(harness)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn tag_name(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom
            .tag_name(target)
            .map(ToOwned::to_owned)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "element".into(),
                actual: "non-element".into(),
            })
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.dom.query_selector(selector)?.is_some())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    /// Bridge state of the autocomplete owning `selector`, which may name its input,
    /// its hidden select or any node inside its wrapper.
    pub fn control_state(&self, selector: &str) -> Result<ControlState> {
        let target = self.select_one(selector)?;
        self.autocompletes
            .iter()
            .find(|control| {
                control.select == target
                    || control.wrapper == target
                    || self.dom.is_descendant_of(target, control.wrapper)
            })
            .map(|control| control.bridge().state().clone())
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "enhanced autocomplete".into(),
                actual: self.dom.tag_name(target).unwrap_or("non-element").to_string(),
            })
    }

    pub fn back_link_state(&self, selector: &str) -> Result<BackLinkState> {
        let target = self.select_one(selector)?;
        self.back_links
            .iter()
            .find(|link| link.node == target)
            .map(BackLink::state)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "initialised back link".into(),
                actual: self.dom.tag_name(target).unwrap_or("non-element").to_string(),
            })
    }

    pub fn current_url(&self) -> &str {
        self.location_history.current_url()
    }

    pub fn referrer(&self) -> &str {
        &self.location_history.referrer
    }

    pub fn history_len(&self) -> usize {
        self.location_history.entries.len()
    }

    pub fn history_index(&self) -> usize {
        self.location_history.index
    }

    pub fn back_calls(&self) -> usize {
        self.location_history.back_calls
    }

    pub fn replace_state_calls(&self) -> usize {
        self.location_history.replace_state_calls
    }

    pub fn location_navigations(&self) -> &[LocationNavigation] {
        &self.location_history.location_navigations
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }
}
