use super::*;
use crate::widgets::autocomplete::{MatchPolicy, SubstringSuggestions, SuggestionSource};
use crate::widgets::back_link::ReferrerAllowList;

pub(crate) const DEFAULT_AUTOCOMPLETE_MODULE: &str = "hmrc-accessible-autocomplete";
pub(crate) const DEFAULT_BACK_LINK_MODULE: &str = "hmrc-back-link";
pub(crate) const DEFAULT_HIDDEN_BACK_LINK_CLASS: &str = "hmrc-hidden-backlink";
pub(crate) const DEFAULT_ASSISTIVE_HINT: &str = "When autocomplete results are available use up and down arrows to review and enter to select. Touch device users, explore by touch or with swipe gestures.";

/// Error-state class carried over from an enhanced select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassMapping {
    pub select_class: String,
    pub control_class: String,
    pub container_class: String,
}

impl ErrorClassMapping {
    pub fn new(select_class: &str, control_class: &str, container_class: &str) -> Self {
        Self {
            select_class: select_class.to_string(),
            control_class: control_class.to_string(),
            container_class: container_class.to_string(),
        }
    }

    pub fn govuk() -> Self {
        Self::new(
            "govuk-select--error",
            "govuk-input--error",
            "autocomplete__wrapper--error",
        )
    }
}

/// Which parts of `window.history` the page exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySupport {
    pub available: bool,
    pub replace_state: bool,
    pub back: bool,
}

impl Default for HistorySupport {
    fn default() -> Self {
        Self::full()
    }
}

impl HistorySupport {
    pub fn full() -> Self {
        Self {
            available: true,
            replace_state: true,
            back: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            replace_state: false,
            back: false,
        }
    }

    pub fn without_replace_state(mut self) -> Self {
        self.replace_state = false;
        self
    }

    pub fn without_back(mut self) -> Self {
        self.back = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub(crate) autocomplete_module: String,
    pub(crate) back_link_module: String,
    pub(crate) hidden_back_link_class: String,
    pub(crate) referrer_allow_list: ReferrerAllowList,
    pub(crate) error_class_map: Vec<ErrorClassMapping>,
    pub(crate) match_policy: MatchPolicy,
    pub(crate) history: HistorySupport,
    pub(crate) assistive_hint: String,
    pub(crate) suggestions: Rc<dyn SuggestionSource>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            autocomplete_module: DEFAULT_AUTOCOMPLETE_MODULE.to_string(),
            back_link_module: DEFAULT_BACK_LINK_MODULE.to_string(),
            hidden_back_link_class: DEFAULT_HIDDEN_BACK_LINK_CLASS.to_string(),
            referrer_allow_list: ReferrerAllowList::default(),
            error_class_map: vec![ErrorClassMapping::govuk()],
            match_policy: MatchPolicy::default(),
            history: HistorySupport::default(),
            assistive_hint: DEFAULT_ASSISTIVE_HINT.to_string(),
            suggestions: Rc::new(SubstringSuggestions),
        }
    }
}

impl WidgetConfig {
    pub fn with_autocomplete_module(mut self, name: &str) -> Result<Self> {
        self.autocomplete_module = validate_module_name(name)?;
        Ok(self)
    }

    pub fn with_back_link_module(mut self, name: &str) -> Result<Self> {
        self.back_link_module = validate_module_name(name)?;
        Ok(self)
    }

    pub fn with_hidden_back_link_class(mut self, class_name: &str) -> Result<Self> {
        if class_name.is_empty() || class_name.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "hidden back link class must be a single class token: {class_name:?}"
            )));
        }
        self.hidden_back_link_class = class_name.to_string();
        Ok(self)
    }

    pub fn with_referrer_allow_list(mut self, allow_list: ReferrerAllowList) -> Self {
        self.referrer_allow_list = allow_list;
        self
    }

    pub fn with_error_class_mapping(mut self, mapping: ErrorClassMapping) -> Self {
        self.error_class_map.push(mapping);
        self
    }

    pub fn without_error_class_mappings(mut self) -> Self {
        self.error_class_map.clear();
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    pub fn with_history(mut self, history: HistorySupport) -> Self {
        self.history = history;
        self
    }

    pub fn with_assistive_hint(mut self, text: &str) -> Self {
        self.assistive_hint = text.to_string();
        self
    }

    pub fn with_suggestion_source(mut self, source: impl SuggestionSource + 'static) -> Self {
        self.suggestions = Rc::new(source);
        self
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    pub fn history(&self) -> HistorySupport {
        self.history
    }

    pub fn referrer_allow_list(&self) -> &ReferrerAllowList {
        &self.referrer_allow_list
    }

    pub fn hidden_back_link_class(&self) -> &str {
        &self.hidden_back_link_class
    }
}

fn validate_module_name(name: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        return Err(Error::Config(format!("invalid data-module name: {name:?}")));
    }
    Ok(name.to_string())
}

/// Everything needed to load a page into a [`crate::Harness`].
#[derive(Debug, Clone)]
pub struct PageSetup {
    pub(crate) url: String,
    pub(crate) referrer: String,
    pub(crate) previous_pages: Vec<String>,
    pub(crate) html: String,
    pub(crate) config: WidgetConfig,
}

impl PageSetup {
    pub fn new(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            referrer: String::new(),
            previous_pages: Vec::new(),
            html: html.to_string(),
            config: WidgetConfig::default(),
        }
    }

    pub fn with_referrer(mut self, referrer: &str) -> Self {
        self.referrer = referrer.to_string();
        self
    }

    /// Adds a session-history entry before the current page.
    pub fn with_previous_page(mut self, url: &str) -> Self {
        self.previous_pages.push(url.to_string());
        self
    }

    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }
}
