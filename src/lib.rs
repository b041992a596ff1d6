use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

mod config;
mod dom;
mod harness;
mod html;
mod location;
mod runtime_state;
mod selector;
mod widgets;

pub use config::{ErrorClassMapping, HistorySupport, PageSetup, WidgetConfig};
pub use harness::Harness;
pub use runtime_state::{EventLog, EventRecord, LocationNavigation, LocationNavigationKind};
pub use widgets::autocomplete::{
    BridgeEffect, ControlState, DescribedByList, LabelMatch, MatchPolicy, OptionList,
    SelectOption, SelectValueBridge, SubstringSuggestions, SuggestionSource,
    merge_described_by,
};
pub use widgets::back_link::{BackLinkState, ReferrerAllowList, ReferrerDecision};
pub use widgets::history::{HistoryApi, HistoryController};

use dom::{Dom, NodeId};
use location::ParsedUrl;
use runtime_state::*;
use selector::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    Dom(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl StdError for Error {}

/// Keeps the first `max_chars` characters, marking a cut with `...`.
pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests;
