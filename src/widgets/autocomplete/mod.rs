use super::*;

mod bridge;
mod control;
mod described_by;
mod enhancer;
mod options;
mod suggestions;

pub use bridge::{BridgeEffect, ControlState, SelectValueBridge};
pub(crate) use control::{AutocompleteControl, ControlNodes};
pub use described_by::{DescribedByList, merge_described_by};
pub(crate) use described_by::reconcile_described_by;
pub(crate) use enhancer::{AutocompleteEnhancer, EnhanceOutcome};
pub use options::{LabelMatch, MatchPolicy, OptionList, SelectOption};
pub use suggestions::{SubstringSuggestions, SuggestionSource};

pub(crate) const ENHANCED_MARKER_ATTR: &str = "data-autocomplete-enhanced";

pub(crate) fn assistive_hint_id(base_id: &str) -> String {
    format!("{base_id}__assistiveHint")
}

pub(crate) fn listbox_id(base_id: &str) -> String {
    format!("{base_id}__listbox")
}

pub(crate) fn hidden_select_id(base_id: &str) -> String {
    format!("{base_id}-select")
}
