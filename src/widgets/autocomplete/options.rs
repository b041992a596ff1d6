use super::*;
use unicode_normalization::UnicodeNormalization;

/// How typed text is compared with option labels. Both sides are NFC-normalized, trimmed
/// and whitespace-collapsed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl MatchPolicy {
    pub fn normalize(&self, text: &str) -> String {
        let composed = text.nfc().collect::<String>();
        let collapsed = composed.split_whitespace().collect::<Vec<_>>().join(" ");
        match self {
            Self::CaseInsensitive => collapsed.to_lowercase(),
            Self::CaseSensitive => collapsed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch<'a> {
    NoMatch,
    Unique(&'a SelectOption),
    Ambiguous(usize),
}

/// Options of a select, read once at enhancement time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    options: Vec<SelectOption>,
}

impl OptionList {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self { options }
    }

    pub(crate) fn from_select(dom: &Dom, select: NodeId) -> Result<Self> {
        let mut options = Vec::new();
        for option in dom.select_options(select) {
            options.push(SelectOption {
                value: dom.option_effective_value(option)?,
                label: dom.option_label(option),
                selected: dom.has_attr(option, "selected")?,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn find_by_value(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// The explicitly selected option, if the markup marked one.
    pub fn selected(&self) -> Option<&SelectOption> {
        self.options.iter().find(|option| option.selected)
    }

    pub fn match_label(&self, text: &str, policy: MatchPolicy) -> LabelMatch<'_> {
        let wanted = policy.normalize(text);
        if wanted.is_empty() {
            return LabelMatch::NoMatch;
        }
        let mut matches = self
            .options
            .iter()
            .filter(|option| policy.normalize(&option.label) == wanted);
        match (matches.next(), matches.count()) {
            (None, _) => LabelMatch::NoMatch,
            (Some(option), 0) => LabelMatch::Unique(option),
            (Some(_), rest) => LabelMatch::Ambiguous(rest + 1),
        }
    }
}
