use super::*;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlState {
    pub committed_value: String,
    pub display_text: String,
}

/// DOM writes requested by the bridge, applied in order by the owning control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEffect {
    SetSelectValue(String),
    DispatchChange,
    SetDisplayText(String),
}

/// Keeps the hidden select's value consistent with the text typed into the input.
///
/// The bridge never touches the DOM. Each transition returns the effects that bring the
/// page in line with the new state; an empty list means nothing observable changed.
#[derive(Debug, Clone)]
pub struct SelectValueBridge {
    options: OptionList,
    policy: MatchPolicy,
    state: ControlState,
    editing: bool,
    /// Set once the user commits through a suggestion or an edited blur. A value that
    /// only arrived with the page never becomes superseded.
    user_committed: bool,
    superseded: Option<String>,
}

impl SelectValueBridge {
    /// `initial_value` is the select's value at enhancement time. Values that name no
    /// option start the control empty.
    pub fn new(options: OptionList, policy: MatchPolicy, initial_value: &str) -> Self {
        let state = match options.find_by_value(initial_value) {
            Some(option) if !option.value.is_empty() => ControlState {
                committed_value: option.value.clone(),
                display_text: option.label.clone(),
            },
            _ => ControlState::default(),
        };
        Self {
            options,
            policy,
            state,
            editing: false,
            user_committed: false,
            superseded: None,
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// True between the first input after a commit and the next commit or blur.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn on_input_changed(&mut self, text: &str) {
        if !self.editing {
            self.editing = true;
            if self.user_committed && !self.state.committed_value.is_empty() {
                self.superseded = Some(self.state.committed_value.clone());
            }
        }
        self.state.display_text = text.to_string();
    }

    pub fn on_suggestion_committed(&mut self, option_value: &str) -> Vec<BridgeEffect> {
        let mut effects = Vec::new();
        match self.options.find_by_value(option_value).cloned() {
            Some(option) => {
                self.set_display_text(&option.label, &mut effects);
                self.commit(&option.value, &mut effects);
            }
            None => self.commit("", &mut effects),
        }
        self.user_committed = true;
        self.finish_edit();
        effects
    }

    pub fn on_blur(&mut self) -> Vec<BridgeEffect> {
        let mut effects = Vec::new();
        let resolved = match self.options.match_label(&self.state.display_text, self.policy) {
            LabelMatch::Unique(option)
                if self.superseded.as_deref() != Some(option.value.as_str()) =>
            {
                Some(option.clone())
            }
            LabelMatch::Unique(_) | LabelMatch::NoMatch | LabelMatch::Ambiguous(_) => None,
        };
        match resolved {
            Some(option) => {
                self.set_display_text(&option.label, &mut effects);
                self.commit(&option.value, &mut effects);
            }
            None => self.commit("", &mut effects),
        }
        if self.editing {
            self.user_committed = true;
        }
        self.finish_edit();
        effects
    }

    fn set_display_text(&mut self, text: &str, effects: &mut Vec<BridgeEffect>) {
        if self.state.display_text != text {
            self.state.display_text = text.to_string();
            effects.push(BridgeEffect::SetDisplayText(text.to_string()));
        }
    }

    fn commit(&mut self, value: &str, effects: &mut Vec<BridgeEffect>) {
        if self.state.committed_value == value {
            return;
        }
        self.state.committed_value = value.to_string();
        effects.push(BridgeEffect::SetSelectValue(value.to_string()));
        effects.push(BridgeEffect::DispatchChange);
    }

    fn finish_edit(&mut self) {
        self.editing = false;
        self.superseded = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> OptionList {
        OptionList::new(vec![
            SelectOption::new("choose", "Choose location").selected(),
            SelectOption::new("eastmidlands", "East Midlands"),
            SelectOption::new("london", "London"),
            SelectOption::new("northeast", "North East"),
        ])
    }

    fn bridge() -> SelectValueBridge {
        SelectValueBridge::new(locations(), MatchPolicy::CaseInsensitive, "choose")
    }

    fn committed(bridge: &SelectValueBridge) -> &str {
        &bridge.state().committed_value
    }

    #[test]
    fn initial_state_mirrors_selected_option() {
        let bridge = bridge();
        assert_eq!(
            bridge.state(),
            &ControlState {
                committed_value: "choose".into(),
                display_text: "Choose location".into(),
            }
        );
    }

    #[test]
    fn unknown_initial_value_starts_empty() {
        let bridge = SelectValueBridge::new(locations(), MatchPolicy::CaseInsensitive, "nowhere");
        assert_eq!(bridge.state(), &ControlState::default());
    }

    #[test]
    fn input_changes_display_text_only() {
        let mut bridge = bridge();
        bridge.on_input_changed("Lon");
        assert_eq!(committed(&bridge), "choose");
        assert_eq!(bridge.state().display_text, "Lon");
        assert!(bridge.is_editing());
    }

    #[test]
    fn committing_a_suggestion_writes_value_label_and_change() {
        let mut bridge = bridge();
        bridge.on_input_changed("Lon");
        let effects = bridge.on_suggestion_committed("london");
        assert_eq!(
            effects,
            vec![
                BridgeEffect::SetDisplayText("London".into()),
                BridgeEffect::SetSelectValue("london".into()),
                BridgeEffect::DispatchChange,
            ]
        );
        assert!(!bridge.is_editing());
    }

    #[test]
    fn recommitting_the_same_value_is_silent_about_the_select() {
        let mut bridge = bridge();
        bridge.on_suggestion_committed("london");
        bridge.on_input_changed("Lo");
        let effects = bridge.on_suggestion_committed("london");
        assert_eq!(effects, vec![BridgeEffect::SetDisplayText("London".into())]);
    }

    #[test]
    fn unknown_suggestion_value_clears() {
        let mut bridge = bridge();
        let effects = bridge.on_suggestion_committed("atlantis");
        assert_eq!(
            effects,
            vec![
                BridgeEffect::SetSelectValue(String::new()),
                BridgeEffect::DispatchChange,
            ]
        );
    }

    #[test]
    fn blur_with_unmatched_text_clears() {
        let mut bridge = bridge();
        bridge.on_suggestion_committed("london");
        bridge.on_input_changed("Bristol");
        let effects = bridge.on_blur();
        assert_eq!(
            effects,
            vec![
                BridgeEffect::SetSelectValue(String::new()),
                BridgeEffect::DispatchChange,
            ]
        );
        assert_eq!(bridge.state().display_text, "Bristol");
    }

    #[test]
    fn blur_with_a_fresh_unique_match_commits_it() {
        let mut bridge = bridge();
        bridge.on_suggestion_committed("london");
        bridge.on_input_changed("north east");
        let effects = bridge.on_blur();
        assert_eq!(
            effects,
            vec![
                BridgeEffect::SetDisplayText("North East".into()),
                BridgeEffect::SetSelectValue("northeast".into()),
                BridgeEffect::DispatchChange,
            ]
        );
    }

    #[test]
    fn retyping_the_committed_label_clears_on_blur() {
        let mut bridge = bridge();
        bridge.on_input_changed("Lon");
        bridge.on_suggestion_committed("london");
        bridge.on_input_changed("London");
        bridge.on_blur();
        assert_eq!(committed(&bridge), "");
    }

    #[test]
    fn blur_without_edit_keeps_the_commit() {
        let mut bridge = bridge();
        bridge.on_suggestion_committed("london");
        assert!(bridge.on_blur().is_empty());
        assert_eq!(committed(&bridge), "london");
    }

    #[test]
    fn second_blur_after_a_clear_is_a_no_op() {
        let mut bridge = bridge();
        bridge.on_input_changed("");
        assert_eq!(bridge.on_blur().len(), 2);
        assert!(bridge.on_blur().is_empty());
        assert_eq!(committed(&bridge), "");
    }

    #[test]
    fn superseded_value_is_forgotten_after_blur() {
        let mut bridge = bridge();
        bridge.on_suggestion_committed("london");
        bridge.on_input_changed("London");
        bridge.on_blur();
        bridge.on_input_changed("London");
        bridge.on_blur();
        assert_eq!(committed(&bridge), "london");
    }

    #[test]
    fn retyping_a_value_that_came_with_the_page_commits_it() {
        let mut bridge =
            SelectValueBridge::new(locations(), MatchPolicy::CaseInsensitive, "london");
        bridge.on_input_changed("London");
        assert!(bridge.on_blur().is_empty());
        assert_eq!(committed(&bridge), "london");

        // Once the user has committed, the same retype is treated as superseding it.
        bridge.on_input_changed("London");
        bridge.on_blur();
        assert_eq!(committed(&bridge), "");
    }
}
