use form_widgets::{
    BridgeEffect, LabelMatch, MatchPolicy, OptionList, SelectOption, SelectValueBridge,
};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const BRIDGE_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/select_value_bridge_property_test.txt";
const DEFAULT_BRIDGE_PROPTEST_CASES: u32 = 256;

#[derive(Debug, Clone)]
enum ControlAction {
    Type(String),
    Commit(String),
    Blur,
}

fn bridge_proptest_cases() -> u32 {
    std::env::var("FORM_WIDGETS_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_BRIDGE_PROPTEST_CASES)
}

fn regions() -> OptionList {
    OptionList::new(vec![
        SelectOption::new("", "Choose a region"),
        SelectOption::new("london", "London"),
        SelectOption::new("northeast", "North East"),
        SelectOption::new("northwest", "North West"),
        SelectOption::new("wales-north", "Wales"),
        SelectOption::new("wales-south", "Wales"),
    ])
}

fn typed_text_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("London"),
        Just("london"),
        Just(" LONDON "),
        Just("Lon"),
        Just("north  east"),
        Just("North West"),
        Just("Wales"),
        Just("Bristol"),
        Just(""),
        Just("Choose a region"),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn action_strategy() -> BoxedStrategy<ControlAction> {
    prop_oneof![
        4 => typed_text_strategy().prop_map(ControlAction::Type),
        2 => prop_oneof![
            Just("london"),
            Just("northeast"),
            Just("wales-south"),
            Just("missing"),
        ]
        .prop_map(|value| ControlAction::Commit(value.to_string())),
        3 => Just(ControlAction::Blur),
    ]
    .boxed()
}

fn assert_effects_match_state(
    before: &str,
    after: &str,
    effects: &[BridgeEffect],
) -> TestCaseResult {
    let select_writes = effects
        .iter()
        .filter_map(|effect| match effect {
            BridgeEffect::SetSelectValue(value) => Some(value.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();
    if before == after {
        prop_assert!(select_writes.is_empty(), "unchanged value was rewritten: {:?}", effects);
        prop_assert!(!effects.contains(&BridgeEffect::DispatchChange));
    } else {
        prop_assert_eq!(select_writes, vec![after]);
        prop_assert_eq!(effects.last(), Some(&BridgeEffect::DispatchChange));
    }
    Ok(())
}

fn assert_action_sequence_is_consistent(actions: &[ControlAction]) -> TestCaseResult {
    let options = regions();
    let mut bridge = SelectValueBridge::new(options.clone(), MatchPolicy::default(), "");

    for action in actions {
        let before = bridge.state().committed_value.clone();
        match action {
            ControlAction::Type(text) => {
                bridge.on_input_changed(text);
                prop_assert!(bridge.is_editing());
                prop_assert_eq!(&bridge.state().display_text, text);
                prop_assert_eq!(&bridge.state().committed_value, &before);
            }
            ControlAction::Commit(value) => {
                let effects = bridge.on_suggestion_committed(value);
                let after = bridge.state().committed_value.clone();
                assert_effects_match_state(&before, &after, &effects)?;
                prop_assert!(!bridge.is_editing());
            }
            ControlAction::Blur => {
                let effects = bridge.on_blur();
                let after = bridge.state().committed_value.clone();
                assert_effects_match_state(&before, &after, &effects)?;
                prop_assert!(!bridge.is_editing());
                if !after.is_empty() {
                    let display_text = &bridge.state().display_text;
                    match options.match_label(display_text, MatchPolicy::default()) {
                        LabelMatch::Unique(option) => prop_assert_eq!(&option.value, &after),
                        other => prop_assert!(false, "blur committed {} on {:?}", after, other),
                    }
                }
            }
        }

        let committed = &bridge.state().committed_value;
        prop_assert!(
            committed.is_empty() || options.find_by_value(committed).is_some(),
            "select value {:?} names no option",
            committed
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: bridge_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(BRIDGE_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn select_value_always_names_an_option_or_is_empty(actions in vec(action_strategy(), 1..24)) {
        assert_action_sequence_is_consistent(&actions)?;
    }

    #[test]
    fn blur_on_a_fresh_control_commits_exactly_the_unique_label(
        preselected in prop_oneof![Just(""), Just("london"), Just("northeast")],
        text in typed_text_strategy(),
    ) {
        let options = regions();
        let mut bridge =
            SelectValueBridge::new(options.clone(), MatchPolicy::default(), preselected);
        bridge.on_input_changed(&text);
        bridge.on_blur();

        let expected = match options.match_label(&text, MatchPolicy::default()) {
            LabelMatch::Unique(option) => option.value.clone(),
            LabelMatch::NoMatch | LabelMatch::Ambiguous(_) => String::new(),
        };
        prop_assert_eq!(&bridge.state().committed_value, &expected);
    }
}
