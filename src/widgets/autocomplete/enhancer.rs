use super::*;

#[derive(Debug)]
pub(crate) enum EnhanceOutcome {
    Enhanced(AutocompleteControl),
    /// The select was already enhanced; only `aria-describedby` was recomputed.
    Reconciled { control: NodeId, changed: bool },
    Skipped(&'static str),
}

/// Replaces a `<select>` with a text input, a suggestion listbox and an assistive hint.
pub(crate) struct AutocompleteEnhancer<'a> {
    config: &'a WidgetConfig,
}

impl<'a> AutocompleteEnhancer<'a> {
    pub(crate) fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }

    pub(crate) fn enhance(&self, dom: &mut Dom, select: NodeId) -> Result<EnhanceOutcome> {
        if !dom.is_tag(select, "select") {
            return Ok(EnhanceOutcome::Skipped("target is not a select"));
        }
        let Some(select_id) = dom.attr(select, "id").filter(|id| !id.is_empty()) else {
            return Ok(EnhanceOutcome::Skipped("select has no id"));
        };

        if let Some(base_id) = self.enhanced_base_id(dom, select, &select_id)? {
            return self.reconcile(dom, select, &base_id);
        }
        let base_id = select_id;
        let hint_id = assistive_hint_id(&base_id);

        let options = OptionList::from_select(dom, select)?;
        let initial_value = dom.value(select)?;
        let bridge = SelectValueBridge::new(options, self.config.match_policy, &initial_value);
        let listbox_id = listbox_id(&base_id);
        let select_described_by = dom.attr(select, "aria-describedby");
        let described_by = merge_described_by(select_described_by.as_deref(), &hint_id);
        let copied_described_by = select_described_by
            .as_deref()
            .unwrap_or_default()
            .split_ascii_whitespace()
            .filter(|id| *id != hint_id)
            .map(str::to_string)
            .collect();

        dom.set_attr(select, "id", &hidden_select_id(&base_id))?;
        dom.set_attr(select, "style", "display: none")?;
        dom.set_attr(select, ENHANCED_MARKER_ATTR, "true")?;

        let wrapper = dom.create_detached_element("div", &[("class", "autocomplete__wrapper")]);
        let input = dom.create_detached_element(
            "input",
            &[
                ("type", "text"),
                ("id", base_id.as_str()),
                ("class", "autocomplete__input autocomplete__input--default"),
                ("role", "combobox"),
                ("autocomplete", "off"),
                ("aria-autocomplete", "list"),
                ("aria-expanded", "false"),
                ("aria-owns", listbox_id.as_str()),
                ("aria-controls", listbox_id.as_str()),
                ("aria-describedby", described_by.as_str()),
                ("value", bridge.state().display_text.as_str()),
            ],
        );
        let listbox = dom.create_detached_element(
            "ul",
            &[
                ("id", listbox_id.as_str()),
                ("class", "autocomplete__menu autocomplete__menu--inline autocomplete__menu--hidden"),
                ("role", "listbox"),
            ],
        );
        let hint = dom.create_detached_element(
            "span",
            &[
                ("id", hint_id.as_str()),
                ("class", "autocomplete__hint"),
                ("style", "display: none"),
            ],
        );
        dom.create_text(hint, self.config.assistive_hint.clone());

        dom.append_child(wrapper, input)?;
        dom.append_child(wrapper, listbox)?;
        dom.append_child(wrapper, hint)?;
        dom.insert_after(select, wrapper)?;

        let control = AutocompleteControl::new(
            base_id,
            ControlNodes {
                select,
                wrapper,
                input,
                listbox,
            },
            bridge,
            Rc::clone(&self.config.suggestions),
            copied_described_by,
        );
        self.sync_error_classes(dom, &control)?;
        Ok(EnhanceOutcome::Enhanced(control))
    }

    /// Base id of an earlier enhancement of `select`, by this crate or by another copy of
    /// the component: the marker attribute, the assistive-hint element, or a control at the
    /// base id with the hint id in its own or the select's `aria-describedby`. Both the
    /// select's id and the id with its `-select` suffix stripped are tried.
    fn enhanced_base_id(
        &self,
        dom: &Dom,
        select: NodeId,
        select_id: &str,
    ) -> Result<Option<String>> {
        let stripped = select_id.strip_suffix("-select").filter(|base| !base.is_empty());
        if dom.has_attr(select, ENHANCED_MARKER_ATTR)? {
            return Ok(Some(stripped.unwrap_or(select_id).to_string()));
        }

        let carries = |node: NodeId, hint_id: &str| {
            dom.attr(node, "aria-describedby")
                .is_some_and(|ids| ids.split_ascii_whitespace().any(|id| id == hint_id))
        };
        let found = stripped.into_iter().chain([select_id]).find(|base| {
            let hint_id = assistive_hint_id(base);
            dom.by_id(&hint_id).is_some()
                || dom.by_id(base).is_some_and(|control| {
                    control != select && (carries(control, &hint_id) || carries(select, &hint_id))
                })
        });
        Ok(found.map(str::to_string))
    }

    /// Brings an earlier enhancement's `aria-describedby` in line with the select. Ids the
    /// control carries beyond the select's are kept, since their origin is unknown here.
    fn reconcile(&self, dom: &mut Dom, select: NodeId, base_id: &str) -> Result<EnhanceOutcome> {
        let Some(control) = dom.by_id(base_id).filter(|node| *node != select) else {
            return Ok(EnhanceOutcome::Skipped("enhanced control is missing"));
        };
        let hint_id = assistive_hint_id(base_id);
        let changed = reconcile_described_by(dom, select, control, &hint_id, &mut Vec::new())?;
        Ok(EnhanceOutcome::Reconciled { control, changed })
    }

    /// Mirrors the select's error-state classes onto the input and wrapper.
    pub(crate) fn sync_error_classes(
        &self,
        dom: &mut Dom,
        control: &AutocompleteControl,
    ) -> Result<()> {
        for mapping in &self.config.error_class_map {
            if dom.class_contains(control.select, &mapping.select_class)? {
                dom.class_add(control.input, &mapping.control_class)?;
                dom.class_add(control.wrapper, &mapping.container_class)?;
            } else {
                dom.class_remove(control.input, &mapping.control_class)?;
                dom.class_remove(control.wrapper, &mapping.container_class)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATION_SELECT: &str = r#"
        <div class="govuk-form-group govuk-form-group--error">
          <label class="govuk-label" for="location">Choose location</label>
          <div id="location-hint" class="govuk-hint">This can be different to where you went before</div>
          <p id="location-error" class="govuk-error-message">Select a location</p>
          <select class="govuk-select govuk-select--error" id="location" name="location"
                  aria-describedby="location-hint location-error" data-module="hmrc-accessible-autocomplete">
            <option value="choose" selected>Choose location</option>
            <option value="london">London</option>
          </select>
        </div>"#;

    fn enhanced(dom: &mut Dom, config: &WidgetConfig) -> Result<AutocompleteControl> {
        let select = dom
            .query_selector("select")?
            .ok_or_else(|| Error::SelectorNotFound("select".into()))?;
        match AutocompleteEnhancer::new(config).enhance(dom, select)? {
            EnhanceOutcome::Enhanced(control) => Ok(control),
            other => Err(Error::Dom(format!("expected enhancement, got {other:?}"))),
        }
    }

    #[test]
    fn enhancement_moves_the_id_to_the_input() -> Result<()> {
        let mut dom = crate::html::parse_html(LOCATION_SELECT)?;
        let control = enhanced(&mut dom, &WidgetConfig::default())?;

        assert_eq!(dom.by_id("location"), Some(control.input));
        assert_eq!(dom.by_id("location-select"), Some(control.select));
        assert_eq!(dom.attr(control.select, "name").as_deref(), Some("location"));
        assert_eq!(dom.attr(control.select, "style").as_deref(), Some("display: none"));
        assert_eq!(dom.value(control.input)?, "Choose location");
        assert_eq!(
            dom.attr(control.input, "aria-describedby").as_deref(),
            Some("location-hint location-error location__assistiveHint")
        );
        assert_eq!(dom.next_element_sibling(control.input), Some(control.listbox));
        assert_eq!(dom.next_element_sibling(control.select), Some(control.wrapper));
        Ok(())
    }

    #[test]
    fn error_state_is_carried_to_input_and_wrapper() -> Result<()> {
        let mut dom = crate::html::parse_html(LOCATION_SELECT)?;
        let control = enhanced(&mut dom, &WidgetConfig::default())?;
        assert!(dom.class_contains(control.input, "govuk-input--error")?);
        assert!(dom.class_contains(control.wrapper, "autocomplete__wrapper--error")?);

        dom.class_remove(control.select, "govuk-select--error")?;
        AutocompleteEnhancer::new(&WidgetConfig::default()).sync_error_classes(&mut dom, &control)?;
        assert!(!dom.class_contains(control.input, "govuk-input--error")?);
        assert!(!dom.class_contains(control.wrapper, "autocomplete__wrapper--error")?);
        Ok(())
    }

    #[test]
    fn second_pass_only_reconciles() -> Result<()> {
        let mut dom = crate::html::parse_html(LOCATION_SELECT)?;
        let config = WidgetConfig::default();
        let control = enhanced(&mut dom, &config)?;
        let node_count = dom.nodes.len();

        let outcome = AutocompleteEnhancer::new(&config).enhance(&mut dom, control.select)?;
        assert!(matches!(
            outcome,
            EnhanceOutcome::Reconciled { control: input, changed: false } if input == control.input
        ));
        assert_eq!(dom.nodes.len(), node_count);
        Ok(())
    }

    #[test]
    fn existing_hint_blocks_a_second_enhancement() -> Result<()> {
        let mut dom = crate::html::parse_html(
            r#"<select id="region"><option value="a">A</option></select>
               <span id="region__assistiveHint"></span>"#,
        )?;
        let select = dom
            .by_id("region")
            .ok_or_else(|| Error::SelectorNotFound("#region".into()))?;
        let config = WidgetConfig::default();
        let outcome = AutocompleteEnhancer::new(&config).enhance(&mut dom, select)?;
        assert!(matches!(outcome, EnhanceOutcome::Skipped(_)));
        assert!(dom.is_tag(select, "select"));
        assert_eq!(dom.attr(select, "id").as_deref(), Some("region"));
        Ok(())
    }

    #[test]
    fn select_without_id_is_skipped() -> Result<()> {
        let mut dom = crate::html::parse_html("<select><option>A</option></select>")?;
        let select = dom
            .query_selector("select")?
            .ok_or_else(|| Error::SelectorNotFound("select".into()))?;
        let config = WidgetConfig::default();
        let outcome = AutocompleteEnhancer::new(&config).enhance(&mut dom, select)?;
        assert!(matches!(outcome, EnhanceOutcome::Skipped("select has no id")));
        Ok(())
    }
}
