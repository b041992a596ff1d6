use super::*;

const MENU_VISIBLE_CLASS: &str = "autocomplete__menu--visible";
const MENU_HIDDEN_CLASS: &str = "autocomplete__menu--hidden";
const OPTION_SELECTOR: &str = "li.autocomplete__option";

/// A live enhanced select: the nodes built for it and the bridge that owns its value.
#[derive(Debug)]
pub(crate) struct AutocompleteControl {
    pub(crate) base_id: String,
    pub(crate) select: NodeId,
    pub(crate) wrapper: NodeId,
    pub(crate) input: NodeId,
    pub(crate) listbox: NodeId,
    bridge: SelectValueBridge,
    source: Rc<dyn SuggestionSource>,
    /// Select describedby ids last written to the input.
    copied_described_by: Vec<String>,
}

impl AutocompleteControl {
    pub(crate) fn new(
        base_id: String,
        nodes: ControlNodes,
        bridge: SelectValueBridge,
        source: Rc<dyn SuggestionSource>,
        copied_described_by: Vec<String>,
    ) -> Self {
        Self {
            base_id,
            select: nodes.select,
            wrapper: nodes.wrapper,
            input: nodes.input,
            listbox: nodes.listbox,
            bridge,
            source,
            copied_described_by,
        }
    }

    pub(crate) fn bridge(&self) -> &SelectValueBridge {
        &self.bridge
    }

    pub(crate) fn hint_id(&self) -> String {
        assistive_hint_id(&self.base_id)
    }

    pub(crate) fn refresh_described_by(&mut self, dom: &mut Dom) -> Result<bool> {
        let hint_id = self.hint_id();
        reconcile_described_by(
            dom,
            self.select,
            self.input,
            &hint_id,
            &mut self.copied_described_by,
        )
    }

    pub(crate) fn handle_input(&mut self, dom: &mut Dom) -> Result<()> {
        let text = dom.value(self.input)?;
        self.bridge.on_input_changed(&text);
        self.render_menu(dom)
    }

    /// `target` is the clicked node inside the listbox. Returns `None` when the click
    /// landed outside every option.
    pub(crate) fn handle_option_click(
        &mut self,
        dom: &mut Dom,
        target: NodeId,
    ) -> Result<Option<Vec<BridgeEffect>>> {
        let Some(option) = dom.closest(target, OPTION_SELECTOR)? else {
            return Ok(None);
        };
        if !dom.is_descendant_of(option, self.listbox) {
            return Ok(None);
        }
        let value = dom.attr(option, "data-option-value").unwrap_or_default();
        let effects = self.bridge.on_suggestion_committed(&value);
        self.close_menu(dom)?;
        Ok(Some(effects))
    }

    pub(crate) fn handle_blur(&mut self, dom: &mut Dom) -> Result<Vec<BridgeEffect>> {
        let effects = self.bridge.on_blur();
        self.close_menu(dom)?;
        Ok(effects)
    }

    /// Applies a DOM write. `DispatchChange` is left to the caller, which owns dispatch.
    pub(crate) fn apply_effect(&self, dom: &mut Dom, effect: &BridgeEffect) -> Result<()> {
        match effect {
            BridgeEffect::SetSelectValue(value) => dom.set_select_value(self.select, value),
            BridgeEffect::SetDisplayText(text) => dom.set_value(self.input, text),
            BridgeEffect::DispatchChange => Ok(()),
        }
    }

    fn render_menu(&self, dom: &mut Dom) -> Result<()> {
        dom.clear_children(self.listbox)?;
        let suggestions = self.source.suggest(
            &self.bridge.state().display_text,
            self.bridge.options(),
            self.bridge.policy(),
        );
        let set_size = suggestions.len().to_string();
        for (index, option) in suggestions.iter().enumerate() {
            let id = format!("{}__option--{index}", self.base_id);
            let position = (index + 1).to_string();
            let item = dom.create_detached_element(
                "li",
                &[
                    ("id", id.as_str()),
                    ("class", "autocomplete__option"),
                    ("role", "option"),
                    ("tabindex", "-1"),
                    ("aria-selected", "false"),
                    ("aria-posinset", position.as_str()),
                    ("aria-setsize", set_size.as_str()),
                    ("data-option-value", option.value.as_str()),
                ],
            );
            dom.create_text(item, option.label.clone());
            dom.append_child(self.listbox, item)?;
        }
        self.set_menu_open(dom, !suggestions.is_empty())
    }

    fn close_menu(&self, dom: &mut Dom) -> Result<()> {
        dom.clear_children(self.listbox)?;
        self.set_menu_open(dom, false)
    }

    fn set_menu_open(&self, dom: &mut Dom, open: bool) -> Result<()> {
        let (add, remove) = if open {
            (MENU_VISIBLE_CLASS, MENU_HIDDEN_CLASS)
        } else {
            (MENU_HIDDEN_CLASS, MENU_VISIBLE_CLASS)
        };
        dom.class_remove(self.listbox, remove)?;
        dom.class_add(self.listbox, add)?;
        dom.set_attr(self.input, "aria-expanded", if open { "true" } else { "false" })
    }
}

/// Node handles produced by enhancement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ControlNodes {
    pub(crate) select: NodeId,
    pub(crate) wrapper: NodeId,
    pub(crate) input: NodeId,
    pub(crate) listbox: NodeId,
}
