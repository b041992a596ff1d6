use super::*;

impl Dom {
    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        self.element(node_id)
            .map(|element| element.value.clone())
            .ok_or_else(|| Error::Dom("value target is not an element".into()))
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.is_tag(node_id, "select") {
            return self.set_select_value(node_id, value);
        }
        self.element_or_err(node_id, "value")?.value = value.to_string();
        Ok(())
    }

    /// Seeds live values after parsing: textareas from their text, selects from
    /// their selected option.
    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.descendant_elements(self.root) {
            match self.tag_name(node) {
                Some("textarea") => {
                    let text = self.text_content(node);
                    self.element_or_err(node, "textarea")?.value = text;
                }
                Some("select") => self.sync_select_value(node)?,
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn sync_select_value_for_option(&mut self, option_node: NodeId) -> Result<()> {
        match self.find_ancestor_by_tag(option_node, "select") {
            Some(select) if self.is_tag(option_node, "option") => self.sync_select_value(select),
            _ => Ok(()),
        }
    }

    /// Selects the first option whose value equals `requested`. No match leaves the
    /// select with an empty value and no selected option, like `select.value = "missing"`.
    pub(crate) fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        if !self.is_tag(select_node, "select") {
            return Err(Error::Dom("set value target is not a select".into()));
        }

        let mut chosen = None;
        for option in self.select_options(select_node) {
            let is_match = chosen.is_none() && self.option_effective_value(option)? == requested;
            if is_match {
                chosen = Some(option);
            }
            self.element_or_err(option, "option")?
                .apply_attr("selected", is_match.then_some("true"));
        }

        self.element_or_err(select_node, "select")?.value = match chosen {
            Some(_) => requested.to_string(),
            None => String::new(),
        };
        Ok(())
    }

    pub(crate) fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let value = match self.selected_option(select_node) {
            Some(option) => self.option_effective_value(option)?,
            None => String::new(),
        };
        self.element_or_err(select_node, "select")?.value = value;
        Ok(())
    }

    /// The first option carrying `selected`, else the first option.
    pub(crate) fn selected_option(&self, select_node: NodeId) -> Option<NodeId> {
        let options = self.select_options(select_node);
        options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied())
    }

    /// Options in document order, including those inside `optgroup`.
    pub(crate) fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        self.descendant_elements(select_node)
            .into_iter()
            .filter(|node| self.is_tag(*node, "option"))
            .collect()
    }

    pub(crate) fn option_effective_value(&self, option_node: NodeId) -> Result<String> {
        if !self.is_tag(option_node, "option") {
            return Err(Error::Dom("option target is not an option".into()));
        }
        Ok(self
            .attr(option_node, "value")
            .unwrap_or_else(|| self.option_label(option_node)))
    }

    /// The option's text with whitespace stripped and collapsed, as `option.text` reports it.
    pub(crate) fn option_label(&self, option_node: NodeId) -> String {
        if let Some(label) = self.attr(option_node, "label") {
            return label;
        }
        self.text_content(option_node)
            .split_ascii_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
