use super::*;

impl Dom {
    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        self.element(node_id)
            .map(|element| element.has_class(class_name))
            .ok_or_else(|| Error::Dom("classList target is not an element".into()))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        self.edit_classes(node_id, |classes| {
            if !classes.iter().any(|class| class == class_name) {
                classes.push(class_name.to_string());
            }
        })
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        self.edit_classes(node_id, |classes| classes.retain(|class| class != class_name))
    }

    fn edit_classes(&mut self, node_id: NodeId, edit: impl FnOnce(&mut Vec<String>)) -> Result<()> {
        let element = self.element_or_err(node_id, "classList")?;
        let mut classes = element.classes().map(str::to_string).collect::<Vec<_>>();
        edit(&mut classes);
        let joined = classes.join(" ");
        element.apply_attr("class", (!joined.is_empty()).then_some(joined.as_str()));
        Ok(())
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        if let [group] = groups.as_slice() {
            if let [part] = group.as_slice() {
                if let Some(id) = part.step.id_only() {
                    return Ok(self.by_id(id).into_iter().collect());
                }
            }
        }

        Ok(self
            .descendant_elements(self.root)
            .into_iter()
            .filter(|node| self.matches_any_group(*node, &groups))
            .collect())
    }

    fn matches_any_group(&self, node_id: NodeId, groups: &[Vec<SelectorPart>]) -> bool {
        groups
            .iter()
            .any(|parts| self.matches_selector_chain(node_id, parts))
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }
        let groups = parse_selector_groups(selector)?;
        Ok(std::iter::once(node_id)
            .chain(self.ancestors(node_id))
            .find(|node| self.matches_any_group(*node, &groups)))
    }
}
