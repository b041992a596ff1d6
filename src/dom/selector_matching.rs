use super::*;

impl Dom {
    /// Matches right to left: the last part against `node_id`, earlier parts
    /// against the nodes its combinator leads to.
    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, parts: &[SelectorPart]) -> bool {
        let Some((last, earlier)) = parts.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        if earlier.is_empty() {
            return true;
        }

        let try_from = |candidate: NodeId| self.matches_selector_chain(candidate, earlier);
        match last.combinator.unwrap_or(SelectorCombinator::Descendant) {
            SelectorCombinator::Child => self.parent(node_id).is_some_and(try_from),
            SelectorCombinator::Descendant => self.ancestors(node_id).any(try_from),
            SelectorCombinator::AdjacentSibling => {
                self.previous_element_sibling(node_id).is_some_and(try_from)
            }
            SelectorCombinator::GeneralSibling => {
                std::iter::successors(self.previous_element_sibling(node_id), |sibling| {
                    self.previous_element_sibling(*sibling)
                })
                .any(try_from)
            }
        }
    }

    pub(crate) fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        let tag_ok = step
            .tag
            .as_ref()
            .is_none_or(|tag| element.tag_name.eq_ignore_ascii_case(tag));
        let id_ok = step
            .id
            .as_ref()
            .is_none_or(|id| element.attrs.get("id") == Some(id));
        if !tag_ok || !id_ok {
            return false;
        }

        step.classes.iter().all(|class| element.has_class(class))
            && step
                .attrs
                .iter()
                .all(|cond| cond.matches(element.attrs.get(&cond.key).map(String::as_str)))
            && step.pseudo_classes.iter().all(|pseudo| match pseudo {
                SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
                SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
                SelectorPseudoClass::Disabled => element.disabled,
                SelectorPseudoClass::Enabled => !element.disabled,
                SelectorPseudoClass::Empty => self.children(node_id).is_empty(),
                SelectorPseudoClass::Focus => self.active_element() == Some(node_id),
            })
    }
}
