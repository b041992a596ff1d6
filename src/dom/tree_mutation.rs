use super::*;

/// Where `attach` puts the child among the parent's children.
enum Slot {
    End,
    After(NodeId),
}

impl Dom {
    fn attach(&mut self, parent: NodeId, child: NodeId, slot: Slot, operation: &str) -> Result<()> {
        let parent_ok = matches!(
            self.nodes.get(parent.0).map(|node| &node.kind),
            Some(NodeKind::Document | NodeKind::Element(_))
        );
        if !parent_ok {
            return Err(Error::Dom(format!("{operation} target cannot have children")));
        }
        if child == self.root || child.0 >= self.nodes.len() {
            return Err(Error::Dom(format!("{operation} node is invalid")));
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(Error::Dom(format!("{operation} would create a cycle")));
        }

        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let anchor = match slot {
            Slot::After(target) => siblings.iter().position(|id| *id == target),
            Slot::End => None,
        };
        match anchor {
            Some(index) => siblings.insert(index + 1, child),
            None => siblings.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
        self.rebuild_id_index();
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
    }

    fn child_position(&self, node_id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node_id)?;
        let index = self
            .children(parent)
            .iter()
            .position(|id| *id == node_id)?;
        Some((parent, index))
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.attach(parent, child, Slot::End, "appendChild")
    }

    /// Places `child` right after `target`, like `target.after(child)`.
    pub(crate) fn insert_after(&mut self, target: NodeId, child: NodeId) -> Result<()> {
        let parent = self
            .parent(target)
            .ok_or_else(|| Error::Dom("after target is detached".into()))?;
        if child == target {
            return Ok(());
        }
        self.attach(parent, child, Slot::After(target), "after")
    }

    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(Error::Dom("removeChild target is not a direct child".into()));
        }
        self.detach(child);
        if self
            .active_element()
            .is_some_and(|active| active == child || self.is_descendant_of(active, child))
        {
            self.set_active_element(None);
        }
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn clear_children(&mut self, parent: NodeId) -> Result<()> {
        for child in self.children(parent).to_vec() {
            self.remove_child(parent, child)?;
        }
        Ok(())
    }

    /// Elements at or below `node_id`, in document order.
    pub(crate) fn descendant_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node_id];
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    fn element_siblings(&self, node_id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let Some((parent, index)) = self.child_position(node_id) else {
            return (Vec::new(), Vec::new());
        };
        let children = self.children(parent);
        let elements = |ids: &[NodeId]| {
            ids.iter()
                .copied()
                .filter(|id| self.element(*id).is_some())
                .collect::<Vec<_>>()
        };
        (elements(&children[..index]), elements(&children[index + 1..]))
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        self.element_siblings(node_id).1.first().copied()
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        self.element_siblings(node_id).0.last().copied()
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors(node_id).find(|node| self.is_tag(*node, tag))
    }
}
