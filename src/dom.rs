use super::*;
use std::fmt::Write as _;

mod class_and_query;
mod form_controls;
mod selector_matching;
mod tree_mutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// An element plus the live form state that attributes only seed.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
}

impl Element {
    fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        Self {
            value: attrs.get("value").cloned().unwrap_or_default(),
            disabled: attrs.contains_key("disabled"),
            readonly: attrs.contains_key("readonly"),
            tag_name,
            attrs,
        }
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|class| class == class_name)
    }

    /// Mirrors an attribute write into the live state it seeds.
    fn apply_attr(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.attrs.insert(name.to_string(), value.to_string());
            }
            None => {
                self.attrs.remove(name);
            }
        }
        match name {
            "value" if self.tag_name != "select" => {
                if let Some(value) = value {
                    self.value = value.to_string();
                }
            }
            "disabled" => self.disabled = value.is_some(),
            "readonly" => self.readonly = value.is_some(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    ids: HashMap<String, NodeId>,
    focused: Option<NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            ids: HashMap::new(),
            focused: None,
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Appends a parsed element. The id index is built once parsing finishes.
    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        self.push_node(Some(parent), NodeKind::Element(Element::new(tag_name, attrs)))
    }

    /// Builds an element outside the tree; it becomes queryable once appended.
    pub(crate) fn create_detached_element(
        &mut self,
        tag_name: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), (*value).to_string()))
            .collect();
        let element = Element::new(tag_name.to_ascii_lowercase(), attrs);
        self.push_node(None, NodeKind::Element(element))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.push_node(Some(parent), NodeKind::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Document | NodeKind::Text(_) => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Document | NodeKind::Text(_) => None,
        }
    }

    fn element_or_err(&mut self, node_id: NodeId, operation: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::Dom(format!("{operation} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Parent, grandparent, and so on up to the root or a detached top.
    pub(crate) fn ancestors(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node_id), |node| self.parent(*node))
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node_id).any(|node| node == ancestor)
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        node_id == self.root || self.is_descendant_of(node_id, self.root)
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub(crate) fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    pub(crate) fn set_active_element(&mut self, node: Option<NodeId>) {
        self.focused = node;
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.push_text(node_id, &mut out);
        out
    }

    fn push_text(&self, node_id: NodeId, out: &mut String) {
        match &self.nodes[node_id.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Document | NodeKind::Element(_) => {
                for child in self.children(node_id) {
                    self.push_text(*child, out);
                }
            }
        }
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Dom("hasAttribute target is not an element".into()))?;
        Ok(element.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        self.write_attr(node_id, name, Some(value), "setAttribute")
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        self.write_attr(node_id, name, None, "removeAttribute")
    }

    fn write_attr(
        &mut self,
        node_id: NodeId,
        name: &str,
        value: Option<&str>,
        operation: &str,
    ) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.element_or_err(node_id, operation)?;
        let is_option = element.tag_name == "option";
        element.apply_attr(&name, value);

        if name == "id" && self.is_connected(node_id) {
            self.rebuild_id_index();
        }
        if is_option && matches!(name.as_str(), "selected" | "value") {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.disabled)
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.readonly)
    }

    /// Serializes a subtree with attributes in name order.
    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node_id, &mut out);
        out
    }

    fn write_markup(&self, node_id: NodeId, out: &mut String) {
        let element = match &self.nodes[node_id.0].kind {
            NodeKind::Text(text) => return out.push_str(text),
            NodeKind::Document => {
                for child in self.children(node_id) {
                    self.write_markup(*child, out);
                }
                return;
            }
            NodeKind::Element(element) => element,
        };

        let mut attrs = element.attrs.iter().collect::<Vec<_>>();
        attrs.sort();
        let _ = write!(out, "<{}", element.tag_name);
        for (name, value) in attrs {
            let _ = write!(out, " {name}=\"{value}\"");
        }
        out.push('>');
        if html::is_void_tag(&element.tag_name) {
            return;
        }
        for child in self.children(node_id) {
            self.write_markup(*child, out);
        }
        let _ = write!(out, "</{}>", element.tag_name);
    }

    /// First element in document order wins a duplicated id.
    pub(crate) fn rebuild_id_index(&mut self) {
        let mut ids = HashMap::new();
        for node in self.descendant_elements(self.root) {
            if let Some(id) = self.attr(node, "id").filter(|id| !id.is_empty()) {
                ids.entry(id).or_insert(node);
            }
        }
        self.ids = ids;
    }
}
