use super::*;

impl Harness {
    fn mismatch(
        &self,
        target: NodeId,
        selector: String,
        expected: String,
        actual: String,
    ) -> Result<()> {
        Err(Error::AssertionFailed {
            selector,
            expected,
            actual,
            dom_snippet: self.node_snippet(target),
        })
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual == expected {
            return Ok(());
        }
        self.mismatch(target, selector.into(), expected.into(), actual)
    }

    /// Compares the live value, which for a select is its selected option's value.
    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual == expected {
            return Ok(());
        }
        self.mismatch(target, selector.into(), expected.into(), actual)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector).map(|_| ())
    }

    /// `expected` of `None` asserts the attribute is absent.
    pub fn assert_attribute(
        &self,
        selector: &str,
        name: &str,
        expected: Option<&str>,
    ) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual.as_deref() == expected {
            return Ok(());
        }
        self.mismatch(
            target,
            format!("{selector}[{name}]"),
            format!("{expected:?}"),
            format!("{actual:?}"),
        )
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual == expected {
            return Ok(());
        }
        self.mismatch(
            target,
            format!("{selector}.{class_name}"),
            expected.to_string(),
            actual.to_string(),
        )
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        self.select_one(selector)
            .map(|target| self.dom.dump_node(target))
    }

    pub(crate) fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }
}
