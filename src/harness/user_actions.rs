use super::*;

/// Input types that do not accept typed text.
const NON_TEXT_INPUT_TYPES: &[&str] = &[
    "hidden", "checkbox", "radio", "submit", "button", "image", "reset", "file",
];

impl Harness {
    fn ensure_text_entry(&self, selector: &str, target: NodeId) -> Result<()> {
        let mismatch = |expected: &str, actual: String| Error::TypeMismatch {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
        };
        match self.dom.tag_name(target) {
            Some("textarea") => Ok(()),
            Some("input") => {
                let kind = self
                    .dom
                    .attr(target, "type")
                    .map(|kind| kind.to_ascii_lowercase())
                    .unwrap_or_default();
                if NON_TEXT_INPUT_TYPES.contains(&kind.as_str()) {
                    Err(mismatch("text-like input", format!("input[type={kind}]")))
                } else {
                    Ok(())
                }
            }
            Some(other) => Err(mismatch("input or textarea", other.to_string())),
            None => Err(mismatch("input or textarea", "non-element".into())),
        }
    }

    /// Focuses the field, replaces its value and fires one `input` event, like filling it in.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }
        self.ensure_text_entry(selector, target)?;

        stacker::grow(DISPATCH_STACK, || {
            self.focus_node(target)?;
            self.dom.set_value(target, text)?;
            self.dispatch_event(target, "input").map(|_| ())
        })
    }

    /// Dispatches `click`; an unprevented click on a link follows its `href`.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(DISPATCH_STACK, || self.click_node(target))
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }
        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }
        self.maybe_follow_anchor_hyperlink(target)
    }

    fn maybe_follow_anchor_hyperlink(&mut self, target: NodeId) -> Result<()> {
        let Some(anchor) = self.dom.closest(target, "a[href]")? else {
            return Ok(());
        };
        let href = self.dom.attr(anchor, "href").unwrap_or_default();
        let next = match ParsedUrl::parse(self.location_history.current_url()) {
            Some(base) => base.join(&href),
            None => href,
        };
        self.location_history.push_entry(&next);
        self.trace_line(format!("[history] navigate -> {next}"));
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(DISPATCH_STACK, || self.focus_node(target))
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(DISPATCH_STACK, || self.blur_node(target))
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(DISPATCH_STACK, || self.dispatch_event(target, event).map(|_| ()))
    }

    /// Sets an attribute the way another script on the page would: no events, no widget
    /// reaction until the next `refresh_autocompletes` or `init_all`.
    pub fn set_attribute(&mut self, selector: &str, name: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_attr(target, name, value)
    }

    pub fn remove_attribute(&mut self, selector: &str, name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.remove_attr(target, name)
    }

    /// Records every `event` that reaches the element matched by `selector`.
    pub fn observe(&mut self, selector: &str, event: &str) -> Result<EventLog> {
        let target = self.select_one(selector)?;
        let log = EventLog::default();
        self.listeners.add(
            target,
            event,
            Listener {
                capture: false,
                kind: ListenerKind::Recorder(log.clone()),
            },
        );
        Ok(log)
    }
}
