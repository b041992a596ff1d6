use super::*;

impl Harness {
    pub(crate) fn dispatch_event(
        &mut self,
        target: NodeId,
        event_type: &str,
    ) -> Result<EventState> {
        self.dispatch_prepared_event(EventState::new(event_type, target))
    }

    /// Capture listeners from the top of the tree down, both listener kinds on the
    /// target, then bubble listeners back up when the event bubbles.
    pub(crate) fn dispatch_prepared_event(&mut self, mut event: EventState) -> Result<EventState> {
        let target = event.target;
        let ancestors = self.dom.ancestors(target).collect::<Vec<_>>();

        let mut stops = ancestors
            .iter()
            .rev()
            .map(|node| (*node, EventPhase::Capturing, true))
            .collect::<Vec<_>>();
        stops.push((target, EventPhase::AtTarget, true));
        stops.push((target, EventPhase::AtTarget, false));
        if event.bubbles {
            stops.extend(
                ancestors
                    .iter()
                    .map(|node| (*node, EventPhase::Bubbling, false)),
            );
        }

        for (node, phase, capture) in stops {
            event.phase = phase;
            event.current_target = node;
            self.invoke_listeners(node, &mut event, capture)?;
        }
        self.trace_event_done(&event);
        Ok(event)
    }

    /// Hidden inputs and disabled controls never take focus.
    pub(crate) fn focus_node(&mut self, node: NodeId) -> Result<()> {
        let hidden_input = self.dom.is_tag(node, "input")
            && self
                .dom
                .attr(node, "type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"));
        if hidden_input || self.dom.disabled(node) || self.dom.active_element() == Some(node) {
            return Ok(());
        }

        if let Some(previous) = self.dom.active_element() {
            self.blur_node(previous)?;
        }
        self.dom.set_active_element(Some(node));
        self.dispatch_event(node, "focusin")?;
        self.dispatch_prepared_event(EventState::new_non_bubbling("focus", node))?;
        Ok(())
    }

    pub(crate) fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.active_element() == Some(node) {
            self.dispatch_event(node, "focusout")?;
            self.dispatch_prepared_event(EventState::new_non_bubbling("blur", node))?;
            self.dom.set_active_element(None);
        }
        Ok(())
    }
}
