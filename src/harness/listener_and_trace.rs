use super::*;
use crate::widgets::autocomplete::BridgeEffect;

impl Harness {
    pub(crate) fn invoke_listeners(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        let listeners = self.listeners.get(node_id, &event.event_type, capture);
        for listener in listeners {
            if self.trace_state.enabled {
                let phase = event.phase.label();
                let target_label = self.trace_node_label(event.target);
                let current_label = self.trace_node_label(event.current_target);
                self.trace_event_line(format!(
                    "[event] {} target={} current={} phase={} default_prevented={}",
                    event.event_type, target_label, current_label, phase, event.default_prevented
                ));
            }
            self.run_listener(&listener.kind, event)?;
        }
        Ok(())
    }

    fn run_listener(&mut self, kind: &ListenerKind, event: &mut EventState) -> Result<()> {
        match kind {
            ListenerKind::AutocompleteInput { control } => {
                let Some(autocomplete) = self.autocompletes.get_mut(*control) else {
                    return Ok(());
                };
                autocomplete.handle_input(&mut self.dom)
            }
            ListenerKind::AutocompleteBlur { control } => {
                let Some(autocomplete) = self.autocompletes.get_mut(*control) else {
                    return Ok(());
                };
                let effects = autocomplete.handle_blur(&mut self.dom)?;
                self.apply_bridge_effects(*control, effects)
            }
            ListenerKind::AutocompleteOptionClick { control } => {
                let Some(autocomplete) = self.autocompletes.get_mut(*control) else {
                    return Ok(());
                };
                let input = autocomplete.input;
                let Some(effects) = autocomplete.handle_option_click(&mut self.dom, event.target)?
                else {
                    return Ok(());
                };
                self.apply_bridge_effects(*control, effects)?;
                self.focus_node(input)
            }
            ListenerKind::BackLinkClick { widget } => {
                let Some(link) = self.back_links.get(*widget) else {
                    return Ok(());
                };
                let went_back = link.handle_click(event, &mut self.location_history);
                let label = self.trace_node_label(event.current_target);
                if went_back {
                    let url = self.location_history.current_url().to_string();
                    self.trace_line(format!("[history] back from {label} -> {url}"));
                } else {
                    self.trace_line(format!("[history] back unavailable for {label}"));
                }
                Ok(())
            }
            ListenerKind::Recorder(log) => {
                log.push(EventRecord {
                    event_type: event.event_type.clone(),
                    target_id: self.dom.attr(event.target, "id"),
                    is_trusted: event.is_trusted,
                    default_prevented: event.default_prevented,
                });
                Ok(())
            }
        }
    }

    /// Applies bridge effects in order. `change` is dispatched on the select, untrusted.
    pub(crate) fn apply_bridge_effects(
        &mut self,
        control: usize,
        effects: Vec<BridgeEffect>,
    ) -> Result<()> {
        let Some(select) = self.autocompletes.get(control).map(|c| c.select) else {
            return Ok(());
        };
        for effect in effects {
            if effect == BridgeEffect::DispatchChange {
                self.dispatch_prepared_event(EventState::new_synthetic("change", select))?;
                continue;
            }
            if let Some(autocomplete) = self.autocompletes.get(control) {
                autocomplete.apply_effect(&mut self.dom, &effect)?;
            }
            if self.trace_state.enabled {
                let label = self.trace_node_label(select);
                self.trace_line(format!("[autocomplete] {label} {effect:?}"));
            }
        }
        Ok(())
    }

    pub(crate) fn trace_event_done(&mut self, event: &EventState) {
        if !(self.trace_state.enabled && self.trace_state.events) {
            return;
        }
        let target_label = self.trace_node_label(event.target);
        self.trace_event_line(format!(
            "[event] done {} target={} trusted={} default_prevented={}",
            event.event_type, target_label, event.is_trusted, event.default_prevented
        ));
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if self.trace_state.enabled {
            if self.trace_state.to_stderr {
                eprintln!("{line}");
            }
            if self.trace_state.logs.len() >= self.trace_state.log_limit {
                self.trace_state.logs.pop_front();
            }
            self.trace_state.logs.push_back(line);
        }
    }

    pub(crate) fn trace_node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }
}
