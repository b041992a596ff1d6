use super::*;
use crate::widgets::autocomplete::{AutocompleteEnhancer, EnhanceOutcome};

impl Harness {
    /// Runs every module initialiser against the current DOM. Safe to call again: enhanced
    /// selects are only reconciled and known back links are left alone.
    pub fn init_all(&mut self) -> Result<()> {
        self.init_autocompletes()?;
        self.init_back_links()
    }

    fn init_autocompletes(&mut self) -> Result<()> {
        let selector = format!(
            "select[data-module=\"{}\"]",
            self.config.autocomplete_module
        );
        for select in self.dom.query_selector_all(&selector)? {
            if let Some(index) = self.autocompletes.iter().position(|c| c.select == select) {
                if let Some(changed) = self.resync_autocomplete(index)? {
                    let label = self.trace_node_label(self.autocompletes[index].input);
                    self.trace_line(format!(
                        "[autocomplete] reconciled {label} describedby_changed={changed}"
                    ));
                    continue;
                }
            }
            let outcome = AutocompleteEnhancer::new(&self.config).enhance(&mut self.dom, select)?;
            match outcome {
                EnhanceOutcome::Enhanced(control) => {
                    let index = self.autocompletes.len();
                    self.listeners.add(
                        control.input,
                        "input",
                        Listener {
                            capture: false,
                            kind: ListenerKind::AutocompleteInput { control: index },
                        },
                    );
                    self.listeners.add(
                        control.input,
                        "blur",
                        Listener {
                            capture: false,
                            kind: ListenerKind::AutocompleteBlur { control: index },
                        },
                    );
                    self.listeners.add(
                        control.listbox,
                        "click",
                        Listener {
                            capture: false,
                            kind: ListenerKind::AutocompleteOptionClick { control: index },
                        },
                    );
                    let input = control.input;
                    self.autocompletes.push(control);
                    let label = self.trace_node_label(input);
                    self.trace_line(format!("[autocomplete] enhanced {label}"));
                }
                EnhanceOutcome::Reconciled { control, changed } => {
                    let label = self.trace_node_label(control);
                    self.trace_line(format!(
                        "[autocomplete] reconciled {label} describedby_changed={changed}"
                    ));
                }
                EnhanceOutcome::Skipped(reason) => {
                    let label = self.trace_node_label(select);
                    self.trace_line(format!("[autocomplete] skipped {label}: {reason}"));
                }
            }
        }
        Ok(())
    }

    fn init_back_links(&mut self) -> Result<()> {
        let selector = format!("[data-module=\"{}\"]", self.config.back_link_module);
        for node in self.dom.query_selector_all(&selector)? {
            if self.back_links.iter().any(|link| link.node == node) {
                continue;
            }
            let replace_calls_before = self.location_history.replace_state_calls;
            let link = BackLink::initialize(
                &mut self.dom,
                node,
                &mut self.location_history,
                &self.config,
            )?;
            let decision = link.decision;
            let widget = self.back_links.len();
            self.back_links.push(link);

            let label = self.trace_node_label(node);
            self.trace_line(format!(
                "[backlink] {label} hidden={} rewrite_history={}",
                decision.hidden, decision.rewrite_history
            ));
            if self.location_history.replace_state_calls > replace_calls_before {
                let url = self.location_history.current_url().to_string();
                self.trace_line(format!("[history] replaceState {url}"));
            }
            if !decision.hidden {
                self.listeners.add(
                    node,
                    "click",
                    Listener {
                        capture: false,
                        kind: ListenerKind::BackLinkClick { widget },
                    },
                );
            }
        }
        Ok(())
    }

    /// Re-syncs every enhanced control with its select: `aria-describedby` and error classes.
    /// Stands in for the mutation observers a browser page would rely on.
    pub fn refresh_autocompletes(&mut self) -> Result<()> {
        for index in 0..self.autocompletes.len() {
            if self.resync_autocomplete(index)? == Some(true) {
                let base_id = &self.autocompletes[index].base_id;
                let line = format!("[autocomplete] refreshed #{base_id} describedby_changed=true");
                self.trace_line(line);
            }
        }
        Ok(())
    }

    /// `None` when the select or its input has left the document.
    fn resync_autocomplete(&mut self, index: usize) -> Result<Option<bool>> {
        let Some(control) = self.autocompletes.get_mut(index) else {
            return Ok(None);
        };
        if !self.dom.is_connected(control.select) || !self.dom.is_connected(control.input) {
            return Ok(None);
        }
        let changed = control.refresh_described_by(&mut self.dom)?;
        AutocompleteEnhancer::new(&self.config).sync_error_classes(&mut self.dom, control)?;
        Ok(Some(changed))
    }
}
