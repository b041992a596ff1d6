use super::*;

/// What a registered listener does when its event reaches it.
#[derive(Debug, Clone)]
pub(crate) enum ListenerKind {
    AutocompleteInput { control: usize },
    AutocompleteBlur { control: usize },
    AutocompleteOptionClick { control: usize },
    BackLinkClick { widget: usize },
    Recorder(EventLog),
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) capture: bool,
    pub(crate) kind: ListenerKind,
}

/// Listeners keyed by node and event type, in registration order.
#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    by_target: HashMap<(NodeId, String), Vec<Listener>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        self.by_target
            .entry((node_id, event.to_string()))
            .or_default()
            .push(listener);
    }

    fn registered(&self, node_id: NodeId, event: &str) -> &[Listener] {
        self.by_target
            .get(&(node_id, event.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Snapshot of the listeners for one phase, so handlers may register more.
    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.registered(node_id, event)
            .iter()
            .filter(|listener| listener.capture == capture)
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.registered(node_id, event).len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventPhase {
    Capturing,
    AtTarget,
    Bubbling,
}

impl EventPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Capturing => "capture",
            Self::AtTarget => "target",
            Self::Bubbling => "bubble",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) phase: EventPhase,
    pub(crate) default_prevented: bool,
    pub(crate) is_trusted: bool,
    pub(crate) bubbles: bool,
    pub(crate) cancelable: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            phase: EventPhase::AtTarget,
            default_prevented: false,
            is_trusted: true,
            bubbles: true,
            cancelable: true,
        }
    }

    /// Focus-family events reach only their target.
    pub(crate) fn new_non_bubbling(event_type: &str, target: NodeId) -> Self {
        let mut event = Self::new(event_type, target);
        event.bubbles = false;
        event.cancelable = false;
        event
    }

    /// Event raised by widget code rather than the user, like
    /// `new Event("change", { bubbles: true })`.
    pub(crate) fn new_synthetic(event_type: &str, target: NodeId) -> Self {
        let mut event = Self::new(event_type, target);
        event.is_trusted = false;
        event.cancelable = false;
        event
    }

    pub(crate) fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }
}

/// One event observed by an [`EventLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event_type: String,
    /// `id` attribute of the event target at dispatch time, if any.
    pub target_id: Option<String>,
    pub is_trusted: bool,
    pub default_prevented: bool,
}

/// Shared handle returned by `Harness::observe`; records every matching event dispatched
/// through the observed element.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Rc<RefCell<Vec<EventRecord>>>,
}

impl EventLog {
    pub(crate) fn push(&self, record: EventRecord) {
        self.records.borrow_mut().push(record);
    }

    pub fn count(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records.borrow().clone()
    }

    pub fn take(&self) -> Vec<EventRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationNavigationKind {
    /// Default action of a followed link.
    Assign,
    /// `history.replaceState` rewrote the current entry.
    Replace,
    /// `history.back` moved within the session history.
    Traverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNavigation {
    pub kind: LocationNavigationKind,
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub(crate) struct LocationHistoryState {
    /// Session history URLs, oldest first.
    pub(crate) entries: Vec<String>,
    pub(crate) index: usize,
    pub(crate) referrer: String,
    pub(crate) location_navigations: Vec<LocationNavigation>,
    pub(crate) replace_state_calls: usize,
    pub(crate) back_calls: usize,
}

impl LocationHistoryState {
    pub(crate) fn new(previous: &[String], current_url: &str, referrer: &str) -> Self {
        let mut entries = previous.to_vec();
        entries.push(current_url.to_string());
        Self {
            index: entries.len() - 1,
            entries,
            referrer: referrer.to_string(),
            location_navigations: Vec::new(),
            replace_state_calls: 0,
            back_calls: 0,
        }
    }

    pub(crate) fn current_url(&self) -> &str {
        self.entries.get(self.index).map_or("", String::as_str)
    }

    /// Drops forward entries and appends `url` as the new current entry.
    pub(crate) fn push_entry(&mut self, url: &str) {
        let from = self.current_url().to_string();
        self.entries.truncate(self.index + 1);
        self.entries.push(url.to_string());
        self.index = self.entries.len() - 1;
        self.location_navigations.push(LocationNavigation {
            kind: LocationNavigationKind::Assign,
            from,
            to: url.to_string(),
        });
    }
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}
