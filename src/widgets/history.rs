use super::*;

/// The slice of `window.history` and `window.location` the back link touches.
pub trait HistoryApi {
    fn current_href(&self) -> String;
    fn replace_state(&mut self, url: &str);
    fn back(&mut self);
}

/// Capability-checked view of the history API, resolved once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryController {
    Available { replace_state: bool, back: bool },
    Unavailable,
}

impl HistoryController {
    pub fn resolve(support: HistorySupport) -> Self {
        if support.available {
            Self::Available {
                replace_state: support.replace_state,
                back: support.back,
            }
        } else {
            Self::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    pub fn can_replace_state(&self) -> bool {
        matches!(
            self,
            Self::Available {
                replace_state: true,
                ..
            }
        )
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self, Self::Available { back: true, .. })
    }

    /// Rewrites the current entry with the current URL. Returns whether the call was made.
    pub fn replace_current(&self, api: &mut dyn HistoryApi) -> bool {
        if !self.can_replace_state() {
            return false;
        }
        let href = api.current_href();
        api.replace_state(&href);
        true
    }

    /// Returns whether `history.back()` was called.
    pub fn go_back(&self, api: &mut dyn HistoryApi) -> bool {
        if !self.can_go_back() {
            return false;
        }
        api.back();
        true
    }
}

impl HistoryApi for LocationHistoryState {
    fn current_href(&self) -> String {
        self.current_url().to_string()
    }

    fn replace_state(&mut self, url: &str) {
        self.replace_state_calls += 1;
        let from = self.current_url().to_string();
        if let Some(entry) = self.entries.get_mut(self.index) {
            *entry = url.to_string();
        }
        self.location_navigations.push(LocationNavigation {
            kind: LocationNavigationKind::Replace,
            from,
            to: url.to_string(),
        });
    }

    fn back(&mut self) {
        self.back_calls += 1;
        if self.index == 0 {
            return;
        }
        let from = self.current_url().to_string();
        self.index -= 1;
        self.location_navigations.push(LocationNavigation {
            kind: LocationNavigationKind::Traverse,
            from,
            to: self.current_url().to_string(),
        });
    }
}
