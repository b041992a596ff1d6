use super::*;
use crate::widgets::history::HistoryController;
use fancy_regex::{Regex, RegexBuilder};

const DEFAULT_ALLOWED_REFERRER_HOSTS: &[&str] = &["account-np.hmrc.gov.uk", "account.hmrc.gov.uk"];

/// Referrer hosts that keep the back link visible even though they differ from the
/// current host. Entries are exact host names or `*.suffix` wildcards, which match any
/// subdomain of `suffix` but not `suffix` itself.
#[derive(Debug, Clone)]
pub struct ReferrerAllowList {
    entries: Vec<(String, Regex)>,
}

impl Default for ReferrerAllowList {
    fn default() -> Self {
        let entries = DEFAULT_ALLOWED_REFERRER_HOSTS
            .iter()
            .filter_map(|host| compile_host_pattern(host).ok())
            .collect();
        Self { entries }
    }
}

impl ReferrerAllowList {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = patterns
            .into_iter()
            .map(|pattern| compile_host_pattern(pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(pattern, _)| pattern.as_str())
            .collect()
    }

    /// `hostname` is matched without its port.
    pub fn allows(&self, hostname: &str) -> bool {
        self.entries
            .iter()
            .any(|(_, regex)| regex.is_match(hostname).unwrap_or(false))
    }
}

fn compile_host_pattern(pattern: &str) -> Result<(String, Regex)> {
    let normalized = pattern.trim().to_ascii_lowercase();
    let (wildcard, host) = match normalized.strip_prefix("*.") {
        Some(suffix) => (true, suffix),
        None => (false, normalized.as_str()),
    };
    let valid = !host.is_empty()
        && !host.starts_with('.')
        && !host.ends_with('.')
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.');
    if !valid {
        return Err(Error::Config(format!(
            "invalid referrer allow-list entry: {pattern:?}"
        )));
    }

    let escaped = host.replace('.', "\\.");
    let source = if wildcard {
        format!("^(?:[a-z0-9-]+\\.)+{escaped}$")
    } else {
        format!("^{escaped}$")
    };
    let regex = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|err| Error::Config(format!("referrer allow-list entry {pattern:?}: {err}")))?;
    Ok((normalized, regex))
}

/// Whether a back link shows, and whether showing it rewrites the current history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferrerDecision {
    pub hidden: bool,
    pub rewrite_history: bool,
}

impl ReferrerDecision {
    pub fn evaluate(
        referrer: &str,
        current_url: &str,
        history: HistoryController,
        allow_list: &ReferrerAllowList,
    ) -> Self {
        let hidden = !history.is_available()
            || Self::should_hide_for_referrer(referrer, current_url, allow_list);
        Self {
            hidden,
            rewrite_history: !hidden && history.can_replace_state(),
        }
    }

    fn should_hide_for_referrer(
        referrer: &str,
        current_url: &str,
        allow_list: &ReferrerAllowList,
    ) -> bool {
        if referrer.trim().is_empty() {
            return true;
        }
        let Some(referrer) = ParsedUrl::parse(referrer) else {
            return true;
        };
        let (Some(referrer_host), Some(hostname)) = (referrer.host(), referrer.hostname()) else {
            return true;
        };
        let same_host = ParsedUrl::parse(current_url)
            .and_then(|current| current.host())
            .is_some_and(|host| host == referrer_host);
        !same_host && !allow_list.allows(hostname)
    }

    pub fn state(&self) -> BackLinkState {
        if self.hidden {
            BackLinkState::Hidden
        } else {
            BackLinkState::VisibleFunctional
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackLinkState {
    Hidden,
    VisibleFunctional,
}

/// An initialized back link: its element and the decision taken at page load.
#[derive(Debug, Clone)]
pub(crate) struct BackLink {
    pub(crate) node: NodeId,
    pub(crate) decision: ReferrerDecision,
    pub(crate) history: HistoryController,
}

impl BackLink {
    pub(crate) fn initialize(
        dom: &mut Dom,
        node: NodeId,
        location_history: &mut LocationHistoryState,
        config: &WidgetConfig,
    ) -> Result<Self> {
        let history = HistoryController::resolve(config.history);
        let decision = ReferrerDecision::evaluate(
            &location_history.referrer,
            location_history.current_url(),
            history,
            &config.referrer_allow_list,
        );
        if decision.hidden {
            dom.class_add(node, &config.hidden_back_link_class)?;
        } else if decision.rewrite_history {
            history.replace_current(location_history);
        }
        Ok(Self {
            node,
            decision,
            history,
        })
    }

    pub(crate) fn state(&self) -> BackLinkState {
        self.decision.state()
    }

    /// Click behaviour of a visible link. Hidden links never register a handler.
    pub(crate) fn handle_click(
        &self,
        event: &mut EventState,
        location_history: &mut LocationHistoryState,
    ) -> bool {
        event.prevent_default();
        self.history.go_back(location_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://www.tax.service.gov.uk/claim/step-2";

    fn decide(referrer: &str) -> ReferrerDecision {
        ReferrerDecision::evaluate(
            referrer,
            PAGE,
            HistoryController::resolve(HistorySupport::full()),
            &ReferrerAllowList::default(),
        )
    }

    #[test]
    fn empty_referrer_hides() {
        let decision = decide("");
        assert!(decision.hidden);
        assert!(!decision.rewrite_history);
        assert_eq!(decision.state(), BackLinkState::Hidden);
    }

    #[test]
    fn same_host_referrer_shows_and_rewrites_history() {
        let decision = decide("https://www.tax.service.gov.uk/claim/step-1");
        assert_eq!(
            decision,
            ReferrerDecision {
                hidden: false,
                rewrite_history: true
            }
        );
    }

    #[test]
    fn allow_listed_foreign_host_shows() {
        assert!(!decide("https://account.hmrc.gov.uk/account").hidden);
        assert!(!decide("https://ACCOUNT-NP.hmrc.gov.uk/").hidden);
    }

    #[test]
    fn foreign_host_that_only_contains_an_allowed_host_hides() {
        assert!(decide("https://account.hmrc.gov.uk.evil.test/").hidden);
        assert!(decide("https://evil.test/?from=www.tax.service.gov.uk").hidden);
        assert!(decide("https://www.google.com/").hidden);
    }

    #[test]
    fn unparseable_referrer_hides() {
        assert!(decide("not a url").hidden);
        assert!(decide("/relative").hidden);
    }

    #[test]
    fn port_is_part_of_same_host_check() {
        let decision = ReferrerDecision::evaluate(
            "http://localhost:9000/a",
            "http://localhost:9001/b",
            HistoryController::resolve(HistorySupport::full()),
            &ReferrerAllowList::default(),
        );
        assert!(decision.hidden);
    }

    #[test]
    fn explicit_default_port_is_the_same_host() {
        let decision = ReferrerDecision::evaluate(
            "https://www.tax.service.gov.uk:443/a",
            PAGE,
            HistoryController::resolve(HistorySupport::full()),
            &ReferrerAllowList::default(),
        );
        assert!(!decision.hidden);
        assert!(decision.rewrite_history);
    }

    #[test]
    fn unavailable_history_hides_even_for_same_host() {
        let decision = ReferrerDecision::evaluate(
            "https://www.tax.service.gov.uk/a",
            PAGE,
            HistoryController::resolve(HistorySupport::unavailable()),
            &ReferrerAllowList::default(),
        );
        assert!(decision.hidden);
    }

    #[test]
    fn missing_replace_state_shows_without_rewriting() {
        let decision = ReferrerDecision::evaluate(
            "https://www.tax.service.gov.uk/a",
            PAGE,
            HistoryController::resolve(HistorySupport::full().without_replace_state()),
            &ReferrerAllowList::default(),
        );
        assert!(!decision.hidden);
        assert!(!decision.rewrite_history);
    }

    #[test]
    fn wildcard_entries_match_subdomains_only() -> Result<()> {
        let allow = ReferrerAllowList::new(["*.hmrc.gov.uk"])?;
        assert!(allow.allows("account.hmrc.gov.uk"));
        assert!(allow.allows("a.b.hmrc.gov.uk"));
        assert!(!allow.allows("hmrc.gov.uk"));
        assert!(!allow.allows("evilhmrc.gov.uk"));
        Ok(())
    }

    #[test]
    fn invalid_entries_are_config_errors() {
        for bad in ["", "*.", "exa mple.com", "https://x.test", "a.*.test", ".lead"] {
            assert!(
                matches!(ReferrerAllowList::new([bad]), Err(Error::Config(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_allow_list_carries_account_hosts() {
        assert_eq!(
            ReferrerAllowList::default().patterns(),
            vec!["account-np.hmrc.gov.uk", "account.hmrc.gov.uk"]
        );
    }
}
