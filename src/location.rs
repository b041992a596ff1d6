#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Authority {
    /// Lowercased; IPv6 literals keep their brackets.
    pub(crate) hostname: String,
    pub(crate) port: Option<String>,
}

/// An absolute URL split the way `window.location` exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedUrl {
    pub(crate) scheme: String,
    pub(crate) authority: Option<Authority>,
    pub(crate) path: String,
    /// Includes the leading `?`, or is empty.
    pub(crate) query: String,
    /// Includes the leading `#`, or is empty.
    pub(crate) fragment: String,
}

impl ParsedUrl {
    /// `None` for relative references, invalid schemes and `scheme://` without a host.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let (scheme, rest) = input.trim().split_once(':')?;
        let mut scheme_chars = scheme.chars();
        let scheme_ok = scheme_chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
            && scheme_chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'));
        if !scheme_ok {
            return None;
        }

        let scheme = scheme.to_ascii_lowercase();
        let (authority, tail) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find(['/', '?', '#']).unwrap_or(after.len());
                let mut authority = parse_authority(&after[..end])?;
                if authority.port.as_deref() == default_port(&scheme) {
                    authority.port = None;
                }
                (Some(authority), &after[end..])
            }
            None => (None, rest),
        };

        let (mut path, query, fragment) = split_reference(tail);
        if authority.is_some() && path.is_empty() {
            path.push('/');
        }
        Some(Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    pub(crate) fn hostname(&self) -> Option<&str> {
        self.authority.as_ref().map(|auth| auth.hostname.as_str())
    }

    /// `hostname[:port]`, compared as a whole for same-host checks.
    pub(crate) fn host(&self) -> Option<String> {
        let auth = self.authority.as_ref()?;
        Some(match &auth.port {
            Some(port) => format!("{}:{port}", auth.hostname),
            None => auth.hostname.clone(),
        })
    }

    pub(crate) fn href(&self) -> String {
        match self.host() {
            Some(host) => format!(
                "{}://{host}{}{}{}",
                self.scheme, self.path, self.query, self.fragment
            ),
            None => format!("{}:{}{}{}", self.scheme, self.path, self.query, self.fragment),
        }
    }

    /// Resolves a link target against this URL.
    pub(crate) fn join(&self, reference: &str) -> String {
        let reference = reference.trim();
        if let Some(absolute) = Self::parse(reference) {
            return absolute.href();
        }
        if reference.starts_with("//") {
            return Self::parse(&format!("{}:{reference}", self.scheme))
                .map_or_else(|| reference.to_string(), |url| url.href());
        }

        let mut next = self.clone();
        if reference.is_empty() {
            return next.href();
        }
        if reference.starts_with('#') {
            next.fragment = reference.to_string();
            return next.href();
        }

        let (path, query, fragment) = split_reference(reference);
        if path.starts_with('/') {
            next.path = path;
        } else if !path.is_empty() {
            let dir = self.path.rsplit_once('/').map_or("", |(dir, _)| dir);
            next.path = format!("{dir}/{path}");
        }
        next.query = query;
        next.fragment = fragment;
        next.href()
    }
}

fn default_port(scheme: &str) -> Option<&'static str> {
    match scheme {
        "http" | "ws" => Some("80"),
        "https" | "wss" => Some("443"),
        _ => None,
    }
}

fn parse_authority(raw: &str) -> Option<Authority> {
    let host_port = raw.rsplit_once('@').map_or(raw, |(_, host)| host);
    let (hostname, port) = if host_port.starts_with('[') {
        let close = host_port.find(']')?;
        let port = host_port[close + 1..].strip_prefix(':');
        (&host_port[..=close], port)
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };
    if hostname.is_empty() {
        return None;
    }
    Some(Authority {
        hostname: hostname.to_ascii_lowercase(),
        port: port.filter(|port| !port.is_empty()).map(str::to_string),
    })
}

/// Splits `path?query#fragment`, keeping the delimiters on query and fragment.
fn split_reference(tail: &str) -> (String, String, String) {
    let (before_hash, fragment) = match tail.find('#') {
        Some(at) => tail.split_at(at),
        None => (tail, ""),
    };
    let (path, query) = match before_hash.find('?') {
        Some(at) => before_hash.split_at(at),
        None => (before_hash, ""),
    };
    (path.to_string(), query.to_string(), fragment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_lowercased_and_keeps_the_port() {
        let url = ParsedUrl::parse("HTTPS://Example.COM:8443/a/b?q=1#top");
        let url = url.as_ref();
        assert_eq!(url.and_then(ParsedUrl::host).as_deref(), Some("example.com:8443"));
        assert_eq!(url.and_then(ParsedUrl::hostname), Some("example.com"));
        assert_eq!(
            url.map(ParsedUrl::href).as_deref(),
            Some("https://example.com:8443/a/b?q=1#top")
        );
    }

    #[test]
    fn default_ports_are_dropped() {
        let host = |input: &str| ParsedUrl::parse(input).and_then(|url| url.host());
        assert_eq!(host("https://a.test:443/").as_deref(), Some("a.test"));
        assert_eq!(host("http://a.test:80").as_deref(), Some("a.test"));
        assert_eq!(host("http://a.test:443/").as_deref(), Some("a.test:443"));
        assert_eq!(
            ParsedUrl::parse("HTTPS://a.test:443/x").map(|url| url.href()).as_deref(),
            Some("https://a.test/x")
        );
    }

    #[test]
    fn credentials_are_dropped_and_the_path_defaults_to_root() {
        let url = ParsedUrl::parse("https://user:pw@www.tax.service.gov.uk");
        assert_eq!(
            url.as_ref().and_then(ParsedUrl::host).as_deref(),
            Some("www.tax.service.gov.uk")
        );
        assert_eq!(url.map(|url| url.path).as_deref(), Some("/"));
    }

    #[test]
    fn relative_and_hostless_inputs_do_not_parse() {
        for input in ["/relative/path", "", "https:///nohost", "1http://x", "not a url"] {
            assert!(ParsedUrl::parse(input).is_none(), "{input:?} parsed");
        }
    }

    #[test]
    fn join_handles_absolute_rooted_and_relative_targets() {
        let Some(base) = ParsedUrl::parse("https://www.tax.service.gov.uk/claim/step-2?x=1") else {
            panic!("base url should parse");
        };
        assert_eq!(base.join("https://other.test/a"), "https://other.test/a");
        assert_eq!(base.join("/start"), "https://www.tax.service.gov.uk/start");
        assert_eq!(
            base.join("step-1?y=2"),
            "https://www.tax.service.gov.uk/claim/step-1?y=2"
        );
        assert_eq!(
            base.join("#main"),
            "https://www.tax.service.gov.uk/claim/step-2?x=1#main"
        );
        assert_eq!(base.join("//cdn.test/x"), "https://cdn.test/x");
    }
}
