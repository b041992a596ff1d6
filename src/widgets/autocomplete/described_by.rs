use super::*;

/// An `aria-describedby` id list with no repeats and the assistive-hint id last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribedByList {
    ids: Vec<String>,
}

impl DescribedByList {
    /// Order-preserving merge of `sources`, skipping empty tokens, repeats and `hint_id`,
    /// followed by `hint_id` once.
    pub fn merge<'a, I>(sources: I, hint_id: &str) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for source in sources.into_iter().flatten() {
            for token in source.split_ascii_whitespace() {
                if token == hint_id || !seen.insert(token) {
                    continue;
                }
                ids.push(token.to_string());
            }
        }
        if !hint_id.is_empty() {
            ids.push(hint_id.to_string());
        }
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }
}

impl fmt::Display for DescribedByList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ids.join(" "))
    }
}

/// The `aria-describedby` value for a control enhanced from a select carrying `original`.
pub fn merge_described_by(original: Option<&str>, hint_id: &str) -> String {
    DescribedByList::merge([original], hint_id).to_string()
}

/// Recomputes `control`'s `aria-describedby` from the select's current list.
///
/// `copied` holds the select ids written to the control last time. Any other id on the
/// control was put there by another script and is kept after the select's ids; a copied id
/// the select no longer carries is dropped. Returns whether the attribute changed.
pub(crate) fn reconcile_described_by(
    dom: &mut Dom,
    select: NodeId,
    control: NodeId,
    hint_id: &str,
    copied: &mut Vec<String>,
) -> Result<bool> {
    let from_select = dom.attr(select, "aria-describedby").unwrap_or_default();
    let current = dom.attr(control, "aria-describedby");
    let external = current
        .as_deref()
        .unwrap_or_default()
        .split_ascii_whitespace()
        .filter(|id| !copied.iter().any(|seen| seen.as_str() == *id))
        .collect::<Vec<_>>()
        .join(" ");
    let merged =
        DescribedByList::merge([Some(from_select.as_str()), Some(external.as_str())], hint_id)
            .to_string();

    *copied = from_select
        .split_ascii_whitespace()
        .filter(|id| *id != hint_id)
        .map(str::to_string)
        .collect();
    if current.as_deref() == Some(merged.as_str()) {
        return Ok(false);
    }
    dom.set_attr(control, "aria-describedby", &merged)?;
    Ok(true)
}
