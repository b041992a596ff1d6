use super::*;

/// Produces the options offered for a query. Ranking is up to the implementation.
pub trait SuggestionSource: fmt::Debug {
    fn suggest<'a>(
        &self,
        query: &str,
        options: &'a OptionList,
        policy: MatchPolicy,
    ) -> Vec<&'a SelectOption>;
}

/// Offers every valued option whose label contains the query, in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringSuggestions;

impl SuggestionSource for SubstringSuggestions {
    fn suggest<'a>(
        &self,
        query: &str,
        options: &'a OptionList,
        policy: MatchPolicy,
    ) -> Vec<&'a SelectOption> {
        let needle = policy.normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        options
            .options()
            .iter()
            .filter(|option| !option.value.is_empty())
            .filter(|option| policy.normalize(&option.label).contains(&needle))
            .collect()
    }
}
