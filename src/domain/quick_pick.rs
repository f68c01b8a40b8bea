use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher};

/// Fuzzy-rank `candidates` against `query`, best first.
///
/// An empty query keeps every candidate in input order.
pub fn rank<'a, I>(candidates: I, query: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if query.trim().is_empty() {
        return candidates.into_iter().map(str::to_string).collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

    let mut scored = pattern.match_list(candidates, &mut matcher);
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored
        .into_iter()
        .map(|(candidate, _)| candidate.to_string())
        .collect()
}

/// Closest candidate to a name that did not match exactly.
pub fn suggest<'a, I>(candidates: I, query: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if query.trim().is_empty() {
        return None;
    }
    rank(candidates, query).into_iter().next()
}
