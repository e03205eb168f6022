//! Result-set summaries
//!
//! Renders a short human-readable description of a ranked result set: a
//! count header, per-agent breakdown, and a preview of the top match.

use crate::rank::SearchResult;

/// Placeholder when the top result has no extractable snippet
const NO_PREVIEW: &str = "no preview available";

/// Render a summary for a ranked result set.
pub fn generate(original_query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for query: \"{original_query}\"");
    }

    let mut summary = format!(
        "Found {} result{} for query: \"{}\"\n",
        results.len(),
        plural(results.len()),
        original_query
    );

    for (agent, count) in count_by_agent(results) {
        summary.push_str(&format!("  {agent}: {count} result{}\n", plural(count)));
    }

    let top = &results[0];
    let preview = top
        .snippets
        .first()
        .map(|s| s.text.as_str())
        .unwrap_or(NO_PREVIEW);
    summary.push_str(&format!(
        "Top match: \"{}\" ({}% relevance)",
        preview,
        (top.score * 100.0).round() as i32
    ));

    summary
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Distinct agent labels in first-appearance order with result counts.
fn count_by_agent(results: &[SearchResult]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for result in results {
        match counts.iter_mut().find(|(agent, _)| *agent == result.agent) {
            Some((_, count)) => *count += 1,
            None => counts.push((result.agent.clone(), 1)),
        }
    }
    counts
}
