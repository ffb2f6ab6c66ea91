//! The semicolon-delimited block id-selection language.
//!
//! A block is included when it is marked `mandatory` in the template, or
//! its id appears as an exact token in the selection string. Tokens are
//! matched whole (up to the next `;` or the end of the string); a partial
//! match does not count. Unmatched tokens in the selection string are
//! silently ignored, matching the source parser's behavior.

use super::CacheTemplate;
use crate::block::BlockFlags;

fn selected(id: &str, selection: &str) -> bool {
    selection.split(';').any(|token| token == id)
}

/// Structured view of a selection string, for programmatic callers that
/// would rather not build the string themselves.
pub fn ids(selection: &str) -> impl Iterator<Item = &str> {
    selection.split(';').filter(|s| !s.is_empty())
}

/// Returns the template indices a selection string resolves to: the union of
/// mandatory blocks and blocks whose id is a selected token, in template
/// order.
pub fn select_indices(template: &CacheTemplate, selection: &str) -> Vec<usize> {
    template
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, bt)| bt.flags.contains(BlockFlags::MANDATORY) || selected(bt.id.as_str(), selection))
        .map(|(i, _)| i)
        .collect()
}
