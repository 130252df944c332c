/// Per-URL notes, kept only for URLs still in the Stash
use std::collections::BTreeMap;

/// Stashed URL -> note text
pub type Notes = BTreeMap<String, String>;

/// Drop notes whose URL is not in `stash`
pub fn clean_notes(notes: Notes, stash: &[String]) -> Notes {
    notes
        .into_iter()
        .filter(|(url, _)| stash.iter().any(|x| x == url))
        .collect()
}
