//! Comma-separated input lists (`fields`, `mention`, `if_mention`).

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub(crate) fn split(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}
