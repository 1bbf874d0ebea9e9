//! Pure data types: entries, ordering, and reconciliation events.

pub mod action;
pub mod entry;
/// Comparator set and ordering configuration.
pub mod ordering;
