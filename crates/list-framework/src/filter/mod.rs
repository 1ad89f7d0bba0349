//! Debounced multi-criteria filter state.
//!
//! - [`FilterController`] - owns live inputs and emits debounced snapshots
//! - [`FilterCriteria`] - the normalized snapshot (search, day-aligned range, facets)

pub mod controller;
pub mod criteria;

pub use controller::{CriteriaCallback, FilterController};
pub use criteria::{end_of_day, start_of_day, DateRange, FilterCriteria, RESERVED_KEYS};
