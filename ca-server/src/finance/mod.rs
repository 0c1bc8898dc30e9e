//! Finance core
//!
//! Balances are always derived from the ledger, never stored. Goal progress
//! is a full recomputation from the current balance every time it runs.

pub mod allocator;
pub mod ledger;

pub use allocator::{Allocation, GoalSlot, allocate, open_slots};
pub use ledger::{summarize, summarize_entries};
