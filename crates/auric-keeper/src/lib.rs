//! # Auric Auto-Compound Scheduler
//!
//! Periodic check/perform pair designed to be driven by an external
//! automation agent:
//!
//! - [`AutoCompoundKeeper::check`] is read-only: "should this user compound,
//!   and for how much?"
//! - [`AutoCompoundKeeper::perform`] re-validates and then atomically folds
//!   the accrued reward back into principal.
//!
//! The batch variant processes each user independently; one user's failure
//! never aborts the rest of the batch.

pub mod keeper;

// Re-exports
pub use keeper::{
    AutoCompoundConfig, AutoCompoundKeeper, CompoundOutcome, KeeperConfig, KeeperError,
};
