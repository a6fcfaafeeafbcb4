//! Transition tables for the four entity state machines. Each table is
//! an exhaustive match from the current status to its legal successor
//! set; requesting any other target (including the current status
//! itself) is rejected without mutating the entity.

pub mod delivery;
pub mod invoice;
pub mod package;
pub mod trip;
