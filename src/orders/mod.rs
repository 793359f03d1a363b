//! Order lifecycle
//!
//! `transition` holds the pure role/status rules; `manager` wires them to
//! the repositories and enforces the relation checks.

pub mod manager;
pub mod transition;

pub use manager::OrderManager;
pub use transition::{
    TransitionEffects, TransitionError, allowed_targets, authorize_cancel, authorize_transition,
};
