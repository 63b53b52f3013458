//! Effect and action execution.
//!
//! - [`EffectContext`]: roster, catalog, config and event sink for one step
//! - [`run_chain`]: best-effort runner for an ordered list of effects
//! - [`gain_status`] / [`clear_status`] / [`fire_status_hook`] /
//!   [`expire_statuses`]: the status lifecycle
//! - [`perform_action`]: resolves one queued [`Action`](super::Action)

mod chain;
mod context;
mod lifecycle;
mod pipeline;

pub use chain::run_chain;
pub use context::EffectContext;
pub use lifecycle::{clear_status, expire_statuses, fire_status_hook, gain_status};
pub use pipeline::{ActionOutcome, perform_action};
