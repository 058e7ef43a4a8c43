/*!
 * Group-membership authorization
 *
 * Responsibility:
 * - config: validate/normalize the allow-list and claim name (once, at construction)
 * - core: per-request decision (bearer -> payload -> claims -> group match)
 *
 * HTTP wiring lives in `middleware::authz`; this module only knows about headers.
 *
 * Public API:
 * - GateConfig / GroupPolicy / ConfigError
 * - GroupGate
 */

mod config;
mod core;

pub use config::{ConfigError, DEFAULT_GROUPS_CLAIM, GateConfig, GroupPolicy};
pub use self::core::GroupGate;
