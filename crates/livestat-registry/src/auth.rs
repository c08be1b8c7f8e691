//! Request authorization for mutating operations.
//!
//! A single static master token is configured at process start and never
//! changes. Mutating calls must present it exactly; reads require nothing.

use livestat_common::{Error, Result};

/// Checks a presented token against the configured master token.
///
/// Exact, case-sensitive comparison. Mismatch or absence rejects the
/// request before any registry access, so the response reveals nothing
/// about whether the targeted ID exists.
pub fn authorize(presented: Option<&str>, master_token: &str) -> Result<()> {
    match presented {
        Some(token) if token == master_token => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}
