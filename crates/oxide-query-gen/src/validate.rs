//! Option validation.

use tracing::debug;

use crate::error::{QueryGenError, Result};
use crate::operation::Operation;

/// Rejects option keys outside the dialect's supported set.
///
/// `present` are the keys the caller set. Any key that is not in
/// `supported` fails the whole call with a
/// [`QueryGenError::Configuration`] naming every offending key; nothing
/// is partially applied. Keys outside `supportable` are reported the same
/// way. An empty `supported` list means the dialect takes no tuning for
/// this operation.
pub fn reject_unsupported_options(
    operation: Operation,
    dialect: &'static str,
    supportable: &[&str],
    supported: &[&str],
    present: &[&str],
) -> Result<()> {
    let unsupported: Vec<String> = present
        .iter()
        .filter(|key| {
            !supportable.iter().any(|s| s == *key) || !supported.iter().any(|s| s == *key)
        })
        .map(|key| (*key).to_string())
        .collect();

    if unsupported.is_empty() {
        return Ok(());
    }

    debug!(
        %operation,
        dialect,
        keys = ?unsupported,
        "rejecting unsupported options"
    );
    Err(QueryGenError::Configuration {
        operation,
        dialect,
        keys: unsupported,
    })
}
