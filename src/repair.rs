use std::num::ParseIntError;
use std::path::Path;

use tracing::{error, warn};

use crate::fsops::WatchFs;

/// What to do when a cycle detects truncation, resolved from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct RepairPolicy {
    /// Rewrite the file with the last known-good content.
    pub fix: bool,
    /// Apply the numeric increment transform to the restored content.
    pub increment: bool,
    /// Step added by the transform.
    pub step: i64,
}

impl RepairPolicy {
    /// Detection-only mode: report truncation, never write.
    #[allow(dead_code)]
    pub fn disabled() -> Self {
        Self {
            fix: false,
            increment: false,
            step: 1,
        }
    }
}

/// Parse `input` as a base-10 integer, add `step`, and re-encode as decimal.
///
/// The numeric-only scope is a deliberate narrow policy for counter files;
/// anything non-numeric is a parse error handled by the caller.
pub fn increment_content(input: &str, step: i64) -> Result<String, ParseIntError> {
    let value: i64 = input.parse()?;
    Ok(value.saturating_add(step).to_string())
}

/// Restore the watch target after a detected truncation.
///
/// Best-effort: the chosen content is written back in one call, and any write
/// failure is reported without retry. A parse failure under `increment` falls
/// back to writing an empty string rather than the unparsed content — the
/// known sharp edge of the transform, kept so stale non-numeric data is never
/// silently re-anointed as good.
pub fn run_repair(fs: &dyn WatchFs, path: &Path, last_good: &str, policy: &RepairPolicy) {
    warn!("fix enabled, reverting file contents");

    let content = if policy.increment {
        match increment_content(last_good, policy.step) {
            Ok(next) => next,
            Err(e) => {
                error!(error = %e, last_good, "cannot increment content");
                String::new()
            }
        }
    } else {
        last_good.to_string()
    };

    if let Err(e) = fs.write(path, &content) {
        error!(error = %e, path = %path.display(), "couldn't write to file");
    }
}
