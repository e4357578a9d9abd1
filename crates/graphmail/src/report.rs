//! Log-then-notify-then-propagate wrapper
//!
//! Every externally-facing operation of the run goes through
//! [`report_outcome`]: success is logged at info level; failure is logged at
//! error level with its full cause chain, reported once to the operator, and
//! then propagated unchanged.

use log::{error, info};

use crate::error::GraphError;
use crate::notify::Notifier;

/// Subject prefix for operator notifications
const NOTIFICATION_SUBJECT: &str = "ERROR - attachment downloader";

/// Run `operation` and report its outcome.
///
/// Ordering is fixed: the log record is written before the notification is
/// dispatched, and dispatch completes before the failure propagates. Exactly
/// one notification is sent per failure. If the notification itself fails,
/// that [`GraphError::Notification`] supersedes the original error (the
/// original remains in the log, which precedes dispatch).
pub fn report_outcome<T, F>(
    name: &str,
    notifier: &dyn Notifier,
    operation: F,
) -> Result<T, GraphError>
where
    F: FnOnce() -> Result<T, GraphError>,
{
    match operation() {
        Ok(value) => {
            info!("{} succeeded", name);
            Ok(value)
        }
        Err(err) => {
            let detail = err.chain();
            error!("{} failed:\n{}", name, detail);

            notifier.send(
                &format!("{}: {}", NOTIFICATION_SUBJECT, name),
                &format!("An error has occurred during {}:\n\n{}", name, detail),
            )?;

            Err(err)
        }
    }
}
