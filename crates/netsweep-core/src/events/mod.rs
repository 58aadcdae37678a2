use tracing::{error, info, warn};

use crate::errors::NetsweepError;
use crate::sweep::types::SweepReport;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

/// User errors (bad config, unreadable inventory) log at warn, the rest at error.
pub fn log_app_error(error: &dyn NetsweepError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error_occurred",
            code = error.error_code(),
            error = %error
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            code = error.error_code(),
            error = %error
        );
    }
}

/// One line per scope with the totals a caller acts on.
pub fn log_sweep_reports(reports: &[SweepReport]) {
    for report in reports {
        let problems = report.errors().len();
        if problems > 0 {
            warn!(
                event = "core.app.sweep_reported",
                scope = %report.scope,
                deleted = report.deleted(),
                failed = report.failed(),
                problems = problems,
                cancelled = report.cancelled
            );
        } else {
            info!(
                event = "core.app.sweep_reported",
                scope = %report.scope,
                deleted = report.deleted(),
                failed = report.failed(),
                cancelled = report.cancelled
            );
        }
    }
}
