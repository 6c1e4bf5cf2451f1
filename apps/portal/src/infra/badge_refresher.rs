use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::app_error::AppResult;
use crate::application::use_cases::QuestionsUseCases;

/// Keep the pending-question count on `badge` loosely in sync.
///
/// Each tick re-runs the cached question fetch. The first successful fetch is always
/// published, later ones only when the count moved. A failed fetch leaves the last
/// published count in place, unless the session can no longer authenticate: then the
/// loop stops and returns that error. It also ends once every receiver is gone.
pub async fn run_badge_refresh_loop(
    questions: QuestionsUseCases,
    period: Duration,
    badge: watch::Sender<usize>,
) -> AppResult<()> {
    let mut ticker = interval(period);
    let mut published = false;

    info!(
        "Pending question badge refresh started (every {}s)",
        period.as_secs()
    );

    loop {
        ticker.tick().await;

        if badge.is_closed() {
            debug!("Badge has no watchers, stopping refresh");
            return Ok(());
        }

        match questions.pending_count().await {
            Ok(pending) => {
                badge.send_if_modified(|current| {
                    let changed = !published || *current != pending;
                    *current = pending;
                    changed
                });
                published = true;
            }
            Err(e) if e.ends_session() => {
                warn!(error = %e, "Session ended, stopping badge refresh");
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Badge refresh failed, keeping previous count");
            }
        }
    }
}
