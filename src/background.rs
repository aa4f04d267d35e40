use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

/// Periodic housekeeping: keeps the rolling lesson window populated and marks
/// unattended past bookings as missed.
pub async fn start_maintenance_worker(state: Arc<AppState>) {
    info!("Starting maintenance worker...");
    let interval = Duration::from_secs(state.config.maintenance_interval_secs.max(1));

    loop {
        let today = state.clock.today();
        let span = info_span!("maintenance", date = %today);

        async {
            run_maintenance(&state).await;
        }
            .instrument(span)
            .await;

        sleep(interval).await;
    }
}

pub async fn run_maintenance(state: &AppState) {
    let today = state.clock.today();
    match state.schedule_service.ensure_schedule(today, state.config.schedule_weeks).await {
        Ok(outcome) => info!("Rolling window checked: {:?}", outcome),
        Err(e) => error!("Failed to ensure schedule: {:?}", e),
    }
    if let Err(e) = state.booking_service.sweep_missed(today).await {
        error!("Failed to sweep missed bookings: {:?}", e);
    }
}
