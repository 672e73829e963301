use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::rooms::SessionManager;

/// Periodically prune ghost connections from every room.
///
/// Joins already prune the room they touch; this catches rooms nobody joins anymore.
pub fn spawn_room_sweep(sessions: Arc<SessionManager>, every: Duration) -> JoinHandle<()> {
    info!("Room sweep running every {:?}", every);
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let report = sessions.sweep();
            debug!("Room sweep finished: {:?}", report);
        }
    })
}
