//! Embassy-driven dispatcher loop
//!
//! Runs [`ActionDispatcher::update`] at `ACT_RATE_HZ` from an Embassy task.
//! Only built with the `embassy` feature.

use embassy_time::{Duration, Instant, Ticker};
use trail_actions_core::traits::TimeSource;

use crate::dispatcher::{ActionDispatcher, ActionIo};

/// Time source backed by the Embassy time driver
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Host side of the loop: lends out its collaborators once per update.
pub trait ActionHost {
    fn io(&mut self) -> ActionIo<'_>;
}

/// Drive the dispatcher forever at the configured rate.
///
/// # Example
///
/// ```rust,ignore
/// #[embassy_executor::task]
/// async fn action_task(mut dispatcher: ActionDispatcher, mut host: FlightHost) {
///     run_action_loop(&mut dispatcher, &mut host).await
/// }
/// ```
pub async fn run_action_loop<H: ActionHost>(dispatcher: &mut ActionDispatcher, host: &mut H) -> ! {
    let interval_ms = dispatcher.params().update_interval_ms();
    crate::log_info!("Action loop started ({} ms interval)", interval_ms);

    let clock = EmbassyTime;
    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));

    loop {
        let now_ms = clock.now_ms();
        {
            let mut io = host.io();
            dispatcher.update(now_ms, &mut io);
        }
        ticker.next().await;
    }
}
