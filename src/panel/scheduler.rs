//! Periodic refresh scheduling.
//!
//! The [`RefreshScheduler`] owns one repeating timer per panel instance. It
//! signals "refresh requested" over a broadcast channel; it never fetches
//! data itself. The timer task is aborted on [`stop`](RefreshScheduler::stop)
//! and on drop, so a torn-down panel cannot keep firing.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Refresh period used when the configured value is out of range.
pub const DEFAULT_REFRESH_MINUTES: u32 = 5;

/// Marker sent on every scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSignal;

/// Clamps a refresh period to `[1, 60]` minutes, substituting
/// [`DEFAULT_REFRESH_MINUTES`] for anything outside the range.
pub fn clamp_refresh_minutes(minutes: u32) -> u32 {
    if (1..=60).contains(&minutes) {
        minutes
    } else {
        DEFAULT_REFRESH_MINUTES
    }
}

/// Owns the repeating refresh timer for one panel.
///
/// One signal is emitted immediately on [`start`](Self::start) and one per
/// period thereafter. Subscribers that fall behind see
/// [`Lagged`](broadcast::error::RecvError::Lagged) rather than blocking the
/// timer.
pub struct RefreshScheduler {
    sender: broadcast::Sender<RefreshSignal>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Creates a scheduler with no timer armed.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender, task: None }
    }

    /// Subscribes to refresh signals.
    ///
    /// Subscribe before calling [`start`](Self::start); signals sent before
    /// the subscription are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshSignal> {
        self.sender.subscribe()
    }

    /// Arms the repeating timer, replacing any previous one.
    ///
    /// Emits one signal immediately and then one every `period_minutes`
    /// minutes. Out-of-range periods fall back to
    /// [`DEFAULT_REFRESH_MINUTES`].
    pub fn start(&mut self, period_minutes: u32) {
        self.stop();

        let minutes = clamp_refresh_minutes(period_minutes);
        let period = Duration::from_secs(u64::from(minutes) * 60);
        let sender = self.sender.clone();

        self.task = Some(tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            loop {
                ticks.tick().await;
                if sender.send(RefreshSignal).is_err() {
                    // No subscribers left; the panel is gone.
                    break;
                }
            }
        }));
    }

    /// Disarms the timer. No further signals are emitted until the next
    /// [`start`](Self::start).
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Replaces the current period: equivalent to `stop` followed by
    /// `start(period_minutes)`.
    pub fn reconfigure(&mut self, period_minutes: u32) {
        self.start(period_minutes);
    }

    /// Whether a timer is currently armed.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn refresh_minutes_clamp() {
        assert_eq!(clamp_refresh_minutes(1), 1);
        assert_eq!(clamp_refresh_minutes(30), 30);
        assert_eq!(clamp_refresh_minutes(60), 60);
        assert_eq!(clamp_refresh_minutes(0), DEFAULT_REFRESH_MINUTES);
        assert_eq!(clamp_refresh_minutes(61), DEFAULT_REFRESH_MINUTES);
        assert_eq!(clamp_refresh_minutes(u32::MAX), DEFAULT_REFRESH_MINUTES);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately_on_start() {
        let mut scheduler = RefreshScheduler::new();
        let mut signals = scheduler.subscribe();

        scheduler.start(5);

        assert_eq!(signals.recv().await.unwrap(), RefreshSignal);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let mut scheduler = RefreshScheduler::new();
        let mut signals = scheduler.subscribe();

        scheduler.start(1);
        signals.recv().await.unwrap();

        // Just short of one period: nothing yet.
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(matches!(signals.try_recv(), Err(TryRecvError::Empty)));

        // Crossing the period boundary produces exactly one signal.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(signals.try_recv().unwrap(), RefreshSignal);
        assert!(matches!(signals.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_period_falls_back_to_default() {
        let mut scheduler = RefreshScheduler::new();
        let mut signals = scheduler.subscribe();

        scheduler.start(0);
        signals.recv().await.unwrap();

        // A 0-minute request runs at the 5-minute default, so nothing fires
        // in the first four minutes.
        tokio::time::sleep(Duration::from_secs(4 * 60)).await;
        assert!(matches!(signals.try_recv(), Err(TryRecvError::Empty)));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(signals.try_recv().unwrap(), RefreshSignal);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_silences_the_timer() {
        let mut scheduler = RefreshScheduler::new();
        let mut signals = scheduler.subscribe();

        scheduler.start(1);
        signals.recv().await.unwrap();

        scheduler.stop();
        assert!(!scheduler.is_running());

        // Well past one period: no signal arrives after stop.
        tokio::time::sleep(Duration::from_secs(5 * 60)).await;
        assert!(matches!(signals.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn reconfigure_replaces_the_period() {
        let mut scheduler = RefreshScheduler::new();
        let mut signals = scheduler.subscribe();

        scheduler.start(60);
        signals.recv().await.unwrap();

        scheduler.reconfigure(1);
        // Re-arming fires immediately again.
        signals.recv().await.unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(signals.try_recv().unwrap(), RefreshSignal);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_the_timer() {
        let mut scheduler = RefreshScheduler::new();
        let mut signals = scheduler.subscribe();

        scheduler.start(1);
        signals.recv().await.unwrap();

        drop(scheduler);

        tokio::time::sleep(Duration::from_secs(5 * 60)).await;
        // The sender is gone with the scheduler, so the channel reports
        // closed rather than delivering late ticks.
        assert!(matches!(
            signals.try_recv(),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed)
        ));
    }
}
