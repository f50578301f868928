use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

/// Time source for the timed phases of the pipeline and the document date stamp.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Calendar date used for the document date stamp.
    fn today(&self) -> NaiveDate;
}

/// Wall clock backed by the tokio timer and the local calendar.
#[derive(Debug)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock whose sleeps complete at once and only advance a counter. The date is fixed.
#[derive(Debug)]
pub struct VirtualClock {
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
    date: NaiveDate,
}

impl VirtualClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            now: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
            date,
        }
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Move time forward without a sleep.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

#[async_trait]
impl Clock for VirtualClock {
    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        self.sleeps
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(duration);
        tokio::task::yield_now().await;
    }

    fn elapsed(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn today(&self) -> NaiveDate {
        self.date
    }
}

/// `MM/DD`, zero-padded, as stamped on the document.
pub fn format_date_stamp(date: NaiveDate) -> String {
    date.format("%m/%d").to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/submit/clock.rs"]
mod tests;
