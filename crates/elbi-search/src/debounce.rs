//! Idle-delay debouncing of an input channel.
//!
//! Each received value cancels the pending evaluation and schedules a new one
//! `delay` after it; only the latest value survives.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

pub struct Debounce<T> {
    inputs: mpsc::Receiver<T>,
    delay: Duration,
    closed: bool,
}

impl<T> Debounce<T> {
    pub fn new(inputs: mpsc::Receiver<T>, delay: Duration) -> Self {
        Self { inputs, delay, closed: false }
    }

    /// Waits for the next value that was followed by `delay` of silence.
    ///
    /// A value still pending when the sender side closes is delivered once
    /// its delay elapses; after that `None` is returned.
    pub async fn next(&mut self) -> Option<T> {
        if self.closed {
            return None;
        }
        let mut latest = self.inputs.recv().await?;
        let mut deadline = Instant::now() + self.delay;

        loop {
            tokio::select! {
                received = self.inputs.recv(), if !self.closed => match received {
                    Some(value) => {
                        latest = value;
                        deadline = Instant::now() + self.delay;
                    }
                    None => self.closed = true,
                },
                () = sleep_until(deadline) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (tx, rx) = mpsc::channel(8);
        let mut debounce = Debounce::new(rx, Duration::from_millis(1000));
        tx.send("c").await.unwrap();
        tx.send("ca").await.unwrap();
        tx.send("caf").await.unwrap();

        let start = Instant::now();
        assert_eq!(debounce.next().await, Some("caf"));
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn each_keystroke_resets_the_timer() {
        let (tx, rx) = mpsc::channel(8);
        let mut debounce = Debounce::new(rx, Duration::from_millis(1000));
        let start = Instant::now();

        tokio::spawn(async move {
            for value in ["c", "ca", "caf"] {
                tx.send(value).await.unwrap();
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            tokio::time::sleep(Duration::from_millis(2000)).await;
            tx.send("cafe").await.unwrap();
        });

        assert_eq!(debounce.next().await, Some("caf"));
        assert_eq!(start.elapsed(), Duration::from_millis(1600));
        assert_eq!(debounce.next().await, Some("cafe"));
        assert_eq!(start.elapsed(), Duration::from_millis(3900));
        assert_eq!(debounce.next().await, None);
    }
}
