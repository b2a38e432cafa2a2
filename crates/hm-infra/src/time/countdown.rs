use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval_at, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use hm_core::countdown::{CountdownId, CountdownKind, CountdownTick};
use hm_core::ports::CountdownPort;

struct Running {
    id: CountdownId,
    token: CancellationToken,
}

/// Countdown driver backed by tokio timers.
///
/// One countdown per kind runs at a time. Ticks go out on the channel given at
/// construction; every countdown stops when the driver is dropped.
pub struct TokioCountdown {
    ticks_tx: mpsc::UnboundedSender<CountdownTick>,
    shutdown: CancellationToken,
    running: Arc<Mutex<HashMap<CountdownKind, Running>>>,
}

impl TokioCountdown {
    pub fn new(ticks_tx: mpsc::UnboundedSender<CountdownTick>) -> Self {
        Self {
            ticks_tx,
            shutdown: CancellationToken::new(),
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Builds a driver together with the receiving end of its tick channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CountdownTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait::async_trait]
impl CountdownPort for TokioCountdown {
    async fn start(&self, id: CountdownId, ticks: u32, period: Duration) -> anyhow::Result<()> {
        let token = self.shutdown.child_token();
        {
            let mut running = self.running.lock().await;
            if let Some(previous) = running.insert(
                id.kind,
                Running {
                    id,
                    token: token.clone(),
                },
            ) {
                previous.token.cancel();
                debug!(countdown = %previous.id, replaced_by = %id, "countdown replaced");
            }
        }

        let tx = self.ticks_tx.clone();
        let running = Arc::clone(&self.running);
        // Zero would make the interval panic.
        let period = period.max(Duration::from_millis(1));
        let first = Instant::now() + period;

        tokio::spawn(async move {
            let mut remaining = ticks;
            if remaining == 0 {
                let _ = tx.send(CountdownTick { id, remaining });
            } else {
                let mut interval = interval_at(first, period);
                loop {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            debug!(countdown = %id, remaining, "countdown cancelled");
                            return;
                        }
                        _ = interval.tick() => {
                            remaining -= 1;
                            if tx.send(CountdownTick { id, remaining }).is_err() {
                                debug!(countdown = %id, "tick receiver gone, stopping countdown");
                                break;
                            }
                            if remaining == 0 {
                                break;
                            }
                        }
                    }
                }
            }

            let mut running = running.lock().await;
            if running.get(&id.kind).is_some_and(|entry| entry.id == id) {
                running.remove(&id.kind);
            }
        });

        debug!(countdown = %id, ticks, period_ms = period.as_millis() as u64, "countdown started");
        Ok(())
    }

    async fn cancel(&self, id: CountdownId) -> anyhow::Result<()> {
        let mut running = self.running.lock().await;
        match running.get(&id.kind) {
            Some(entry) if entry.id == id => {
                if let Some(entry) = running.remove(&id.kind) {
                    entry.token.cancel();
                }
            }
            _ => debug!(countdown = %id, "cancel for countdown that is not running"),
        }
        Ok(())
    }

    async fn cancel_all(&self) -> anyhow::Result<()> {
        let mut running = self.running.lock().await;
        for (_, entry) in running.drain() {
            entry.token.cancel();
        }
        Ok(())
    }
}

impl Drop for TokioCountdown {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(kind: CountdownKind, epoch: u64) -> CountdownId {
        CountdownId { kind, epoch }
    }

    #[tokio::test(start_paused = true)]
    async fn single_tick_fires_after_one_period() -> anyhow::Result<()> {
        let (countdown, mut rx) = TokioCountdown::channel();
        let splash = id(CountdownKind::Splash, 1);
        let started = Instant::now();

        countdown
            .start(splash, 1, Duration::from_millis(2000))
            .await?;
        let tick = rx.recv().await.expect("tick");

        assert_eq!(tick, CountdownTick { id: splash, remaining: 0 });
        assert_eq!(started.elapsed(), Duration::from_millis(2000));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_count_down_once_per_period() -> anyhow::Result<()> {
        let (countdown, mut rx) = TokioCountdown::channel();
        let resend = id(CountdownKind::OtpResend, 3);

        countdown.start(resend, 3, Duration::from_secs(1)).await?;

        let mut remaining = Vec::new();
        for _ in 0..3 {
            remaining.push(rx.recv().await.expect("tick").remaining);
        }
        assert_eq!(remaining, vec![2, 1, 0]);
        assert!(countdown.running.lock().await.is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_stops_ticking() -> anyhow::Result<()> {
        let (countdown, mut rx) = TokioCountdown::channel();
        let resend = id(CountdownKind::OtpResend, 1);

        countdown.start(resend, 30, Duration::from_secs(1)).await?;
        assert_eq!(rx.recv().await.expect("tick").remaining, 29);

        countdown.cancel(resend).await?;
        let late = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(late.is_err(), "no tick expected after cancel, got {late:?}");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_with_stale_id_keeps_current_countdown() -> anyhow::Result<()> {
        let (countdown, mut rx) = TokioCountdown::channel();
        let current = id(CountdownKind::OtpResend, 5);

        countdown.start(current, 1, Duration::from_secs(1)).await?;
        countdown.cancel(id(CountdownKind::OtpResend, 4)).await?;

        assert_eq!(rx.recv().await.expect("tick").id, current);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_countdown_of_same_kind() -> anyhow::Result<()> {
        let (countdown, mut rx) = TokioCountdown::channel();
        let first = id(CountdownKind::OtpResend, 1);
        let second = id(CountdownKind::OtpResend, 2);

        countdown.start(first, 1, Duration::from_secs(5)).await?;
        countdown.start(second, 1, Duration::from_secs(1)).await?;

        assert_eq!(rx.recv().await.expect("tick").id, second);
        let late = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(late.is_err(), "replaced countdown must not fire");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_stops_every_kind() -> anyhow::Result<()> {
        let (countdown, mut rx) = TokioCountdown::channel();

        countdown
            .start(id(CountdownKind::Splash, 1), 1, Duration::from_secs(2))
            .await?;
        countdown
            .start(id(CountdownKind::OtpResend, 2), 30, Duration::from_secs(1))
            .await?;
        countdown.cancel_all().await?;

        let late = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(late.is_err());
        Ok(())
    }
}
