use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::{Emotion, Shift, MAX_INTENSITY};

/// A full-catalog shift with every emotion at a random intensity.
pub fn random_shift<R: Rng + ?Sized>(rng: &mut R) -> Shift {
    Emotion::all()
        .map(|emotion| (emotion, rng.gen_range(0..=MAX_INTENSITY)))
        .collect()
}

struct Running {
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

/// Periodically emits randomized shifts until stopped. At most one ticker runs at a time.
#[derive(Default)]
pub struct CrazyMode {
    running: Option<Running>,
}

impl CrazyMode {
    pub fn new() -> Self {
        Self { running: None }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map(|running| !running.handle.is_finished())
            .unwrap_or(false)
    }

    /// Spawns the ticker on the current tokio runtime and returns the receiving end, or
    /// `None` when a ticker is already active.
    pub fn start(&mut self, interval: Duration) -> Option<UnboundedReceiver<Shift>> {
        if self.is_running() {
            return None;
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(run_ticker(interval, sender, Arc::clone(&shutdown)));

        self.running = Some(Running { shutdown, handle });
        log::info!("Crazy mode started ({} ms interval)", interval.as_millis());

        Some(receiver)
    }

    pub fn stop(&mut self) -> bool {
        match self.running.take() {
            Some(running) => {
                // notify_one keeps a permit if the ticker is between polls
                running.shutdown.notify_one();
                log::info!("Crazy mode stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for CrazyMode {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticker(interval: Duration, sender: UnboundedSender<Shift>, shutdown: Arc<Notify>) {
    let mut rng = StdRng::from_entropy();
    // tokio::time::interval panics on a zero period
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    // the first tick of a tokio interval completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.notified() => break,
            _ = ticker.tick() => {
                if sender.send(random_shift(&mut rng)).is_err() {
                    break;
                }
            }
        }
    }
}
