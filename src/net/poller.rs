//! Background weather fetcher.
//!
//! Runs each fetch on its own thread and reports through a channel so the
//! render loop never waits on the network. At most one fetch is in flight.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike};

use super::fetch::OpenMeteo;
use crate::error::FetchError;
use crate::signal::weather::WeatherReading;

pub type FetchOutcome = Result<WeatherReading, FetchError>;

type FetchJob = Arc<dyn Fn() -> FetchOutcome + Send + Sync>;

pub struct WeatherPoller {
    job: FetchJob,
    pending: Option<mpsc::Receiver<FetchOutcome>>,
}

impl WeatherPoller {
    /// Poll Open-Meteo, reading rain for the local hour at fetch time.
    pub fn open_meteo(client: OpenMeteo) -> Self {
        Self::from_fn(move || client.fetch(Local::now().hour() as usize))
    }

    /// Use an arbitrary fetch function.
    pub fn from_fn<F>(job: F) -> Self
    where
        F: Fn() -> FetchOutcome + Send + Sync + 'static,
    {
        Self {
            job: Arc::new(job),
            pending: None,
        }
    }

    /// Start a fetch unless one is already running.
    pub fn request(&mut self) -> bool {
        if self.pending.is_some() {
            log::debug!("weather fetch already in flight; skipping");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let job = Arc::clone(&self.job);
        std::thread::spawn(move || {
            let _ = tx.send(job());
        });

        self.pending = Some(rx);
        true
    }

    /// Non-blocking check for a finished fetch.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let rx = self.pending.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(FetchError::Disconnected),
        };
        self.pending = None;
        Some(outcome)
    }

    /// Wait up to `timeout` for the pending fetch.
    pub fn wait(&mut self, timeout: Duration) -> Option<FetchOutcome> {
        let rx = self.pending.as_ref()?;
        let outcome = match rx.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => return None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(FetchError::Disconnected),
        };
        self.pending = None;
        Some(outcome)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
