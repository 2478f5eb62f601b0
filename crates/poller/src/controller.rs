//! Cycle controller: poll → validate → translate → deliver → sleep.
//!
//! Owns the time cursor and every recovery decision:
//! - transport failures are transient; the next cycle retries with the same cursor
//! - a response with the wrong shape is fatal and stops the loop
//! - a malformed record is skipped without affecting the rest of the batch
//! - a failed delivery is retried until it succeeds, keeping message order

use std::time::Duration;

use chrono::Utc;

use herald_common::error::{TransportError, ValidationError};
use herald_common::types::TimeCursor;
use herald_notifier::Notifier;
use herald_review::{translate_value, validate_response};

use crate::poller::StatusSource;

/// Phase of the controller, for logging and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Polling,
    Validating,
    Translating,
    Delivering,
    Sleeping,
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleState::Idle => write!(f, "idle"),
            CycleState::Polling => write!(f, "polling"),
            CycleState::Validating => write!(f, "validating"),
            CycleState::Translating => write!(f, "translating"),
            CycleState::Delivering => write!(f, "delivering"),
            CycleState::Sleeping => write!(f, "sleeping"),
        }
    }
}

/// Result of one cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Response processed. `skipped` counts malformed records.
    Completed { delivered: usize, skipped: usize },
    /// Poll failed; cursor untouched.
    Transient(TransportError),
    /// Response violated the contract; the loop must stop.
    Fatal(ValidationError),
}

pub struct CycleController<S, N> {
    source: S,
    notifier: N,
    cursor: TimeCursor,
    retry_period: Duration,
    state: CycleState,
    /// Last failure report delivered to the chat, to avoid repeating it every cycle.
    last_failure_report: Option<String>,
}

impl<S: StatusSource, N: Notifier> CycleController<S, N> {
    pub fn new(source: S, notifier: N, cursor: TimeCursor, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            cursor,
            retry_period,
            state: CycleState::Idle,
            last_failure_report: None,
        }
    }

    pub fn cursor(&self) -> TimeCursor {
        self.cursor
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run cycles until a fatal error. Sleeps `retry_period` between cycles.
    pub async fn run(&mut self) -> Result<(), ValidationError> {
        tracing::info!(
            from_date = self.cursor.as_secs(),
            retry_period_secs = self.retry_period.as_secs(),
            "Status polling started"
        );

        loop {
            if let CycleOutcome::Fatal(e) = self.run_cycle().await {
                self.set_state(CycleState::Idle);
                return Err(e);
            }
            self.set_state(CycleState::Sleeping);
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Execute a single cycle without the trailing sleep.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let started_at = Utc::now().timestamp();

        self.set_state(CycleState::Polling);
        let raw = match self.source.fetch(self.cursor).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(from_date = self.cursor.as_secs(), error = %e, "Status API request failed");
                self.report_failure(&e.to_string()).await;
                return CycleOutcome::Transient(e);
            }
        };

        self.set_state(CycleState::Validating);
        let response = match validate_response(raw) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Status API response has an unexpected shape");
                self.report_failure(&e.to_string()).await;
                return CycleOutcome::Fatal(e);
            }
        };

        if response.is_empty() {
            tracing::debug!(from_date = self.cursor.as_secs(), "No new statuses");
        }

        self.set_state(CycleState::Translating);
        let mut messages = Vec::with_capacity(response.homeworks.len());
        let mut skipped = 0;
        for (index, item) in response.homeworks.iter().enumerate() {
            match translate_value(item) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    tracing::error!(index, error = %e, "Skipping malformed homework record");
                    skipped += 1;
                }
            }
        }

        self.set_state(CycleState::Delivering);
        for message in &messages {
            let attempts = self.deliver(message).await;
            tracing::info!(attempts, "Status notification sent");
        }

        let next = response.current_date.unwrap_or(started_at);
        if self.cursor.advance_to(next) {
            tracing::debug!(from_date = self.cursor.as_secs(), "Cursor advanced");
        }
        self.last_failure_report = None;

        CycleOutcome::Completed {
            delivered: messages.len(),
            skipped,
        }
    }

    /// Deliver one message, retrying with a fixed pause until it goes through.
    /// Returns the number of attempts made.
    async fn deliver(&self, message: &str) -> u32 {
        let mut attempts = 1;
        while !self.notifier.notify(message).await {
            tracing::warn!(
                attempt = attempts,
                retry_in_secs = self.retry_period.as_secs(),
                "Message delivery failed, retrying the same message"
            );
            tokio::time::sleep(self.retry_period).await;
            attempts += 1;
        }
        attempts
    }

    /// Tell the chat about a failure, once per distinct error. Single attempt.
    async fn report_failure(&mut self, error: &str) {
        let text = format!("Сбой в работе программы: {}", error);
        if self.last_failure_report.as_deref() == Some(text.as_str()) {
            tracing::debug!("Failure already reported, not repeating");
            return;
        }
        if self.notifier.notify(&text).await {
            self.last_failure_report = Some(text);
        }
    }

    fn set_state(&mut self, state: CycleState) {
        if self.state != state {
            tracing::trace!(from = %self.state, to = %state, "Cycle state changed");
            self.state = state;
        }
    }
}
