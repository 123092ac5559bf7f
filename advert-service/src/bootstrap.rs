//! One-shot connection establishment at startup
//!
//! The bootstrapper moves through `Idle -> Connecting -> Connected | Failed`.
//! While connecting it makes one attempt per interval until an attempt
//! succeeds or the total budget is spent. A connection that opens but fails
//! its liveness check is fatal and is not retried.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{BootstrapError, DatabaseError, DatabaseOperation, Error};

/// Opens and checks connections for the bootstrapper
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Send + Sync;

    /// Make a single connection attempt
    async fn connect(&self) -> Result<Self::Connection, DatabaseError>;

    /// Check that an opened connection actually answers
    async fn ping(&self, connection: &Self::Connection) -> Result<(), DatabaseError>;
}

/// Observable progress of a bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    Connecting {
        /// Attempts made so far
        attempts: u32,
    },
    Connected,
    Failed,
}

/// Retry-until-timeout connection establishment
#[derive(Debug)]
pub struct Bootstrapper {
    retry_interval: Duration,
    timeout: Duration,
    state: BootstrapState,
}

impl Bootstrapper {
    /// Both durations must be non-zero
    pub fn new(retry_interval: Duration, timeout: Duration) -> crate::error::Result<Self> {
        if retry_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "database retry interval must be positive".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "database bootstrap timeout must be positive".to_string(),
            ));
        }
        Ok(Self {
            retry_interval,
            timeout,
            state: BootstrapState::Idle,
        })
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Drive the machine to `Connected` or `Failed`
    ///
    /// The first attempt is made one interval after entering `Connecting`.
    /// Every attempt is bounded by the time left in the budget, so a
    /// stalled connect cannot push the run past the timeout.
    pub async fn run<C>(&mut self, connector: &C) -> Result<C::Connection, BootstrapError>
    where
        C: Connector + ?Sized,
    {
        let deadline = Instant::now() + self.timeout;
        let mut ticker = time::interval_at(Instant::now() + self.retry_interval, self.retry_interval);
        // An attempt that overruns the interval is followed by one fresh attempt, not a burst
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempts = 0;
        self.state = BootstrapState::Connecting { attempts };

        let connection = loop {
            tokio::select! {
                biased;
                _ = time::sleep_until(deadline) => {
                    return Err(self.fail(attempts));
                }
                _ = ticker.tick() => {
                    attempts += 1;
                    self.state = BootstrapState::Connecting { attempts };
                    match time::timeout_at(deadline, connector.connect()).await {
                        Ok(Ok(connection)) => break connection,
                        Ok(Err(e)) => {
                            tracing::warn!(attempt = attempts, "Connection attempt failed: {}. Retrying...", e);
                        }
                        Err(_) => return Err(self.fail(attempts)),
                    }
                }
            }
        };

        if let Err(e) = connector.ping(&connection).await {
            self.state = BootstrapState::Failed;
            tracing::error!("Liveness check failed after connecting: {}", e);
            let e = DatabaseError { operation: DatabaseOperation::Ping, ..e };
            return Err(BootstrapError::LivenessCheck(e));
        }

        self.state = BootstrapState::Connected;
        tracing::info!(attempts, "Connect success");
        Ok(connection)
    }

    fn fail(&mut self, attempts: u32) -> BootstrapError {
        self.state = BootstrapState::Failed;
        tracing::error!(
            attempts,
            "Database connection failed after {:?} timeout",
            self.timeout
        );
        BootstrapError::TimedOut {
            timeout: self.timeout,
        }
    }
}
