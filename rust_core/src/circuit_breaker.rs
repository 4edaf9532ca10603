//! Circuit breaker for the football data API.
//!
//! After `failure_threshold` consecutive failed requests the breaker trips
//! and refuses requests for `cooldown`. The first request after the cooldown
//! is a probe; `probe_successes` good probes close the breaker again and a
//! failed probe trips it straight back.

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::error::ApiFootballError;

/// Externally visible breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub cooldown: Duration,
    pub probe_successes: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
            probe_successes: 2,
        }
    }
}

#[derive(Debug)]
enum Circuit {
    Closed { failures: u32 },
    Open { since: Instant },
    HalfOpen { successes: u32 },
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    circuit: Mutex<Circuit>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            circuit: Mutex::new(Circuit::Closed { failures: 0 }),
        }
    }

    /// Refuses the request while open; lets a probe through once the
    /// cooldown is over.
    pub fn check(&self) -> Result<(), ApiFootballError> {
        let mut circuit = self.circuit.lock();
        if let Circuit::Open { since } = *circuit {
            if since.elapsed() < self.config.cooldown {
                return Err(ApiFootballError::CircuitOpen(self.name.clone()));
            }
            info!("{}: cooldown over, probing", self.name);
            *circuit = Circuit::HalfOpen { successes: 0 };
        }
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.check().is_ok()
    }

    pub fn record_success(&self) {
        let mut circuit = self.circuit.lock();
        match &mut *circuit {
            Circuit::HalfOpen { successes } => {
                *successes += 1;
                if *successes >= self.config.probe_successes {
                    info!("{}: {} good probes, breaker closed", self.name, successes);
                    *circuit = Circuit::Closed { failures: 0 };
                }
            }
            _ => *circuit = Circuit::Closed { failures: 0 },
        }
    }

    pub fn record_failure(&self) {
        let mut circuit = self.circuit.lock();
        match &mut *circuit {
            Circuit::Closed { failures } => {
                *failures += 1;
                if *failures >= self.config.failure_threshold {
                    warn!(
                        "{}: {} failed requests in a row, breaker tripped for {:?}",
                        self.name, failures, self.config.cooldown
                    );
                    *circuit = Circuit::Open {
                        since: Instant::now(),
                    };
                }
            }
            Circuit::HalfOpen { .. } => {
                warn!("{}: probe failed, breaker tripped again", self.name);
                *circuit = Circuit::Open {
                    since: Instant::now(),
                };
            }
            Circuit::Open { .. } => {}
        }
    }

    pub fn state(&self) -> BreakerState {
        match *self.circuit.lock() {
            Circuit::Closed { .. } => BreakerState::Closed,
            Circuit::Open { .. } => BreakerState::Open,
            Circuit::HalfOpen { .. } => BreakerState::HalfOpen,
        }
    }

    /// Consecutive failures while closed.
    pub fn failure_count(&self) -> u32 {
        match *self.circuit.lock() {
            Circuit::Closed { failures } => failures,
            _ => self.config.failure_threshold,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reset(&self) {
        *self.circuit.lock() = Circuit::Closed { failures: 0 };
    }
}

// ============================================================================
// Tests
// ============================================================================
