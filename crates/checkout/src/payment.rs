//! Payment simulation: a cancellable state machine standing in for a
//! real payment gateway.
//!
//! The external contract is the [`PaymentGateway`] trait: amount in,
//! transaction id or decline out. A production gateway adapter can be
//! substituted behind it without touching the order or earnings ledgers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::{Money, TransactionId};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How the buyer pays. The simulator treats every method identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Netbanking,
    Cod,
}

impl PaymentMethod {
    /// Returns the method name as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Netbanking => "netbanking",
            PaymentMethod::Cod => "cod",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The phase of the payment state machine.
///
/// ```text
/// Idle ──start──► Processing ──┬──► Success
///   ▲                          └──► Failed ──reset──► Idle
///   └────────── teardown ◄─── (any) ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    Idle,
    Processing,
    Success,
    Failed,
}

impl std::fmt::Display for PaymentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentPhase::Idle => "idle",
            PaymentPhase::Processing => "processing",
            PaymentPhase::Success => "success",
            PaymentPhase::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// How one payment attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The gateway accepted the payment.
    Success(TransactionId),

    /// The gateway declined; the simulator stays `Failed` until reset.
    Declined,
}

/// Errors that can occur during payment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// `start` is only valid from the idle phase.
    #[error("payment already {phase}")]
    NotIdle { phase: PaymentPhase },

    /// The gateway declined the payment.
    #[error("payment declined")]
    Declined,

    /// The attempt was torn down before it resolved.
    #[error("payment cancelled before resolution")]
    Cancelled,

    /// `reset` is only valid from the failed phase.
    #[error("cannot reset from {phase}")]
    InvalidReset { phase: PaymentPhase },
}

/// Simulated gateway timing.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Delay before the outcome is decided.
    pub processing_delay: Duration,

    /// Extra delay between deciding success and completing the attempt.
    pub confirmation_delay: Duration,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
            confirmation_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug)]
struct SimState {
    phase: PaymentPhase,
    method: Option<PaymentMethod>,
    amount: Option<Money>,
    transaction_id: Option<TransactionId>,
    simulate_failure: bool,
    // Bumped on every teardown; a resolver holding a stale epoch may not
    // mutate state or complete its attempt.
    epoch: u64,
    resolver: Option<JoinHandle<()>>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            phase: PaymentPhase::Idle,
            method: None,
            amount: None,
            transaction_id: None,
            simulate_failure: false,
            epoch: 0,
            resolver: None,
        }
    }
}

/// The payment gateway stand-in.
///
/// `start` transitions `Idle → Processing` and schedules a resolver
/// that decides the outcome after a fixed delay. The failure toggle is
/// read at resolution time, so flipping it mid-flight affects the
/// in-flight attempt. Tearing the flow down while processing cancels
/// the resolution inside the simulator; a late resolver can never
/// complete the attempt or mutate state afterward.
#[derive(Clone, Default)]
pub struct PaymentSimulator {
    state: Arc<Mutex<SimState>>,
    config: PaymentConfig,
}

impl PaymentSimulator {
    /// Creates a simulator with default timing.
    pub fn new() -> Self {
        Self::with_config(PaymentConfig::default())
    }

    /// Creates a simulator with explicit timing.
    pub fn with_config(config: PaymentConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::default())),
            config,
        }
    }

    /// Configures the simulated gateway to decline. Evaluated when the
    /// in-flight attempt resolves, not when it starts.
    pub fn set_simulate_failure(&self, fail: bool) {
        self.state.lock().unwrap().simulate_failure = fail;
    }

    /// Returns the current phase.
    pub fn phase(&self) -> PaymentPhase {
        self.state.lock().unwrap().phase
    }

    /// Returns the transaction id, assigned only on success.
    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.state.lock().unwrap().transaction_id.clone()
    }

    /// Starts a payment attempt. Valid only from `Idle`.
    ///
    /// Must be called within a tokio runtime; the resolver runs as a
    /// spawned task so the attempt resolves even if the caller is slow
    /// to await it.
    pub fn start(
        &self,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<PaymentAttempt, PaymentError> {
        let mut state = self.state.lock().unwrap();
        if state.phase != PaymentPhase::Idle {
            return Err(PaymentError::NotIdle { phase: state.phase });
        }

        state.phase = PaymentPhase::Processing;
        state.method = Some(method);
        state.amount = Some(amount);
        state.transaction_id = None;
        let epoch = state.epoch;

        let (tx, rx) = oneshot::channel();
        let shared = Arc::clone(&self.state);
        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(config.processing_delay).await;

            // Decide the outcome under the lock; the failure toggle is
            // read here, at resolution time.
            let transaction_id = {
                let mut st = shared.lock().unwrap();
                if st.epoch != epoch {
                    return;
                }
                if st.simulate_failure {
                    st.phase = PaymentPhase::Failed;
                    None
                } else {
                    let id = TransactionId::generate();
                    st.phase = PaymentPhase::Success;
                    st.transaction_id = Some(id.clone());
                    Some(id)
                }
            };

            let Some(transaction_id) = transaction_id else {
                tracing::warn!(%amount, %method, "simulated payment declined");
                let _ = tx.send(PaymentOutcome::Declined);
                return;
            };

            tokio::time::sleep(config.confirmation_delay).await;
            {
                let st = shared.lock().unwrap();
                if st.epoch != epoch {
                    // Torn down during confirmation; discard the result.
                    return;
                }
            }
            tracing::info!(%transaction_id, %amount, "simulated payment succeeded");
            let _ = tx.send(PaymentOutcome::Success(transaction_id));
        });
        state.resolver = Some(handle);

        Ok(PaymentAttempt {
            rx,
            guard: AttemptGuard {
                state: Arc::clone(&self.state),
                epoch,
                armed: true,
            },
        })
    }

    /// Returns a failed attempt to `Idle` so the buyer can retry with
    /// any method. Valid only from `Failed`; resolution is never
    /// automatic.
    pub fn reset(&self) -> Result<(), PaymentError> {
        let mut state = self.state.lock().unwrap();
        if state.phase != PaymentPhase::Failed {
            return Err(PaymentError::InvalidReset { phase: state.phase });
        }
        state.phase = PaymentPhase::Idle;
        state.method = None;
        state.amount = None;
        Ok(())
    }

    /// Tears the flow down, discarding any in-flight resolution.
    ///
    /// After teardown the pending resolver can never complete its
    /// attempt or mutate state, and the simulator is back at `Idle`.
    pub fn teardown(&self) {
        cancel_epoch_unconditional(&self.state);
    }
}

fn cancel_epoch(state: &Mutex<SimState>, epoch: u64) {
    let mut st = state.lock().unwrap();
    if st.epoch != epoch {
        return;
    }
    invalidate(&mut st);
}

fn cancel_epoch_unconditional(state: &Mutex<SimState>) {
    let mut st = state.lock().unwrap();
    invalidate(&mut st);
}

fn invalidate(st: &mut SimState) {
    st.epoch += 1;
    if let Some(handle) = st.resolver.take() {
        handle.abort();
    }
    st.phase = PaymentPhase::Idle;
    st.method = None;
    st.amount = None;
    st.transaction_id = None;
}

struct AttemptGuard {
    state: Arc<Mutex<SimState>>,
    epoch: u64,
    armed: bool,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        if self.armed {
            // The attempt was dropped unresolved: treat it as teardown.
            cancel_epoch(&self.state, self.epoch);
        }
    }
}

/// A single in-flight payment attempt.
///
/// Dropping an unresolved attempt tears the flow down: the scheduled
/// resolution is discarded and the simulator returns to `Idle`.
pub struct PaymentAttempt {
    rx: oneshot::Receiver<PaymentOutcome>,
    guard: AttemptGuard,
}

impl PaymentAttempt {
    /// Waits for the attempt to resolve.
    ///
    /// Returns [`PaymentError::Cancelled`] when the flow was torn down
    /// before resolution.
    pub async fn resolve(mut self) -> Result<PaymentOutcome, PaymentError> {
        let result = (&mut self.rx).await;
        self.guard.armed = false;
        result.map_err(|_| PaymentError::Cancelled)
    }
}

/// The seam a real payment gateway would be substituted behind.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges the given amount, yielding the transaction id on success.
    async fn charge(
        &self,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<TransactionId, PaymentError>;
}

#[async_trait]
impl PaymentGateway for PaymentSimulator {
    async fn charge(
        &self,
        method: PaymentMethod,
        amount: Money,
    ) -> Result<TransactionId, PaymentError> {
        let attempt = self.start(method, amount)?;
        match attempt.resolve().await? {
            PaymentOutcome::Success(transaction_id) => {
                // The flow ends with the charge: return to idle so the
                // buyer can purchase again. A decline instead stays
                // `Failed` until an explicit reset.
                self.teardown();
                Ok(transaction_id)
            }
            PaymentOutcome::Declined => Err(PaymentError::Declined),
        }
    }
}
