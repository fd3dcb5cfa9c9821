//! Async request boundary
//!
//! Every run gets its own oracle from an [`OracleFactory`], so concurrent
//! requests never share world state. The blocking run executes on tokio's
//! blocking pool under the configured timeout. A run that times out is
//! abandoned, not cancelled: its worker finishes in the background and its
//! result is dropped.

use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::core::config::VerifierConfig;
use crate::core::error::{Result, VerifierError};
use crate::oracle::{RuleBase, RuleBaseOracle, WorldStateOracle};
use crate::report::VerificationReport;
use crate::verification::{VerificationEngine, VerificationInput};

/// Produces a fresh, exclusively owned oracle for each run
pub trait OracleFactory: Send + Sync + 'static {
    type Oracle: WorldStateOracle;

    fn create(&self) -> Self::Oracle;
}

impl OracleFactory for Arc<RuleBase> {
    type Oracle = RuleBaseOracle;

    fn create(&self) -> RuleBaseOracle {
        RuleBaseOracle::new(Arc::clone(self))
    }
}

/// Verification entry point for concurrent callers
pub struct VerificationService<F: OracleFactory> {
    factory: Arc<F>,
    config: Arc<VerifierConfig>,
}

impl<F: OracleFactory> Clone for VerificationService<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            config: Arc::clone(&self.config),
        }
    }
}

impl VerificationService<Arc<RuleBase>> {
    /// Service over an embedded rule base
    pub fn with_rules(rules: RuleBase, config: VerifierConfig) -> Self {
        Self::new(Arc::new(rules), config)
    }

    /// Service over the reference robot rules with default configuration
    pub fn robot() -> Self {
        Self::with_rules(RuleBase::robot_defaults(), VerifierConfig::default())
    }
}

impl<F: OracleFactory> VerificationService<F> {
    pub fn new(factory: F, config: VerifierConfig) -> Self {
        Self {
            factory: Arc::new(factory),
            config: Arc::new(config),
        }
    }

    /// Run one verification on a dedicated oracle, bounded by the run timeout
    pub async fn verify(&self, input: VerificationInput) -> Result<VerificationReport> {
        let factory = Arc::clone(&self.factory);
        let config = Arc::clone(&self.config);
        let timeout = self.config.service.run_timeout();

        let task = tokio::task::spawn_blocking(move || {
            let mut oracle = factory.create();
            VerificationEngine::new(&config).verify_input(&mut oracle, &input)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(report)) => report,
            Ok(Err(join_err)) => Err(VerifierError::Join(join_err.to_string())),
            Err(_) => {
                tracing::warn!("Verification run exceeded {:?}", timeout);
                Err(VerifierError::Timeout(timeout))
            }
        }
    }

    /// Verify on a private runtime, for synchronous callers
    ///
    /// The runtime is shut down without waiting for abandoned workers, so a
    /// stalled oracle cannot hold the caller past the run timeout.
    pub fn verify_blocking(&self, input: VerificationInput) -> Result<VerificationReport> {
        let rt = Runtime::new()?;
        let result = rt.block_on(self.verify(input));
        rt.shutdown_background();
        result
    }

    /// Parse a JSON request body and verify it
    pub async fn verify_json(&self, body: &serde_json::Value) -> Result<VerificationReport> {
        let input = VerificationInput::from_json(body)?;
        self.verify(input).await
    }
}
