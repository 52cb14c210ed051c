//! Named test steps.

use std::future::Future;

use tokio::time::Instant;
use tracing::{Instrument, error, info, info_span};

use crate::error::{HarnessError, Result};

/// Run `work` as a named step.
///
/// The step gets its own `tracing` span; failures are wrapped in
/// [`HarnessError::Step`] so the report names every enclosing step.
///
/// # Errors
///
/// Returns whatever `work` returns, wrapped with the step name.
pub async fn step<T, F>(name: &str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let span = info_span!("step", name);
    async move {
        let started = Instant::now();
        info!("step started");
        match work.await {
            Ok(value) => {
                info!(elapsed = ?started.elapsed(), "step passed");
                Ok(value)
            }
            Err(source) => {
                error!(elapsed = ?started.elapsed(), error = %source, "step failed");
                Err(HarnessError::Step {
                    name: name.to_string(),
                    source: Box::new(source),
                })
            }
        }
    }
    .instrument(span)
    .await
}
