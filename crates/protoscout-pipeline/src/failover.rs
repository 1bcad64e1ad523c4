//! Failover invoker.
//!
//! Executes a named operation against an ordered endpoint list: up to
//! `attempts_per_endpoint` tries against each endpoint with a fixed delay
//! between failed attempts, then ordered fallback to the next endpoint. An
//! endpoint, once exhausted, is never revisited within the same operation.
//! There is no per-call time-box; the retry budget is the only bound.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use protoscout_common::{EndpointAddress, ProtoscoutError, Result};

/// Retry budget applied to every reflection operation.
#[derive(Debug, Clone)]
pub struct FailoverConfig {
    /// Total attempts against one endpoint before falling over.
    pub attempts_per_endpoint: u32,
    /// Fixed delay between failed attempts on the same endpoint.
    pub retry_delay: Duration,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            attempts_per_endpoint: 3,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

pub struct FailoverInvoker {
    config: FailoverConfig,
}

impl FailoverInvoker {
    pub fn new(config: FailoverConfig) -> Self {
        Self { config }
    }

    /// Runs `attempt` against each endpoint in order until one attempt
    /// succeeds, returning the value together with the endpoint that
    /// produced it.
    ///
    /// # Errors
    ///
    /// [`ProtoscoutError::AllEndpointsExhausted`] once every endpoint has
    /// failed `attempts_per_endpoint` times.
    pub async fn invoke<T, F, Fut>(
        &self,
        endpoints: &[EndpointAddress],
        operation: &str,
        mut attempt: F,
    ) -> Result<(T, EndpointAddress)>
    where
        F: FnMut(EndpointAddress) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        for endpoint in endpoints {
            for n in 1..=self.config.attempts_per_endpoint {
                match attempt(endpoint.clone()).await {
                    Ok(value) => {
                        debug!(
                            "{} succeeded against {} (attempt {})",
                            operation, endpoint, n
                        );
                        return Ok((value, endpoint.clone()));
                    }
                    Err(e) => {
                        warn!(
                            "{} attempt {}/{} against {} failed: {}",
                            operation, n, self.config.attempts_per_endpoint, endpoint, e
                        );
                        if n < self.config.attempts_per_endpoint {
                            tokio::time::sleep(self.config.retry_delay).await;
                        }
                    }
                }
            }
            // This endpoint is spent; fall over and never come back to it.
        }

        Err(ProtoscoutError::AllEndpointsExhausted(operation.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn endpoints(list: &[&str]) -> Vec<EndpointAddress> {
        list.iter().map(|e| e.to_string()).collect()
    }

    fn down(endpoint: &str) -> ProtoscoutError {
        ProtoscoutError::EndpointUnavailable(format!("{}: connection refused", endpoint))
    }

    #[tokio::test]
    async fn test_first_endpoint_success_touches_nothing_else() {
        let invoker = FailoverInvoker::new(FailoverConfig::default());
        let attempted = Mutex::new(Vec::new());

        let (value, endpoint) = invoker
            .invoke(&endpoints(&["good:9090", "never:9090"]), "list_services", |e| {
                attempted.lock().unwrap().push(e.clone());
                async move { Ok(42u32) }
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(endpoint, "good:9090");
        assert_eq!(*attempted.lock().unwrap(), vec!["good:9090".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_endpoint_attempted_three_times_with_full_delays() {
        let invoker = FailoverInvoker::new(FailoverConfig::default());
        let attempts = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result: Result<((), EndpointAddress)> = invoker
            .invoke(&endpoints(&["dead:9090"]), "list_services", |e| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(down(&e)) }
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            ProtoscoutError::AllEndpointsExhausted(_)
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // two inter-attempt sleeps, none after the final attempt
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(4000), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(6000), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallover_preserves_order_and_never_revisits() {
        let invoker = FailoverInvoker::new(FailoverConfig::default());
        let attempted = Mutex::new(Vec::new());

        let (_, endpoint) = invoker
            .invoke(
                &endpoints(&["dead:9090", "alive:9090", "spare:9090"]),
                "file_containing_symbol",
                |e| {
                    attempted.lock().unwrap().push(e.clone());
                    async move {
                        if e == "alive:9090" {
                            Ok(())
                        } else {
                            Err(down(&e))
                        }
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(endpoint, "alive:9090");
        assert_eq!(
            *attempted.lock().unwrap(),
            vec![
                "dead:9090".to_string(),
                "dead:9090".to_string(),
                "dead:9090".to_string(),
                "alive:9090".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_success_on_retry_stays_on_the_same_endpoint() {
        let invoker = FailoverInvoker::new(FailoverConfig {
            attempts_per_endpoint: 3,
            retry_delay: Duration::from_millis(1),
        });
        let attempts = AtomicU32::new(0);

        let (value, endpoint) = invoker
            .invoke(&endpoints(&["flaky:9090", "spare:9090"]), "list_services", |e| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 1 {
                        Ok("listed")
                    } else {
                        Err(down(&e))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "listed");
        assert_eq!(endpoint, "flaky:9090");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_endpoints_exhausted_after_full_budget() {
        let invoker = FailoverInvoker::new(FailoverConfig::default());
        let attempts = AtomicU32::new(0);

        let result: Result<((), EndpointAddress)> = invoker
            .invoke(&endpoints(&["a:1", "b:2"]), "list_services", |e| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move { Err(down(&e)) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_empty_endpoint_list_is_immediately_exhausted() {
        let invoker = FailoverInvoker::new(FailoverConfig::default());
        let result: Result<((), EndpointAddress)> = invoker
            .invoke(&[], "list_services", |_| async move { Ok(()) })
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ProtoscoutError::AllEndpointsExhausted(_)
        ));
    }
}
