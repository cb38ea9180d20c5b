//! Batch lookups: many DOT numbers → snapshots.
//!
//! Each lookup runs as its own task; at most `concurrency` requests are in flight.
//! Results come back in input order and failures never abort the batch.

use crate::config::PipelineConfig;
use crate::error::SaferError;
use crate::models::CompanySnapshot;
use crate::scraper::CarrierSource;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

pub struct Pipeline<S> {
    source: Arc<S>,
    concurrency: usize,
}

impl<S: CarrierSource + 'static> Pipeline<S> {
    pub fn new(source: Arc<S>, config: &PipelineConfig) -> Self {
        Self {
            source,
            concurrency: config.concurrency.max(1),
        }
    }

    pub async fn run(&self, dot_numbers: &[String]) -> BatchReport {
        info!(
            "=== Fetching {} snapshots ({} at a time) ===",
            dot_numbers.len(),
            self.concurrency
        );

        let sem = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(dot_numbers.len());

        for dot in dot_numbers {
            let task_dot = dot.clone();
            let source = Arc::clone(&self.source);
            let sem = Arc::clone(&sem);

            let handle = tokio::spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .expect("batch semaphore is never closed");
                source.get_company_by_dot_number(&task_dot).await
            });

            handles.push((dot.clone(), handle));
        }

        let mut report = BatchReport::default();
        for (dot, handle) in handles {
            match handle.await {
                Ok(Ok(snapshot)) => {
                    info!("{}: {}", dot, snapshot.legal_name);
                    report.snapshots.push((dot, snapshot));
                }
                Ok(Err(SaferError::CompanyNotFound)) => {
                    warn!("{}: not found", dot);
                    report.not_found.push(dot);
                }
                Ok(Err(e)) => {
                    warn!("{}: {}", dot, e);
                    report.errors.push((dot, e.to_string()));
                }
                Err(e) => {
                    error!("Task panic for {}: {}", dot, e);
                    report.errors.push((dot, e.to_string()));
                }
            }
        }

        info!(
            "=== Done: {} found | {} not found | {} errors ===",
            report.snapshots.len(),
            report.not_found.len(),
            report.errors.len()
        );
        report
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub snapshots: Vec<(String, CompanySnapshot)>,
    pub not_found: Vec<String>,
    pub errors: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::CompanyResult;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers from a fixed table and records peak concurrency.
    #[derive(Default)]
    struct FakeSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl CarrierSource for FakeSource {
        async fn get_company_by_dot_number(&self, dot: &str) -> Result<CompanySnapshot> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match dot {
                "0" => Err(SaferError::CompanyNotFound),
                "500" => Err(SaferError::Status { status: StatusCode::INTERNAL_SERVER_ERROR }),
                _ => Ok(CompanySnapshot {
                    dot_number: dot.to_string(),
                    legal_name: format!("CARRIER {dot}"),
                    ..Default::default()
                }),
            }
        }

        async fn get_company_by_mc_mx(&self, _mc_mx: &str) -> Result<CompanySnapshot> {
            Err(SaferError::CompanyNotFound)
        }

        async fn search_companies_by_name(&self, _name: &str) -> Result<Vec<CompanyResult>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_sorts_outcomes() {
        let source = Arc::new(FakeSource::default());
        let pipeline = Pipeline::new(Arc::clone(&source), &PipelineConfig { concurrency: 2 });

        let dots: Vec<String> = ["1", "0", "2", "500", "3", "4"].map(String::from).to_vec();
        let report = pipeline.run(&dots).await;

        let found: Vec<&str> = report.snapshots.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(found, vec!["1", "2", "3", "4"]);
        assert_eq!(report.snapshots[2].1.legal_name, "CARRIER 3");
        assert_eq!(report.not_found, vec!["0"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, "500");
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let pipeline = Pipeline::new(
            Arc::new(FakeSource::default()),
            &PipelineConfig { concurrency: 0 },
        );
        let report = pipeline.run(&["7".to_string()]).await;
        assert_eq!(report.snapshots.len(), 1);
    }
}
