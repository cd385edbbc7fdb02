use std::path::PathBuf;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::{Dashboard, DashboardSummary, GrowthPoint, MonthlyReturn};
use crate::sample;

pub const SUMMARY_RESOURCE: &str = "dashboard.json";
pub const GROWTH_RESOURCE: &str = "growth.json";
pub const MONTHLY_RESOURCE: &str = "monthly.json";

/// Load failures are recoverable by design: the caller masks them with
/// sample data and a warning status, so these only reach logs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("malformed payload in {resource}: {source}")]
    MalformedPayload {
        resource: String,
        source: serde_json::Error,
    },
}

/// Where the three JSON resources live. Each resource is addressed by its
/// file name relative to the base.
#[derive(Debug, Clone)]
pub enum DataSource {
    Remote {
        base: String,
        client: reqwest::Client,
    },
    Local(PathBuf),
}

impl DataSource {
    pub fn new(spec: &str) -> DataSource {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            DataSource::Remote {
                base: spec.trim_end_matches('/').to_string(),
                client: reqwest::Client::new(),
            }
        } else {
            DataSource::Local(PathBuf::from(spec))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Remote { base, .. } => base.clone(),
            DataSource::Local(dir) => dir.display().to_string(),
        }
    }

    /// Fetches one resource and deserializes it. A network error or non-2xx
    /// response counts as the resource not being there; only a response we
    /// actually got to parse can be malformed.
    async fn fetch_json<T: DeserializeOwned>(&self, resource: &str) -> Result<T, LoadError> {
        let bytes = match self {
            DataSource::Remote { base, client } => {
                let url = format!("{base}/{resource}");
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|_| LoadError::ResourceNotFound(resource.to_string()))?;
                if !response.status().is_success() {
                    return Err(LoadError::ResourceNotFound(resource.to_string()));
                }
                response
                    .bytes()
                    .await
                    .map_err(|_| LoadError::ResourceNotFound(resource.to_string()))?
                    .to_vec()
            }
            DataSource::Local(dir) => tokio::fs::read(dir.join(resource))
                .await
                .map_err(|_| LoadError::ResourceNotFound(resource.to_string()))?,
        };

        serde_json::from_slice(&bytes).map_err(|source| LoadError::MalformedPayload {
            resource: resource.to_string(),
            source,
        })
    }
}

/// Loads summary, growth and monthly resources in order. The first failure
/// short-circuits the remaining fetches for this cycle; no retries.
pub async fn load(source: &DataSource) -> Result<Dashboard, LoadError> {
    let summary: DashboardSummary = source.fetch_json(SUMMARY_RESOURCE).await?;
    let growth: Vec<GrowthPoint> = source.fetch_json(GROWTH_RESOURCE).await?;
    let monthly: Vec<MonthlyReturn> = source.fetch_json(MONTHLY_RESOURCE).await?;

    debug!(
        growth_points = growth.len(),
        monthly_entries = monthly.len(),
        "dashboard feed loaded"
    );

    Ok(Dashboard {
        summary,
        growth,
        monthly,
    })
}

/// Outcome of one load cycle. `fallback` marks that the real feed was
/// unavailable and the sample dataset was substituted.
#[derive(Debug)]
pub struct LoadOutcome {
    pub dashboard: Dashboard,
    pub fallback: bool,
}

/// Never fails: on any load error the sample dataset takes the feed's
/// place so downstream rendering always has non-empty input.
pub async fn load_or_sample(source: &DataSource) -> LoadOutcome {
    match load(source).await {
        Ok(dashboard) => LoadOutcome {
            dashboard,
            fallback: false,
        },
        Err(err) => {
            warn!(source = %source.describe(), error = %err, "load failed, using sample data");
            LoadOutcome {
                dashboard: sample::sample_dashboard(),
                fallback: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fundview-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn load_reads_all_three_fixtures() {
        let source = DataSource::new("sample_data");
        let dashboard = load(&source).await.unwrap();
        assert_eq!(dashboard.summary.win_rate, 84.5);
        assert_eq!(dashboard.summary.risk_score, 92.0);
        assert_eq!(dashboard.summary.consistency_score, 94.7);
        assert!(!dashboard.growth.is_empty());
        assert!(dashboard.monthly.iter().any(|m| m.pct < 0.0));
    }

    #[tokio::test]
    async fn missing_first_resource_short_circuits() {
        let source = DataSource::new("/nonexistent/feed");
        match load(&source).await {
            Err(LoadError::ResourceNotFound(name)) => assert_eq!(name, SUMMARY_RESOURCE),
            other => panic!("expected ResourceNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_json_is_classified_as_malformed() {
        let dir = temp_dir("malformed");
        std::fs::write(dir.join(SUMMARY_RESOURCE), b"{not json").unwrap();
        let source = DataSource::Local(dir.clone());
        match load(&source).await {
            Err(LoadError::MalformedPayload { resource, .. }) => {
                assert_eq!(resource, SUMMARY_RESOURCE)
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn failed_load_substitutes_non_empty_sample_data() {
        let source = DataSource::new("/nonexistent/feed");
        let outcome = load_or_sample(&source).await;
        assert!(outcome.fallback);
        assert!(!outcome.dashboard.growth.is_empty());
        assert!(!outcome.dashboard.monthly.is_empty());
        assert!(outcome.dashboard.summary.total_accounts > 0);
    }

    #[test]
    fn http_specs_become_remote_sources() {
        match DataSource::new("https://example.com/data/") {
            DataSource::Remote { base, .. } => assert_eq!(base, "https://example.com/data"),
            other => panic!("expected remote source, got {other:?}"),
        }
        assert!(matches!(
            DataSource::new("./data"),
            DataSource::Local(_)
        ));
    }
}
