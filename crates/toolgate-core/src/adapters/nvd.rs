use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms};
use crate::domain::CveRecord;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{Provider, ProviderFuture};
use crate::request::CveId;
use crate::ProviderId;

const CVE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

/// NIST National Vulnerability Database, CVE API 2.0.
#[derive(Clone)]
pub struct NvdAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl NvdAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    vulnerabilities: Vec<VulnerabilityPayload>,
}

#[derive(Debug, Deserialize)]
struct VulnerabilityPayload {
    cve: CvePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvePayload {
    published: Option<String>,
    last_modified: Option<String>,
    #[serde(default)]
    descriptions: Vec<DescriptionPayload>,
    #[serde(default)]
    metrics: MetricsPayload,
    #[serde(default)]
    references: Vec<ReferencePayload>,
}

#[derive(Debug, Deserialize)]
struct DescriptionPayload {
    lang: String,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricsPayload {
    #[serde(default)]
    cvss_metric_v31: Vec<MetricPayload>,
    #[serde(default)]
    cvss_metric_v30: Vec<MetricPayload>,
    #[serde(default)]
    cvss_metric_v2: Vec<MetricPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricPayload {
    cvss_data: CvssPayload,
    /// v2 metrics carry severity here rather than in `cvssData`.
    base_severity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvssPayload {
    base_score: Option<f64>,
    base_severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReferencePayload {
    url: String,
}

impl Provider<CveId, CveRecord> for NvdAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Nvd
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a CveId) -> ProviderFuture<'a, CveRecord> {
        Box::pin(async move {
            let request = HttpRequest::get(format!("{CVE_URL}?cveId={}", input.as_str()))
                .with_timeout_ms(timeout_ms(self.timeout));
            let payload: SearchPayload = get_json(self.http_client.as_ref(), ProviderId::Nvd, request).await?;
            Ok(payload
                .vulnerabilities
                .into_iter()
                .next()
                .map(|vulnerability| normalize_cve(vulnerability.cve)))
        })
    }
}

fn normalize_cve(cve: CvePayload) -> CveRecord {
    let metrics = cve.metrics;
    let metric = metrics
        .cvss_metric_v31
        .into_iter()
        .chain(metrics.cvss_metric_v30)
        .chain(metrics.cvss_metric_v2)
        .next();

    let (score, severity) = match metric {
        Some(metric) => (
            metric.cvss_data.base_score,
            metric.cvss_data.base_severity.or(metric.base_severity),
        ),
        None => (None, None),
    };

    CveRecord {
        description: cve
            .descriptions
            .into_iter()
            .find(|description| description.lang == "en")
            .map(|description| description.value)
            .unwrap_or_default(),
        severity,
        score,
        published: cve.published,
        modified: cve.last_modified,
        references: cve.references.into_iter().map(|reference| reference.url).collect(),
    }
}
