use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::probe::ProbeResult;
use crate::template::{Target, TargetProbeSpec, Template, TemplateSummary};

/// Longest error body excerpt carried into a `NetworkError`
const MAX_ERROR_BODY: usize = 200;

/// Remote collaborator that runs a probe against a draft target
pub trait TargetProber {
    fn verify_target(&self, target: &Target) -> Result<ProbeResult>;
}

/// Every backend reply wraps its payload as `{"body": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    body: Option<T>,
}

/// Blocking client for the template backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, base }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.api_base()?,
            Duration::from_secs(config.request_timeout_secs),
        ))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// All templates, as shown in the list view
    pub fn list(&self) -> Result<Vec<TemplateSummary>> {
        let url = self.endpoint(&["list"])?;
        let body: Option<Vec<TemplateSummary>> = self.get_json(&url)?;
        Ok(body.unwrap_or_default())
    }

    pub fn load(&self, name: &str) -> Result<Template> {
        let url = self.endpoint(&["detail", name])?;
        match self.get_json::<Template>(&url) {
            Ok(Some(template)) => Ok(template),
            Ok(None) | Err(ConsoleError::NetworkError { status: 404, .. }) => {
                Err(ConsoleError::TemplateNotFound(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the stored template wholesale. Last writer wins.
    pub fn save(&self, template: &Template) -> Result<()> {
        let url = self.endpoint(&["save", "template", &template.name])?;
        self.post(&url, template)?;
        tracing::info!(template = %template.name, "template saved");
        Ok(())
    }

    /// Quick verify of a normalized URL, outside any editing session
    pub fn verify_spec(&self, spec: &TargetProbeSpec) -> Result<ProbeResult> {
        self.verify(spec)
    }

    fn verify<B: Serialize>(&self, payload: &B) -> Result<ProbeResult> {
        let url = self.endpoint(&["verify-target"])?;
        let mut response = self.post(&url, payload)?;
        let status = response.status().as_u16();
        let envelope: Envelope<ProbeResult> = response.body_mut().read_json()?;
        envelope.body.ok_or_else(|| ConsoleError::NetworkError {
            status,
            message: "verification returned no result".to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ConsoleError::ConfigError(format!("'{}' cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>> {
        let mut response = self.agent.get(url.as_str()).call()?;
        let status = response.status().as_u16();
        tracing::debug!(method = "GET", path = url.path(), status, "backend call");
        if !(200..300).contains(&status) {
            return Err(status_error(status, &mut response));
        }
        let envelope: Envelope<T> = response.body_mut().read_json()?;
        Ok(envelope.body)
    }

    fn post<B: Serialize>(&self, url: &Url, payload: &B) -> Result<ureq::http::Response<ureq::Body>> {
        let mut response = self.agent.post(url.as_str()).send_json(payload)?;
        let status = response.status().as_u16();
        tracing::debug!(method = "POST", path = url.path(), status, "backend call");
        if !(200..300).contains(&status) {
            return Err(status_error(status, &mut response));
        }
        Ok(response)
    }
}

impl TargetProber for ApiClient {
    fn verify_target(&self, target: &Target) -> Result<ProbeResult> {
        self.verify(target)
    }
}

fn status_error(status: u16, response: &mut ureq::http::Response<ureq::Body>) -> ConsoleError {
    let text = response.body_mut().read_to_string().unwrap_or_default();
    let message = match text.trim() {
        "" => response
            .status()
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        body => body.chars().take(MAX_ERROR_BODY).collect(),
    };
    ConsoleError::NetworkError { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(1))
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:8765");
        assert_eq!(c.endpoint(&["list"]).unwrap().as_str(), "http://localhost:8765/list");

        let c = client("http://localhost:8765/api/");
        assert_eq!(
            c.endpoint(&["save", "template", "web"]).unwrap().as_str(),
            "http://localhost:8765/api/save/template/web"
        );
    }

    #[test]
    fn test_endpoint_encodes_names() {
        let c = client("http://localhost:8765");
        let url = c.endpoint(&["detail", "my template/v2"]).unwrap();
        assert_eq!(url.path(), "/detail/my%20template%2Fv2");
    }

    #[test]
    fn test_non_hierarchical_base_rejected() {
        let c = client("mailto:ops@example.com");
        assert!(matches!(c.endpoint(&["list"]), Err(ConsoleError::ConfigError(_))));
    }
}
