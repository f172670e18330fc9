use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize;

/// Optional string map whose absence is meaningful ("no headers" vs "empty headers")
pub type EntryMap = Option<BTreeMap<String, String>>;

/// Regions the backend knows how to deploy probe workers to
pub const KNOWN_REGIONS: &[&str] = &[
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-south-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-north-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

/// HTTP method a probe issues
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Get, Method::Post, Method::Put];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            other => Err(format!("Unsupported method '{}'. Use GET, POST or PUT", other)),
        }
    }
}

/// A region code a template is probed from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub region: String,
}

impl Region {
    pub fn new(code: impl Into<String>) -> Self {
        Self { region: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.region
    }

    pub fn is_known(&self) -> bool {
        KNOWN_REGIONS.contains(&self.region.as_str())
    }
}

/// One HTTP probe definition
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Target {
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub url: String,
    /// Request headers; `None` when the target has none
    #[serde(
        default,
        deserialize_with = "deserialize_entry_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub header: EntryMap,
    /// Request body fields; `None` when the target has none
    #[serde(
        default,
        deserialize_with = "deserialize_entry_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: EntryMap,
}

impl Target {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            header: None,
            body: None,
        }
    }
}

/// Backends sometimes send `{}` or `null` for a missing map; both mean absent.
fn deserialize_entry_map<'de, D>(deserializer: D) -> Result<EntryMap, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<BTreeMap<String, String>> = Option::deserialize(deserializer)?;
    Ok(map.filter(|m| !m.is_empty()))
}

/// A named synthetic monitoring template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    #[serde(rename = "Name")]
    pub name: String,
    /// Seconds between probe rounds
    #[serde(rename = "Interval", default)]
    pub interval: u64,
    /// Per-request timeout in seconds
    #[serde(rename = "Timeout", default)]
    pub timeout: u64,
    #[serde(rename = "SlackURLs", default, deserialize_with = "null_as_default")]
    pub slack_urls: Vec<String>,
    #[serde(rename = "Regions", default, deserialize_with = "null_as_default")]
    pub regions: Vec<Region>,
    #[serde(rename = "Targets", default, deserialize_with = "null_as_default")]
    pub targets: Vec<Target>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interval: 60,
            timeout: 10,
            slack_urls: Vec::new(),
            regions: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Pre-save checks. None of these block a save; they are shown as warnings.
    pub fn check(&self) -> Vec<TemplateIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(TemplateIssue::MissingName);
        }
        if self.targets.is_empty() {
            issues.push(TemplateIssue::NoTargets);
        }
        for (index, target) in self.targets.iter().enumerate() {
            if target.method == Method::Get && target.body.is_some() {
                issues.push(TemplateIssue::BodyOnGet { index });
            }
            if let Err(e) = normalize::normalize(&target.url) {
                issues.push(TemplateIssue::InvalidUrl { index, reason: e.to_string() });
            }
        }
        for region in &self.regions {
            if !region.is_known() {
                issues.push(TemplateIssue::UnknownRegion(region.region.clone()));
            }
        }

        issues
    }
}

/// A problem found by [`Template::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
    MissingName,
    NoTargets,
    BodyOnGet { index: usize },
    InvalidUrl { index: usize, reason: String },
    UnknownRegion(String),
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateIssue::MissingName => write!(f, "template name is empty"),
            TemplateIssue::NoTargets => write!(f, "template has no targets to check"),
            TemplateIssue::BodyOnGet { index } => {
                write!(f, "target #{} is a GET request with a body", index + 1)
            }
            TemplateIssue::InvalidUrl { index, reason } => {
                write!(f, "target #{} has an invalid URL: {}", index + 1, reason)
            }
            TemplateIssue::UnknownRegion(code) => write!(f, "region '{}' is not a known region", code),
        }
    }
}

/// Row of the template list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Regions", default, deserialize_with = "null_as_default")]
    pub regions: Vec<Region>,
    #[serde(rename = "Targets", default, deserialize_with = "null_as_default")]
    pub targets: Vec<Target>,
    #[serde(rename = "Interval", default)]
    pub interval: u64,
    #[serde(rename = "Timeout", default)]
    pub timeout: u64,
}

/// Structured probe target derived from a free-text URL, used by quick verify
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetProbeSpec {
    /// Host (with any non-default port) followed by path, without scheme, query or fragment
    pub url: String,
    pub method: Method,
    pub port: String,
    pub protocol: String,
}
