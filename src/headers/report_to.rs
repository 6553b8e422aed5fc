//! Report-To
//!
//! Each reporting group renders as one JSON object; several groups are joined
//! with `,` inside a single header value.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{SecurityHeader, REPORT_TO};
use crate::error::{HeaderError, HeadersResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingEndpoint {
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl ReportingEndpoint {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            priority: None,
            weight: None,
        }
    }

    pub fn parse(url: &str) -> HeadersResult<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    fn is_plain(&self) -> bool {
        self.priority.is_none() && self.weight.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(with = "crate::config::humantime_serde")]
    pub max_age: Duration,
    pub endpoints: Vec<ReportingEndpoint>,
    #[serde(default)]
    pub include_subdomains: bool,
}

impl ReportingGroup {
    pub fn new(max_age: Duration, endpoints: Vec<ReportingEndpoint>) -> Self {
        Self {
            name: None,
            max_age,
            endpoints,
            include_subdomains: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn to_json(&self) -> HeadersResult<String> {
        let plain = self.endpoints.iter().all(ReportingEndpoint::is_plain);
        let wire = GroupWire {
            name: self.name.as_deref(),
            max_age: self.max_age.as_secs(),
            include_subdomains: self.include_subdomains,
            endpoints: self
                .endpoints
                .iter()
                .map(|e| {
                    if plain {
                        EndpointWire::Url(e.url.as_str())
                    } else {
                        EndpointWire::Detailed {
                            url: e.url.as_str(),
                            priority: e.priority,
                            weight: e.weight,
                        }
                    }
                })
                .collect(),
        };

        serde_json::to_string(&wire).map_err(|e| HeaderError::Format(e.to_string()))
    }
}

#[derive(Serialize)]
struct GroupWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    max_age: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    include_subdomains: bool,
    endpoints: Vec<EndpointWire<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EndpointWire<'a> {
    Url(&'a str),
    Detailed {
        url: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        priority: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<u32>,
    },
}

/// One or more reporting groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportTo(pub Vec<ReportingGroup>);

impl ReportTo {
    pub fn validate(&self) -> HeadersResult<()> {
        if self.0.is_empty() {
            return Err(HeaderError::invalid_argument(
                "groups",
                "At least one group must be included for the Report-To header",
            ));
        }
        Ok(())
    }
}

impl SecurityHeader for ReportTo {
    const NAME: &'static str = REPORT_TO;

    fn header_value(&self) -> HeadersResult<String> {
        self.validate()?;
        let groups = self
            .0
            .iter()
            .map(ReportingGroup::to_json)
            .collect::<HeadersResult<Vec<_>>>()?;
        Ok(groups.join(","))
    }
}
