//! Expect-CT

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{SecurityHeader, EXPECT_CT};
use crate::error::HeadersResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectCt {
    pub enforce: bool,
    #[serde(with = "crate::config::humantime_serde::option")]
    pub max_age: Option<Duration>,
    pub report_uri: Option<Url>,
}

impl Default for ExpectCt {
    fn default() -> Self {
        Self {
            enforce: true,
            max_age: None,
            report_uri: None,
        }
    }
}

impl SecurityHeader for ExpectCt {
    const NAME: &'static str = EXPECT_CT;

    fn header_value(&self) -> HeadersResult<String> {
        let mut directives = Vec::with_capacity(3);
        if self.enforce {
            directives.push("enforce".to_string());
        }
        if let Some(max_age) = self.max_age {
            directives.push(format!("max-age={}", max_age.as_secs()));
        }
        if let Some(report_uri) = &self.report_uri {
            directives.push(format!("report-uri=\"{}\"", report_uri));
        }
        Ok(directives.join(", "))
    }
}
