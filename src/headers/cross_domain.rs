//! X-Permitted-Cross-Domain-Policies

use serde::{Deserialize, Serialize};

use super::{SecurityHeader, X_PERMITTED_CROSS_DOMAIN_POLICIES};
use crate::error::HeadersResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermittedCrossDomainPolicy {
    #[default]
    None,
    MasterOnly,
    ByContentType,
    #[serde(rename = "by-ftp-filename")]
    ByFtpFileName,
    All,
}

impl PermittedCrossDomainPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MasterOnly => "master-only",
            Self::ByContentType => "by-content-type",
            Self::ByFtpFileName => "by-ftp-filename",
            Self::All => "all",
        }
    }
}

impl SecurityHeader for PermittedCrossDomainPolicy {
    const NAME: &'static str = X_PERMITTED_CROSS_DOMAIN_POLICIES;

    fn header_value(&self) -> HeadersResult<String> {
        Ok(self.as_str().to_string())
    }
}
