//! X-UA-Compatible

use serde::{Deserialize, Serialize};

use super::{SecurityHeader, X_UA_COMPATIBLE};
use crate::error::HeadersResult;

/// Internet Explorer document mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IeCompatibilityMode {
    #[default]
    Edge,
    IE5,
    IE7,
    IE8,
    IE9,
    IE10,
    IE11,
    EmulateIE7,
    EmulateIE8,
    EmulateIE9,
    EmulateIE10,
    EmulateIE11,
}

impl IeCompatibilityMode {
    fn mode(self) -> &'static str {
        match self {
            Self::Edge => "Edge",
            Self::IE5 => "5",
            Self::IE7 => "7",
            Self::IE8 => "8",
            Self::IE9 => "9",
            Self::IE10 => "10",
            Self::IE11 => "11",
            Self::EmulateIE7 => "EmulateIE7",
            Self::EmulateIE8 => "EmulateIE8",
            Self::EmulateIE9 => "EmulateIE9",
            Self::EmulateIE10 => "EmulateIE10",
            Self::EmulateIE11 => "EmulateIE11",
        }
    }
}

impl SecurityHeader for IeCompatibilityMode {
    const NAME: &'static str = X_UA_COMPATIBLE;

    fn header_value(&self) -> HeadersResult<String> {
        Ok(format!("IE={}", self.mode()))
    }
}
