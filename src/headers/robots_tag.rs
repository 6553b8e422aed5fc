//! X-Robots-Tag

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SecurityHeader, X_ROBOTS_TAG};
use crate::error::HeadersResult;

/// Indexing restriction; declaration order is emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsDirective {
    NoIndex,
    NoFollow,
    None,
    NoArchive,
    NoCache,
    NoSnippet,
    NoOdp,
    NoTranslate,
    NoImageIndex,
}

impl RobotsDirective {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoIndex => "noindex",
            Self::NoFollow => "nofollow",
            Self::None => "none",
            Self::NoArchive => "noarchive",
            Self::NoCache => "nocache",
            Self::NoSnippet => "nosnippet",
            Self::NoOdp => "noodp",
            Self::NoTranslate => "notranslate",
            Self::NoImageIndex => "noimageindex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagePreviewSize {
    None,
    Standard,
    Large,
}

impl ImagePreviewSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Large => "large",
        }
    }
}

/// An empty directive set means `all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsTag {
    pub user_agent: Option<String>,
    pub directives: BTreeSet<RobotsDirective>,
    pub unavailable_after: Option<DateTime<Utc>>,
    pub max_snippet: Option<i32>,
    pub max_video_preview: Option<i32>,
    pub max_image_preview: Option<ImagePreviewSize>,
}

impl RobotsTag {
    /// `noindex, nofollow` style tag
    pub fn restrict(no_index: bool, no_follow: bool) -> Self {
        let mut directives = BTreeSet::new();
        if no_index {
            directives.insert(RobotsDirective::NoIndex);
        }
        if no_follow {
            directives.insert(RobotsDirective::NoFollow);
        }
        Self {
            directives,
            ..Default::default()
        }
    }
}

impl SecurityHeader for RobotsTag {
    const NAME: &'static str = X_ROBOTS_TAG;

    fn header_value(&self) -> HeadersResult<String> {
        let mut parts: Vec<String> = if self.directives.is_empty() {
            vec!["all".to_string()]
        } else {
            self.directives.iter().map(|d| d.as_str().to_string()).collect()
        };

        if let Some(after) = self.unavailable_after {
            parts.push(format!(
                "unavailable_after: {}",
                after.format("%A, %-d-%b-%Y %-H:%M:%S UTC")
            ));
        }
        if let Some(max_snippet) = self.max_snippet {
            parts.push(format!("max-snippet:{}", max_snippet));
        }
        if let Some(max_video_preview) = self.max_video_preview {
            parts.push(format!("max-video-preview:{}", max_video_preview));
        }
        if let Some(size) = self.max_image_preview {
            parts.push(format!("max-image-preview:{}", size.as_str()));
        }

        let joined = parts.join(", ");
        Ok(match &self.user_agent {
            Some(user_agent) => format!("{}: {}", user_agent, joined),
            None => joined,
        })
    }
}
