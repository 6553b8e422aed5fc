//! Permissions-Policy
//!
//! A map from feature name to its allow-list. Features render in name order
//! so the cached header value is stable across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{SecurityHeader, PERMISSIONS_POLICY};
use crate::error::{HeaderError, HeadersResult};

pub const ALL: &str = "*";
pub const SELF: &str = "self";

/// Well-known feature names
pub mod features {
    pub const ACCELEROMETER: &str = "accelerometer";
    pub const AMBIENT_LIGHT_SENSOR: &str = "ambient-light-sensor";
    pub const AUTOPLAY: &str = "autoplay";
    pub const BATTERY: &str = "battery";
    pub const BACKGROUND_FETCH: &str = "background-fetch";
    pub const BACKGROUND_SYNC: &str = "background-sync";
    pub const BLUETOOTH: &str = "bluetooth";
    pub const CAMERA: &str = "camera";
    pub const CLIPBOARD_READ: &str = "clipboard-read";
    pub const CLIPBOARD_WRITE: &str = "clipboard-write";
    pub const DEVICE_INFO: &str = "device-info";
    pub const DISPLAY_CAPTURE: &str = "display-capture";
    pub const DOCUMENT_DOMAIN: &str = "document-domain";
    pub const ENCRYPTED_MEDIA: &str = "encrypted-media";
    pub const FULLSCREEN: &str = "fullscreen";
    pub const GEOLOCATION: &str = "geolocation";
    pub const GYROSCOPE: &str = "gyroscope";
    pub const LAYOUT_ANIMATIONS: &str = "layout-animations";
    pub const LEGACY_IMAGE_FORMATS: &str = "legacy-image-formats";
    pub const MAGNETOMETER: &str = "magnetometer";
    pub const MICROPHONE: &str = "microphone";
    pub const MIDI: &str = "midi";
    pub const NFC: &str = "nfc";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const OVERSIZED_IMAGES: &str = "oversized-images";
    pub const PAYMENT: &str = "payment";
    pub const PERSISTENT_STORAGE: &str = "persistent-storage";
    pub const PICTURE_IN_PICTURE: &str = "picture-in-picture";
    pub const PUBLICKEY_CREDENTIALS_GET: &str = "publickey-credentials-get";
    pub const SPEAKER: &str = "speaker";
    pub const SPEAKER_SELECTION: &str = "speaker-selection";
    pub const SYNC_XHR: &str = "sync-xhr";
    pub const SCREEN_WAKE_LOCK: &str = "screen-wake-lock";
    pub const UNOPTIMIZED_IMAGES: &str = "unoptimized-images";
    pub const UNSIZED_MEDIA: &str = "unsized-media";
    pub const USB: &str = "usb";
    pub const VIBRATE: &str = "vibrate";
    pub const VR: &str = "vr";
    pub const WAKE_LOCK: &str = "wake-lock";
    pub const WEBAUTHN: &str = "webauthn";
    pub const XR_SPATIAL_TRACKING: &str = "xr-spatial-tracking";
}

/// A per-response adjustment of the configured policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum PermissionsPolicyChange {
    Allow { feature: String, value: String },
    Disallow { feature: String, value: String },
}

impl PermissionsPolicyChange {
    pub fn allow(feature: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Allow {
            feature: feature.into(),
            value: value.into(),
        }
    }

    pub fn disallow(feature: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Disallow {
            feature: feature.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionsPolicy {
    features: BTreeMap<String, Vec<String>>,
}

impl PermissionsPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn allow_list(&self, feature: &str) -> Option<&[String]> {
        self.features.get(feature).map(Vec::as_slice)
    }

    fn entry(&mut self, feature: &str) -> &mut Vec<String> {
        self.features.entry(feature.to_string()).or_default()
    }

    /// Allow `origin` for `feature`
    pub fn add(mut self, feature: &str, origin: &str) -> Self {
        let list = self.entry(feature);
        if !list.iter().any(|v| v == origin) {
            list.push(origin.to_string());
        }
        self
    }

    /// Allow every origin, replacing anything configured before
    pub fn add_all(mut self, feature: &str) -> Self {
        let list = self.entry(feature);
        list.clear();
        list.push(ALL.to_string());
        self
    }

    pub fn add_self(self, feature: &str) -> Self {
        self.add(feature, SELF)
    }

    /// Disable `feature` entirely (an empty allow-list)
    pub fn add_none(mut self, feature: &str) -> HeadersResult<Self> {
        if !self.entry(feature).is_empty() {
            return Err(HeaderError::InvalidState(format!(
                "The allow list of '{}' can not be set to none, because it already contains values",
                feature
            )));
        }
        Ok(self)
    }

    /// Copy of this policy with `changes` applied in order
    pub fn merge(&self, changes: &[PermissionsPolicyChange]) -> HeadersResult<Self> {
        let mut merged = self.clone();

        for change in changes {
            match change {
                PermissionsPolicyChange::Allow { feature, value } if value == ALL => {
                    merged = merged.add_all(feature);
                }
                PermissionsPolicyChange::Allow { feature, value } => {
                    merged = merged.add(feature, value);
                }
                PermissionsPolicyChange::Disallow { feature, value } => {
                    let list = merged.entry(feature);
                    if value == ALL {
                        list.clear();
                    } else if let Some(position) = list.iter().position(|v| v == value) {
                        list.remove(position);
                    } else {
                        return Err(HeaderError::InvalidState(format!(
                            "Value '{}' can't be removed for feature '{}', because it has never been added",
                            value, feature
                        )));
                    }
                }
            }
        }

        Ok(merged)
    }
}

fn render_allow_value(value: &str) -> String {
    if value == ALL || value == SELF || value.starts_with('"') {
        value.to_string()
    } else {
        format!("\"{}\"", value)
    }
}

impl SecurityHeader for PermissionsPolicy {
    const NAME: &'static str = PERMISSIONS_POLICY;

    fn header_value(&self) -> HeadersResult<String> {
        let rendered: Vec<String> = self
            .features
            .iter()
            .map(|(feature, values)| {
                let values: Vec<String> = values.iter().map(|v| render_allow_value(v)).collect();
                format!("{}=({})", feature, values.join(" "))
            })
            .collect();
        Ok(rendered.join(", "))
    }
}
