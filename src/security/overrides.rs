//! Per-response header overrides
//!
//! Handlers attach these as response extensions, either by returning them as
//! part of the response tuple or through [`SecurityOverridesExt`]. The header
//! middleware reads them before writing the configured values.

use std::convert::Infallible;

use axum::response::{IntoResponseParts, Response, ResponseParts};

use crate::headers::{FrameOptionsPolicy, IeCompatibilityMode, PermissionsPolicyChange};

/// Replaces the configured X-Frame-Options for one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOptionsOverride(pub FrameOptionsPolicy);

/// Replaces the configured X-UA-Compatible for one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UaCompatibleOverride(pub IeCompatibilityMode);

/// Allow/disallow changes merged into the configured Permissions-Policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionsPolicyChanges(pub Vec<PermissionsPolicyChange>);

impl PermissionsPolicyChanges {
    pub fn allow(mut self, feature: &str, value: &str) -> Self {
        self.0.push(PermissionsPolicyChange::allow(feature, value));
        self
    }

    pub fn disallow(mut self, feature: &str, value: &str) -> Self {
        self.0.push(PermissionsPolicyChange::disallow(feature, value));
        self
    }
}

macro_rules! extension_parts {
    ($($ty:ty),*) => {
        $(
            impl IntoResponseParts for $ty {
                type Error = Infallible;

                fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
                    res.extensions_mut().insert(self);
                    Ok(res)
                }
            }
        )*
    };
}

extension_parts!(FrameOptionsOverride, UaCompatibleOverride, PermissionsPolicyChanges);

/// Convenience setters on an already built response
pub trait SecurityOverridesExt {
    fn set_frame_options(&mut self, policy: FrameOptionsPolicy);

    fn set_ua_compatible(&mut self, mode: IeCompatibilityMode);

    fn allow_permissions_policy(&mut self, feature: &str, value: &str);

    fn disallow_permissions_policy(&mut self, feature: &str, value: &str);
}

impl SecurityOverridesExt for Response {
    fn set_frame_options(&mut self, policy: FrameOptionsPolicy) {
        self.extensions_mut().insert(FrameOptionsOverride(policy));
    }

    fn set_ua_compatible(&mut self, mode: IeCompatibilityMode) {
        self.extensions_mut().insert(UaCompatibleOverride(mode));
    }

    fn allow_permissions_policy(&mut self, feature: &str, value: &str) {
        push_change(self, PermissionsPolicyChange::allow(feature, value));
    }

    fn disallow_permissions_policy(&mut self, feature: &str, value: &str) {
        push_change(self, PermissionsPolicyChange::disallow(feature, value));
    }
}

fn push_change(response: &mut Response, change: PermissionsPolicyChange) {
    let extensions = response.extensions_mut();
    match extensions.get_mut::<PermissionsPolicyChanges>() {
        Some(changes) => changes.0.push(change),
        None => {
            extensions.insert(PermissionsPolicyChanges(vec![change]));
        }
    }
}
