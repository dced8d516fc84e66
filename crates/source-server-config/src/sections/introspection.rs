// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key introspection configuration.
//!
//! Introspection is the one service-to-service path that is gated by a
//! deployment-wide shared secret instead of subject-based authorization. The
//! secret itself never comes from the TOML file; it is loaded from
//! `SOURCE_AUTHZ_INTROSPECTION_SECRET` (or `_FILE`).

use serde::Deserialize;
use source_common_config::SecretString;

/// Header carrying the shared secret on introspection requests.
pub const DEFAULT_INTROSPECTION_HEADER: &str = "Authorization";

/// Introspection configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct IntrospectionConfig {
	pub enabled: bool,
	pub header: String,
	pub secret: Option<SecretString>,
}

impl Default for IntrospectionConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			header: DEFAULT_INTROSPECTION_HEADER.to_string(),
			secret: None,
		}
	}
}

/// Introspection configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntrospectionConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub header: Option<String>,
}

impl IntrospectionConfigLayer {
	pub fn merge(&mut self, other: IntrospectionConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.header.is_some() {
			self.header = other.header;
		}
	}

	pub fn finalize(self, secret: Option<SecretString>) -> IntrospectionConfig {
		IntrospectionConfig {
			enabled: self.enabled.unwrap_or(false),
			header: self
				.header
				.unwrap_or_else(|| DEFAULT_INTROSPECTION_HEADER.to_string()),
			secret,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = IntrospectionConfigLayer::default().finalize(None);
		assert!(!config.enabled);
		assert_eq!(config.header, "Authorization");
		assert!(config.secret.is_none());
	}

	#[test]
	fn test_secret_is_attached_and_redacted() {
		let layer = IntrospectionConfigLayer {
			enabled: Some(true),
			header: None,
		};
		let config = layer.finalize(Some(SecretString::from("shared")));
		assert!(config.enabled);
		assert_eq!(config.secret.as_ref().unwrap().expose(), "shared");
		assert!(!format!("{config:?}").contains("shared"));
	}

	#[test]
	fn test_merge_keeps_unset_fields() {
		let mut base = IntrospectionConfigLayer {
			enabled: Some(true),
			header: Some("X-Source-Key".to_string()),
		};
		base.merge(IntrospectionConfigLayer {
			enabled: Some(false),
			header: None,
		});
		assert_eq!(base.enabled, Some(false));
		assert_eq!(base.header, Some("X-Source-Key".to_string()));
	}
}
