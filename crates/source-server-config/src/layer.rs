// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{IntrospectionConfigLayer, LoggingConfigLayer};

/// Authorization service configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthzConfigLayer {
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub introspection: Option<IntrospectionConfigLayer>,
}

impl AuthzConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: AuthzConfigLayer) {
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(
			&mut self.introspection,
			other.introspection,
			IntrospectionConfigLayer::merge,
		);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_empty_layers() {
		let mut base = AuthzConfigLayer::default();
		base.merge(AuthzConfigLayer::default());
		assert!(base.logging.is_none());
		assert!(base.introspection.is_none());
	}

	#[test]
	fn test_merge_other_overwrites() {
		let mut base = AuthzConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("info".to_string()),
				json: Some(true),
			}),
			..Default::default()
		};
		let other = AuthzConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				json: None,
			}),
			..Default::default()
		};
		base.merge(other);
		let logging = base.logging.unwrap();
		assert_eq!(logging.level, Some("debug".to_string()));
		assert_eq!(logging.json, Some(true));
	}

	#[test]
	fn test_merge_adds_missing_sections() {
		let mut base = AuthzConfigLayer::default();
		let other = AuthzConfigLayer {
			introspection: Some(IntrospectionConfigLayer {
				enabled: Some(true),
				header: None,
			}),
			..Default::default()
		};
		base.merge(other);
		assert_eq!(base.introspection.unwrap().enabled, Some(true));
	}
}
