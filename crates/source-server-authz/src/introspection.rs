// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Service-to-service API key introspection.
//!
//! This is the one path that is not authorized by subject. The caller
//! presents the deployment-wide shared secret in a request header and, if it
//! matches, may look up any API key by id. The gate fails closed: no
//! configured secret, no header, or a mismatch all yield `Unauthenticated`.

use source_common_secret::SecretString;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::api_key::ApiKey;
use crate::error::AuthzError;

/// Shared-secret check for the introspection endpoint.
#[derive(Debug, Clone, Default)]
pub struct IntrospectionGate {
	secret: Option<SecretString>,
}

impl IntrospectionGate {
	pub fn new(secret: Option<SecretString>) -> Self {
		Self { secret }
	}

	/// A gate that rejects every request.
	pub fn closed() -> Self {
		Self { secret: None }
	}

	pub fn is_configured(&self) -> bool {
		self.secret.is_some()
	}

	/// Compare the presented header value with the shared secret.
	pub fn check(&self, presented: Option<&str>) -> Result<(), AuthzError> {
		let Some(expected) = &self.secret else {
			warn!("introspection rejected: no shared secret configured");
			return Err(AuthzError::Unauthenticated);
		};

		let Some(presented) = presented else {
			warn!("introspection rejected: missing header");
			return Err(AuthzError::Unauthenticated);
		};

		let expected = expected.expose().as_bytes();
		let presented = presented.as_bytes();

		// ct_eq returns false for slices of different length.
		if bool::from(expected.ct_eq(presented)) {
			Ok(())
		} else {
			warn!("introspection rejected: invalid shared secret");
			Err(AuthzError::Unauthenticated)
		}
	}

	/// Check the header, then return the key if it exists and is enabled.
	///
	/// Absent keys are `NotFound`; disabled keys are `Unauthenticated`.
	pub fn introspect<'a>(
		&self,
		presented: Option<&str>,
		key: Option<&'a ApiKey>,
	) -> Result<&'a ApiKey, AuthzError> {
		self.check(presented)?;

		let key = key.ok_or(AuthzError::NotFound)?;
		if key.disabled {
			debug!(access_key_id = %key.access_key_id, "introspection of disabled key");
			return Err(AuthzError::Unauthenticated);
		}
		Ok(key)
	}
}
