// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key credentials.
//!
//! Programmatic callers send `Authorization: <access-key-id> <secret-access-key>`.
//! Only a SHA-256 hash of the secret access key is ever stored; presented
//! secrets are hashed and compared in constant time.

use chrono::{DateTime, Utc};
use source_common_secret::SecretString;
use subtle::ConstantTimeEq;
use tracing::{instrument, warn};

use crate::abac::{AccountSubject, ApiKeySubject, Subject};
use crate::api_key::ApiKey;
use crate::error::AuthzError;
use crate::types::AccessKeyId;

/// Exact length of a secret access key.
pub const SECRET_ACCESS_KEY_LENGTH: usize = 64;

/// Credentials parsed from an `Authorization` header.
#[derive(Debug, Clone)]
pub struct ApiKeyCredentials {
	pub access_key_id: AccessKeyId,
	pub secret_access_key: SecretString,
}

/// An API key record as held by storage, with the hash of its secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredApiKey {
	pub key: ApiKey,
	/// Hex SHA-256 of the secret access key.
	pub secret_hash: String,
}

/// Parse `<access-key-id> <secret-access-key>`.
///
/// Any malformed header yields `Unauthenticated` with no further detail.
pub fn parse_api_key_authorization(header: &str) -> Result<ApiKeyCredentials, AuthzError> {
	let mut parts = header.split_whitespace();
	let (Some(access_key_id), Some(secret), None) = (parts.next(), parts.next(), parts.next()) else {
		return Err(AuthzError::Unauthenticated);
	};

	let access_key_id =
		AccessKeyId::parse(access_key_id).map_err(|_| AuthzError::Unauthenticated)?;
	if secret.len() != SECRET_ACCESS_KEY_LENGTH {
		return Err(AuthzError::Unauthenticated);
	}

	Ok(ApiKeyCredentials {
		access_key_id,
		secret_access_key: SecretString::new(secret.to_string()),
	})
}

/// Hash a secret access key using SHA-256 and return the hex-encoded result.
pub fn hash_secret_access_key(secret: &str) -> String {
	use sha2::{Digest, Sha256};
	let mut hasher = Sha256::new();
	hasher.update(secret.as_bytes());
	hex::encode(hasher.finalize())
}

/// Turn presented credentials plus the fetched key and owner snapshot into a
/// [`Subject`].
///
/// Fails with `Unauthenticated` when the key id or secret does not match,
/// the key is disabled or expired at `now`, or the owner snapshot is not the
/// key's (enabled) account.
#[instrument(level = "debug", skip_all, fields(access_key_id = %credentials.access_key_id))]
pub fn resolve_api_key_subject(
	credentials: &ApiKeyCredentials,
	stored: &StoredApiKey,
	owner: AccountSubject,
	now: DateTime<Utc>,
) -> Result<Subject, AuthzError> {
	if stored.key.access_key_id != credentials.access_key_id {
		warn!("API key resolution failed: access key id mismatch");
		return Err(AuthzError::Unauthenticated);
	}

	let presented = hash_secret_access_key(credentials.secret_access_key.expose());
	if !bool::from(presented.as_bytes().ct_eq(stored.secret_hash.as_bytes())) {
		warn!("API key resolution failed: invalid secret");
		return Err(AuthzError::Unauthenticated);
	}

	if !stored.key.is_active_at(now) {
		warn!("API key resolution failed: key disabled or expired");
		return Err(AuthzError::Unauthenticated);
	}

	if owner.account.account_id != stored.key.account_id || owner.is_disabled() {
		warn!("API key resolution failed: owning account unavailable");
		return Err(AuthzError::Unauthenticated);
	}

	Ok(Subject::ApiKey(ApiKeySubject {
		api_key: stored.key.clone(),
		owner,
		resolved_at: now,
	}))
}
