// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccessKeyId, AccountId, RepositoryId};

/// A programmatic credential owned by an account, optionally scoped to one
/// repository of that account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
	pub access_key_id: AccessKeyId,
	pub account_id: AccountId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub repository_id: Option<RepositoryId>,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub disabled: bool,
	pub expires_at: DateTime<Utc>,
}

impl ApiKey {
	/// Usable at `now`: not disabled and not yet expired.
	pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
		!self.disabled && now < self.expires_at
	}

	pub fn is_repository_scoped(&self) -> bool {
		self.repository_id.is_some()
	}
}
