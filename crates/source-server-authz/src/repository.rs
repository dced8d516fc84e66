// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository snapshots.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, RepositoryId, Visibility};

/// A repository, addressed by `(account_id, repository_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
	/// Owning account.
	pub account_id: AccountId,
	pub repository_id: RepositoryId,
	#[serde(default)]
	pub visibility: Visibility,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub featured: bool,
}

impl Repository {
	pub fn new(account_id: AccountId, repository_id: RepositoryId, visibility: Visibility) -> Self {
		Self {
			account_id,
			repository_id,
			visibility,
			disabled: false,
			featured: false,
		}
	}

	pub fn with_disabled(mut self) -> Self {
		self.disabled = true;
		self
	}

	/// Readable without any membership.
	pub fn is_publicly_readable(&self) -> bool {
		self.visibility == Visibility::Public && !self.disabled
	}
}
