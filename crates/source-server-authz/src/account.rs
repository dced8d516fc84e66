// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account snapshots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{AccountFlag, AccountId, AccountType, IdentityId};

/// An individual or organization account.
///
/// Individual accounts carry the identity they are bound to; organizations
/// have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	pub account_id: AccountId,
	pub account_type: AccountType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identity_id: Option<IdentityId>,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub flags: BTreeSet<AccountFlag>,
}

impl Account {
	pub fn individual(account_id: AccountId, identity_id: IdentityId) -> Self {
		Self {
			account_id,
			account_type: AccountType::Individual,
			identity_id: Some(identity_id),
			disabled: false,
			flags: BTreeSet::new(),
		}
	}

	pub fn organization(account_id: AccountId) -> Self {
		Self {
			account_id,
			account_type: AccountType::Organization,
			identity_id: None,
			disabled: false,
			flags: BTreeSet::new(),
		}
	}

	pub fn with_flag(mut self, flag: AccountFlag) -> Self {
		self.flags.insert(flag);
		self
	}

	pub fn with_disabled(mut self) -> Self {
		self.disabled = true;
		self
	}

	pub fn has_flag(&self, flag: AccountFlag) -> bool {
		self.flags.contains(&flag)
	}

	pub fn is_admin(&self) -> bool {
		self.has_flag(AccountFlag::Admin)
	}

	pub fn is_organization(&self) -> bool {
		self.account_type == AccountType::Organization
	}
}
