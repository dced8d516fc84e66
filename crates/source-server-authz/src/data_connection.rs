// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data connection snapshots. A data connection holds the credentials for an
//! underlying storage backend.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::types::{AccountFlag, DataConnectionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConnection {
	pub data_connection_id: DataConnectionId,
	/// Only admins may see or use a restricted connection.
	#[serde(default)]
	pub restricted: bool,
	/// Cannot be used for new repository data.
	#[serde(default)]
	pub read_only: bool,
	/// Flag an account must hold to use this connection.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub required_flag: Option<AccountFlag>,
}

impl DataConnection {
	pub fn new(data_connection_id: DataConnectionId) -> Self {
		Self {
			data_connection_id,
			restricted: false,
			read_only: false,
			required_flag: None,
		}
	}

	pub fn restricted(mut self) -> Self {
		self.restricted = true;
		self
	}

	pub fn usable_by(&self, account: &Account) -> bool {
		!self.read_only
			&& self
				.required_flag
				.map_or(true, |flag| account.has_flag(flag))
	}
}
