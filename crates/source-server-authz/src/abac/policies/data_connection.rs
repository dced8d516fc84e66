// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data connection access policies. Everything beyond reading and using an
//! unrestricted connection is reserved for admins.

use crate::abac::{AccountSubject, DataConnectionAction};
use crate::data_connection::DataConnection;

pub fn evaluate(
	subject: &AccountSubject,
	action: DataConnectionAction,
	connection: &DataConnection,
) -> bool {
	if connection.restricted {
		return false;
	}

	match action {
		DataConnectionAction::Get => true,
		DataConnectionAction::Use => connection.usable_by(&subject.account),
		DataConnectionAction::Create
		| DataConnectionAction::ViewCredentials
		| DataConnectionAction::Put
		| DataConnectionAction::Disable => false,
	}
}
