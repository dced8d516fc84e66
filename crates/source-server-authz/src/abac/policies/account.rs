// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account access policies.

use crate::abac::{AccountAction, AccountSubject};
use crate::account::Account;
use crate::types::{AccountFlag, AccountType, MembershipRole};

pub fn evaluate(subject: &AccountSubject, action: AccountAction, account: &Account) -> bool {
	if account.disabled {
		return false;
	}

	let id = &account.account_id;

	match action {
		AccountAction::Create => match account.account_type {
			AccountType::Organization => subject.account.has_flag(AccountFlag::CreateOrganizations),
			// The subject already holds its individual account.
			AccountType::Individual => false,
		},
		AccountAction::Get | AccountAction::ListApiKeys | AccountAction::PutProfile => {
			subject.has_role(id, None, MembershipRole::Maintainer)
		}
		AccountAction::GetFlags => {
			subject.owns(id)
				|| (account.is_organization()
					&& subject
						.active_memberships()
						.any(|m| &m.organization_account_id == id))
		}
		AccountAction::GetProfile | AccountAction::ListMemberships => true,
		AccountAction::Disable => subject.owns(id),
		AccountAction::PutFlags => false,
	}
}
