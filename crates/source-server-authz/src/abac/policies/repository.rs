// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository access policies.
//!
//! Visibility only ever grants reads. Writes need ownership or a
//! `write_data` (or higher) membership on the repository or its organization.

use crate::abac::{AccountSubject, RepositoryAction};
use crate::repository::Repository;
use crate::types::{AccountFlag, MembershipRole, Visibility};

pub fn evaluate(subject: &AccountSubject, action: RepositoryAction, repository: &Repository) -> bool {
	if repository.disabled {
		return false;
	}

	let role = subject.role_for(&repository.account_id, Some(&repository.repository_id));
	let at_least = |minimum: MembershipRole| role.is_some_and(|r| r >= minimum);

	match action {
		RepositoryAction::Get | RepositoryAction::List | RepositoryAction::ReadData => {
			repository.visibility == Visibility::Public || role.is_some()
		}
		RepositoryAction::WriteData | RepositoryAction::Put => at_least(MembershipRole::WriteData),
		RepositoryAction::Create => {
			if subject.owns(&repository.account_id) {
				subject.account.has_flag(AccountFlag::CreateRepositories)
			} else {
				subject.has_role(&repository.account_id, None, MembershipRole::Maintainer)
			}
		}
		RepositoryAction::ListApiKeys | RepositoryAction::ListMemberships => {
			at_least(MembershipRole::Maintainer)
		}
		RepositoryAction::Disable | RepositoryAction::UpdateFeatured => false,
	}
}
