// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource-specific policy evaluators.
//!
//! Each evaluator is reached only for an enabled, non-admin account subject;
//! the engine handles anonymous subjects and the admin and self-access
//! overrides before dispatching here. Every evaluator denies by default.

pub mod account;
pub mod api_key;
pub mod data_connection;
pub mod membership;
pub mod repository;

#[cfg(test)]
pub(crate) mod fixtures {
	use crate::abac::AccountSubject;
	use crate::account::Account;
	use crate::membership::Membership;
	use crate::types::{AccountId, IdentityId, MembershipRole, MembershipState, RepositoryId};

	pub fn account_id(s: &str) -> AccountId {
		AccountId::parse(s).unwrap()
	}

	pub fn repository_id(s: &str) -> RepositoryId {
		RepositoryId::parse(s).unwrap()
	}

	pub fn user(name: &str) -> AccountSubject {
		AccountSubject::new(Account::individual(account_id(name), IdentityId::generate()))
	}

	pub fn membership(
		member: &str,
		org: &str,
		repo: Option<&str>,
		role: MembershipRole,
		state: MembershipState,
	) -> Membership {
		Membership::new(
			account_id(member),
			account_id(org),
			repo.map(repository_id),
			role,
			state,
		)
	}

	pub fn user_with_role(name: &str, org: &str, repo: Option<&str>, role: MembershipRole) -> AccountSubject {
		user(name).with_membership(membership(name, org, repo, role, MembershipState::Member))
	}
}
