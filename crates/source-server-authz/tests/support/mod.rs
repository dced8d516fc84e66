// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use chrono::{Duration, Utc};
use source_server_authz::{
	decide, Account, AccountSubject, Action, ApiKey, ApiKeySubject, AccessKeyId, AccountId,
	Decision, IdentityId, Membership, MembershipRole, MembershipState, Repository, RepositoryId,
	Resource, Subject, Visibility,
};

pub const ORG: &str = "radiant-earth";
pub const OTHER_ORG: &str = "other-org";

pub fn account_id(s: &str) -> AccountId {
	AccountId::parse(s).unwrap()
}

pub fn repository_id(s: &str) -> RepositoryId {
	RepositoryId::parse(s).unwrap()
}

pub fn individual(name: &str) -> Account {
	Account::individual(account_id(name), IdentityId::generate())
}

pub fn user(name: &str) -> AccountSubject {
	AccountSubject::new(individual(name))
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

/// An account holding one membership on `ORG` in the given role and state.
pub fn org_member(name: &str, role: MembershipRole, state: MembershipState) -> AccountSubject {
	user(name).with_membership(membership(name, ORG, None, role, state))
}

pub fn repository(owner: &str, name: &str, visibility: Visibility) -> Repository {
	Repository::new(account_id(owner), repository_id(name), visibility)
}

pub fn api_key(owner: &str, scope: Option<&str>) -> ApiKey {
	ApiKey {
		access_key_id: AccessKeyId::parse("SCTESTKEY").unwrap(),
		account_id: account_id(owner),
		repository_id: scope.map(repository_id),
		name: "test".to_string(),
		disabled: false,
		expires_at: Utc::now() + Duration::days(7),
	}
}

pub fn api_key_subject(owner: AccountSubject, scope: Option<&str>) -> Subject {
	let key = api_key(owner.account_id().as_str(), scope);
	Subject::ApiKey(ApiKeySubject {
		api_key: key,
		owner,
		resolved_at: Utc::now(),
	})
}

pub struct DecisionCase {
	pub name: &'static str,
	pub subject: Subject,
	pub resource: Resource,
	pub action: Action,
	pub expected: Decision,
}

pub fn run_decision_cases(cases: &[DecisionCase]) {
	for case in cases {
		let decision = decide(&case.subject, &case.resource, case.action)
			.unwrap_or_else(|e| panic!("Case '{}': unexpected error {e}", case.name));
		if decision != case.expected {
			panic!(
				"Case '{}': {} by {} - expected {}, got {}",
				case.name,
				case.action,
				case.subject.label(),
				case.expected,
				decision
			);
		}
	}
}
