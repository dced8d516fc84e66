// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Property tests over the whole action catalog.

mod support;

use proptest::prelude::*;
use source_server_authz::abac::RepositoryAction;
use source_server_authz::{
	decide, Account, AccountFlag, AccountSubject, Action, ApiKey, DataConnection, DataConnectionId,
	Decision, MembershipRole, MembershipState, Resource, Subject, Visibility,
};

use support::*;

fn arb_visibility() -> impl Strategy<Value = Visibility> {
	prop_oneof![
		Just(Visibility::Public),
		Just(Visibility::Unlisted),
		Just(Visibility::Private),
	]
}

fn arb_role() -> impl Strategy<Value = MembershipRole> {
	proptest::sample::select(MembershipRole::all().to_vec())
}

fn arb_state() -> impl Strategy<Value = MembershipState> {
	proptest::sample::select(MembershipState::all().to_vec())
}

fn arb_terminal_state() -> impl Strategy<Value = MembershipState> {
	prop_oneof![Just(MembershipState::Revoked), Just(MembershipState::Rejected)]
}

fn arb_repo_scope() -> impl Strategy<Value = Option<&'static str>> {
	prop_oneof![Just(None), Just(Some("landsat")), Just(Some("sentinel"))]
}

/// One resource of every type, owned by or scoped to `ORG` where it applies.
fn resources(visibility: Visibility, disabled: bool, state: MembershipState) -> Vec<Resource> {
	let mut repo = repository(ORG, "landsat", visibility);
	repo.disabled = disabled;

	let mut org = Account::organization(account_id(ORG));
	org.disabled = disabled;

	let mut key: ApiKey = api_key(ORG, None);
	key.disabled = disabled;

	let mut connection = DataConnection::new(DataConnectionId::parse("aws-us-west-2").unwrap());
	connection.restricted = disabled;

	vec![
		Resource::Account(org),
		Resource::Repository(repo),
		Resource::Membership(membership("carol", ORG, None, MembershipRole::WriteData, state)),
		Resource::ApiKey(key),
		Resource::DataConnection(connection),
	]
}

fn with_role(role: MembershipRole, state: MembershipState, scope: Option<&str>) -> AccountSubject {
	user("alice").with_membership(membership("alice", ORG, scope, role, state))
}

fn allowed(subject: &Subject, resource: &Resource, action: Action) -> bool {
	decide(subject, resource, action).unwrap().is_allowed()
}

fn each_decision(subject: &Subject, resource: &Resource) -> Vec<(Action, Decision)> {
	Action::for_resource_type(resource.resource_type())
		.into_iter()
		.map(|action| (action, decide(subject, resource, action).unwrap()))
		.collect()
}

proptest! {
	#[test]
	fn anonymous_get_iff_public_and_enabled(visibility in arb_visibility(), disabled in any::<bool>()) {
		let mut repo = repository(ORG, "landsat", visibility);
		repo.disabled = disabled;
		let decision = decide(
			&Subject::Anonymous,
			&Resource::Repository(repo),
			Action::Repository(RepositoryAction::Get),
		)
		.unwrap();
		prop_assert_eq!(
			decision.is_allowed(),
			visibility == Visibility::Public && !disabled
		);
	}

	#[test]
	fn anonymous_never_mutates(
		visibility in arb_visibility(),
		disabled in any::<bool>(),
		state in arb_state(),
	) {
		for resource in resources(visibility, disabled, state) {
			for (action, decision) in each_decision(&Subject::Anonymous, &resource) {
				let read = matches!(
					action.as_str(),
					"repository:get" | "repository:list" | "repository:data:read" | "account:profile:get"
				);
				if !read {
					prop_assert_eq!(decision, Decision::Deny, "{} on {:?}", action, resource);
				}
			}
		}
	}

	#[test]
	fn admin_is_allowed_everything(
		visibility in arb_visibility(),
		disabled in any::<bool>(),
		state in arb_state(),
	) {
		let mut admin = user("root");
		admin.account = admin.account.with_flag(AccountFlag::Admin);
		let admin = Subject::Account(admin);
		for resource in resources(visibility, disabled, state) {
			for (action, decision) in each_decision(&admin, &resource) {
				prop_assert_eq!(decision, Decision::Allow, "{} on {:?}", action, resource);
			}
		}
	}

	#[test]
	fn removing_admin_never_grants(
		role in arb_role(),
		state in arb_state(),
		scope in arb_repo_scope(),
		visibility in arb_visibility(),
		disabled in any::<bool>(),
	) {
		let plain = with_role(role, state, scope);
		let mut admin = plain.clone();
		admin.account = admin.account.with_flag(AccountFlag::Admin);
		let (plain, admin) = (Subject::Account(plain), Subject::Account(admin));

		for resource in resources(visibility, disabled, state) {
			for action in Action::for_resource_type(resource.resource_type()) {
				if allowed(&plain, &resource, action) {
					prop_assert!(allowed(&admin, &resource, action), "{} on {:?}", action, resource);
				}
			}
		}
	}

	#[test]
	fn higher_roles_keep_every_permission(
		low in arb_role(),
		high in arb_role(),
		scope in arb_repo_scope(),
		visibility in arb_visibility(),
		disabled in any::<bool>(),
		target_state in arb_state(),
	) {
		prop_assume!(low <= high);
		let low_subject = Subject::Account(with_role(low, MembershipState::Member, scope));
		let high_subject = Subject::Account(with_role(high, MembershipState::Member, scope));

		for resource in resources(visibility, disabled, target_state) {
			for action in Action::for_resource_type(resource.resource_type()) {
				if allowed(&low_subject, &resource, action) {
					prop_assert!(
						allowed(&high_subject, &resource, action),
						"{} lost on {:?} going from {} to {}",
						action, resource, low, high
					);
				}
			}
		}
	}

	#[test]
	fn terminal_memberships_grant_nothing(
		role in arb_role(),
		state in arb_terminal_state(),
		scope in arb_repo_scope(),
		visibility in arb_visibility(),
		disabled in any::<bool>(),
		target_state in arb_state(),
	) {
		let terminal = Subject::Account(with_role(role, state, scope));
		let outsider = Subject::Account(user("alice"));

		for resource in resources(visibility, disabled, target_state) {
			prop_assert_eq!(
				each_decision(&terminal, &resource),
				each_decision(&outsider, &resource),
				"terminal membership changed decisions on {:?}", resource
			);
		}
	}

	#[test]
	fn decisions_are_idempotent(
		role in arb_role(),
		state in arb_state(),
		scope in arb_repo_scope(),
		visibility in arb_visibility(),
		disabled in any::<bool>(),
	) {
		let subject = Subject::Account(with_role(role, state, scope));
		for resource in resources(visibility, disabled, state) {
			prop_assert_eq!(each_decision(&subject, &resource), each_decision(&subject, &resource));
		}
	}

	#[test]
	fn api_keys_never_exceed_their_owner(
		role in arb_role(),
		scope in arb_repo_scope(),
		visibility in arb_visibility(),
		disabled in any::<bool>(),
		target_state in arb_state(),
	) {
		let owner = with_role(role, MembershipState::Member, None);
		let as_account = Subject::Account(owner.clone());
		let as_key = api_key_subject(owner, scope);

		for resource in resources(visibility, disabled, target_state) {
			for action in Action::for_resource_type(resource.resource_type()) {
				if allowed(&as_key, &resource, action) {
					prop_assert!(allowed(&as_account, &resource, action), "{} on {:?}", action, resource);
				}
			}
		}
	}
}
