// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for policy evaluation.
//!
//! - [`Subject`]: who is asking (anonymous, a bare identity, an account, or an API key)
//! - [`Resource`]: a tagged snapshot of the entity being acted upon
//! - [`Action`]: the operation, bound to exactly one [`ResourceType`]
//! - [`Decision`]: the outcome
//!
//! All of these are plain values. The engine never fetches anything; callers
//! load snapshots first and pass them in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::Account;
use crate::api_key::ApiKey;
use crate::data_connection::DataConnection;
use crate::membership::Membership;
use crate::repository::Repository;
use crate::types::{AccountId, IdentityId, MembershipRole, RepositoryId};

// =============================================================================
// Resources
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	Account,
	Repository,
	Membership,
	ApiKey,
	DataConnection,
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceType::Account => write!(f, "account"),
			ResourceType::Repository => write!(f, "repository"),
			ResourceType::Membership => write!(f, "membership"),
			ResourceType::ApiKey => write!(f, "api_key"),
			ResourceType::DataConnection => write!(f, "data_connection"),
		}
	}
}

/// Snapshot of the resource being acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
	Account(Account),
	Repository(Repository),
	Membership(Membership),
	ApiKey(ApiKey),
	DataConnection(DataConnection),
}

impl Resource {
	pub fn resource_type(&self) -> ResourceType {
		match self {
			Resource::Account(_) => ResourceType::Account,
			Resource::Repository(_) => ResourceType::Repository,
			Resource::Membership(_) => ResourceType::Membership,
			Resource::ApiKey(_) => ResourceType::ApiKey,
			Resource::DataConnection(_) => ResourceType::DataConnection,
		}
	}
}

impl From<Account> for Resource {
	fn from(value: Account) -> Self {
		Resource::Account(value)
	}
}

impl From<Repository> for Resource {
	fn from(value: Repository) -> Self {
		Resource::Repository(value)
	}
}

impl From<Membership> for Resource {
	fn from(value: Membership) -> Self {
		Resource::Membership(value)
	}
}

impl From<ApiKey> for Resource {
	fn from(value: ApiKey) -> Self {
		Resource::ApiKey(value)
	}
}

impl From<DataConnection> for Resource {
	fn from(value: DataConnection) -> Self {
		Resource::DataConnection(value)
	}
}

// =============================================================================
// Action catalog
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
	Create,
	Get,
	Disable,
	GetFlags,
	PutFlags,
	GetProfile,
	PutProfile,
	ListApiKeys,
	ListMemberships,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryAction {
	Create,
	Put,
	Disable,
	List,
	Get,
	ReadData,
	WriteData,
	UpdateFeatured,
	ListApiKeys,
	ListMemberships,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipAction {
	/// Create the (invited) membership passed as the resource.
	Invite,
	Accept,
	Reject,
	Revoke,
	/// Change the role of the membership to `role`.
	UpdateRole { role: MembershipRole },
	Get,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyAction {
	Create,
	Get,
	Revoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataConnectionAction {
	Create,
	Get,
	Use,
	ViewCredentials,
	Put,
	Disable,
}

/// An operation subject to authorization.
///
/// Each variant wraps the action set of one resource type, so the resource
/// type of an action is fixed by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	Account(AccountAction),
	Repository(RepositoryAction),
	Membership(MembershipAction),
	ApiKey(ApiKeyAction),
	DataConnection(DataConnectionAction),
}

/// Returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

const UPDATE_ROLE: &str = "membership:role:update";

impl Action {
	pub fn resource_type(&self) -> ResourceType {
		match self {
			Action::Account(_) => ResourceType::Account,
			Action::Repository(_) => ResourceType::Repository,
			Action::Membership(_) => ResourceType::Membership,
			Action::ApiKey(_) => ResourceType::ApiKey,
			Action::DataConnection(_) => ResourceType::DataConnection,
		}
	}

	/// Stable action name, used in logs and errors.
	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Account(a) => match a {
				AccountAction::Create => "account:create",
				AccountAction::Get => "account:get",
				AccountAction::Disable => "account:disable",
				AccountAction::GetFlags => "account:flags:get",
				AccountAction::PutFlags => "account:flags:put",
				AccountAction::GetProfile => "account:profile:get",
				AccountAction::PutProfile => "account:profile:put",
				AccountAction::ListApiKeys => "account:listAPIKeys",
				AccountAction::ListMemberships => "account:listMemberships",
			},
			Action::Repository(a) => match a {
				RepositoryAction::Create => "repository:create",
				RepositoryAction::Put => "repository:put",
				RepositoryAction::Disable => "repository:disable",
				RepositoryAction::List => "repository:list",
				RepositoryAction::Get => "repository:get",
				RepositoryAction::ReadData => "repository:data:read",
				RepositoryAction::WriteData => "repository:data:write",
				RepositoryAction::UpdateFeatured => "repository:featured:update",
				RepositoryAction::ListApiKeys => "repository:listAPIKeys",
				RepositoryAction::ListMemberships => "repository:listMemberships",
			},
			Action::Membership(a) => match a {
				MembershipAction::Invite => "membership:invite",
				MembershipAction::Accept => "membership:accept",
				MembershipAction::Reject => "membership:reject",
				MembershipAction::Revoke => "membership:revoke",
				MembershipAction::UpdateRole { .. } => UPDATE_ROLE,
				MembershipAction::Get => "membership:get",
			},
			Action::ApiKey(a) => match a {
				ApiKeyAction::Create => "api_key:create",
				ApiKeyAction::Get => "api_key:get",
				ApiKeyAction::Revoke => "api_key:revoke",
			},
			Action::DataConnection(a) => match a {
				DataConnectionAction::Create => "data_connection:create",
				DataConnectionAction::Get => "data_connection:get",
				DataConnectionAction::Use => "data_connection:use",
				DataConnectionAction::ViewCredentials => "data_connection:credentials:view",
				DataConnectionAction::Put => "data_connection:put",
				DataConnectionAction::Disable => "data_connection:disable",
			},
		}
	}

	/// Every action in the catalog. `UpdateRole` appears once per target role.
	pub fn catalog() -> Vec<Action> {
		use AccountAction as A;
		use DataConnectionAction as D;
		use RepositoryAction as R;

		let mut actions = vec![
			Action::Account(A::Create),
			Action::Account(A::Get),
			Action::Account(A::Disable),
			Action::Account(A::GetFlags),
			Action::Account(A::PutFlags),
			Action::Account(A::GetProfile),
			Action::Account(A::PutProfile),
			Action::Account(A::ListApiKeys),
			Action::Account(A::ListMemberships),
			Action::Repository(R::Create),
			Action::Repository(R::Put),
			Action::Repository(R::Disable),
			Action::Repository(R::List),
			Action::Repository(R::Get),
			Action::Repository(R::ReadData),
			Action::Repository(R::WriteData),
			Action::Repository(R::UpdateFeatured),
			Action::Repository(R::ListApiKeys),
			Action::Repository(R::ListMemberships),
			Action::Membership(MembershipAction::Invite),
			Action::Membership(MembershipAction::Accept),
			Action::Membership(MembershipAction::Reject),
			Action::Membership(MembershipAction::Revoke),
			Action::Membership(MembershipAction::Get),
			Action::ApiKey(ApiKeyAction::Create),
			Action::ApiKey(ApiKeyAction::Get),
			Action::ApiKey(ApiKeyAction::Revoke),
			Action::DataConnection(D::Create),
			Action::DataConnection(D::Get),
			Action::DataConnection(D::Use),
			Action::DataConnection(D::ViewCredentials),
			Action::DataConnection(D::Put),
			Action::DataConnection(D::Disable),
		];
		actions.extend(
			MembershipRole::all()
				.iter()
				.map(|&role| Action::Membership(MembershipAction::UpdateRole { role })),
		);
		actions
	}

	/// Catalog entries for one resource type.
	pub fn for_resource_type(resource_type: ResourceType) -> Vec<Action> {
		Self::catalog()
			.into_iter()
			.filter(|a| a.resource_type() == resource_type)
			.collect()
	}
}

/// `UpdateRole` renders as `membership:role:update:<role>` so that the
/// target role survives a round trip through [`FromStr`].
impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Action::Membership(MembershipAction::UpdateRole { role }) => {
				write!(f, "{UPDATE_ROLE}:{role}")
			}
			other => f.write_str(other.as_str()),
		}
	}
}

impl FromStr for Action {
	type Err = UnknownAction;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if let Some(role) = s
			.strip_prefix(UPDATE_ROLE)
			.and_then(|rest| rest.strip_prefix(':'))
		{
			return MembershipRole::all()
				.iter()
				.find(|r| r.to_string() == role)
				.map(|&role| Action::Membership(MembershipAction::UpdateRole { role }))
				.ok_or_else(|| UnknownAction(s.to_string()));
		}

		Action::catalog()
			.into_iter()
			.find(|a| !matches!(a, Action::Membership(MembershipAction::UpdateRole { .. })) && a.as_str() == s)
			.ok_or_else(|| UnknownAction(s.to_string()))
	}
}

// =============================================================================
// Decisions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
	Allow,
	Deny,
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow)
	}
}

impl From<bool> for Decision {
	fn from(allowed: bool) -> Self {
		if allowed {
			Decision::Allow
		} else {
			Decision::Deny
		}
	}
}

impl fmt::Display for Decision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Decision::Allow => write!(f, "allow"),
			Decision::Deny => write!(f, "deny"),
		}
	}
}

// =============================================================================
// Subjects
// =============================================================================

/// The party requesting an action. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subject {
	Anonymous,
	/// A verified identity that has not created its account yet.
	Identity { identity_id: IdentityId },
	Account(AccountSubject),
	ApiKey(ApiKeySubject),
}

impl Subject {
	/// Short description for logs. Never includes secrets.
	pub fn label(&self) -> String {
		match self {
			Subject::Anonymous => "anonymous".to_string(),
			Subject::Identity { identity_id } => format!("identity:{identity_id}"),
			Subject::Account(s) => format!("account:{}", s.account.account_id),
			Subject::ApiKey(s) => format!("api_key:{}", s.api_key.access_key_id),
		}
	}

	pub fn is_anonymous(&self) -> bool {
		matches!(self, Subject::Anonymous)
	}
}

/// An authenticated account and its memberships.
///
/// There is no separate admin field; admin status is always read from the
/// account's flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSubject {
	pub account: Account,
	#[serde(default)]
	pub memberships: Vec<Membership>,
}

impl AccountSubject {
	pub fn new(account: Account) -> Self {
		Self {
			account,
			memberships: Vec::new(),
		}
	}

	pub fn with_membership(mut self, membership: Membership) -> Self {
		self.memberships.push(membership);
		self
	}

	pub fn account_id(&self) -> &AccountId {
		&self.account.account_id
	}

	pub fn is_admin(&self) -> bool {
		self.account.is_admin()
	}

	pub fn is_disabled(&self) -> bool {
		self.account.disabled
	}

	pub fn owns(&self, account_id: &AccountId) -> bool {
		self.account_id() == account_id
	}

	/// Memberships that carry privilege: `Member` state and belonging to
	/// this account.
	pub fn active_memberships(&self) -> impl Iterator<Item = &Membership> {
		self.memberships
			.iter()
			.filter(|m| m.state.grants_privilege() && &m.account_id == self.account_id())
	}

	/// Governing role on `(owner, repository)`.
	///
	/// Owning the namespace counts as `Owner`. Otherwise the highest role
	/// among all applicable active memberships wins, whether organization-wide
	/// or repository-scoped.
	pub fn role_for(
		&self,
		owner: &AccountId,
		repository: Option<&RepositoryId>,
	) -> Option<MembershipRole> {
		if self.owns(owner) {
			return Some(MembershipRole::Owner);
		}
		self.active_memberships()
			.filter(|m| m.applies_to(owner, repository))
			.map(|m| m.role)
			.max()
	}

	/// Role from organization-wide memberships only. Owning the namespace
	/// still counts as `Owner`.
	pub fn organization_role(&self, organization: &AccountId) -> Option<MembershipRole> {
		if self.owns(organization) {
			return Some(MembershipRole::Owner);
		}
		self.active_memberships()
			.filter(|m| m.is_organization_wide() && &m.organization_account_id == organization)
			.map(|m| m.role)
			.max()
	}

	pub fn has_role(
		&self,
		owner: &AccountId,
		repository: Option<&RepositoryId>,
		minimum: MembershipRole,
	) -> bool {
		self.role_for(owner, repository)
			.is_some_and(|role| role >= minimum)
	}
}

/// A validated API key and the snapshot of its owning account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeySubject {
	pub api_key: ApiKey,
	pub owner: AccountSubject,
	/// Instant the key was resolved; expiry is judged against this.
	pub resolved_at: DateTime<Utc>,
}

impl ApiKeySubject {
	/// The account authority this key may exercise on `resource`, if any.
	///
	/// `None` when the owner snapshot does not match the key, the key is
	/// disabled or expired, or the key is repository-scoped and `resource`
	/// is not that repository.
	pub fn authority_for(&self, resource: &Resource) -> Option<&AccountSubject> {
		if self.api_key.account_id != self.owner.account.account_id {
			return None;
		}
		if !self.api_key.is_active_at(self.resolved_at) {
			return None;
		}
		if let Some(scoped) = &self.api_key.repository_id {
			let in_scope = matches!(
				resource,
				Resource::Repository(repo)
					if &repo.repository_id == scoped && repo.account_id == self.api_key.account_id
			);
			if !in_scope {
				return None;
			}
		}
		Some(&self.owner)
	}
}

// =============================================================================
// Wire shapes
// =============================================================================

/// A complete decision request, as accepted by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
	pub subject: Subject,
	pub resource: Resource,
	pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResponse {
	pub allow: bool,
}

impl From<Decision> for DecisionResponse {
	fn from(decision: Decision) -> Self {
		Self {
			allow: decision.is_allowed(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{AccountType, IdentityId, MembershipState, Visibility};

	fn id(s: &str) -> AccountId {
		AccountId::parse(s).unwrap()
	}

	fn repo_id(s: &str) -> RepositoryId {
		RepositoryId::parse(s).unwrap()
	}

	fn alice() -> AccountSubject {
		AccountSubject::new(Account::individual(id("alice"), IdentityId::generate()))
	}

	fn member_of(
		org: &str,
		repo: Option<&str>,
		role: MembershipRole,
		state: MembershipState,
	) -> Membership {
		Membership::new(id("alice"), id(org), repo.map(repo_id), role, state)
	}

	mod catalog {
		use super::*;

		#[test]
		fn every_action_has_a_unique_display_name() {
			let mut names: Vec<String> = Action::catalog().iter().map(|a| a.to_string()).collect();
			let len = names.len();
			names.sort();
			names.dedup();
			assert_eq!(names.len(), len);
		}

		#[test]
		fn display_round_trips_through_from_str() {
			for action in Action::catalog() {
				let parsed: Action = action.to_string().parse().unwrap();
				assert_eq!(parsed, action);
			}
		}

		#[test]
		fn unknown_names_are_rejected() {
			assert!("repository:delete".parse::<Action>().is_err());
			assert!("membership:role:update".parse::<Action>().is_err());
			assert!("membership:role:update:root".parse::<Action>().is_err());
		}

		#[test]
		fn every_resource_type_has_actions() {
			for rt in [
				ResourceType::Account,
				ResourceType::Repository,
				ResourceType::Membership,
				ResourceType::ApiKey,
				ResourceType::DataConnection,
			] {
				assert!(!Action::for_resource_type(rt).is_empty(), "{rt}");
			}
		}

		#[test]
		fn action_wire_format() {
			let json = serde_json::to_value(Action::Repository(RepositoryAction::ReadData)).unwrap();
			assert_eq!(json, serde_json::json!({"repository": "read_data"}));

			let action: Action = serde_json::from_value(serde_json::json!({
				"membership": {"update_role": {"role": "maintainers"}}
			}))
			.unwrap();
			assert_eq!(
				action,
				Action::Membership(MembershipAction::UpdateRole {
					role: MembershipRole::Maintainer
				})
			);
		}
	}

	mod roles {
		use super::*;

		#[test]
		fn owner_of_namespace_is_owner() {
			assert_eq!(alice().role_for(&id("alice"), None), Some(MembershipRole::Owner));
		}

		#[test]
		fn highest_applicable_role_wins() {
			let subject = alice()
				.with_membership(member_of(
					"acme",
					None,
					MembershipRole::WriteData,
					MembershipState::Member,
				))
				.with_membership(member_of(
					"acme",
					Some("landsat"),
					MembershipRole::Maintainer,
					MembershipState::Member,
				))
				.with_membership(member_of(
					"acme",
					Some("landsat"),
					MembershipRole::ReadData,
					MembershipState::Member,
				));

			assert_eq!(
				subject.role_for(&id("acme"), Some(&repo_id("landsat"))),
				Some(MembershipRole::Maintainer)
			);
			assert_eq!(
				subject.role_for(&id("acme"), Some(&repo_id("sentinel"))),
				Some(MembershipRole::WriteData)
			);
			assert_eq!(
				subject.organization_role(&id("acme")),
				Some(MembershipRole::WriteData)
			);
		}

		#[test]
		fn organization_role_ignores_repository_scopes() {
			let subject = alice().with_membership(member_of(
				"acme",
				Some("landsat"),
				MembershipRole::Owner,
				MembershipState::Member,
			));
			assert_eq!(subject.organization_role(&id("acme")), None);
			assert_eq!(subject.role_for(&id("acme"), None), None);
			assert_eq!(
				subject.role_for(&id("acme"), Some(&repo_id("landsat"))),
				Some(MembershipRole::Owner)
			);
			assert_eq!(subject.organization_role(&id("alice")), Some(MembershipRole::Owner));
		}

		#[test]
		fn non_member_states_grant_nothing() {
			for state in [
				MembershipState::Invited,
				MembershipState::Requested,
				MembershipState::Revoked,
				MembershipState::Rejected,
			] {
				let subject =
					alice().with_membership(member_of("acme", None, MembershipRole::Owner, state));
				assert_eq!(subject.role_for(&id("acme"), None), None, "{state}");
			}
		}

		#[test]
		fn memberships_of_other_accounts_are_ignored() {
			let mut foreign = member_of("acme", None, MembershipRole::Owner, MembershipState::Member);
			foreign.account_id = id("mallory");
			let subject = alice().with_membership(foreign);
			assert_eq!(subject.role_for(&id("acme"), None), None);
		}
	}

	mod api_keys {
		use super::*;
		use crate::types::AccessKeyId;
		use chrono::Duration;

		fn key_subject(repository_id: Option<&str>, expires_in: Duration) -> ApiKeySubject {
			let now = Utc::now();
			ApiKeySubject {
				api_key: ApiKey {
					access_key_id: AccessKeyId::parse("SCKEY").unwrap(),
					account_id: id("alice"),
					repository_id: repository_id.map(repo_id),
					name: String::new(),
					disabled: false,
					expires_at: now + expires_in,
				},
				owner: alice(),
				resolved_at: now,
			}
		}

		fn repository(name: &str) -> Resource {
			Resource::Repository(Repository::new(id("alice"), repo_id(name), Visibility::Private))
		}

		#[test]
		fn unscoped_key_acts_as_owner() {
			let subject = key_subject(None, Duration::days(1));
			assert!(subject.authority_for(&repository("landsat")).is_some());
		}

		#[test]
		fn expired_key_has_no_authority() {
			let subject = key_subject(None, Duration::seconds(-1));
			assert!(subject.authority_for(&repository("landsat")).is_none());
		}

		#[test]
		fn scoped_key_only_reaches_its_repository() {
			let subject = key_subject(Some("landsat"), Duration::days(1));
			assert!(subject.authority_for(&repository("landsat")).is_some());
			assert!(subject.authority_for(&repository("sentinel")).is_none());
			assert!(subject
				.authority_for(&Resource::Account(subject.owner.account.clone()))
				.is_none());
		}

		#[test]
		fn owner_mismatch_has_no_authority() {
			let mut subject = key_subject(None, Duration::days(1));
			subject.owner.account.account_id = id("mallory");
			assert!(subject.authority_for(&repository("landsat")).is_none());
		}
	}

	#[test]
	fn subject_wire_format() {
		let subject: Subject = serde_json::from_value(serde_json::json!({
			"type": "account",
			"account": {"account_id": "alice", "account_type": "individual"},
		}))
		.unwrap();
		match subject {
			Subject::Account(s) => {
				assert_eq!(s.account.account_type, AccountType::Individual);
				assert!(s.memberships.is_empty());
			}
			other => panic!("unexpected subject {other:?}"),
		}

		let anon: Subject = serde_json::from_value(serde_json::json!({"type": "anonymous"})).unwrap();
		assert!(anon.is_anonymous());
	}

	#[test]
	fn decision_from_bool() {
		assert_eq!(Decision::from(true), Decision::Allow);
		assert_eq!(Decision::from(false), Decision::Deny);
		assert_eq!(DecisionResponse::from(Decision::Allow), DecisionResponse { allow: true });
	}
}
