// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fetch-then-decide glue between a [`ResourceStore`] and the engine.
//!
//! Handlers call into [`Gate`] instead of the store directly, so every read
//! and write passes through `decide`. Whether a missing record is reported as
//! `NotFound` or folded into the denial is chosen per call with
//! [`ExistencePolicy`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::abac::{
	authorize, denial_for, AccountAction, Action, ApiKeyAction, DataConnectionAction,
	MembershipAction, RepositoryAction, Resource, Subject,
};
use crate::account::Account;
use crate::api_key::ApiKey;
use crate::credentials::{parse_api_key_authorization, resolve_api_key_subject, StoredApiKey};
use crate::data_connection::DataConnection;
use crate::error::AuthzError;
use crate::introspection::IntrospectionGate;
use crate::membership::{Membership, MembershipTransition};
use crate::repository::Repository;
use crate::store::ResourceStore;
use crate::types::{AccessKeyId, AccountId, DataConnectionId, MembershipId, RepositoryId};

/// How an absent resource is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistencePolicy {
	/// Absence is `NotFound`, checked before authorization.
	Disclosed,
	/// Absence looks exactly like a denial for the same subject.
	#[default]
	Concealed,
}

/// Authorize `action` on a fetched snapshot and hand the snapshot back.
pub fn authorize_fetched<T>(
	subject: &Subject,
	fetched: Option<T>,
	action: Action,
	policy: ExistencePolicy,
) -> Result<T, AuthzError>
where
	T: Clone + Into<Resource>,
{
	let Some(value) = fetched else {
		return Err(match policy {
			ExistencePolicy::Disclosed => AuthzError::NotFound,
			ExistencePolicy::Concealed => denial_for(subject),
		});
	};
	authorize(subject, &value.clone().into(), action)?;
	Ok(value)
}

/// The membership action that guards a lifecycle transition.
pub fn transition_action(transition: MembershipTransition) -> Action {
	Action::Membership(match transition {
		MembershipTransition::Accept => MembershipAction::Accept,
		MembershipTransition::Reject => MembershipAction::Reject,
		MembershipTransition::Revoke => MembershipAction::Revoke,
		MembershipTransition::UpdateRole(role) => MembershipAction::UpdateRole { role },
	})
}

pub struct Gate<S: ResourceStore> {
	store: Arc<S>,
	introspection: IntrospectionGate,
}

impl<S: ResourceStore> Clone for Gate<S> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
			introspection: self.introspection.clone(),
		}
	}
}

impl<S: ResourceStore> Gate<S> {
	pub fn new(store: Arc<S>, introspection: IntrospectionGate) -> Self {
		Self {
			store,
			introspection,
		}
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	/// Resolve an optional API key `Authorization` header into a subject.
	///
	/// No header means [`Subject::Anonymous`]. A header that fails to resolve
	/// for any reason is `Unauthenticated`.
	#[instrument(level = "debug", skip_all)]
	pub async fn resolve_subject(
		&self,
		authorization: Option<&str>,
		now: DateTime<Utc>,
	) -> Result<Subject, AuthzError> {
		let Some(header) = authorization else {
			return Ok(Subject::Anonymous);
		};

		let credentials = parse_api_key_authorization(header)?;
		let stored = self
			.store
			.fetch_api_key(&credentials.access_key_id)
			.await?
			.ok_or(AuthzError::Unauthenticated)?;
		let owner = self
			.store
			.account_subject(&stored.key.account_id)
			.await?
			.ok_or(AuthzError::Unauthenticated)?;

		resolve_api_key_subject(&credentials, &stored, owner, now)
	}

	pub async fn account(
		&self,
		subject: &Subject,
		account_id: &AccountId,
		action: AccountAction,
		policy: ExistencePolicy,
	) -> Result<Account, AuthzError> {
		let fetched = self.store.fetch_account(account_id).await?;
		authorize_fetched(subject, fetched, Action::Account(action), policy)
	}

	pub async fn repository(
		&self,
		subject: &Subject,
		account_id: &AccountId,
		repository_id: &RepositoryId,
		action: RepositoryAction,
		policy: ExistencePolicy,
	) -> Result<Repository, AuthzError> {
		let fetched = self.store.fetch_repository(account_id, repository_id).await?;
		authorize_fetched(subject, fetched, Action::Repository(action), policy)
	}

	pub async fn membership(
		&self,
		subject: &Subject,
		membership_id: MembershipId,
		policy: ExistencePolicy,
	) -> Result<Membership, AuthzError> {
		let fetched = self.store.fetch_membership(membership_id).await?;
		authorize_fetched(
			subject,
			fetched,
			Action::Membership(MembershipAction::Get),
			policy,
		)
	}

	pub async fn api_key(
		&self,
		subject: &Subject,
		access_key_id: &AccessKeyId,
		action: ApiKeyAction,
		policy: ExistencePolicy,
	) -> Result<ApiKey, AuthzError> {
		let fetched = self
			.store
			.fetch_api_key(access_key_id)
			.await?
			.map(|stored| stored.key);
		authorize_fetched(subject, fetched, Action::ApiKey(action), policy)
	}

	pub async fn data_connection(
		&self,
		subject: &Subject,
		data_connection_id: &DataConnectionId,
		action: DataConnectionAction,
		policy: ExistencePolicy,
	) -> Result<DataConnection, AuthzError> {
		let fetched = self.store.fetch_data_connection(data_connection_id).await?;
		authorize_fetched(subject, fetched, Action::DataConnection(action), policy)
	}

	/// Authorize and store a new account.
	#[instrument(level = "debug", skip_all, fields(account_id = %account.account_id))]
	pub async fn create_account(&self, subject: &Subject, account: Account) -> Result<(), AuthzError> {
		authorize(
			subject,
			&Resource::Account(account.clone()),
			Action::Account(AccountAction::Create),
		)?;
		self.store.create_account(account).await
	}

	/// Authorize and store a new repository.
	pub async fn create_repository(
		&self,
		subject: &Subject,
		repository: Repository,
	) -> Result<(), AuthzError> {
		authorize(
			subject,
			&Resource::Repository(repository.clone()),
			Action::Repository(RepositoryAction::Create),
		)?;
		self.store.create_repository(repository).await
	}

	/// Authorize and store an invitation.
	pub async fn invite(&self, subject: &Subject, membership: Membership) -> Result<(), AuthzError> {
		authorize(
			subject,
			&Resource::Membership(membership.clone()),
			Action::Membership(MembershipAction::Invite),
		)?;
		self.store.create_membership(membership).await
	}

	/// Authorize a lifecycle transition against the current snapshot and
	/// apply it.
	///
	/// Authorization runs before the state machine, so a subject without
	/// rights never learns whether the transition would have been legal.
	#[instrument(level = "debug", skip(self, subject), fields(subject = %subject.label()))]
	pub async fn transition_membership(
		&self,
		subject: &Subject,
		membership_id: MembershipId,
		transition: MembershipTransition,
		at: DateTime<Utc>,
	) -> Result<Membership, AuthzError> {
		let current = self.store.fetch_membership(membership_id).await?;
		authorize_fetched(
			subject,
			current,
			transition_action(transition),
			ExistencePolicy::Concealed,
		)?;
		let updated = self
			.store
			.transition_membership(membership_id, transition, at)
			.await?;
		debug!(state = %updated.state, "membership updated");
		Ok(updated)
	}

	/// Authorize and store a new API key.
	pub async fn create_api_key(&self, subject: &Subject, api_key: StoredApiKey) -> Result<(), AuthzError> {
		authorize(
			subject,
			&Resource::ApiKey(api_key.key.clone()),
			Action::ApiKey(ApiKeyAction::Create),
		)?;
		self.store.create_api_key(api_key).await
	}

	/// Service-to-service key lookup, authorized by the shared secret only.
	///
	/// The header is checked before the store is touched.
	pub async fn introspect_api_key(
		&self,
		presented: Option<&str>,
		access_key_id: &AccessKeyId,
	) -> Result<ApiKey, AuthzError> {
		self.introspection.check(presented)?;
		let stored = self.store.fetch_api_key(access_key_id).await?;
		let key = stored.map(|s| s.key);
		self.introspection
			.introspect(presented, key.as_ref())
			.cloned()
	}
}
