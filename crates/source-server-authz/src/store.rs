// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource storage boundary.
//!
//! [`ResourceStore`] is what the rest of the system implements over its real
//! database. Reads return `Ok(None)` for absent records; writes that would
//! break a uniqueness or lifecycle invariant return
//! [`AuthzError::Conflict`], never a denial. Writes are expected to be
//! preceded by a `decide` call (see [`crate::gate::Gate`]).
//!
//! [`MemoryStore`] is an in-process implementation used by tests and the CLI.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::abac::AccountSubject;
use crate::account::Account;
use crate::credentials::StoredApiKey;
use crate::data_connection::DataConnection;
use crate::error::AuthzError;
use crate::membership::{Membership, MembershipTransition};
use crate::repository::Repository;
use crate::types::{
	AccessKeyId, AccountId, AccountType, DataConnectionId, MembershipId, RepositoryId,
};

#[async_trait]
pub trait ResourceStore: Send + Sync {
	async fn fetch_account(&self, account_id: &AccountId) -> Result<Option<Account>, AuthzError>;

	async fn fetch_repository(
		&self,
		account_id: &AccountId,
		repository_id: &RepositoryId,
	) -> Result<Option<Repository>, AuthzError>;

	async fn fetch_membership(
		&self,
		membership_id: MembershipId,
	) -> Result<Option<Membership>, AuthzError>;

	async fn fetch_api_key(
		&self,
		access_key_id: &AccessKeyId,
	) -> Result<Option<StoredApiKey>, AuthzError>;

	async fn fetch_data_connection(
		&self,
		data_connection_id: &DataConnectionId,
	) -> Result<Option<DataConnection>, AuthzError>;

	/// All memberships held by `account_id`, in any state.
	async fn memberships_for(&self, account_id: &AccountId) -> Result<Vec<Membership>, AuthzError>;

	async fn create_account(&self, account: Account) -> Result<(), AuthzError>;

	async fn create_repository(&self, repository: Repository) -> Result<(), AuthzError>;

	async fn create_membership(&self, membership: Membership) -> Result<(), AuthzError>;

	/// Apply a lifecycle transition and return the updated membership.
	async fn transition_membership(
		&self,
		membership_id: MembershipId,
		transition: MembershipTransition,
		at: DateTime<Utc>,
	) -> Result<Membership, AuthzError>;

	async fn create_api_key(&self, api_key: StoredApiKey) -> Result<(), AuthzError>;

	/// Insert or replace a data connection.
	async fn put_data_connection(&self, connection: DataConnection) -> Result<(), AuthzError>;

	/// Load an account together with its memberships.
	async fn account_subject(
		&self,
		account_id: &AccountId,
	) -> Result<Option<AccountSubject>, AuthzError> {
		let Some(account) = self.fetch_account(account_id).await? else {
			return Ok(None);
		};
		let memberships = self.memberships_for(account_id).await?;
		Ok(Some(AccountSubject {
			account,
			memberships,
		}))
	}
}

#[derive(Debug, Default)]
struct Tables {
	accounts: HashMap<AccountId, Account>,
	repositories: HashMap<(AccountId, RepositoryId), Repository>,
	memberships: HashMap<MembershipId, Membership>,
	api_keys: HashMap<AccessKeyId, StoredApiKey>,
	data_connections: HashMap<DataConnectionId, DataConnection>,
}

/// In-memory [`ResourceStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: RwLock<Tables>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

fn conflict(message: impl Into<String>) -> AuthzError {
	AuthzError::Conflict(message.into())
}

#[async_trait]
impl ResourceStore for MemoryStore {
	async fn fetch_account(&self, account_id: &AccountId) -> Result<Option<Account>, AuthzError> {
		Ok(self.tables.read().await.accounts.get(account_id).cloned())
	}

	async fn fetch_repository(
		&self,
		account_id: &AccountId,
		repository_id: &RepositoryId,
	) -> Result<Option<Repository>, AuthzError> {
		let key = (account_id.clone(), repository_id.clone());
		Ok(self.tables.read().await.repositories.get(&key).cloned())
	}

	async fn fetch_membership(
		&self,
		membership_id: MembershipId,
	) -> Result<Option<Membership>, AuthzError> {
		Ok(self.tables.read().await.memberships.get(&membership_id).cloned())
	}

	async fn fetch_api_key(
		&self,
		access_key_id: &AccessKeyId,
	) -> Result<Option<StoredApiKey>, AuthzError> {
		Ok(self.tables.read().await.api_keys.get(access_key_id).cloned())
	}

	async fn fetch_data_connection(
		&self,
		data_connection_id: &DataConnectionId,
	) -> Result<Option<DataConnection>, AuthzError> {
		Ok(self
			.tables
			.read()
			.await
			.data_connections
			.get(data_connection_id)
			.cloned())
	}

	async fn memberships_for(&self, account_id: &AccountId) -> Result<Vec<Membership>, AuthzError> {
		let tables = self.tables.read().await;
		let mut memberships: Vec<Membership> = tables
			.memberships
			.values()
			.filter(|m| &m.account_id == account_id)
			.cloned()
			.collect();
		memberships.sort_by_key(|m| m.state_changed_at);
		Ok(memberships)
	}

	#[instrument(level = "debug", skip(self, account), fields(account_id = %account.account_id))]
	async fn create_account(&self, account: Account) -> Result<(), AuthzError> {
		let mut tables = self.tables.write().await;

		if tables.accounts.contains_key(&account.account_id) {
			return Err(conflict(format!("account {} already exists", account.account_id)));
		}

		match (account.account_type, account.identity_id) {
			(AccountType::Individual, None) => {
				return Err(conflict("individual account must be bound to an identity"));
			}
			(AccountType::Individual, Some(identity_id)) => {
				let taken = tables.accounts.values().any(|a| {
					a.account_type == AccountType::Individual && a.identity_id == Some(identity_id)
				});
				if taken {
					return Err(conflict("identity already has an individual account"));
				}
			}
			(AccountType::Organization, Some(_)) => {
				return Err(conflict("organization account cannot be bound to an identity"));
			}
			(AccountType::Organization, None) => {}
		}

		debug!("account created");
		tables.accounts.insert(account.account_id.clone(), account);
		Ok(())
	}

	#[instrument(
		level = "debug",
		skip(self, repository),
		fields(account_id = %repository.account_id, repository_id = %repository.repository_id)
	)]
	async fn create_repository(&self, repository: Repository) -> Result<(), AuthzError> {
		let mut tables = self.tables.write().await;

		if !tables.accounts.contains_key(&repository.account_id) {
			return Err(AuthzError::NotFound);
		}

		let key = (repository.account_id.clone(), repository.repository_id.clone());
		if tables.repositories.contains_key(&key) {
			return Err(conflict(format!(
				"repository {}/{} already exists",
				repository.account_id, repository.repository_id
			)));
		}

		debug!("repository created");
		tables.repositories.insert(key, repository);
		Ok(())
	}

	#[instrument(level = "debug", skip(self, membership), fields(membership_id = %membership.membership_id))]
	async fn create_membership(&self, membership: Membership) -> Result<(), AuthzError> {
		let mut tables = self.tables.write().await;

		if tables.memberships.contains_key(&membership.membership_id) {
			return Err(conflict("membership already exists"));
		}

		match tables.accounts.get(&membership.organization_account_id) {
			None => return Err(AuthzError::NotFound),
			Some(org) if !org.is_organization() => {
				return Err(conflict("memberships can only target organizations"));
			}
			Some(_) => {}
		}
		if !tables.accounts.contains_key(&membership.account_id) {
			return Err(AuthzError::NotFound);
		}
		if let Some(repository_id) = &membership.repository_id {
			let key = (membership.organization_account_id.clone(), repository_id.clone());
			if !tables.repositories.contains_key(&key) {
				return Err(AuthzError::NotFound);
			}
		}

		let duplicate = tables.memberships.values().any(|m| {
			m.account_id == membership.account_id
				&& m.organization_account_id == membership.organization_account_id
				&& m.repository_id == membership.repository_id
				&& !m.state.is_terminal()
		});
		if duplicate {
			return Err(conflict("account already has a membership on this scope"));
		}

		debug!(state = %membership.state, role = %membership.role, "membership created");
		tables
			.memberships
			.insert(membership.membership_id, membership);
		Ok(())
	}

	#[instrument(level = "debug", skip(self))]
	async fn transition_membership(
		&self,
		membership_id: MembershipId,
		transition: MembershipTransition,
		at: DateTime<Utc>,
	) -> Result<Membership, AuthzError> {
		let mut tables = self.tables.write().await;

		let current = tables
			.memberships
			.get(&membership_id)
			.ok_or(AuthzError::NotFound)?;
		let next = current.apply(transition, at)?;

		debug!(from = %current.state, to = %next.state, "membership transitioned");
		tables.memberships.insert(membership_id, next.clone());
		Ok(next)
	}

	#[instrument(level = "debug", skip(self, api_key), fields(access_key_id = %api_key.key.access_key_id))]
	async fn create_api_key(&self, api_key: StoredApiKey) -> Result<(), AuthzError> {
		let mut tables = self.tables.write().await;

		if tables.api_keys.contains_key(&api_key.key.access_key_id) {
			return Err(conflict("access key id already exists"));
		}
		if !tables.accounts.contains_key(&api_key.key.account_id) {
			return Err(AuthzError::NotFound);
		}

		debug!("api key created");
		tables
			.api_keys
			.insert(api_key.key.access_key_id.clone(), api_key);
		Ok(())
	}

	async fn put_data_connection(&self, connection: DataConnection) -> Result<(), AuthzError> {
		self.tables
			.write()
			.await
			.data_connections
			.insert(connection.data_connection_id.clone(), connection);
		Ok(())
	}
}
