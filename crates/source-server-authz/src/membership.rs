// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership snapshots and the membership lifecycle.
//!
//! ```text
//! Invited/Requested --accept--> Member --revoke--> Revoked
//! Invited/Requested --reject--> Rejected
//! Member --update_role--> Member
//! ```
//!
//! `Revoked` and `Rejected` are terminal. A membership in either state is
//! never reactivated; a new membership record is created instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthzError;
use crate::types::{AccountId, MembershipId, MembershipRole, MembershipState, RepositoryId};

/// Binds an account to an organization, optionally scoped to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
	pub membership_id: MembershipId,
	/// The member.
	pub account_id: AccountId,
	pub organization_account_id: AccountId,
	/// `None` for organization-wide memberships.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub repository_id: Option<RepositoryId>,
	pub role: MembershipRole,
	pub state: MembershipState,
	pub state_changed_at: DateTime<Utc>,
}

impl Membership {
	pub fn new(
		account_id: AccountId,
		organization_account_id: AccountId,
		repository_id: Option<RepositoryId>,
		role: MembershipRole,
		state: MembershipState,
	) -> Self {
		Self {
			membership_id: MembershipId::generate(),
			account_id,
			organization_account_id,
			repository_id,
			role,
			state,
			state_changed_at: Utc::now(),
		}
	}

	pub fn is_organization_wide(&self) -> bool {
		self.repository_id.is_none()
	}

	/// Whether this membership covers the scope `(organization, repository)`.
	///
	/// Organization-wide memberships cover every repository of the
	/// organization. Repository-scoped memberships only cover their own
	/// repository and never the organization itself.
	pub fn applies_to(&self, organization: &AccountId, repository: Option<&RepositoryId>) -> bool {
		if &self.organization_account_id != organization {
			return false;
		}
		match (&self.repository_id, repository) {
			(None, _) => true,
			(Some(scoped), Some(target)) => scoped == target,
			(Some(_), None) => false,
		}
	}

	/// Apply a lifecycle transition, returning the updated membership.
	pub fn apply(
		&self,
		transition: MembershipTransition,
		at: DateTime<Utc>,
	) -> Result<Membership, AuthzError> {
		let state = self.state.transition(transition)?;
		let mut next = self.clone();
		next.state = state;
		if let MembershipTransition::UpdateRole(role) = transition {
			next.role = role;
		}
		next.state_changed_at = at;
		Ok(next)
	}
}

/// A requested change to a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTransition {
	Accept,
	Reject,
	Revoke,
	UpdateRole(MembershipRole),
}

impl MembershipState {
	/// The state reached by applying `transition`, or `Conflict` if the
	/// transition is not allowed from this state.
	pub fn transition(self, transition: MembershipTransition) -> Result<MembershipState, AuthzError> {
		use MembershipState::*;
		use MembershipTransition as T;

		match (self, transition) {
			(Invited | Requested, T::Accept) => Ok(Member),
			(Invited | Requested, T::Reject) => Ok(Rejected),
			(Member, T::Revoke) => Ok(Revoked),
			(Member, T::UpdateRole(_)) => Ok(Member),
			(state, transition) => Err(AuthzError::Conflict(format!(
				"membership in state {state} cannot {transition:?}"
			))),
		}
	}
}
