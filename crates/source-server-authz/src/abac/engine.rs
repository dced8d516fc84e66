// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy evaluation engine.
//!
//! [`decide`] is the single entry point. Evaluation order:
//!
//! 1. **Type check**: an action applied to the wrong resource type is a
//!    caller bug and returns [`AuthzError::Misuse`]
//! 2. **Unauthenticated subjects**: anonymous callers and bare identities
//!    only get public reads (plus creating the identity's own account)
//! 3. **API keys**: reduced to the owning account's authority, bounded by the
//!    key's state, expiry and repository scope
//! 4. **Disabled accounts**: denied everything
//! 5. **Admin override**: admins are allowed everything
//! 6. **Self access**: an account may always read itself and edit its profile
//! 7. **Resource policy**: delegated to [`super::policies`]
//!
//! Anything not explicitly allowed is denied.

use tracing::{debug, error, instrument};

use super::policies::{account, api_key, data_connection, membership, repository};
use super::types::{
	AccountAction, AccountSubject, Action, DataConnectionAction, Decision, RepositoryAction,
	Resource, Subject,
};
use crate::error::AuthzError;
use crate::types::{AccountType, IdentityId};

/// Decides whether `subject` may perform `action` on `resource`.
///
/// Denial is an ordinary `Ok(Decision::Deny)`. The only error is
/// [`AuthzError::Misuse`], returned when `action` belongs to a different
/// resource type than `resource`.
///
/// The function is pure: no I/O, no shared state, safe to call from any
/// number of threads.
#[instrument(
	level = "debug",
	skip(subject, resource),
	fields(
		subject = %subject.label(),
		action = action.as_str(),
		resource_type = %resource.resource_type(),
	)
)]
pub fn decide(subject: &Subject, resource: &Resource, action: Action) -> Result<Decision, AuthzError> {
	check_resource_type(resource, action)?;

	let decision = Decision::from(evaluate(subject, resource, action));
	debug!(%decision, "authorization decision");
	Ok(decision)
}

/// Like [`decide`], but maps a denial to an error suitable for returning to
/// the caller: `Unauthenticated` for anonymous subjects, `Denied` otherwise.
pub fn authorize(subject: &Subject, resource: &Resource, action: Action) -> Result<(), AuthzError> {
	match decide(subject, resource, action)? {
		Decision::Allow => Ok(()),
		Decision::Deny => Err(denial_for(subject)),
	}
}

/// Like [`decide`], but treats misuse as a denial. Misuse is still logged at
/// error level.
pub fn decide_or_deny(subject: &Subject, resource: &Resource, action: Action) -> Decision {
	match decide(subject, resource, action) {
		Ok(decision) => decision,
		Err(e) => {
			error!(error = %e, "authorization check failed, denying");
			Decision::Deny
		}
	}
}

/// The error a denied `subject` should see.
pub fn denial_for(subject: &Subject) -> AuthzError {
	if subject.is_anonymous() {
		AuthzError::Unauthenticated
	} else {
		AuthzError::Denied
	}
}

fn check_resource_type(resource: &Resource, action: Action) -> Result<(), AuthzError> {
	let resource_type = resource.resource_type();
	if action.resource_type() != resource_type {
		error!(
			action = action.as_str(),
			expected = %action.resource_type(),
			actual = %resource_type,
			"action applied to wrong resource type"
		);
		return Err(AuthzError::Misuse {
			action: action.as_str(),
			resource_type,
		});
	}
	Ok(())
}

fn evaluate(subject: &Subject, resource: &Resource, action: Action) -> bool {
	match subject {
		Subject::Anonymous => public_access(resource, action),
		Subject::Identity { identity_id } => {
			public_access(resource, action) || identity_access(identity_id, resource, action)
		}
		Subject::Account(account) => evaluate_account(account, resource, action),
		Subject::ApiKey(key) => match key.authority_for(resource) {
			Some(owner) => evaluate_account(owner, resource, action),
			None => false,
		},
	}
}

/// Actions anyone may perform, signed in or not.
fn public_access(resource: &Resource, action: Action) -> bool {
	match (resource, action) {
		(
			Resource::Repository(repo),
			Action::Repository(RepositoryAction::Get | RepositoryAction::List | RepositoryAction::ReadData),
		) => repo.is_publicly_readable(),
		(Resource::Account(account), Action::Account(AccountAction::GetProfile)) => !account.disabled,
		_ => false,
	}
}

/// A verified identity without an account may create its own individual
/// account and look at unrestricted data connections.
fn identity_access(identity_id: &IdentityId, resource: &Resource, action: Action) -> bool {
	match (resource, action) {
		(Resource::Account(account), Action::Account(AccountAction::Create)) => {
			account.account_type == AccountType::Individual
				&& account.identity_id.as_ref() == Some(identity_id)
				&& !account.disabled
		}
		(Resource::DataConnection(conn), Action::DataConnection(DataConnectionAction::Get)) => {
			!conn.restricted
		}
		_ => false,
	}
}

fn evaluate_account(subject: &AccountSubject, resource: &Resource, action: Action) -> bool {
	if subject.is_disabled() {
		return false;
	}

	if subject.is_admin() {
		return true;
	}

	if self_access(subject, resource, action) {
		return true;
	}

	match (resource, action) {
		(Resource::Account(r), Action::Account(a)) => account::evaluate(subject, a, r),
		(Resource::Repository(r), Action::Repository(a)) => repository::evaluate(subject, a, r),
		(Resource::Membership(r), Action::Membership(a)) => membership::evaluate(subject, a, r),
		(Resource::ApiKey(r), Action::ApiKey(a)) => api_key::evaluate(subject, a, r),
		(Resource::DataConnection(r), Action::DataConnection(a)) => {
			data_connection::evaluate(subject, a, r)
		}
		_ => false,
	}
}

/// Reading one's own account, flags and profile, and editing one's own
/// profile. Never covers writing flags.
fn self_access(subject: &AccountSubject, resource: &Resource, action: Action) -> bool {
	let Resource::Account(account) = resource else {
		return false;
	};
	subject.owns(&account.account_id)
		&& matches!(
			action,
			Action::Account(
				AccountAction::Get
					| AccountAction::GetProfile
					| AccountAction::PutProfile
					| AccountAction::GetFlags
			)
		)
}
