// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API key access policies.
//!
//! Keys are managed by their owning account or by maintainers of the key's
//! scope. The shared-secret introspection path lives in
//! [`crate::introspection`] and does not go through here.

use crate::abac::{AccountSubject, ApiKeyAction};
use crate::api_key::ApiKey;
use crate::types::MembershipRole;

pub fn evaluate(subject: &AccountSubject, action: ApiKeyAction, api_key: &ApiKey) -> bool {
	let manages = subject.has_role(
		&api_key.account_id,
		api_key.repository_id.as_ref(),
		MembershipRole::Maintainer,
	);

	match action {
		ApiKeyAction::Create => manages,
		ApiKeyAction::Get | ApiKeyAction::Revoke => !api_key.disabled && manages,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abac::policies::fixtures::*;
	use crate::types::AccessKeyId;
	use chrono::{Duration, Utc};

	fn key(owner: &str, repo: Option<&str>) -> ApiKey {
		ApiKey {
			access_key_id: AccessKeyId::parse("SCTESTKEY").unwrap(),
			account_id: account_id(owner),
			repository_id: repo.map(repository_id),
			name: "ci".to_string(),
			disabled: false,
			expires_at: Utc::now() + Duration::days(30),
		}
	}

	#[test]
	fn owner_manages_own_keys() {
		let subject = user("alice");
		for action in [ApiKeyAction::Create, ApiKeyAction::Get, ApiKeyAction::Revoke] {
			assert!(evaluate(&subject, action, &key("alice", None)));
		}
	}

	#[test]
	fn other_accounts_cannot_manage() {
		let subject = user("bob");
		assert!(!evaluate(&subject, ApiKeyAction::Revoke, &key("alice", None)));
		assert!(!evaluate(&subject, ApiKeyAction::Create, &key("alice", None)));
	}

	#[test]
	fn repository_maintainer_manages_repository_keys() {
		let subject = user_with_role("bob", "acme", Some("landsat"), MembershipRole::Maintainer);
		assert!(evaluate(&subject, ApiKeyAction::Revoke, &key("acme", Some("landsat"))));
		assert!(!evaluate(&subject, ApiKeyAction::Revoke, &key("acme", Some("sentinel"))));
		assert!(!evaluate(&subject, ApiKeyAction::Revoke, &key("acme", None)));
	}

	#[test]
	fn organization_maintainer_manages_organization_keys() {
		let subject = user_with_role("bob", "acme", None, MembershipRole::Maintainer);
		assert!(evaluate(&subject, ApiKeyAction::Create, &key("acme", None)));
		assert!(evaluate(&subject, ApiKeyAction::Revoke, &key("acme", Some("landsat"))));
	}

	#[test]
	fn write_data_cannot_manage_keys() {
		let subject = user_with_role("bob", "acme", None, MembershipRole::WriteData);
		assert!(!evaluate(&subject, ApiKeyAction::Create, &key("acme", None)));
	}

	#[test]
	fn disabled_keys_are_hidden() {
		let mut k = key("alice", None);
		k.disabled = true;
		assert!(!evaluate(&user("alice"), ApiKeyAction::Get, &k));
		assert!(!evaluate(&user("alice"), ApiKeyAction::Revoke, &k));
	}
}
