// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core identifier and enum types shared by the resource snapshots and the
//! decision engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Minimum length of an account or repository identifier.
pub const MIN_ID_LENGTH: usize = 3;
/// Maximum length of an account or repository identifier.
pub const MAX_ID_LENGTH: usize = 40;

/// Access key ids always start with this prefix.
pub const ACCESS_KEY_ID_PREFIX: &str = "SC";
const MIN_ACCESS_KEY_ID_LENGTH: usize = 2;
const MAX_ACCESS_KEY_ID_LENGTH: usize = 24;

/// Identifier validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
	#[error("{kind} must be between {min} and {max} characters")]
	Length {
		kind: &'static str,
		min: usize,
		max: usize,
	},

	#[error("{kind} contains invalid characters")]
	Format { kind: &'static str },
}

// =============================================================================
// Slug identifiers
// =============================================================================

fn validate_slug(kind: &'static str, value: &str) -> Result<String, IdError> {
	let value = value.to_ascii_lowercase();

	if value.len() < MIN_ID_LENGTH || value.len() > MAX_ID_LENGTH {
		return Err(IdError::Length {
			kind,
			min: MIN_ID_LENGTH,
			max: MAX_ID_LENGTH,
		});
	}

	let bytes = value.as_bytes();
	let valid_chars = bytes
		.iter()
		.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-');
	let edges_alnum = bytes
		.first()
		.zip(bytes.last())
		.is_some_and(|(f, l)| f.is_ascii_alphanumeric() && l.is_ascii_alphanumeric());

	if !valid_chars || !edges_alnum || value.contains("--") {
		return Err(IdError::Format { kind });
	}

	Ok(value)
}

macro_rules! define_slug_type {
	($name:ident, $kind:expr, $doc:expr) => {
		#[doc = $doc]
		///
		/// Lowercase ASCII letters, digits and single hyphens; 3 to 40
		/// characters; starts and ends with a letter or digit. Input is
		/// normalized to lowercase.
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);

		impl $name {
			/// Parse and normalize an identifier.
			pub fn parse(value: &str) -> Result<Self, IdError> {
				validate_slug($kind, value).map(Self)
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl FromStr for $name {
			type Err = IdError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::parse(s)
			}
		}

		impl TryFrom<String> for $name {
			type Error = IdError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::parse(&value)
			}
		}

		impl From<$name> for String {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_slug_type!(AccountId, "account id", "Unique identifier for an account.");
define_slug_type!(
	RepositoryId,
	"repository id",
	"Identifier of a repository, unique within its owning account."
);
define_slug_type!(
	DataConnectionId,
	"data connection id",
	"Unique identifier for a data connection."
);

// =============================================================================
// Access key identifiers
// =============================================================================

/// Public half of an API key credential, e.g. `SCABCDEF0123456789`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKeyId(String);

impl AccessKeyId {
	pub fn parse(value: &str) -> Result<Self, IdError> {
		const KIND: &str = "access key id";

		if value.len() < MIN_ACCESS_KEY_ID_LENGTH || value.len() > MAX_ACCESS_KEY_ID_LENGTH {
			return Err(IdError::Length {
				kind: KIND,
				min: MIN_ACCESS_KEY_ID_LENGTH,
				max: MAX_ACCESS_KEY_ID_LENGTH,
			});
		}
		let uppercase_alnum = value
			.bytes()
			.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
		if !value.starts_with(ACCESS_KEY_ID_PREFIX) || !uppercase_alnum {
			return Err(IdError::Format { kind: KIND });
		}

		Ok(Self(value.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AccessKeyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<String> for AccessKeyId {
	type Error = IdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<AccessKeyId> for String {
	fn from(id: AccessKeyId) -> Self {
		id.0
	}
}

// =============================================================================
// UUID identifiers
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}
	};
}

define_id_type!(MembershipId, "Unique identifier for a membership.");
define_id_type!(
	IdentityId,
	"Identifier of a verified identity from the external identity provider."
);

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
	Individual,
	Organization,
}

impl fmt::Display for AccountType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AccountType::Individual => write!(f, "individual"),
			AccountType::Organization => write!(f, "organization"),
		}
	}
}

/// Account-level capability grants, independent of any organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountFlag {
	/// Full platform access.
	Admin,
	CreateRepositories,
	CreateOrganizations,
}

impl AccountFlag {
	pub fn all() -> &'static [AccountFlag] {
		&[
			AccountFlag::Admin,
			AccountFlag::CreateRepositories,
			AccountFlag::CreateOrganizations,
		]
	}
}

impl fmt::Display for AccountFlag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AccountFlag::Admin => write!(f, "admin"),
			AccountFlag::CreateRepositories => write!(f, "create_repositories"),
			AccountFlag::CreateOrganizations => write!(f, "create_organizations"),
		}
	}
}

// =============================================================================
// Membership roles and states
// =============================================================================

/// Privilege level within a membership.
///
/// Variants are declared lowest first so the derived `Ord` is the privilege
/// order: `ReadData < WriteData < Maintainer < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MembershipRole {
	#[serde(rename = "read_data")]
	ReadData,
	#[serde(rename = "write_data")]
	WriteData,
	#[serde(rename = "maintainers")]
	Maintainer,
	#[serde(rename = "owners")]
	Owner,
}

impl MembershipRole {
	/// All roles, lowest privilege first.
	pub fn all() -> &'static [MembershipRole] {
		&[
			MembershipRole::ReadData,
			MembershipRole::WriteData,
			MembershipRole::Maintainer,
			MembershipRole::Owner,
		]
	}

	/// Returns true if this role has at least the permissions of the given role.
	pub fn has_permission_of(&self, other: &MembershipRole) -> bool {
		self >= other
	}
}

impl fmt::Display for MembershipRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MembershipRole::ReadData => write!(f, "read_data"),
			MembershipRole::WriteData => write!(f, "write_data"),
			MembershipRole::Maintainer => write!(f, "maintainers"),
			MembershipRole::Owner => write!(f, "owners"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
	Invited,
	Requested,
	Member,
	Revoked,
	Rejected,
}

impl MembershipState {
	pub fn all() -> &'static [MembershipState] {
		&[
			MembershipState::Invited,
			MembershipState::Requested,
			MembershipState::Member,
			MembershipState::Revoked,
			MembershipState::Rejected,
		]
	}

	/// Awaiting acceptance or rejection.
	pub fn is_pending(&self) -> bool {
		matches!(self, MembershipState::Invited | MembershipState::Requested)
	}

	/// No transitions out; a new membership must be created instead.
	pub fn is_terminal(&self) -> bool {
		matches!(self, MembershipState::Revoked | MembershipState::Rejected)
	}

	/// Only members carry privilege.
	pub fn grants_privilege(&self) -> bool {
		matches!(self, MembershipState::Member)
	}
}

impl fmt::Display for MembershipState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MembershipState::Invited => write!(f, "invited"),
			MembershipState::Requested => write!(f, "requested"),
			MembershipState::Member => write!(f, "member"),
			MembershipState::Revoked => write!(f, "revoked"),
			MembershipState::Rejected => write!(f, "rejected"),
		}
	}
}

// =============================================================================
// Visibility
// =============================================================================

/// Repository read exposure. Never affects write access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
	Public,
	/// Reachable by direct link only; authorized like `Private`.
	Unlisted,
	#[default]
	Private,
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Visibility::Public => write!(f, "public"),
			Visibility::Unlisted => write!(f, "unlisted"),
			Visibility::Private => write!(f, "private"),
		}
	}
}
