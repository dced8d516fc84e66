// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization error types.

use thiserror::Error;

use crate::abac::ResourceType;
use crate::types::IdError;

/// Errors surfaced by the decision engine and its collaborators.
///
/// Messages never say *why* a request was denied.
#[derive(Debug, Error)]
pub enum AuthzError {
	/// Policy says no.
	#[error("access denied")]
	Denied,

	/// Missing, malformed or rejected credentials.
	#[error("authentication required")]
	Unauthenticated,

	#[error("not found")]
	NotFound,

	/// Uniqueness or state machine violation.
	#[error("conflict: {0}")]
	Conflict(String),

	/// An action was evaluated against a resource of the wrong type. This is
	/// a caller defect, not a security event.
	#[error("action {action} cannot be applied to a {resource_type} resource")]
	Misuse {
		action: &'static str,
		resource_type: ResourceType,
	},

	#[error(transparent)]
	InvalidIdentifier(#[from] IdError),

	#[error("storage error: {0}")]
	Storage(String),
}

impl AuthzError {
	/// HTTP-equivalent status code for the error.
	pub fn status_code(&self) -> u16 {
		match self {
			AuthzError::Denied => 403,
			AuthzError::Unauthenticated => 401,
			AuthzError::NotFound => 404,
			AuthzError::Conflict(_) => 409,
			AuthzError::InvalidIdentifier(_) => 400,
			AuthzError::Misuse { .. } | AuthzError::Storage(_) => 500,
		}
	}

	/// Internal errors indicate a bug or an infrastructure fault rather than
	/// a decision about the caller.
	pub fn is_internal(&self) -> bool {
		matches!(self, AuthzError::Misuse { .. } | AuthzError::Storage(_))
	}
}

pub type Result<T> = std::result::Result<T, AuthzError>;
