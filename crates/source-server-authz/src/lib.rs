// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization for the Source data platform.
//!
//! This crate provides:
//! - Typed identifiers and resource snapshots (accounts, repositories,
//!   memberships, API keys, data connections)
//! - The membership lifecycle state machine
//! - A pure ABAC decision engine ([`abac::decide`])
//! - API key credential parsing and resolution
//! - Shared-secret gated API key introspection
//! - A storage boundary ([`store::ResourceStore`]) and fetch-then-decide
//!   helpers ([`gate::Gate`])
//!
//! # Security Considerations
//!
//! - Secret access keys are stored as SHA-256 hashes and compared in constant time
//! - Secrets use [`source_common_secret::SecretString`] so they never reach logs
//! - Anything not explicitly allowed by a policy is denied

pub mod abac;
pub mod account;
pub mod api_key;
pub mod credentials;
pub mod data_connection;
pub mod error;
pub mod gate;
pub mod introspection;
pub mod membership;
pub mod repository;
pub mod store;
pub mod types;

pub use abac::{
	authorize, decide, decide_or_deny, denial_for, AccountSubject, Action, ApiKeySubject, Decision,
	DecisionRequest, DecisionResponse, Resource, ResourceType, Subject,
};
pub use account::Account;
pub use api_key::ApiKey;
pub use credentials::{
	hash_secret_access_key, parse_api_key_authorization, resolve_api_key_subject,
	ApiKeyCredentials, StoredApiKey, SECRET_ACCESS_KEY_LENGTH,
};
pub use data_connection::DataConnection;
pub use error::{AuthzError, Result};
pub use gate::{authorize_fetched, ExistencePolicy, Gate};
pub use introspection::IntrospectionGate;
pub use membership::{Membership, MembershipTransition};
pub use repository::Repository;
pub use store::{MemoryStore, ResourceStore};
pub use types::{
	AccessKeyId, AccountFlag, AccountId, AccountType, DataConnectionId, IdError, IdentityId,
	MembershipId, MembershipRole, MembershipState, RepositoryId, Visibility,
};
