// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based authorization.
//!
//! 1. **Types** ([`types`]): subjects, resource snapshots, the action catalog
//! 2. **Policies** ([`policies`]): one evaluator per resource type
//! 3. **Engine** ([`engine`]): overrides and dispatch
//!
//! ```text
//! decide(subject, resource, action)
//!     │
//!     ├── action/resource type mismatch → Err(Misuse)
//!     ├── Anonymous / Identity → public reads (+ own account creation)
//!     ├── ApiKey → owner's authority, bounded by key scope and expiry
//!     ├── disabled account → Deny
//!     ├── Admin flag → Allow
//!     ├── own account read / profile edit → Allow
//!     └── Route to resource-specific policy:
//!         ├── Account → account::evaluate()
//!         ├── Repository → repository::evaluate()
//!         ├── Membership → membership::evaluate()
//!         ├── ApiKey → api_key::evaluate()
//!         └── DataConnection → data_connection::evaluate()
//! ```
//!
//! # Example
//!
//! ```
//! use source_server_authz::abac::{decide, Action, Decision, RepositoryAction, Resource, Subject};
//! use source_server_authz::{AccountId, Repository, RepositoryId, Visibility};
//!
//! let repository = Repository::new(
//!     AccountId::parse("radiant-earth").unwrap(),
//!     RepositoryId::parse("landsat").unwrap(),
//!     Visibility::Public,
//! );
//!
//! let decision = decide(
//!     &Subject::Anonymous,
//!     &Resource::Repository(repository),
//!     Action::Repository(RepositoryAction::ReadData),
//! )
//! .unwrap();
//! assert_eq!(decision, Decision::Allow);
//! ```

pub mod engine;
pub mod policies;
pub mod types;

pub use engine::*;
pub use types::*;
