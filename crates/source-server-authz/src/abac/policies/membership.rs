// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership access policies.
//!
//! The requester's role is taken on the membership's own scope: the
//! organization, or the organization plus repository for repository-scoped
//! memberships. A requester can never grant, revoke or assign a role above
//! its own.

use crate::abac::{AccountSubject, MembershipAction};
use crate::membership::Membership;
use crate::types::{MembershipRole, MembershipState};

pub fn evaluate(subject: &AccountSubject, action: MembershipAction, membership: &Membership) -> bool {
	let is_own = subject.owns(&membership.account_id);
	let requester = subject.role_for(
		&membership.organization_account_id,
		membership.repository_id.as_ref(),
	);
	let manages = |target: MembershipRole| {
		requester.is_some_and(|r| r >= MembershipRole::Maintainer && r >= target)
	};

	match action {
		MembershipAction::Invite => {
			membership.state == MembershipState::Invited && manages(membership.role)
		}
		MembershipAction::Accept | MembershipAction::Reject => {
			is_own && membership.state.is_pending()
		}
		MembershipAction::Revoke => {
			membership.state == MembershipState::Member && (is_own || manages(membership.role))
		}
		MembershipAction::UpdateRole { role } => {
			membership.state == MembershipState::Member
				&& requester.is_some_and(|r| r >= MembershipRole::Owner && role <= r)
		}
		MembershipAction::Get => {
			is_own
				|| requester.is_some_and(|r| r >= MembershipRole::Maintainer)
				|| membership.state == MembershipState::Member
		}
	}
}
