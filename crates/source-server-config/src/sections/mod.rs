// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

pub mod introspection;
pub mod logging;

pub use introspection::{IntrospectionConfig, IntrospectionConfigLayer, DEFAULT_INTROSPECTION_HEADER};
pub use logging::{LoggingConfig, LoggingConfigLayer};
