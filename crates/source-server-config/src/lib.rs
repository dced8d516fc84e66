// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the authorization service.
//!
//! Sources, lowest to highest precedence:
//! - Built-in defaults
//! - TOML file (`/etc/source/authz.toml`, or an explicit path)
//! - Environment (`SOURCE_AUTHZ_*`)
//!
//! The introspection shared secret only ever comes from the environment
//! (`SOURCE_AUTHZ_INTROSPECTION_SECRET` or `SOURCE_AUTHZ_INTROSPECTION_SECRET_FILE`).
//!
//! ```ignore
//! use source_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("introspection enabled: {}", config.introspection.enabled);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::AuthzConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use source_common_config::SecretString;
use tracing::{debug, info};

/// Environment variable holding the introspection shared secret.
pub const INTROSPECTION_SECRET_ENV: &str = "SOURCE_AUTHZ_INTROSPECTION_SECRET";

/// Fully resolved service configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthzConfig {
	pub logging: LoggingConfig,
	pub introspection: IntrospectionConfig,
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<AuthzConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<AuthzConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<AuthzConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<AuthzConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = AuthzConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let secret = source_common_config::load_secret_env(INTROSPECTION_SECRET_ENV)
		.map_err(|e| ConfigError::Secret(e.to_string()))?;

	finalize(merged, secret)
}

/// Finalize a merged layer into resolved config.
pub fn finalize(
	layer: AuthzConfigLayer,
	introspection_secret: Option<SecretString>,
) -> Result<AuthzConfig, ConfigError> {
	let logging = layer.logging.unwrap_or_default().finalize();
	let introspection = layer
		.introspection
		.unwrap_or_default()
		.finalize(introspection_secret);

	validate_config(&introspection)?;

	info!(
		log_level = %logging.level,
		log_json = logging.json,
		introspection_enabled = introspection.enabled,
		introspection_header = %introspection.header,
		introspection_secret_configured = introspection.secret.is_some(),
		"Authorization configuration loaded"
	);

	Ok(AuthzConfig {
		logging,
		introspection,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(introspection: &IntrospectionConfig) -> Result<(), ConfigError> {
	if introspection.enabled && introspection.secret.is_none() {
		return Err(ConfigError::Validation(format!(
			"introspection is enabled but {INTROSPECTION_SECRET_ENV} is not set"
		)));
	}
	if introspection.header.trim().is_empty() {
		return Err(ConfigError::InvalidValue {
			key: "introspection.header".to_string(),
			message: "header name must not be empty".to_string(),
		});
	}
	Ok(())
}
