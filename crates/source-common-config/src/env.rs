// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers for loading secrets.
//!
//! Secrets may be provided directly (`VAR`) or through a mounted file
//! (`VAR_FILE`), the convention used by Docker and Kubernetes secrets.

use std::path::PathBuf;
use std::{env, fs};

use source_common_secret::SecretString;
use thiserror::Error;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	/// Failed to read the secret file.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The secret file path was empty.
	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from the environment using the `VAR` / `VAR_FILE` convention.
///
/// `{var}_FILE` wins over `{var}`. A single trailing newline is stripped from
/// file contents. Empty direct values are treated as unset so that an empty
/// shared secret can never be configured by accident.
///
/// ```no_run
/// use source_common_config::load_secret_env;
///
/// let secret = load_secret_env("SOURCE_AUTHZ_INTROSPECTION_SECRET")?;
/// if let Some(secret) = secret {
///     println!("secret configured: {secret}"); // prints "[REDACTED]"
/// }
/// # Ok::<(), source_common_config::SecretEnvError>(())
/// ```
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		if secret.is_empty() {
			return Ok(None);
		}
		return Ok(Some(SecretString::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// Each test uses its own variable names; the process environment is shared
	// between test threads.

	#[test]
	fn unset_variable_is_none() {
		let result = load_secret_env("SOURCE_TEST_SECRET_UNSET").unwrap();
		assert!(result.is_none());
	}

	#[test]
	fn direct_value_is_loaded() {
		env::set_var("SOURCE_TEST_SECRET_DIRECT", "s3cr3t");
		let result = load_secret_env("SOURCE_TEST_SECRET_DIRECT").unwrap();
		assert_eq!(result.unwrap().expose(), "s3cr3t");
	}

	#[test]
	fn empty_direct_value_is_none() {
		env::set_var("SOURCE_TEST_SECRET_EMPTY", "");
		let result = load_secret_env("SOURCE_TEST_SECRET_EMPTY").unwrap();
		assert!(result.is_none());
	}

	#[test]
	fn file_value_wins_and_trailing_newline_is_stripped() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var("SOURCE_TEST_SECRET_FILE_WINS", "from-env");
		env::set_var(
			"SOURCE_TEST_SECRET_FILE_WINS_FILE",
			file.path().to_str().unwrap(),
		);

		let result = load_secret_env("SOURCE_TEST_SECRET_FILE_WINS").unwrap();
		assert_eq!(result.unwrap().expose(), "from-file");
	}

	#[test]
	fn empty_file_path_is_an_error() {
		env::set_var("SOURCE_TEST_SECRET_EMPTY_PATH_FILE", "");
		let err = load_secret_env("SOURCE_TEST_SECRET_EMPTY_PATH").unwrap_err();
		assert!(matches!(err, SecretEnvError::EmptyPath { .. }));
	}

	#[test]
	fn missing_file_is_an_error() {
		env::set_var(
			"SOURCE_TEST_SECRET_MISSING_FILE",
			"/nonexistent/source-authz/secret",
		);
		let err = load_secret_env("SOURCE_TEST_SECRET_MISSING").unwrap_err();
		assert!(matches!(err, SecretEnvError::Io { .. }));
	}
}
