// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `source-authz`: evaluate authorization requests from the command line.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use source_server_authz::{decide, DecisionRequest, DecisionResponse, IntrospectionGate};
use source_server_config::{AuthzConfig, LoggingConfig};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Source authorization engine.
#[derive(Parser, Debug)]
#[command(name = "source-authz", about = "Source authorization decision engine", version)]
struct Args {
	/// Configuration file (defaults to /etc/source/authz.toml)
	#[arg(long, global = true, env = "SOURCE_AUTHZ_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Evaluate a JSON decision request and print `{"allow": bool}`
	Decide {
		/// Path to the request, or `-` for stdin
		#[arg(long, default_value = "-")]
		request: String,
	},
	/// Check a presented introspection header against the shared secret
	Introspect {
		/// Header value as presented by the caller
		#[arg(long)]
		header: Option<String>,
	},
	/// Print the resolved configuration (secrets redacted)
	Config,
}

fn main() -> Result<()> {
	let args = Args::parse();

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => source_server_config::load_config_with_file(path.clone()),
		None => source_server_config::load_config(),
	}
	.context("failed to load configuration")?;

	init_tracing(&config.logging);

	match args.command {
		Command::Decide { request } => {
			let input = read_input(&request)?;
			let response = decide_json(&input)?;
			println!("{}", serde_json::to_string(&response)?);
		}
		Command::Introspect { header } => {
			introspection_gate(&config)
				.check(header.as_deref())
				.context("introspection rejected")?;
			info!("introspection header accepted");
			println!("ok");
		}
		Command::Config => {
			println!("{config:#?}");
		}
	}

	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	// stdout carries command output; logs go to stderr.
	if logging.json {
		registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init();
	} else {
		registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

fn read_input(source: &str) -> Result<String> {
	if source == "-" {
		let mut input = String::new();
		std::io::stdin()
			.read_to_string(&mut input)
			.context("failed to read request from stdin")?;
		return Ok(input);
	}
	read_file(Path::new(source))
}

fn read_file(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn decide_json(input: &str) -> Result<DecisionResponse> {
	let request: DecisionRequest =
		serde_json::from_str(input).context("invalid decision request")?;
	debug!(subject = %request.subject.label(), action = %request.action, "evaluating request");

	let decision = decide(&request.subject, &request.resource, request.action)?;
	Ok(decision.into())
}

fn introspection_gate(config: &AuthzConfig) -> IntrospectionGate {
	if config.introspection.enabled {
		IntrospectionGate::new(config.introspection.secret.clone())
	} else {
		IntrospectionGate::closed()
	}
}
