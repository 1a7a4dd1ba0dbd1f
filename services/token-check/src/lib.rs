use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use edtoken_auth::{AuthError, Claims, Verifier};
use edtoken_config::{ConfigError, VerifierConfig};

pub const SERVICE_NAME: &str = "token-check";

/// Verify an Ed25519-signed bearer token against the configured public key.
#[derive(Debug, Parser)]
#[command(name = "token-check", version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "EDTOKEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base64Url public key material, replaces the configured key
    #[arg(long)]
    pub key_x: Option<String>,

    /// Token to verify; read from stdin when omitted
    #[arg(env = "EDTOKEN_TOKEN")]
    pub token: Option<String>,
}

/// Resolve the verifier configuration: file, then environment, then flags.
pub fn resolve_config(cli: &Cli) -> Result<VerifierConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => VerifierConfig::from_file(path)?,
        None => VerifierConfig::default(),
    };
    config.apply_environment_overrides();
    if let Some(x) = &cli.key_x {
        config.key.x = x.clone();
        config.key_path = None;
    }
    Ok(config)
}

/// Token from the command line, or the first non-empty line of `input`.
pub fn read_token(cli: &Cli, input: impl BufRead) -> io::Result<String> {
    if let Some(token) = &cli.token {
        return Ok(token.clone());
    }
    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no token supplied"))
}

/// One-line report for an outcome.
pub fn render(outcome: &Result<Claims, AuthError>) -> String {
    match outcome {
        Ok(claims) => format!(
            "valid: subject={} expires_at={}",
            claims.subject().unwrap_or("-"),
            claims.expires_at.to_rfc3339()
        ),
        Err(err) => format!("invalid: {err}"),
    }
}

/// Verify one token and print the report. Returns whether it was accepted.
pub fn run(cli: &Cli, input: impl BufRead) -> Result<bool, Box<dyn std::error::Error>> {
    let config = resolve_config(cli)?;
    let verifier = Verifier::new(config.public_key()?);
    let token = read_token(cli, input)?;

    let outcome = verifier.verify(&token);
    if let Err(err) = &outcome {
        tracing::info!(reason = err.kind().as_str(), "token rejected");
    }
    println!("{}", render(&outcome));
    Ok(outcome.is_ok())
}
