use std::env;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Server settings read from the environment.
///
/// - `RS_CHAIN_HOST`: bind address (default `127.0.0.1`)
/// - `RS_CHAIN_PORT`: bind port (default `5000`)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
}

impl ServerConfig {
	/// Reads the configuration from `RS_CHAIN_HOST` and `RS_CHAIN_PORT`.
	///
	/// # Errors
	/// Returns an error if the port is not a valid `u16`.
	pub fn from_env() -> Result<Self, String> {
		Self::from_values(env::var("RS_CHAIN_HOST").ok(), env::var("RS_CHAIN_PORT").ok())
	}

	fn from_values(host: Option<String>, port: Option<String>) -> Result<Self, String> {
		let host = match host {
			Some(h) if !h.trim().is_empty() => h.trim().to_owned(),
			_ => DEFAULT_HOST.to_owned(),
		};
		let port = match port {
			Some(p) => p
				.trim()
				.parse::<u16>()
				.map_err(|_| format!("RS_CHAIN_PORT must be a port number, got '{}'", p))?,
			None => DEFAULT_PORT,
		};
		Ok(Self { host, port })
	}
}
