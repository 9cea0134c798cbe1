use std::collections::HashMap;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{delete, get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::Deserialize;

use rs_chain_core::{Chain, ChainError};

mod config;

use config::ServerConfig;

/// Query parameters for the `/v1/forward` endpoint
#[derive(Deserialize)]
struct ForwardParams {
	start: Option<String>, // -> random known state if missing
	length: Option<usize>,
	adjust: Option<bool>
}

/// Query parameters shared by `/v1/fit` and `/v1/load`
#[derive(Deserialize)]
struct BuildParams {
	extend: Option<bool>,
	weighted: Option<bool>
}

#[derive(Deserialize)]
struct FitBody {
	observations: Vec<String>,
	states: Option<Vec<String>>
}

#[derive(Deserialize)]
struct LoadBody {
	transitions: HashMap<String, HashMap<String, f64>>,
	states: Option<Vec<String>>
}

struct SharedData {
	chain: Chain<String>
}

/// Maps a chain error to an HTTP response.
///
/// - Unknown states are `404`
/// - Dead ends are `409`
/// - Rejected input is `400`
fn error_response(error: ChainError) -> HttpResponse {
	match error {
		ChainError::UnknownState(_) => HttpResponse::NotFound().body(error.to_string()),
		ChainError::SamplingDeadEnd { .. } => HttpResponse::Conflict().body(error.to_string()),
		ChainError::InvalidWeight { .. } | ChainError::DimensionMismatch { .. } => {
			HttpResponse::BadRequest().body(error.to_string())
		}
		ChainError::InvalidSlot { .. } => HttpResponse::InternalServerError().body(error.to_string()),
	}
}

/// HTTP GET endpoint `/v1/forward`
///
/// Generates a sequence from the chain, starting after `start`.
/// Returns the generated states as a JSON array.
#[get("/v1/forward")]
async fn get_forward(data: web::Data<Mutex<SharedData>>, query: web::Query<ForwardParams>) -> impl Responder {
	let length = query.length.unwrap_or(10);
	let adjust = query.adjust.unwrap_or(true);

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let start = match &query.start {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => match shared_data.chain.random_state() {
			Some(s) => s.clone(),
			None => return HttpResponse::BadRequest().body("Chain is empty"),
		},
	};

	match shared_data.chain.forward(&start, length, adjust) {
		Ok(states) => HttpResponse::Ok().json(states),
		Err(e) => {
			warn!("forward from '{}' failed: {}", start, e);
			error_response(e)
		}
	}
}

/// HTTP PUT endpoint `/v1/fit`
///
/// Trains the chain on the observed sequence in the body.
#[put("/v1/fit")]
async fn put_fit(data: web::Data<Mutex<SharedData>>, query: web::Query<BuildParams>, body: web::Json<FitBody>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let body = body.into_inner();
	let extend = query.extend.unwrap_or(false);
	match shared_data.chain.fit(&body.observations, body.states.as_deref(), extend) {
		Ok(()) => {
			info!("fitted {} observations, {} states", body.observations.len(), shared_data.chain.len());
			HttpResponse::Ok().body("Chain fitted successfully")
		}
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/load`
///
/// Replaces (or extends) the chain with explicit transition weights.
#[put("/v1/load")]
async fn put_load(data: web::Data<Mutex<SharedData>>, query: web::Query<BuildParams>, body: web::Json<LoadBody>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};

	let body = body.into_inner();
	let extend = query.extend.unwrap_or(false);
	let weighted = query.weighted.unwrap_or(true);
	match shared_data.chain.load(body.transitions, body.states.as_deref(), extend, weighted) {
		Ok(()) => {
			info!("loaded chain with {} states", shared_data.chain.len());
			HttpResponse::Ok().body("Chain loaded successfully")
		}
		Err(e) => error_response(e),
	}
}

#[get("/v1/states")]
async fn get_states(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.chain.states().join("\n"))
}

#[get("/v1/chain")]
async fn get_chain(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	HttpResponse::Ok().json(&shared_data.chain)
}

#[delete("/v1/chain")]
async fn delete_chain(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
	};
	shared_data.chain.clear();
	HttpResponse::Ok().body("Chain cleared")
}

/// Registers every endpoint.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_forward)
		.service(put_fit)
		.service(put_load)
		.service(get_states)
		.service(get_chain)
		.service(delete_chain);
}

/// Main entry point for the server.
///
/// Holds one empty chain behind a `Mutex` and starts an Actix-web HTTP
/// server. Bind address comes from `ServerConfig`; log level from `RUST_LOG`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

	let shared_data = SharedData {
		chain: Chain::new(),
	};
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	info!("listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.configure(configure)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
