//! HTTP server for the order API.
//!
//! A single route serves GraphQL: `POST` executes a request, and `GET`
//! serves GraphiQL when the playground is enabled.

use crate::graphql::OrderSchema;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
	extract::State,
	http::{header, HeaderValue, Method},
	response::{Html, IntoResponse},
	routing::{get, post},
	Router,
};
use order_config::{ApiConfig, CorsConfig};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Errors that can occur while setting up or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("Invalid CORS origin '{0}'")]
	InvalidOrigin(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Schema with the order store attached.
	pub schema: OrderSchema,
	/// Route GraphiQL sends its requests to.
	pub graphql_path: String,
}

/// Builds the router with routing and middleware for the API.
pub fn build_router(api_config: &ApiConfig, schema: OrderSchema) -> Result<Router, ServerError> {
	let graphql_route = if api_config.playground {
		get(handle_graphiql).post(handle_graphql)
	} else {
		post(handle_graphql)
	};

	let app_state = AppState {
		schema,
		graphql_path: api_config.path.clone(),
	};

	Ok(Router::new()
		.route(&api_config.path, graphql_route)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(RequestBodyLimitLayer::new(api_config.max_request_size))
				.layer(cors_layer(api_config.cors.as_ref())?),
		)
		.with_state(app_state))
}

/// Starts the HTTP server and runs it until Ctrl-C.
pub async fn start_server(api_config: ApiConfig, schema: OrderSchema) -> Result<(), ServerError> {
	let app = build_router(&api_config, schema)?;

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!(
		"Order API listening on http://{}{}",
		bind_address,
		api_config.path
	);
	if api_config.playground {
		tracing::info!("GraphiQL available on GET {}", api_config.path);
	}

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

fn cors_layer(cors: Option<&CorsConfig>) -> Result<CorsLayer, ServerError> {
	let Some(cors) = cors else {
		return Ok(CorsLayer::permissive());
	};

	let origins = cors
		.allowed_origins
		.iter()
		.map(|origin| {
			HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin(origin.clone()))
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([header::CONTENT_TYPE]))
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Failed to install Ctrl-C handler");
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutdown signal received");
}

/// Handles POST requests on the GraphQL route.
async fn handle_graphql(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
	state.schema.execute(request.into_inner()).await.into()
}

/// Handles GET requests on the GraphQL route when the playground is enabled.
async fn handle_graphiql(State(state): State<AppState>) -> impl IntoResponse {
	Html(GraphiQLSource::build().endpoint(&state.graphql_path).finish())
}
