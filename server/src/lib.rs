//! HTTP front end of the todo service.
//!
//! # Overview
//! Serves one GraphQL endpoint, `POST /graphql`. Each request passes through
//! the authentication gate, which attaches a typed [`gate::Session`], and is
//! then executed against a schema built once at startup.
//!
//! # Design
//! Status codes follow one rule. Requests that cannot be executed at all
//! (bad JSON, empty or unparsable query, a document the schema rejects) get
//! 400 and an error body. Anything that reaches the resolvers gets the
//! GraphQL envelope, with the status taken from the error codes inside it:
//! 401 for `UNAUTHENTICATED`, 403 for `FORBIDDEN`, 500 for any other error,
//! 200 when there are none.
//!
//! A caller without a valid identity who sends a rejected document that
//! selects a protected field gets the authentication error instead of the
//! 400, so identity is always reported first.

pub mod config;
pub mod error;
pub mod gate;
pub mod graphql;
pub mod state;
pub mod telemetry;

use async_graphql::http::GraphiQLSource;
use async_graphql::parser::types::{ExecutableDocument, Selection};
use async_graphql::{ErrorExtensionValues, ServerError, Value, Variables};
use async_graphql_axum::GraphQLResponse;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use todo_core::{AuthError, ErrorKind};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::Config;
pub use error::ApiError;
pub use gate::Session;
pub use state::AppState;

/// JSON body of a GraphQL request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlBody {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub variables: Option<serde_json::Value>,
    #[serde(default)]
    pub operation_name: Option<String>,
}

pub fn app(state: AppState) -> Router {
    let mut graphql = post(graphql_handler);
    if state.config.graphiql {
        graphql = graphql.get(graphiql);
    }

    let mut router = Router::new()
        .route("/graphql", graphql)
        .layer(TraceLayer::new_for_http());
    if state.config.cors_allow_any_origin {
        router = router.layer(CorsLayer::permissive());
    }
    router.with_state(state)
}

/// Serves until SIGINT or SIGTERM, then drains in-flight requests.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn graphql_handler(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<GraphqlBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if body.query.trim().is_empty() {
        return Err(ApiError::bad_request("Invalid GraphQL query"));
    }
    let document = async_graphql::parser::parse_query(&body.query)
        .map_err(|e| ApiError::bad_request(format!("Invalid GraphQL query: {e}")))?;
    let denied = session.identity().err();

    let mut request = async_graphql::Request::new(body.query).data(session);
    if let Some(variables) = body.variables {
        request = request.variables(Variables::from_json(variables));
    }
    if let Some(operation_name) = body.operation_name {
        request = request.operation_name(operation_name);
    }

    let mut response = state.schema.execute(request).await;

    // Errors without a path come from the engine rejecting the request
    // before any resolver ran.
    let rejected: Vec<String> = response
        .errors
        .iter()
        .filter(|e| e.path.is_empty() && code_of(e).is_none())
        .map(|e| e.message.clone())
        .collect();
    if !rejected.is_empty() {
        match denied {
            Some(reason) if selects_gated_field(&document) => {
                warn!(%reason, "rejected invalid document from unauthenticated caller");
                response = async_graphql::Response::from_errors(vec![auth_error(&reason)]);
            }
            _ => {
                return Err(ApiError::bad_request(format!(
                    "Invalid GraphQL query: {}",
                    rejected.join("; ")
                )));
            }
        }
    }

    for error in response.errors.iter_mut().filter(|e| code_of(e).is_none()) {
        error
            .extensions
            .get_or_insert_with(Default::default)
            .set(graphql::CODE, ErrorKind::Internal.code().to_string());
    }

    let status = status_for(&response);
    Ok((status, GraphQLResponse::from(response)).into_response())
}

/// Root fields that resolve without an identity.
const PUBLIC_FIELDS: &[&str] = &["login", "__typename", "__schema", "__type"];

/// Whether any operation in `document` selects a root field that requires an
/// identity. Fragments at the root count as gated.
fn selects_gated_field(document: &ExecutableDocument) -> bool {
    document.operations.iter().any(|(_, operation)| {
        operation
            .node
            .selection_set
            .node
            .items
            .iter()
            .any(|selection| match &selection.node {
                Selection::Field(field) => {
                    !PUBLIC_FIELDS.contains(&field.node.name.node.as_str())
                }
                _ => true,
            })
    })
}

fn auth_error(reason: &AuthError) -> ServerError {
    let mut error = ServerError::new(reason.to_string(), None);
    let mut extensions = ErrorExtensionValues::default();
    extensions.set(graphql::CODE, reason.kind().code().to_string());
    error.extensions = Some(extensions);
    error
}

fn code_of(error: &ServerError) -> Option<&str> {
    match error.extensions.as_ref()?.get(graphql::CODE)? {
        Value::String(code) => Some(code.as_str()),
        _ => None,
    }
}

/// Maps the error codes in a GraphQL response onto an HTTP status.
fn status_for(response: &async_graphql::Response) -> StatusCode {
    if response.errors.is_empty() {
        return StatusCode::OK;
    }

    let codes: Vec<&str> = response.errors.iter().filter_map(code_of).collect();

    if codes.contains(&ErrorKind::Unauthenticated.code()) {
        StatusCode::UNAUTHORIZED
    } else if codes.contains(&ErrorKind::Forbidden.code()) {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down server");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(codes: &[&str]) -> async_graphql::Response {
        let errors = codes
            .iter()
            .map(|code| {
                let mut error = ServerError::new("boom", None);
                let mut extensions = ErrorExtensionValues::default();
                extensions.set("code", code.to_string());
                error.extensions = Some(extensions);
                error
            })
            .collect();
        async_graphql::Response::from_errors(errors)
    }

    #[test]
    fn status_without_errors_is_ok() {
        assert_eq!(status_for(&async_graphql::Response::new(Value::Null)), StatusCode::OK);
    }

    #[test]
    fn unauthenticated_wins_over_other_errors() {
        let response = response_with(&["VALIDATION", "FORBIDDEN", "UNAUTHENTICATED"]);
        assert_eq!(status_for(&response), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(status_for(&response_with(&["FORBIDDEN"])), StatusCode::FORBIDDEN);
    }

    #[test]
    fn other_errors_map_to_500() {
        assert_eq!(
            status_for(&response_with(&["NOT_FOUND"])),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn gated_fields_are_detected() {
        let gated = |query: &str| {
            selects_gated_field(&async_graphql::parser::parse_query(query).unwrap())
        };
        assert!(gated("{ todos { id } }"));
        assert!(gated(
            r#"mutation { login(email: "a", password: "b") { token } deleteTodo(id: "x") }"#
        ));
        assert!(gated("query Q { ...Root } fragment Root on Query { users { id } }"));
        assert!(!gated(r#"mutation { login(email: "a", password: "b") { token } }"#));
        assert!(!gated("{ __typename }"));
    }

    #[test]
    fn auth_error_carries_its_code() {
        let error = auth_error(&AuthError::MissingToken);
        assert_eq!(code_of(&error), Some("UNAUTHENTICATED"));
        assert_eq!(error.message, "missing authorization header");
    }

    #[test]
    fn body_accepts_missing_variables() {
        let body: GraphqlBody = serde_json::from_str(r#"{"query":"{ todos { id } }"}"#).unwrap();
        assert!(body.variables.is_none());
        assert!(body.operation_name.is_none());
    }
}
