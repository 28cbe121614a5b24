//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Applications
//! - `POST /api/v1/applications` - Submit an application (201, returns `{id, status}`)
//! - `GET /api/v1/applications/{id}` - Application status with offers and bank submissions
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use offer_aggregator::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState { application_service });
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, ApplicationRequest, ApplicationStatusResponse, BankSubmissionResponse,
    ErrorResponse, HealthResponse, OfferResponse, SubmitResponse,
};
pub use routes::create_router;
