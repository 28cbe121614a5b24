//! # REST Handlers
//!
//! Request/response DTOs and axum handlers for the application endpoints.
//!
//! Error bodies share one shape: `{error, message, code}`.

use crate::application::error::ApplicationError;
use crate::application::services::ApplicationService;
use crate::domain::entities::{Application, BankSubmission, Offer};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    ApplicationId, ApplicationStatus, CustomerData, MaritalStatus, OfferStatus, SubmissionStatus,
    Timestamp,
};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "offer-aggregator";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application lifecycle service.
    pub application_service: ApplicationService,
}

/// Body of `POST /api/v1/applications`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Monthly income.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub monthly_income: Decimal,
    /// Monthly expenses.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub monthly_expenses: Decimal,
    /// One of `SINGLE`, `MARRIED`, `DIVORCED`, `WIDOWED`, `COHABITING`.
    #[serde(default)]
    pub marital_status: String,
    /// Consent to credit scoring.
    #[serde(default)]
    pub agree_to_be_scored: bool,
    /// Requested amount.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Number of dependents.
    #[serde(default)]
    pub dependents: i64,
}

impl ApplicationRequest {
    /// Validates the request into customer data.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` or a domain validation error
    /// describing the first invalid field.
    pub fn into_customer_data(self) -> Result<CustomerData, ApplicationError> {
        let marital_status = MaritalStatus::from_str(&self.marital_status).map_err(|_| {
            ApplicationError::validation(
                "maritalStatus must be one of: SINGLE MARRIED DIVORCED WIDOWED COHABITING",
            )
        })?;
        let dependents = u32::try_from(self.dependents).map_err(|_| {
            ApplicationError::validation("dependents must be greater than or equal to 0")
        })?;

        Ok(CustomerData::builder(self.phone, self.email, self.amount)
            .monthly_income(self.monthly_income)
            .monthly_expenses(self.monthly_expenses)
            .marital_status(marital_status)
            .agree_to_be_scored(self.agree_to_be_scored)
            .dependents(dependents)
            .build()?)
    }
}

/// Body of a successful submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Application id.
    pub id: ApplicationId,
    /// Status at intake.
    pub status: ApplicationStatus,
}

/// Offer as returned to clients. Terms are omitted when the bank sent none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    /// Offer id.
    pub id: String,
    /// Bank that made the offer.
    pub bank_name: String,
    /// Monthly payment.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub monthly_payment_amount: Option<Decimal>,
    /// Total repayment.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_repayment_amount: Option<Decimal>,
    /// Number of payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_payments: Option<u32>,
    /// Annual percentage rate.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub annual_percentage_rate: Option<Decimal>,
    /// First repayment date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_repayment_date: Option<String>,
    /// `APPROVED` or `REJECTED`.
    pub status: OfferStatus,
    /// Creation time.
    pub created_at: Timestamp,
}

impl From<&Offer> for OfferResponse {
    fn from(offer: &Offer) -> Self {
        let terms = offer.terms();
        Self {
            id: offer.id().to_string(),
            bank_name: offer.bank_name().to_string(),
            monthly_payment_amount: terms.map(|t| t.monthly_payment()),
            total_repayment_amount: terms.map(|t| t.total_repayment()),
            number_of_payments: terms.map(|t| t.number_of_payments()),
            annual_percentage_rate: terms.map(|t| t.annual_percentage_rate()),
            first_repayment_date: terms.map(|t| t.first_repayment_date().to_string()),
            status: offer.status(),
            created_at: offer.created_at(),
        }
    }
}

/// Per-bank submission as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSubmissionResponse {
    /// Bank name.
    pub bank_name: String,
    /// `DRAFT`, `SUCCESS` or `FAILED`.
    pub status: SubmissionStatus,
    /// The bank's tracking id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    /// Submit time.
    pub submitted_at: Timestamp,
    /// Resolution time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&BankSubmission> for BankSubmissionResponse {
    fn from(submission: &BankSubmission) -> Self {
        Self {
            bank_name: submission.bank_name().to_string(),
            status: submission.status(),
            bank_id: submission.external_id().map(str::to_string),
            submitted_at: submission.submitted_at(),
            completed_at: submission.completed_at(),
            error: submission.error().map(str::to_string),
        }
    }
}

/// Body of `GET /api/v1/applications/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusResponse {
    /// Application id.
    pub id: ApplicationId,
    /// Aggregate status.
    pub status: ApplicationStatus,
    /// Offers received so far.
    pub offers: Vec<OfferResponse>,
    /// One entry per bank.
    pub bank_submissions: Vec<BankSubmissionResponse>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last status change.
    pub updated_at: Timestamp,
}

impl From<&Application> for ApplicationStatusResponse {
    fn from(application: &Application) -> Self {
        Self {
            id: application.id(),
            status: application.status(),
            offers: application.offers().iter().map(OfferResponse::from).collect(),
            bank_submissions: application
                .submissions()
                .iter()
                .map(BankSubmissionResponse::from)
                .collect(),
            created_at: application.created_at(),
            updated_at: application.updated_at(),
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy`.
    pub status: String,
    /// Service name.
    pub service: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error class.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
    /// Machine-readable code.
    pub code: String,
}

/// Handler error carrying its HTTP status.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, code: &str) -> Self {
        let error = status.canonical_reason().unwrap_or("Error").to_string();
        Self {
            status,
            body: ErrorResponse {
                error,
                message: message.into(),
                code: code.to_string(),
            },
        }
    }

    fn with_error(mut self, error: &str) -> Self {
        self.body.error = error.to_string();
        self
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error body.
    #[must_use]
    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `POST /api/v1/applications`
pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ApplicationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected malformed application request");
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "Invalid request format",
            "INVALID_REQUEST_FORMAT",
        )
    })?;

    let customer = request.into_customer_data().map_err(|e| {
        tracing::warn!(error = %e, "application request failed validation");
        let message = match e {
            ApplicationError::Validation(message)
            | ApplicationError::Domain(DomainError::ValidationError(message)) => message,
            other => other.to_string(),
        };
        ApiError::new(StatusCode::BAD_REQUEST, message, "VALIDATION_FAILED")
            .with_error("Validation Failed")
    })?;

    let receipt = state
        .application_service
        .submit(customer)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to submit application");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process application",
                "APPLICATION_PROCESSING_FAILED",
            )
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            id: receipt.id,
            status: receipt.status,
        }),
    ))
}

/// `GET /api/v1/applications/{id}`
pub async fn get_application_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationStatusResponse>, ApiError> {
    let application_id = ApplicationId::from_str(&id).map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "Invalid application ID format",
            "INVALID_APPLICATION_ID",
        )
    })?;

    match state.application_service.get_status(&application_id).await {
        Ok(application) => {
            tracing::debug!(
                %application_id,
                status = %application.status(),
                offers = application.offers().len(),
                "application status retrieved"
            );
            Ok(Json(ApplicationStatusResponse::from(&application)))
        }
        Err(e) if e.is_not_found() => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "Application not found",
            "APPLICATION_NOT_FOUND",
        )),
        Err(e) => {
            tracing::error!(%application_id, error = %e, "failed to retrieve application");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve application status",
                "APPLICATION_RETRIEVAL_FAILED",
            ))
        }
    }
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
