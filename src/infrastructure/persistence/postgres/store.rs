//! # PostgreSQL Store
//!
//! PostgreSQL implementation of the repository ports using sqlx.
//!
//! The schema lives in `migrations/` and is applied by [`PostgresStore::migrate`].
//! Unique constraints on `(application_id, bank_name)` for submissions and
//! offers, and foreign keys to `applications`, back the port invariants.

use crate::domain::entities::{Application, BankSubmission, Offer};
use crate::domain::value_objects::{
    ApplicationId, ApplicationStatus, BankName, CustomerData, OfferId, OfferTerms,
    ParseEnumError, SubmissionId,
};
use crate::infrastructure::persistence::traits::{
    ApplicationRepository, BankSubmissionRepository, OfferRepository, RepositoryError,
    RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQL implementation of the repository ports.
///
/// # Examples
///
/// ```ignore
/// use offer_aggregator::infrastructure::persistence::postgres::PostgresStore;
///
/// let store = PostgresStore::connect("postgres://localhost/aggregator", 10).await?;
/// store.migrate().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` if the database is unreachable.
    pub async fn connect(url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Internal` if a migration fails.
    pub async fn migrate(&self) -> RepositoryResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::internal(format!("migration failed: {e}")))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn submissions_for(&self, ids: &[Uuid]) -> RepositoryResult<Vec<BankSubmission>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT id, application_id, bank_name, status, external_id,
                   submitted_at, completed_at, error_message, created_at
            FROM bank_submissions
            WHERE application_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter()
            .map(SubmissionRow::try_into_submission)
            .collect()
    }
}

/// Maps insert failures onto the port's error contract.
fn map_insert_error(entity_type: &'static str, id: String, err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepositoryError::duplicate(entity_type, id);
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::not_found("Application", id);
        }
    }
    RepositoryError::query(err.to_string())
}

fn to_u32(field: &str, value: i32) -> RepositoryResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::serialization(format!("negative {field}: {value}")))
}

fn parse_column<T>(value: &str) -> RepositoryResult<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|e: ParseEnumError| RepositoryError::serialization(e.to_string()))
}

#[async_trait]
impl ApplicationRepository for PostgresStore {
    async fn create(&self, application: &Application) -> RepositoryResult<()> {
        let customer = application.customer();
        let dependents = i32::try_from(customer.dependents())
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO applications (
                id, phone, email, monthly_income, monthly_expenses, marital_status,
                agree_to_be_scored, amount, dependents, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(application.id().as_uuid())
        .bind(customer.phone())
        .bind(customer.email())
        .bind(customer.monthly_income())
        .bind(customer.monthly_expenses())
        .bind(customer.marital_status().as_str())
        .bind(customer.agree_to_be_scored())
        .bind(customer.amount())
        .bind(dependents)
        .bind(application.status().as_str())
        .bind(DateTime::<Utc>::from(application.created_at()))
        .bind(DateTime::<Utc>::from(application.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error("Application", application.id().to_string(), e))?;

        Ok(())
    }

    async fn get(&self, id: &ApplicationId) -> RepositoryResult<Option<Application>> {
        let row: Option<ApplicationRow> = sqlx::query_as(
            r#"
            SELECT id, phone, email, monthly_income, monthly_expenses, marital_status,
                   agree_to_be_scored, amount, dependents, status, created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let submissions = self.submissions_for(&[id.as_uuid()]).await?;
        let offers = OfferRepository::find_by_application(self, id).await?;
        Ok(Some(
            row.try_into_application()?
                .with_submissions(submissions)
                .with_offers(offers),
        ))
    }

    async fn update(&self, application: &Application) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(application.id().as_uuid())
        .bind(application.status().as_str())
        .bind(DateTime::<Utc>::from(application.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                "Application",
                application.id().to_string(),
            ));
        }
        Ok(())
    }

    async fn exists(&self, id: &ApplicationId) -> RepositoryResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;
        Ok(exists)
    }

    async fn find_by_status(
        &self,
        status: ApplicationStatus,
    ) -> RepositoryResult<Vec<Application>> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(
            r#"
            SELECT id, phone, email, monthly_income, monthly_expenses, marital_status,
                   agree_to_be_scored, amount, dependents, status, created_at, updated_at
            FROM applications
            WHERE status = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut by_application: HashMap<Uuid, Vec<BankSubmission>> = HashMap::new();
        for submission in self.submissions_for(&ids).await? {
            by_application
                .entry(submission.application_id().as_uuid())
                .or_default()
                .push(submission);
        }

        rows.into_iter()
            .map(|row| {
                let submissions = by_application.remove(&row.id).unwrap_or_default();
                Ok(row.try_into_application()?.with_submissions(submissions))
            })
            .collect()
    }
}

#[async_trait]
impl BankSubmissionRepository for PostgresStore {
    async fn create(&self, submission: &BankSubmission) -> RepositoryResult<()> {
        insert_submission(&self.pool, submission).await
    }

    async fn create_batch(&self, submissions: &[BankSubmission]) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;

        for submission in submissions {
            insert_submission(&mut *tx, submission).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))
    }

    async fn update(&self, submission: &BankSubmission) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bank_submissions
            SET status = $2, completed_at = $3, error_message = $4
            WHERE id = $1
            "#,
        )
        .bind(submission.id().as_uuid())
        .bind(submission.status().as_str())
        .bind(submission.completed_at().map(DateTime::<Utc>::from))
        .bind(submission.error())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                "BankSubmission",
                submission.id().to_string(),
            ));
        }
        Ok(())
    }

    async fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> RepositoryResult<Vec<BankSubmission>> {
        self.submissions_for(&[application_id.as_uuid()]).await
    }
}

async fn insert_submission<'e, E>(executor: E, submission: &BankSubmission) -> RepositoryResult<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO bank_submissions (
            id, application_id, bank_name, status, external_id,
            submitted_at, completed_at, error_message, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(submission.id().as_uuid())
    .bind(submission.application_id().as_uuid())
    .bind(submission.bank_name().as_str())
    .bind(submission.status().as_str())
    .bind(submission.external_id())
    .bind(DateTime::<Utc>::from(submission.submitted_at()))
    .bind(submission.completed_at().map(DateTime::<Utc>::from))
    .bind(submission.error())
    .bind(DateTime::<Utc>::from(submission.created_at()))
    .execute(executor)
    .await
    .map_err(|e| {
        map_insert_error(
            "BankSubmission",
            format!("{}/{}", submission.application_id(), submission.bank_name()),
            e,
        )
    })?;
    Ok(())
}

#[async_trait]
impl OfferRepository for PostgresStore {
    async fn create(&self, offer: &Offer) -> RepositoryResult<()> {
        let terms = offer.terms();
        let number_of_payments = terms
            .map(|t| i32::try_from(t.number_of_payments()))
            .transpose()
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO offers (
                id, application_id, bank_name, status, monthly_payment, total_repayment,
                number_of_payments, annual_percentage_rate, first_repayment_date, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(offer.id().as_uuid())
        .bind(offer.application_id().as_uuid())
        .bind(offer.bank_name().as_str())
        .bind(offer.status().as_str())
        .bind(terms.map(OfferTerms::monthly_payment))
        .bind(terms.map(OfferTerms::total_repayment))
        .bind(number_of_payments)
        .bind(terms.map(OfferTerms::annual_percentage_rate))
        .bind(terms.map(OfferTerms::first_repayment_date))
        .bind(DateTime::<Utc>::from(offer.created_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error("Offer", offer.id().to_string(), e))?;

        Ok(())
    }

    async fn find_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> RepositoryResult<Vec<Offer>> {
        let rows: Vec<OfferRow> = sqlx::query_as(
            r#"
            SELECT id, application_id, bank_name, status, monthly_payment, total_repayment,
                   number_of_payments, annual_percentage_rate, first_repayment_date, created_at
            FROM offers
            WHERE application_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(application_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(OfferRow::try_into_offer).collect()
    }
}

/// Row type for application queries.
#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    phone: String,
    email: String,
    monthly_income: Decimal,
    monthly_expenses: Decimal,
    marital_status: String,
    agree_to_be_scored: bool,
    amount: Decimal,
    dependents: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn try_into_application(self) -> RepositoryResult<Application> {
        let marital_status = parse_column(&self.marital_status)?;
        let status = parse_column(&self.status)?;

        let customer = CustomerData::from_parts(
            self.phone,
            self.email,
            self.monthly_income,
            self.monthly_expenses,
            marital_status,
            self.agree_to_be_scored,
            self.amount,
            to_u32("dependents", self.dependents)?,
        );

        Ok(Application::from_parts(
            ApplicationId::new(self.id),
            customer,
            status,
            self.created_at.into(),
            self.updated_at.into(),
        ))
    }
}

/// Row type for submission queries.
#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    application_id: Uuid,
    bank_name: String,
    status: String,
    external_id: Option<String>,
    submitted_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn try_into_submission(self) -> RepositoryResult<BankSubmission> {
        let status = parse_column(&self.status)?;

        Ok(BankSubmission::from_parts(
            SubmissionId::new(self.id),
            ApplicationId::new(self.application_id),
            BankName::new(self.bank_name),
            status,
            self.external_id,
            self.submitted_at.into(),
            self.completed_at.map(Into::into),
            self.error_message,
            self.created_at.into(),
        ))
    }
}

/// Row type for offer queries.
#[derive(Debug, sqlx::FromRow)]
struct OfferRow {
    id: Uuid,
    application_id: Uuid,
    bank_name: String,
    status: String,
    monthly_payment: Option<Decimal>,
    total_repayment: Option<Decimal>,
    number_of_payments: Option<i32>,
    annual_percentage_rate: Option<Decimal>,
    first_repayment_date: Option<String>,
    created_at: DateTime<Utc>,
}

impl OfferRow {
    fn try_into_offer(self) -> RepositoryResult<Offer> {
        let status = parse_column(&self.status)?;
        let number_of_payments = self
            .number_of_payments
            .map(|n| to_u32("number_of_payments", n))
            .transpose()?;
        let terms = OfferTerms::from_optional(
            self.monthly_payment,
            self.total_repayment,
            number_of_payments,
            self.annual_percentage_rate,
            self.first_repayment_date,
        )
        .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        Ok(Offer::from_parts(
            OfferId::new(self.id),
            ApplicationId::new(self.application_id),
            BankName::new(self.bank_name),
            status,
            terms,
            self.created_at.into(),
        ))
    }
}
