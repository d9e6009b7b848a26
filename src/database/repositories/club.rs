//! SeaORM Club repository implementation
//!
//! Clubs are the owning side of the club/stadium relationship; the stadium
//! repository resolves club references through the same table this
//! repository manages.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::entities::{clubs, prelude::*};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Club, ClubCreateRequest, ClubUpdateRequest};
use crate::utils::database_retry::{RetryConfig, with_retry};

use super::{is_foreign_key_violation, map_unique_violation, require_found};

/// SeaORM-based Club repository
#[derive(Clone)]
pub struct ClubSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
    retry: RetryConfig,
    cancel: CancellationToken,
}

impl ClubSeaOrmRepository {
    /// Create a new ClubSeaOrmRepository with the standard retry schedule
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self {
            connection,
            retry: RetryConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the retry schedule (the config is shared and immutable)
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a request-scoped cancellation token honored at every store
    /// round-trip and backoff wait
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Create a new club
    pub async fn create(&self, request: ClubCreateRequest) -> RepositoryResult<Club> {
        let now = Utc::now();
        let active_model = clubs::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique name index doubles as the duplicate-write guard: an
        // insert retried after an ambiguous fault surfaces a constraint
        // violation instead of a second row.
        let model = with_retry(
            &self.retry,
            &self.cancel,
            || {
                let insert = active_model.clone();
                async move {
                    insert
                        .insert(&*self.connection)
                        .await
                        .map_err(|err| map_unique_violation(err, "idx_clubs_name_unique"))
                }
            },
            "clubs.create",
        )
        .await?;

        Ok(Club::from(model))
    }

    /// Fetch a single club by its unique name
    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Club> {
        let model = self.fetch_model_by_name(name).await?;
        Ok(Club::from(model))
    }

    /// List all clubs
    ///
    /// Zero rows is a valid empty result, not an absence condition.
    pub async fn list_all(&self) -> RepositoryResult<Vec<Club>> {
        let models = with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Clubs::find()
                    .order_by_asc(clubs::Column::Name)
                    .all(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "clubs.list_all",
        )
        .await?;

        Ok(models.into_iter().map(Club::from).collect())
    }

    /// Update an existing club
    ///
    /// Last-write-wins: the row is re-read and overwritten with absolute
    /// values; no version token is checked.
    pub async fn update(&self, name: &str, request: ClubUpdateRequest) -> RepositoryResult<Club> {
        let existing = self.fetch_model_by_name(name).await?;

        let mut active_model: clubs::ActiveModel = existing.into();
        active_model.name = Set(request.name.clone());
        active_model.updated_at = Set(Utc::now());

        let updated = with_retry(
            &self.retry,
            &self.cancel,
            || {
                let update = active_model.clone();
                async move {
                    update
                        .update(&*self.connection)
                        .await
                        .map_err(|err| map_unique_violation(err, "idx_clubs_name_unique"))
                }
            },
            "clubs.update",
        )
        .await?;

        Ok(Club::from(updated))
    }

    /// Delete a club by name
    ///
    /// Clubs still referenced by stadiums are protected by the foreign key
    /// and surface a constraint violation.
    pub async fn delete(&self, name: &str) -> RepositoryResult<()> {
        let existing = self.fetch_model_by_name(name).await?;
        let club_id = existing.id;

        // Existence is proven above; zero rows affected on a retried attempt
        // means an earlier attempt already removed the row.
        with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Clubs::delete_by_id(club_id)
                    .exec(&*self.connection)
                    .await
                    .map_err(|err| {
                        if is_foreign_key_violation(&err) {
                            RepositoryError::ConstraintViolation {
                                constraint: "fk_stadiums_club_id".to_string(),
                                message: err.to_string(),
                            }
                        } else {
                            RepositoryError::Database(err)
                        }
                    })
            },
            "clubs.delete",
        )
        .await?;

        Ok(())
    }

    async fn fetch_model_by_name(&self, name: &str) -> RepositoryResult<clubs::Model> {
        let found = with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Clubs::find()
                    .filter(clubs::Column::Name.eq(name))
                    .one(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "clubs.find_by_name",
        )
        .await?;

        require_found(found, "clubs", "name", name)
    }
}
