//! SeaORM Stadium repository implementation
//!
//! Stadiums are owned by clubs; every write first resolves the referenced
//! club through the retry executor and aborts with the typed not-found
//! signal if it is absent, so no orphan stadium can be persisted.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::entities::{clubs, prelude::*, stadiums};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Stadium, StadiumCreateRequest, StadiumUpdateRequest};
use crate::utils::database_retry::{RetryConfig, with_retry};

use super::{map_unique_violation, require_found};

/// SeaORM-based Stadium repository
#[derive(Clone)]
pub struct StadiumSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
    retry: RetryConfig,
    cancel: CancellationToken,
}

impl StadiumSeaOrmRepository {
    /// Create a new StadiumSeaOrmRepository with the standard retry schedule
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

    /// Fetch a single stadium by its unique name, joined with its owning club
    pub async fn find_by_name(&self, name: &str) -> RepositoryResult<Stadium> {
        let found = with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Stadiums::find()
                    .filter(stadiums::Column::Name.eq(name))
                    .find_also_related(Clubs)
                    .one(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "stadiums.find_by_name",
        )
        .await?;

        let (stadium, club) = require_found(found, "stadiums", "name", name)?;
        let club = require_found(club, "clubs", "id", &stadium.club_id.to_string())?;
        Ok(Stadium::from_models(stadium, club))
    }

    /// List all stadiums joined with their owning clubs
    ///
    /// Zero rows is a valid empty result, not an absence condition.
    pub async fn list_all(&self) -> RepositoryResult<Vec<Stadium>> {
        let rows = with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Stadiums::find()
                    .find_also_related(Clubs)
                    .order_by_asc(stadiums::Column::Name)
                    .all(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "stadiums.list_all",
        )
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for (stadium, club) in rows {
            let club = require_found(club, "clubs", "id", &stadium.club_id.to_string())?;
            results.push(Stadium::from_models(stadium, club));
        }
        Ok(results)
    }

    /// Create a new stadium owned by the named club
    ///
    /// The club must already exist; nothing is inserted otherwise.
    pub async fn create(
        &self,
        club_name: &str,
        request: StadiumCreateRequest,
    ) -> RepositoryResult<Stadium> {
        validate_capacity(request.capacity)?;
        let club = self.fetch_club_by_name(club_name).await?;

        let now = Utc::now();
        let active_model = stadiums::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.clone()),
            capacity: Set(request.capacity),
            club_id: Set(club.id),
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
                        .map_err(|err| map_unique_violation(err, "idx_stadiums_name_unique"))
                }
            },
            "stadiums.create",
        )
        .await?;

        Ok(Stadium::from_models(model, club))
    }

    /// Update an existing stadium, reassigning it to the named club
    ///
    /// Last-write-wins: the row is re-read, then overwritten with absolute
    /// values. No version token is checked; concurrent updates to the same
    /// key are arbitrated by the store's own isolation.
    pub async fn update(
        &self,
        name: &str,
        club_name: &str,
        request: StadiumUpdateRequest,
    ) -> RepositoryResult<Stadium> {
        validate_capacity(request.capacity)?;

        let existing = self.fetch_model_by_name(name).await?;
        let club = self.fetch_club_by_name(club_name).await?;

        let mut active_model: stadiums::ActiveModel = existing.into();
        active_model.name = Set(request.name.clone());
        active_model.capacity = Set(request.capacity);
        active_model.club_id = Set(club.id);
        active_model.updated_at = Set(Utc::now());

        // Update by primary key sets absolute values, so re-running it after
        // an ambiguous fault cannot double-apply.
        let updated = with_retry(
            &self.retry,
            &self.cancel,
            || {
                let update = active_model.clone();
                async move {
                    update
                        .update(&*self.connection)
                        .await
                        .map_err(|err| map_unique_violation(err, "idx_stadiums_name_unique"))
                }
            },
            "stadiums.update",
        )
        .await?;

        Ok(Stadium::from_models(updated, club))
    }

    /// Delete a stadium by name
    pub async fn delete(&self, name: &str) -> RepositoryResult<()> {
        let existing = self.fetch_model_by_name(name).await?;
        let stadium_id = existing.id;

        // Existence is proven above; zero rows affected on a retried attempt
        // means an earlier attempt already removed the row.
        with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Stadiums::delete_by_id(stadium_id)
                    .exec(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "stadiums.delete",
        )
        .await?;

        Ok(())
    }

    async fn fetch_model_by_name(&self, name: &str) -> RepositoryResult<stadiums::Model> {
        let found = with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Stadiums::find()
                    .filter(stadiums::Column::Name.eq(name))
                    .one(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "stadiums.find_by_name",
        )
        .await?;

        require_found(found, "stadiums", "name", name)
    }

    async fn fetch_club_by_name(&self, club_name: &str) -> RepositoryResult<clubs::Model> {
        let found = with_retry(
            &self.retry,
            &self.cancel,
            || async move {
                Clubs::find()
                    .filter(clubs::Column::Name.eq(club_name))
                    .one(&*self.connection)
                    .await
                    .map_err(RepositoryError::from)
            },
            "stadiums.fetch_club",
        )
        .await?;

        require_found(found, "clubs", "name", club_name)
    }
}

fn validate_capacity(capacity: i32) -> RepositoryResult<()> {
    if capacity <= 0 {
        return Err(RepositoryError::ConstraintViolation {
            constraint: "stadiums_capacity_positive".to_string(),
            message: format!("capacity must be positive, got {capacity}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::Migrator;
    use crate::database::repositories::ClubSeaOrmRepository;
    use crate::models::ClubCreateRequest;
    use sea_orm_migration::MigratorTrait;

    async fn memory_database() -> Arc<DatabaseConnection> {
        let db_url = format!(
            "sqlite:file:{}?mode=memory&cache=shared",
            Uuid::new_v4()
        );
        let db = sea_orm::Database::connect(&db_url).await.expect("memory db");
        Migrator::up(&db, None).await.expect("migrations");
        Arc::new(db)
    }

    async fn seed_club(connection: &Arc<DatabaseConnection>, name: &str) {
        ClubSeaOrmRepository::new(connection.clone())
            .create(ClubCreateRequest { name: name.into() })
            .await
            .expect("seed club");
    }

    #[tokio::test]
    async fn test_find_by_name_missing_is_typed_not_found() {
        let connection = memory_database().await;
        let repo = StadiumSeaOrmRepository::new(connection);

        let err = repo.find_by_name("Emirates").await.unwrap_err();
        match err {
            RepositoryError::RecordNotFound {
                table,
                field,
                value,
            } => {
                assert_eq!(table, "stadiums");
                assert_eq!(field, "name");
                assert_eq!(value, "Emirates");
            }
            other => panic!("expected RecordNotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_then_find_returns_exact_fields() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        let created = repo
            .create(
                "Arsenal",
                StadiumCreateRequest {
                    name: "Emirates".into(),
                    capacity: 60_000,
                },
            )
            .await
            .expect("create stadium");

        let found = repo.find_by_name("Emirates").await.expect("find stadium");
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Emirates");
        assert_eq!(found.capacity, 60_000);
        assert_eq!(found.club.name, "Arsenal");
    }

    #[tokio::test]
    async fn test_create_with_missing_club_leaves_store_unchanged() {
        let connection = memory_database().await;
        let repo = StadiumSeaOrmRepository::new(connection);

        let err = repo
            .create(
                "Chelsea",
                StadiumCreateRequest {
                    name: "Stamford Bridge".into(),
                    capacity: 40_000,
                },
            )
            .await
            .unwrap_err();

        match err {
            RepositoryError::RecordNotFound { table, value, .. } => {
                assert_eq!(table, "clubs");
                assert_eq!(value, "Chelsea");
            }
            other => panic!("expected RecordNotFound, got: {other:?}"),
        }

        // No partial insert
        assert!(repo.list_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_capacity_must_be_positive() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        let err = repo
            .create(
                "Arsenal",
                StadiumCreateRequest {
                    name: "Emirates".into(),
                    capacity: 0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::ConstraintViolation { ref constraint, .. }
                if constraint == "stadiums_capacity_positive"
        ));
        assert!(repo.list_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_stadium_name_is_constraint_violation() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "Emirates".into(),
                capacity: 60_000,
            },
        )
        .await
        .expect("first create");

        let err = repo
            .create(
                "Arsenal",
                StadiumCreateRequest {
                    name: "Emirates".into(),
                    capacity: 61_000,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_stadium_is_not_found() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        let err = repo
            .update(
                "Emirates",
                "Arsenal",
                StadiumUpdateRequest {
                    name: "Emirates".into(),
                    capacity: 60_704,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::RecordNotFound { ref table, .. } if table == "stadiums"
        ));
    }

    #[tokio::test]
    async fn test_update_with_missing_club_is_not_found() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "Emirates".into(),
                capacity: 60_000,
            },
        )
        .await
        .expect("create");

        let err = repo
            .update(
                "Emirates",
                "Chelsea",
                StadiumUpdateRequest {
                    name: "Emirates".into(),
                    capacity: 60_704,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::RecordNotFound { ref table, .. } if table == "clubs"
        ));

        // The failed update left the row untouched
        let found = repo.find_by_name("Emirates").await.expect("find");
        assert_eq!(found.capacity, 60_000);
        assert_eq!(found.club.name, "Arsenal");
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "Emirates".into(),
                capacity: 60_000,
            },
        )
        .await
        .expect("create");

        let request = StadiumUpdateRequest {
            name: "Emirates".into(),
            capacity: 60_704,
        };
        let first = repo
            .update("Emirates", "Arsenal", request.clone())
            .await
            .expect("first update");
        let second = repo
            .update("Emirates", "Arsenal", request)
            .await
            .expect("second update");

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, first.name);
        assert_eq!(second.capacity, first.capacity);
        assert_eq!(second.club, first.club);
        assert_eq!(repo.list_all().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_update_reassigns_owning_club() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        seed_club(&connection, "Tottenham").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "White Hart Lane".into(),
                capacity: 36_000,
            },
        )
        .await
        .expect("create");

        repo.update(
            "White Hart Lane",
            "Tottenham",
            StadiumUpdateRequest {
                name: "White Hart Lane".into(),
                capacity: 36_000,
            },
        )
        .await
        .expect("update");

        let found = repo.find_by_name("White Hart Lane").await.expect("find");
        assert_eq!(found.club.name, "Tottenham");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let connection = memory_database().await;
        let repo = StadiumSeaOrmRepository::new(connection);

        let err = repo.delete("Emirates").await.unwrap_err();
        assert!(matches!(err, RepositoryError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_all_joins_owning_clubs() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        seed_club(&connection, "Chelsea").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Chelsea",
            StadiumCreateRequest {
                name: "Stamford Bridge".into(),
                capacity: 40_000,
            },
        )
        .await
        .expect("create");
        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "Emirates".into(),
                capacity: 60_000,
            },
        )
        .await
        .expect("create");

        let all = repo.list_all().await.expect("list");
        let names: Vec<(&str, &str)> = all
            .iter()
            .map(|stadium| (stadium.name.as_str(), stadium.club.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![("Emirates", "Arsenal"), ("Stamford Bridge", "Chelsea")]
        );
    }

    #[tokio::test]
    async fn test_club_delete_blocked_while_stadium_references_it() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let clubs_repo = ClubSeaOrmRepository::new(connection.clone());
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "Emirates".into(),
                capacity: 60_000,
            },
        )
        .await
        .expect("create");

        let err = clubs_repo.delete("Arsenal").await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation { .. }));
    }

    /// The full reference scenario: create, read back, update, read back,
    /// delete, read back.
    #[tokio::test]
    async fn test_stadium_lifecycle() {
        let connection = memory_database().await;
        seed_club(&connection, "Arsenal").await;
        let repo = StadiumSeaOrmRepository::new(connection);

        repo.create(
            "Arsenal",
            StadiumCreateRequest {
                name: "Emirates".into(),
                capacity: 60_000,
            },
        )
        .await
        .expect("create");

        let found = repo.find_by_name("Emirates").await.expect("find");
        assert_eq!(found.capacity, 60_000);
        assert_eq!(found.club.name, "Arsenal");

        repo.update(
            "Emirates",
            "Arsenal",
            StadiumUpdateRequest {
                name: "Emirates".into(),
                capacity: 60_704,
            },
        )
        .await
        .expect("update");

        let found = repo.find_by_name("Emirates").await.expect("find after update");
        assert_eq!(found.capacity, 60_704);

        repo.delete("Emirates").await.expect("delete");

        let err = repo.find_by_name("Emirates").await.unwrap_err();
        assert!(matches!(err, RepositoryError::RecordNotFound { .. }));
    }
}
