//! Connection repository for database operations
//!
//! This module provides the ConnectionRepository struct which encapsulates
//! SeaORM operations for the connections table and enforces the request
//! lifecycle guards: duplicate-pair prevention, recipient-only responses
//! and requester-only withdrawal.

use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::connection::{self, ConnectionStatus, Entity as Connection};

/// Guard failures for connection writes, mapped to HTTP errors at the
/// handler boundary.
#[derive(Debug, Error)]
pub enum ConnectionWriteError {
    #[error("connection not found")]
    NotFound,
    #[error("user is not allowed to modify this connection")]
    Forbidden,
    #[error("connection is no longer pending")]
    NotPending,
    #[error("a connection between these users already exists")]
    AlreadyRelated,
    #[error("cannot create a connection with yourself")]
    SelfConnection,
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

/// Repository for connection database operations
#[derive(Debug, Clone)]
pub struct ConnectionRepository {
    pub db: Arc<DatabaseConnection>,
}

impl ConnectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds a connection by its ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<connection::Model>> {
        let found = Connection::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(found)
    }

    /// Lists every connection where `user_id` is requester or recipient,
    /// newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<connection::Model>> {
        let found = Connection::find()
            .filter(
                Condition::any()
                    .add(connection::Column::RequesterId.eq(user_id))
                    .add(connection::Column::RecipientId.eq(user_id)),
            )
            .order_by_desc(connection::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Lists every accepted connection in the system, for the leaderboard.
    pub async fn list_accepted_all(&self) -> Result<Vec<connection::Model>> {
        let found = Connection::find()
            .filter(connection::Column::Status.eq(ConnectionStatus::Accepted))
            .all(self.db.as_ref())
            .await?;
        Ok(found)
    }

    /// Finds any connection between the two users, in either direction and
    /// any status.
    pub async fn find_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<connection::Model>, sea_orm::DbErr> {
        Connection::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(connection::Column::RequesterId.eq(a))
                            .add(connection::Column::RecipientId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(connection::Column::RequesterId.eq(b))
                            .add(connection::Column::RecipientId.eq(a)),
                    ),
            )
            .one(self.db.as_ref())
            .await
    }

    /// Creates a pending request from `requester_id` to `recipient_id`.
    ///
    /// Rejects self-connections and any pair that already has a connection
    /// in either direction, regardless of status. The unique index on
    /// (requester_id, recipient_id) backstops the same-direction race.
    pub async fn create_request(
        &self,
        requester_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<connection::Model, ConnectionWriteError> {
        if requester_id == recipient_id {
            return Err(ConnectionWriteError::SelfConnection);
        }

        if self
            .find_between(requester_id, recipient_id)
            .await?
            .is_some()
        {
            return Err(ConnectionWriteError::AlreadyRelated);
        }

        let model = connection::ActiveModel {
            id: Set(Uuid::new_v4()),
            requester_id: Set(requester_id),
            recipient_id: Set(recipient_id),
            status: Set(ConnectionStatus::Pending),
            created_at: Set(Utc::now().into()),
        };

        let created = model.insert(self.db.as_ref()).await?;
        tracing::info!(
            connection_id = %created.id,
            requester_id = %requester_id,
            recipient_id = %recipient_id,
            "Created connection request"
        );
        Ok(created)
    }

    /// Applies the recipient's response to a pending request and returns the
    /// updated row.
    ///
    /// Only the recipient may respond, and only while the request is still
    /// pending. `accept == false` declines. The write itself is filtered on
    /// the pending status so a concurrent response cannot overwrite a
    /// terminal state.
    pub async fn respond(
        &self,
        id: Uuid,
        responder_id: Uuid,
        accept: bool,
    ) -> Result<connection::Model, ConnectionWriteError> {
        let existing = Connection::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ConnectionWriteError::NotFound)?;

        if existing.recipient_id != responder_id {
            return Err(ConnectionWriteError::Forbidden);
        }
        if existing.status != ConnectionStatus::Pending {
            return Err(ConnectionWriteError::NotPending);
        }

        let new_status = if accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Declined
        };

        let result = Connection::update_many()
            .col_expr(connection::Column::Status, Expr::value(new_status))
            .filter(connection::Column::Id.eq(id))
            .filter(connection::Column::Status.eq(ConnectionStatus::Pending))
            .exec(self.db.as_ref())
            .await?;

        // Zero rows means another response landed between read and write.
        if result.rows_affected == 0 {
            return Err(ConnectionWriteError::NotPending);
        }

        let updated = Connection::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ConnectionWriteError::NotFound)?;

        tracing::info!(
            connection_id = %updated.id,
            status = ?updated.status,
            "Connection request resolved"
        );
        Ok(updated)
    }

    /// Withdraws a pending request. Only the requester may withdraw, and
    /// only while the request is still pending; the row is deleted. The
    /// delete is filtered on requester and pending status so a request that
    /// was resolved concurrently stays intact.
    pub async fn withdraw(
        &self,
        id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), ConnectionWriteError> {
        let existing = Connection::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ConnectionWriteError::NotFound)?;

        if existing.requester_id != requester_id {
            return Err(ConnectionWriteError::Forbidden);
        }
        if existing.status != ConnectionStatus::Pending {
            return Err(ConnectionWriteError::NotPending);
        }

        let result = Connection::delete_many()
            .filter(connection::Column::Id.eq(id))
            .filter(connection::Column::RequesterId.eq(requester_id))
            .filter(connection::Column::Status.eq(ConnectionStatus::Pending))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(ConnectionWriteError::NotPending);
        }

        tracing::info!(connection_id = %id, "Connection request withdrawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::repositories::UserRepository;
    use migration::{Migrator, MigratorTrait};

    async fn setup() -> (ConnectionRepository, Uuid, Uuid) {
        let db = Arc::new(sea_orm::Database::connect("sqlite::memory:").await.unwrap());
        Migrator::up(db.as_ref(), None).await.unwrap();

        let users = UserRepository::new(Arc::clone(&db));
        let alice = users
            .create("alice@ucalgary.ca", &hash_password("pw"))
            .await
            .unwrap();
        let bob = users
            .create("bob@ucalgary.ca", &hash_password("pw"))
            .await
            .unwrap();

        (ConnectionRepository::new(db), alice.id, bob.id)
    }

    #[tokio::test]
    async fn respond_rejects_already_resolved_request() {
        let (repo, alice, bob) = setup().await;
        let request = repo.create_request(alice, bob).await.unwrap();

        let accepted = repo.respond(request.id, bob, true).await.unwrap();
        assert_eq!(accepted.status, ConnectionStatus::Accepted);

        // A second response must not overwrite the terminal state.
        let err = repo.respond(request.id, bob, false).await.unwrap_err();
        assert!(matches!(err, ConnectionWriteError::NotPending));

        let stored = repo.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ConnectionStatus::Accepted);
    }

    #[tokio::test]
    async fn guarded_update_leaves_terminal_rows_untouched() {
        let (repo, alice, bob) = setup().await;
        let request = repo.create_request(alice, bob).await.unwrap();
        repo.respond(request.id, bob, true).await.unwrap();

        // Replays the write that loses a response race: the row passed the
        // in-memory pending check earlier but is no longer pending when the
        // update runs. The status filter must reject it.
        let result = Connection::update_many()
            .col_expr(
                connection::Column::Status,
                Expr::value(ConnectionStatus::Declined),
            )
            .filter(connection::Column::Id.eq(request.id))
            .filter(connection::Column::Status.eq(ConnectionStatus::Pending))
            .exec(repo.db.as_ref())
            .await
            .unwrap();
        assert_eq!(result.rows_affected, 0);

        let stored = repo.get_by_id(request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ConnectionStatus::Accepted);
    }

    #[tokio::test]
    async fn withdraw_rejects_already_resolved_request() {
        let (repo, alice, bob) = setup().await;
        let request = repo.create_request(alice, bob).await.unwrap();
        repo.respond(request.id, bob, true).await.unwrap();

        let err = repo.withdraw(request.id, alice).await.unwrap_err();
        assert!(matches!(err, ConnectionWriteError::NotPending));

        // The accepted row survives the attempted withdrawal.
        assert!(repo.get_by_id(request.id).await.unwrap().is_some());
    }
}
