//! # Derived Views
//!
//! Pure functions that turn persisted rows into the derived views the API
//! serves: connection partitions, the leaderboard, profile search and
//! match scoring. Keeping these free of database access makes every rule
//! unit-testable in isolation.

pub mod leaderboard;
pub mod matching;
pub mod search;

use uuid::Uuid;

use crate::models::connection::{ConnectionStatus, Model as ConnectionModel};

/// A user's connections split into the three lists the client renders.
#[derive(Debug, Default, Clone)]
pub struct ConnectionPartition {
    /// Pending requests where the user is the recipient
    pub received: Vec<ConnectionModel>,
    /// Pending requests where the user is the requester
    pub sent: Vec<ConnectionModel>,
    /// Accepted connections in either direction
    pub active: Vec<ConnectionModel>,
}

/// Splits `connections` into received/sent/active relative to `user_id`.
///
/// Declined rows are dropped: they are kept in storage to block repeat
/// requests but never shown.
pub fn partition_connections(
    user_id: Uuid,
    connections: Vec<ConnectionModel>,
) -> ConnectionPartition {
    let mut partition = ConnectionPartition::default();

    for conn in connections {
        match conn.status {
            ConnectionStatus::Pending if conn.recipient_id == user_id => {
                partition.received.push(conn)
            }
            ConnectionStatus::Pending if conn.requester_id == user_id => partition.sent.push(conn),
            ConnectionStatus::Accepted => partition.active.push(conn),
            _ => {}
        }
    }

    partition
}

/// Returns the other participant of a connection relative to `user_id`.
pub fn counterpart_id(user_id: Uuid, connection: &ConnectionModel) -> Uuid {
    if connection.requester_id == user_id {
        connection.recipient_id
    } else {
        connection.requester_id
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::connection::{ConnectionStatus, Model as ConnectionModel};

    pub fn connection(
        requester_id: Uuid,
        recipient_id: Uuid,
        status: ConnectionStatus,
    ) -> ConnectionModel {
        ConnectionModel {
            id: Uuid::new_v4(),
            requester_id,
            recipient_id,
            status,
            created_at: Utc::now().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::connection;
    use super::*;

    #[test]
    fn partition_splits_by_role_and_status() {
        let me = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();

        let incoming = connection(alice, me, ConnectionStatus::Pending);
        let outgoing = connection(me, bob, ConnectionStatus::Pending);
        let active = connection(carol, me, ConnectionStatus::Accepted);
        let declined = connection(me, carol, ConnectionStatus::Declined);

        let partition = partition_connections(
            me,
            vec![
                incoming.clone(),
                outgoing.clone(),
                active.clone(),
                declined,
            ],
        );

        assert_eq!(partition.received.len(), 1);
        assert_eq!(partition.received[0].id, incoming.id);
        assert_eq!(partition.sent.len(), 1);
        assert_eq!(partition.sent[0].id, outgoing.id);
        assert_eq!(partition.active.len(), 1);
        assert_eq!(partition.active[0].id, active.id);
    }

    #[test]
    fn declined_connections_are_hidden() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        let partition = partition_connections(
            me,
            vec![
                connection(me, other, ConnectionStatus::Declined),
                connection(other, me, ConnectionStatus::Declined),
            ],
        );

        assert!(partition.received.is_empty());
        assert!(partition.sent.is_empty());
        assert!(partition.active.is_empty());
    }

    #[test]
    fn accepted_connections_are_active_in_both_directions() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        let as_requester =
            partition_connections(me, vec![connection(me, other, ConnectionStatus::Accepted)]);
        let as_recipient =
            partition_connections(me, vec![connection(other, me, ConnectionStatus::Accepted)]);

        assert_eq!(as_requester.active.len(), 1);
        assert_eq!(as_recipient.active.len(), 1);
    }

    #[test]
    fn counterpart_resolves_either_direction() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        let outgoing = connection(me, other, ConnectionStatus::Pending);
        let incoming = connection(other, me, ConnectionStatus::Pending);

        assert_eq!(counterpart_id(me, &outgoing), other);
        assert_eq!(counterpart_id(me, &incoming), other);
    }
}
