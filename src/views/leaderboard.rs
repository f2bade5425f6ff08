//! Leaderboard tally over accepted connections.
//!
//! Each accepted row credits both participants with one connection. Ranking
//! is by count descending; ties break on user ID ascending so the output is
//! stable across requests.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::connection::Model as ConnectionModel;

/// One leaderboard row before profile enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub accepted_count: u64,
    /// 1-based rank; equal counts still get distinct ranks in tie-break order
    pub rank: u64,
}

/// Tallies accepted connections per participant and returns the top
/// `limit` entries.
///
/// Callers must pass only accepted rows; the tally does not re-check status.
pub fn compute_leaderboard(accepted: &[ConnectionModel], limit: usize) -> Vec<LeaderboardEntry> {
    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for conn in accepted {
        *counts.entry(conn.requester_id).or_insert(0) += 1;
        *counts.entry(conn.recipient_id).or_insert(0) += 1;
    }

    let mut entries: Vec<(Uuid, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (user_id, accepted_count))| LeaderboardEntry {
            user_id,
            accepted_count,
            rank: (i + 1) as u64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::connection::ConnectionStatus;
    use crate::views::test_support::connection;

    #[test]
    fn each_accepted_row_credits_both_participants() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();

        let entries = compute_leaderboard(&[connection(x, y, ConnectionStatus::Accepted)], 10);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.accepted_count == 1));
    }

    #[test]
    fn ranking_is_by_count_descending() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let z = Uuid::new_v4();

        // x is on two accepted connections, y and z on one each.
        let rows = vec![
            connection(x, y, ConnectionStatus::Accepted),
            connection(z, x, ConnectionStatus::Accepted),
        ];

        let entries = compute_leaderboard(&rows, 10);

        assert_eq!(entries[0].user_id, x);
        assert_eq!(entries[0].accepted_count, 2);
        assert_eq!(entries[0].rank, 1);
        assert!(entries[1..].iter().all(|e| e.accepted_count == 1));
    }

    #[test]
    fn ties_break_on_user_id_for_stable_output() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();

        let rows = vec![connection(x, y, ConnectionStatus::Accepted)];

        let first = compute_leaderboard(&rows, 10);
        let second = compute_leaderboard(&rows, 10);

        assert_eq!(first, second);
        assert!(first[0].user_id < first[1].user_id);
    }

    #[test]
    fn limit_truncates_entries() {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let rows = vec![
            connection(users[0], users[1], ConnectionStatus::Accepted),
            connection(users[2], users[3], ConnectionStatus::Accepted),
        ];

        let entries = compute_leaderboard(&rows, 3);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.last().unwrap().rank, 3);
    }

    #[test]
    fn no_accepted_rows_means_empty_leaderboard() {
        assert!(compute_leaderboard(&[], 3).is_empty());
    }
}
