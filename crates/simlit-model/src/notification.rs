use crate::ids::{NotificationId, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workflow notification as delivered to one user.
///
/// Created by the backend as a transition side effect; the client only ever
/// marks it read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub read: bool,
    #[serde(rename = "relatedId", default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<ProposalId>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Read/unread counters shown next to the bell icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    #[serde(rename = "totalRead")]
    pub total_read: usize,
    #[serde(rename = "totalUnread")]
    pub total_unread: usize,
}

/// Compute the summary counters for a notification list.
#[must_use]
pub fn summarize(notifications: &[Notification]) -> NotificationSummary {
    let total_unread = notifications.iter().filter(|n| !n.read).count();
    NotificationSummary {
        total_read: notifications.len() - total_unread,
        total_unread,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: i64, read: bool) -> Notification {
        Notification {
            id: NotificationId(id),
            message: "Proposal menunggu persetujuan Anda".into(),
            read,
            related_id: Some(ProposalId(4)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summary_counts_read_and_unread() {
        let list = vec![notification(1, true), notification(2, false), notification(3, false)];
        let summary = summarize(&list);
        assert_eq!(summary.total_read, 1);
        assert_eq!(summary.total_unread, 2);
    }

    #[test]
    fn empty_list_summary_is_zero() {
        assert_eq!(summarize(&[]), NotificationSummary::default());
    }
}
