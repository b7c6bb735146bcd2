//! Audit metadata shared by every aggregate.

use chrono::{DateTime, Utc};

/// Who touched a record and when, for both the creation and the latest
/// update side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditTrail {
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_by: i64,
    pub updated_at: DateTime<Utc>,
}

impl AuditTrail {
    /// Stamp a freshly created record: the creator and timestamp cover both
    /// the creation and the update side.
    pub fn stamp_created(actor: i64, at: DateTime<Utc>) -> Self {
        Self {
            created_by: actor,
            created_at: at,
            updated_by: actor,
            updated_at: at,
        }
    }

    /// Carry the creation side forward untouched and restamp the update side.
    pub fn stamp_updated(self, actor: i64, at: DateTime<Utc>) -> Self {
        Self {
            updated_by: actor,
            updated_at: at,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_stamp_covers_both_sides() {
        let now = Utc::now();
        let audit = AuditTrail::stamp_created(7, now);
        assert_eq!(audit.created_by, 7);
        assert_eq!(audit.updated_by, 7);
        assert_eq!(audit.created_at, now);
        assert_eq!(audit.updated_at, now);
    }

    #[test]
    fn updated_stamp_preserves_creation_side() {
        let created = Utc::now();
        let audit = AuditTrail::stamp_created(7, created);
        let later = created + chrono::Duration::seconds(30);
        let updated = audit.stamp_updated(9, later);
        assert_eq!(updated.created_by, 7);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_by, 9);
        assert_eq!(updated.updated_at, later);
    }
}
