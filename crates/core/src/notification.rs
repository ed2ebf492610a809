//! Notification type tags and dedup windows.
//!
//! Deduplication is keyed on `(asset, notification type, window)`. Callers
//! query for an existing notification inside the window before dispatching;
//! the bucketed [`dedup_key`] is additionally stored with every row so a
//! unique index turns a concurrent duplicate insert into a no-op.

use chrono::{Duration, FixedOffset};
use serde::Serialize;

use crate::calendar::{local_date, start_of_local_day};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Notification type constants
// ---------------------------------------------------------------------------

/// An asset was moved into maintenance.
pub const TYPE_ASSET_MAINTENANCE: &str = "asset_maintenance";
/// An asset has stayed in maintenance beyond the grace period.
pub const TYPE_MAINTENANCE_OVERDUE: &str = "maintenance_overdue";
/// An asset's warranty expired.
pub const TYPE_WARRANTY_EXPIRY: &str = "warranty_expiry";
/// An asset's warranty is about to expire.
pub const TYPE_WARRANTY_EXPIRING_SOON: &str = "warranty_expiring_soon";

/// Metadata key carrying the source asset id.
pub const METADATA_ASSET_ID: &str = "asset_id";

/// Amount a rolling window is shortened by, so a job firing once per window
/// length still re-alerts when it wakes slightly early or late.
pub const ROLLING_WINDOW_SLACK_MINUTES: i64 = 60;

// ---------------------------------------------------------------------------
// Dedup windows
// ---------------------------------------------------------------------------

/// Period within which a second alert of the same type for the same asset
/// counts as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupWindow {
    /// The current local calendar day.
    Today,
    /// The asset's whole lifetime.
    Ever,
    /// A rolling window ending at `now`, `days` long minus
    /// [`ROLLING_WINDOW_SLACK_MINUTES`].
    Rolling { days: i64 },
}

impl DedupWindow {
    /// Lower bound for the existence query, or `None` for an unbounded window.
    pub fn since(&self, now: Timestamp, offset: FixedOffset) -> Option<Timestamp> {
        match self {
            Self::Today => Some(start_of_local_day(now, offset)),
            Self::Ever => None,
            Self::Rolling { days } => Some(
                now - Duration::days(*days) + Duration::minutes(ROLLING_WINDOW_SLACK_MINUTES),
            ),
        }
    }

    /// Storage bucket identifying the window instance containing `now`.
    ///
    /// Rolling windows cannot be bucketed exactly; they use fixed epoch-aligned
    /// blocks of the same length. The existence query keeps the exact rolling
    /// semantics; the bucket only guards concurrent inserts.
    pub fn bucket(&self, now: Timestamp, offset: FixedOffset) -> String {
        match self {
            Self::Today => local_date(now, offset).format("%Y-%m-%d").to_string(),
            Self::Ever => "ever".to_string(),
            Self::Rolling { days } => {
                let span = (*days).max(1);
                let epoch_day = now.timestamp().div_euclid(86_400);
                format!("w{}", epoch_day.div_euclid(span))
            }
        }
    }
}

/// Deterministic dedup key stored with each notification row.
pub fn dedup_key(
    notification_type: &str,
    asset_id: DbId,
    window: DedupWindow,
    now: Timestamp,
    offset: FixedOffset,
) -> String {
    format!(
        "{notification_type}:{asset_id}:{}",
        window.bucket(now, offset)
    )
}
