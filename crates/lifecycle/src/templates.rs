//! Notification content for the four lifecycle alert classes.

use assetwatch_core::notification::{
    METADATA_ASSET_ID, TYPE_ASSET_MAINTENANCE, TYPE_MAINTENANCE_OVERDUE, TYPE_WARRANTY_EXPIRING_SOON,
    TYPE_WARRANTY_EXPIRY,
};
use assetwatch_core::types::{DbId, Timestamp};
use assetwatch_db::models::asset::Asset;
use serde_json::{json, Value};

/// Rendered notification, identical for every recipient of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationTemplate {
    pub notification_type: &'static str,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    /// Always carries the source asset id under [`METADATA_ASSET_ID`].
    pub metadata: Value,
    pub dedup_key: Option<String>,
}

fn asset_link(asset_id: DbId) -> Option<String> {
    Some(format!("/assets/{asset_id}"))
}

fn asset_label(asset: &Asset) -> String {
    format!("{} ({})", asset.name, asset.asset_code)
}

fn plural_days(days: i64) -> &'static str {
    if days == 1 {
        "day"
    } else {
        "days"
    }
}

/// An asset was moved into maintenance, automatically or by an operator.
///
/// The key is unique per transition instant; the transition itself is what
/// keeps this alert from repeating.
pub fn asset_maintenance(asset: &Asset, reason: &str, now: Timestamp) -> NotificationTemplate {
    NotificationTemplate {
        notification_type: TYPE_ASSET_MAINTENANCE,
        title: format!("{} moved to maintenance", asset.asset_code),
        body: format!(
            "{} has been placed under maintenance (reason: {reason}). New issue reports are blocked until maintenance is completed.",
            asset_label(asset)
        ),
        link: asset_link(asset.id),
        metadata: json!({
            METADATA_ASSET_ID: asset.id,
            "asset_code": asset.asset_code,
            "reason": reason,
        }),
        dedup_key: Some(format!(
            "{TYPE_ASSET_MAINTENANCE}:{}:{}",
            asset.id,
            now.timestamp()
        )),
    }
}

pub fn maintenance_overdue(asset: &Asset, days: i64, dedup_key: String) -> NotificationTemplate {
    NotificationTemplate {
        notification_type: TYPE_MAINTENANCE_OVERDUE,
        title: format!("Maintenance overdue: {}", asset.asset_code),
        body: format!(
            "{} has been under maintenance for {days} {}. Please review its progress.",
            asset_label(asset),
            plural_days(days)
        ),
        link: asset_link(asset.id),
        metadata: json!({
            METADATA_ASSET_ID: asset.id,
            "asset_code": asset.asset_code,
            "days_in_maintenance": days,
            "maintenance_reason": asset.maintenance_reason,
        }),
        dedup_key: Some(dedup_key),
    }
}

pub fn warranty_expired(asset: &Asset, dedup_key: String) -> NotificationTemplate {
    NotificationTemplate {
        notification_type: TYPE_WARRANTY_EXPIRY,
        title: format!("Warranty expired: {}", asset.asset_code),
        body: format!(
            "The warranty for {} has expired. Repairs are no longer covered.",
            asset_label(asset)
        ),
        link: asset_link(asset.id),
        metadata: json!({
            METADATA_ASSET_ID: asset.id,
            "asset_code": asset.asset_code,
            "warranty_expiry": asset.warranty_expiry,
        }),
        dedup_key: Some(dedup_key),
    }
}

pub fn warranty_expiring(
    asset: &Asset,
    days_remaining: i64,
    dedup_key: String,
) -> NotificationTemplate {
    let when = match days_remaining {
        0 => "today".to_string(),
        n => format!("in {n} {}", plural_days(n)),
    };
    NotificationTemplate {
        notification_type: TYPE_WARRANTY_EXPIRING_SOON,
        title: format!("Warranty expiring soon: {}", asset.asset_code),
        body: format!("The warranty for {} expires {when}.", asset_label(asset)),
        link: asset_link(asset.id),
        metadata: json!({
            METADATA_ASSET_ID: asset.id,
            "asset_code": asset.asset_code,
            "warranty_expiry": asset.warranty_expiry,
            "days_remaining": days_remaining,
        }),
        dedup_key: Some(dedup_key),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn asset() -> Asset {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Asset {
            id: 12,
            organization_id: 1,
            asset_code: "LAP-012".into(),
            name: "Laptop".into(),
            condition: "good".into(),
            status: "available".into(),
            maintenance_reason: None,
            maintenance_start_date: None,
            maintenance_completed_date: None,
            last_health_check: None,
            purchase_date: None,
            warranty_expiry: None,
            assigned_to: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn every_template_carries_the_asset_id() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let a = asset();
        for t in [
            asset_maintenance(&a, "age", now),
            maintenance_overdue(&a, 3, "k".into()),
            warranty_expired(&a, "k".into()),
            warranty_expiring(&a, 10, "k".into()),
        ] {
            assert_eq!(t.metadata[METADATA_ASSET_ID], 12);
            assert_eq!(t.link.as_deref(), Some("/assets/12"));
        }
    }

    #[test]
    fn expiring_body_mentions_days_remaining() {
        let t = warranty_expiring(&asset(), 1, "k".into());
        assert!(t.body.ends_with("expires in 1 day."));
        let t = warranty_expiring(&asset(), 0, "k".into());
        assert!(t.body.ends_with("expires today."));
        assert_eq!(t.metadata["days_remaining"], 0);
    }
}
