//! Cache key and hash-field naming shared by every component that touches
//! per-user state.

use chrono::{Datelike, NaiveDate};

use crate::id::{AppId, GroupId, UserId};

/// Field holding the direct-stream sync cursor.
pub const SYNC_KEY_FIELD: &str = "sync_key";

/// Field holding the 0/1 forbidden flag.
pub const FORBIDDEN_FIELD: &str = "forbidden";

/// Field holding the unread counter.
pub const UNREAD_FIELD: &str = "unread";

/// Prefix of the per-group sync cursor fields.
pub const GROUP_SYNC_FIELD_PREFIX: &str = "group_sync_key_";

/// Global hash mapping raw token bytes to encoded auth payloads.
pub const ACCESS_TOKEN_TABLE: &str = "im_access_token";

pub fn user_record_key(app_id: AppId, user_id: UserId) -> String {
    format!("users_{}_{}", app_id, user_id)
}

/// Field name of a user's cursor for one group.
///
/// Distinct group IDs always yield distinct names, and none of them collide
/// with the fixed fields above.
pub fn group_sync_field(group_id: GroupId) -> String {
    format!("{}{}", GROUP_SYNC_FIELD_PREFIX, group_id)
}

/// Distinct-users counter for a tenant.
pub fn statistics_users_key(app_id: AppId) -> String {
    format!("statistics_users_{}", app_id)
}

/// Daily-active-users counter. The date is rendered without zero padding
/// (`2024_3_7`).
pub fn statistics_dau_key(date: NaiveDate, app_id: AppId) -> String {
    format!(
        "statistics_dau_{}_{}_{}_{}",
        date.year(),
        date.month(),
        date.day(),
        app_id
    )
}
