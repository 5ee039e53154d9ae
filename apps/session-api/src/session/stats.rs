//! Engagement counters: distinct users per tenant and per day.
//!
//! Counting is delegated to the store's approximate-distinct primitive, so
//! adding the same user repeatedly leaves the estimate unchanged and storage
//! does not grow with cardinality.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use im_common::keys::{statistics_dau_key, statistics_users_key};
use im_common::{AppId, UserScope};

use crate::db::kv::KeyValueStore;
use crate::error::SessionError;

#[derive(Clone)]
pub struct Statistics {
    kv: Arc<dyn KeyValueStore>,
}

impl Statistics {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Record the user in the tenant's all-time user count.
    pub async fn count_user(&self, scope: UserScope) {
        self.add(statistics_users_key(scope.app_id), scope).await
    }

    /// Record the user as active today (local calendar date).
    pub async fn count_dau(&self, scope: UserScope) {
        self.count_dau_on(scope, Local::now().date_naive()).await
    }

    pub async fn count_dau_on(&self, scope: UserScope, date: NaiveDate) {
        self.add(statistics_dau_key(date, scope.app_id), scope).await
    }

    pub async fn estimated_users(&self, app_id: AppId) -> Result<u64, SessionError> {
        Ok(self.kv.pfcount(&statistics_users_key(app_id)).await?)
    }

    pub async fn estimated_dau(&self, app_id: AppId, date: NaiveDate) -> Result<u64, SessionError> {
        Ok(self.kv.pfcount(&statistics_dau_key(date, app_id)).await?)
    }

    async fn add(&self, key: String, scope: UserScope) {
        let member = scope.user_id.to_string();
        if let Err(e) = self.kv.pfadd(&key, member.as_bytes()).await {
            tracing::info!(?e, %key, "pfadd failed");
        }
    }
}
