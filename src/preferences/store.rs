use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{types::AttributeValue, Client};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::dto::{NotificationSettings, Theme, UserPreferences};

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<UserPreferences>>;
    async fn put(&self, prefs: &UserPreferences) -> anyhow::Result<()>;
}

pub struct DynamoPreferences {
    client: Client,
    table: String,
}

impl DynamoPreferences {
    pub async fn new(table: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: Client::new(&shared),
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl PreferenceStore for DynamoPreferences {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<UserPreferences>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .context("dynamodb get_item")?;

        Ok(response.item.map(|item| from_item(user_id, &item)))
    }

    async fn put(&self, prefs: &UserPreferences) -> anyhow::Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(prefs)))
            .send()
            .await
            .context("dynamodb put_item")?;
        Ok(())
    }
}

pub fn to_item(prefs: &UserPreferences) -> HashMap<String, AttributeValue> {
    let notifications = HashMap::from([
        (
            "email".to_string(),
            AttributeValue::Bool(prefs.notifications.email),
        ),
        (
            "push".to_string(),
            AttributeValue::Bool(prefs.notifications.push),
        ),
        (
            "weeklyReport".to_string(),
            AttributeValue::Bool(prefs.notifications.weekly_report),
        ),
    ]);
    let updated_at = prefs
        .updated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| prefs.updated_at.to_string());

    HashMap::from([
        (
            "userId".to_string(),
            AttributeValue::S(prefs.user_id.clone()),
        ),
        (
            "theme".to_string(),
            AttributeValue::S(prefs.theme.as_str().to_string()),
        ),
        (
            "currency".to_string(),
            AttributeValue::S(prefs.currency.clone()),
        ),
        (
            "language".to_string(),
            AttributeValue::S(prefs.language.clone()),
        ),
        (
            "notifications".to_string(),
            AttributeValue::M(notifications),
        ),
        (
            "defaultCategory".to_string(),
            AttributeValue::S(prefs.default_category.clone()),
        ),
        ("updatedAt".to_string(), AttributeValue::S(updated_at)),
    ])
}

/// Maps a stored item back onto the preferences shape. Missing or malformed
/// attributes fall back to the documented defaults rather than failing the read.
pub fn from_item(user_id: &str, item: &HashMap<String, AttributeValue>) -> UserPreferences {
    let defaults = UserPreferences::default_for(user_id);

    let theme = match string_attr(item, "theme").as_deref() {
        Some("dark") => Theme::Dark,
        Some("light") => Theme::Light,
        _ => defaults.theme,
    };
    let notifications = item
        .get("notifications")
        .and_then(|v| v.as_m().ok())
        .map(|m| NotificationSettings {
            email: bool_attr(m, "email").unwrap_or(defaults.notifications.email),
            push: bool_attr(m, "push").unwrap_or(defaults.notifications.push),
            weekly_report: bool_attr(m, "weeklyReport")
                .unwrap_or(defaults.notifications.weekly_report),
        })
        .unwrap_or(defaults.notifications);
    let updated_at = string_attr(item, "updatedAt")
        .and_then(|s| OffsetDateTime::parse(&s, &Rfc3339).ok())
        .unwrap_or(defaults.updated_at);

    UserPreferences {
        user_id: user_id.to_string(),
        theme,
        currency: string_attr(item, "currency").unwrap_or(defaults.currency),
        language: string_attr(item, "language").unwrap_or(defaults.language),
        notifications,
        default_category: string_attr(item, "defaultCategory").unwrap_or(defaults.default_category),
        updated_at,
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn bool_attr(item: &HashMap<String, AttributeValue>, key: &str) -> Option<bool> {
    item.get(key).and_then(|v| v.as_bool().ok()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn item_round_trips_through_attribute_values() {
        let prefs = UserPreferences {
            user_id: "auth0|user-1".into(),
            theme: Theme::Dark,
            currency: "EUR".into(),
            language: "de".into(),
            notifications: NotificationSettings {
                email: false,
                push: true,
                weekly_report: false,
            },
            default_category: "Groceries".into(),
            updated_at: datetime!(2025-06-01 12:00 UTC),
        };

        let item = to_item(&prefs);
        let restored = from_item("auth0|user-1", &item);

        assert_eq!(restored.theme, Theme::Dark);
        assert_eq!(restored.currency, "EUR");
        assert_eq!(restored.language, "de");
        assert!(restored.notifications.push);
        assert!(!restored.notifications.email);
        assert_eq!(restored.default_category, "Groceries");
        assert_eq!(restored.updated_at, prefs.updated_at);
    }

    #[test]
    fn missing_attributes_fall_back_to_defaults() {
        let item = HashMap::from([(
            "userId".to_string(),
            AttributeValue::S("auth0|user-1".into()),
        )]);
        let restored = from_item("auth0|user-1", &item);
        assert_eq!(restored.theme, Theme::Light);
        assert_eq!(restored.currency, "USD");
        assert_eq!(restored.default_category, "Other");
        assert!(restored.notifications.email);
    }
}
