use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub weekly_report: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            weekly_report: true,
        }
    }
}

/// Per-user settings document. One item per user, last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    pub theme: Theme,
    pub currency: String,
    pub language: String,
    pub notifications: NotificationSettings,
    pub default_category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserPreferences {
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            theme: Theme::Light,
            currency: "USD".into(),
            language: "en".into(),
            notifications: NotificationSettings::default(),
            default_category: "Other".into(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePreferencesRequest {
    pub theme: Option<Theme>,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub notifications: Option<NotificationSettings>,
    pub default_category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedPreferencesResponse {
    pub message: String,
    pub preferences: UserPreferences,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let prefs = UserPreferences::default_for("auth0|user-1");
        assert_eq!(prefs.user_id, "auth0|user-1");
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.currency, "USD");
        assert_eq!(prefs.language, "en");
        assert!(prefs.notifications.email);
        assert!(!prefs.notifications.push);
        assert!(prefs.notifications.weekly_report);
        assert_eq!(prefs.default_category, "Other");
    }

    #[test]
    fn preferences_serialize_with_camel_case_keys() {
        let prefs = UserPreferences::default_for("auth0|user-1");
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["userId"], "auth0|user-1");
        assert_eq!(json["theme"], "light");
        assert_eq!(json["defaultCategory"], "Other");
        assert_eq!(json["notifications"]["weeklyReport"], true);
        assert!(json["updatedAt"].is_string());
    }
}
