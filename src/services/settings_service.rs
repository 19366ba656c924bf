//! Settings Service - owner-only access to per-user preferences

use std::sync::Arc;

use crate::domain::{DomainError, Settings, SettingsChanges, SettingsRepository};

/// Accepts tags like `en`, `pt-BR`, `zh-Hant`
pub fn validate_language(language: &str) -> Result<(), DomainError> {
    let valid = (2..=8).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        && !language.starts_with('-')
        && !language.ends_with('-');

    if !valid {
        return Err(DomainError::validation(format!(
            "'{}' is not a valid language tag",
            language
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct SettingsService {
    settings: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self { settings }
    }

    pub async fn get_settings(
        &self,
        acting_user_id: i32,
        user_id: i32,
    ) -> Result<Settings, DomainError> {
        if acting_user_id != user_id {
            return Err(DomainError::authorization(
                "users can only read their own settings",
            ));
        }

        self.settings
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_settings(
        &self,
        acting_user_id: i32,
        user_id: i32,
        changes: SettingsChanges,
    ) -> Result<Settings, DomainError> {
        if acting_user_id != user_id {
            return Err(DomainError::authorization(
                "users can only change their own settings",
            ));
        }

        if let Some(language) = &changes.language {
            validate_language(language)?;
        }

        self.settings.update(user_id, changes).await
    }
}
