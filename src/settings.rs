//! Per-chat settings held for the lifetime of the process.
//!
//! Nothing is persisted: a restart brings every chat back to
//! [`DEFAULT_MAX_CELL`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use teloxide::types::ChatId;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::validation::{validate_max_cell, DEFAULT_MAX_CELL};

/// Settings for a single chat
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub max_cell: u64,
    pub updated_at: DateTime<Utc>,
}

/// Shared, thread-safe store of chat settings
#[derive(Debug, Default)]
pub struct ChatSettingsStore {
    settings: RwLock<HashMap<ChatId, ChatSettings>>,
}

impl ChatSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store ready to be shared between handlers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Maximum cell number for a chat, [`DEFAULT_MAX_CELL`] if never set
    pub fn max_cell(&self, chat_id: ChatId) -> u64 {
        self.settings
            .read()
            .get(&chat_id)
            .map(|s| s.max_cell)
            .unwrap_or(DEFAULT_MAX_CELL)
    }

    /// Full settings entry for a chat, if one was ever written
    pub fn get(&self, chat_id: ChatId) -> Option<ChatSettings> {
        self.settings.read().get(&chat_id).cloned()
    }

    /// Set the maximum cell number for a chat.
    ///
    /// Values outside `[10, 2000]` are rejected and the previous setting is
    /// kept.
    pub fn set_max_cell(&self, chat_id: ChatId, value: i64) -> AppResult<u64> {
        let max_cell = validate_max_cell(value).map_err(|key| {
            debug!(chat_id = %chat_id, value, "Rejected maximum cell setting");
            AppError::Validation(key.to_string())
        })?;

        self.settings.write().insert(
            chat_id,
            ChatSettings {
                max_cell,
                updated_at: Utc::now(),
            },
        );

        info!(chat_id = %chat_id, max_cell, "Maximum cell updated");
        Ok(max_cell)
    }

    /// Forget everything stored for a chat
    pub fn reset(&self, chat_id: ChatId) -> bool {
        self.settings.write().remove(&chat_id).is_some()
    }

    /// Number of chats with stored settings
    pub fn len(&self) -> usize {
        self.settings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.read().is_empty()
    }
}
