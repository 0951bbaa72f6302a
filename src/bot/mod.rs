//! Bot module for handling Telegram interactions
//!
//! - `message_handler`: routes incoming messages
//! - `command_handlers`: slash commands and menu actions
//! - `dialogue_manager`: answers to pending prompts
//! - `ui_builder`: keyboards and message formatting

pub mod command_handlers;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use teloxide::types::Message;
use teloxide::Bot;

use crate::localization::LocalizationManager;
use crate::settings::ChatSettingsStore;

/// Common context for bot handlers containing shared dependencies
#[derive(Debug)]
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub msg: &'a Message,
    pub localization: &'a Arc<LocalizationManager>,
    pub settings: &'a ChatSettingsStore,
    pub language_code: Option<&'a str>,
}

// Re-export main handler functions for use in main.rs
pub use message_handler::message_handler;

pub use command_handlers::BotCommand;
pub use dialogue_manager::{
    apply_max_cell_input, evaluate_cell_input, CellCheckOutcome, MaxCellOutcome,
};
pub use ui_builder::{
    create_main_menu_keyboard, format_cell_check_reply, format_max_cell_reply,
    format_similar_cells, MenuAction,
};
