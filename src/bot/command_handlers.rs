//! Command Handlers module for slash commands and main menu actions

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

use crate::dialogue::{CellDialogue, CellDialogueState};
use crate::localization::{t_args_lang, t_lang};
use crate::observability::{self, UserAction};

use super::ui_builder::{
    create_main_menu_keyboard, format_help_message, remove_keyboard, MenuAction,
};
use super::HandlerContext;

/// Slash commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Check,
    SetMax,
    ShowMax,
    Cancel,
    Reset,
    Unknown,
}

impl BotCommand {
    /// Parse a message starting with `/`, ignoring any `@botname` suffix
    /// and trailing arguments. Returns `None` for plain text.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        Some(match name.as_str() {
            "start" => BotCommand::Start,
            "help" => BotCommand::Help,
            "check" => BotCommand::Check,
            "setmax" => BotCommand::SetMax,
            "showmax" => BotCommand::ShowMax,
            "cancel" => BotCommand::Cancel,
            "reset" => BotCommand::Reset,
            _ => BotCommand::Unknown,
        })
    }
}

impl From<MenuAction> for BotCommand {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::CheckCell => BotCommand::Check,
            MenuAction::SetMaxCell => BotCommand::SetMax,
            MenuAction::ShowMaxCell => BotCommand::ShowMax,
            MenuAction::Help => BotCommand::Help,
        }
    }
}

/// Run a command or menu action.
///
/// Any pending prompt is replaced: commands always win over a half-finished
/// flow.
pub async fn handle_command(
    ctx: &HandlerContext<'_>,
    dialogue: &CellDialogue,
    command: BotCommand,
) -> Result<()> {
    debug!(chat_id = %ctx.msg.chat.id, command = ?command, "Handling command");

    match command {
        BotCommand::Start => {
            dialogue.reset().await?;
            handle_start_command(ctx).await
        }
        BotCommand::Help => {
            dialogue.reset().await?;
            handle_help_command(ctx).await
        }
        BotCommand::Check => handle_check_command(ctx, dialogue).await,
        BotCommand::SetMax => handle_setmax_command(ctx, dialogue).await,
        BotCommand::ShowMax => {
            dialogue.reset().await?;
            handle_showmax_command(ctx).await
        }
        BotCommand::Cancel => handle_cancel_command(ctx, dialogue).await,
        BotCommand::Reset => {
            dialogue.reset().await?;
            handle_reset_command(ctx).await
        }
        BotCommand::Unknown => {
            dialogue.reset().await?;
            send_with_menu(ctx, t_lang(ctx.localization, "use-menu", ctx.language_code)).await
        }
    }
}

fn record_action(ctx: &HandlerContext<'_>, action: UserAction) {
    observability::record_user_action(ctx.msg.chat.id.0, action, ctx.language_code);
}

/// Send an HTML message with the main menu attached
pub async fn send_with_menu(ctx: &HandlerContext<'_>, text: String) -> Result<()> {
    ctx.bot
        .send_message(ctx.msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(create_main_menu_keyboard(ctx.localization, ctx.language_code))
        .await?;
    Ok(())
}

/// Send a prompt with the menu hidden, then wait for `state`
async fn prompt(
    ctx: &HandlerContext<'_>,
    dialogue: &CellDialogue,
    key: &str,
    state: CellDialogueState,
) -> Result<()> {
    ctx.bot
        .send_message(ctx.msg.chat.id, t_lang(ctx.localization, key, ctx.language_code))
        .reply_markup(remove_keyboard())
        .await?;
    dialogue.update(state).await?;
    Ok(())
}

/// Handle the /start command
pub async fn handle_start_command(ctx: &HandlerContext<'_>) -> Result<()> {
    record_action(ctx, UserAction::StartCommand);
    send_with_menu(ctx, t_lang(ctx.localization, "welcome", ctx.language_code)).await
}

/// Handle the /help command
pub async fn handle_help_command(ctx: &HandlerContext<'_>) -> Result<()> {
    record_action(ctx, UserAction::HelpCommand);
    send_with_menu(ctx, format_help_message(ctx.localization, ctx.language_code)).await
}

/// Handle the /check command: ask for a cell number
pub async fn handle_check_command(ctx: &HandlerContext<'_>, dialogue: &CellDialogue) -> Result<()> {
    record_action(ctx, UserAction::CheckCell);
    prompt(ctx, dialogue, "prompt-cell", CellDialogueState::WaitingForCellNumber).await
}

/// Handle the /setmax command: ask for the new maximum
pub async fn handle_setmax_command(
    ctx: &HandlerContext<'_>,
    dialogue: &CellDialogue,
) -> Result<()> {
    record_action(ctx, UserAction::SetMaxCell);
    prompt(ctx, dialogue, "prompt-max", CellDialogueState::WaitingForMaxCell).await
}

/// Handle the /showmax command
pub async fn handle_showmax_command(ctx: &HandlerContext<'_>) -> Result<()> {
    record_action(ctx, UserAction::ShowMaxCell);
    let value = ctx.settings.max_cell(ctx.msg.chat.id).to_string();
    let text = t_args_lang(
        ctx.localization,
        "show-max",
        &[("value", value.as_str())],
        ctx.language_code,
    );
    send_with_menu(ctx, text).await
}

/// Handle the /cancel command
pub async fn handle_cancel_command(
    ctx: &HandlerContext<'_>,
    dialogue: &CellDialogue,
) -> Result<()> {
    record_action(ctx, UserAction::Cancel);
    let pending = dialogue.get().await?.unwrap_or_default().is_pending();
    dialogue.reset().await?;

    let key = if pending { "cancelled" } else { "nothing-to-cancel" };
    send_with_menu(ctx, t_lang(ctx.localization, key, ctx.language_code)).await
}

/// Handle the /reset command: forget the chat's settings
pub async fn handle_reset_command(ctx: &HandlerContext<'_>) -> Result<()> {
    record_action(ctx, UserAction::Reset);
    ctx.settings.reset(ctx.msg.chat.id);
    let value = ctx.settings.max_cell(ctx.msg.chat.id).to_string();
    let text = t_args_lang(
        ctx.localization,
        "reset-done",
        &[("value", value.as_str())],
        ctx.language_code,
    );
    send_with_menu(ctx, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/setmax@cell_finder_bot"), Some(BotCommand::SetMax));
        assert_eq!(BotCommand::parse("  /SHOWMAX  "), Some(BotCommand::ShowMax));
        assert_eq!(BotCommand::parse("/check 105"), Some(BotCommand::Check));
        assert_eq!(BotCommand::parse("/unknown"), Some(BotCommand::Unknown));
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(BotCommand::parse("105"), None);
        assert_eq!(BotCommand::parse(""), None);
        assert_eq!(BotCommand::parse("hello /start"), None);
    }

    #[test]
    fn test_menu_actions_map_to_commands() {
        assert_eq!(BotCommand::from(MenuAction::CheckCell), BotCommand::Check);
        assert_eq!(BotCommand::from(MenuAction::Help), BotCommand::Help);
    }
}
