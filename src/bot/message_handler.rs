//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, Instrument};

use crate::dialogue::{CellDialogue, CellDialogueState};
use crate::errors::error_logging;
use crate::localization::{t_lang, LocalizationManager};
use crate::observability;
use crate::settings::ChatSettingsStore;
use crate::validation::parse_integer;

use super::command_handlers::{handle_command, send_with_menu, BotCommand};
use super::dialogue_manager::{handle_cell_input, handle_max_cell_input, take_pending_state};
use super::ui_builder::MenuAction;
use super::HandlerContext;

/// How a text message is going to be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRoute {
    Command(BotCommand),
    CellNumber,
    MaxCell,
    UseMenu,
}

/// Decide what a text message means.
///
/// Commands and menu buttons come first and replace any pending prompt.
/// Otherwise the pending prompt gets the text; with nothing pending, a bare
/// integer is treated as a cell to check.
pub fn route_text(
    text: &str,
    state: &CellDialogueState,
    localization: &LocalizationManager,
) -> TextRoute {
    if let Some(command) = BotCommand::parse(text) {
        return TextRoute::Command(command);
    }

    if let Some(action) = MenuAction::from_text(text, localization) {
        return TextRoute::Command(action.into());
    }

    match state {
        CellDialogueState::WaitingForCellNumber => TextRoute::CellNumber,
        CellDialogueState::WaitingForMaxCell => TextRoute::MaxCell,
        CellDialogueState::Start if parse_integer(text).is_ok() => TextRoute::CellNumber,
        CellDialogueState::Start => TextRoute::UseMenu,
    }
}

async fn handle_text_message(
    ctx: &HandlerContext<'_>,
    dialogue: CellDialogue,
    text: &str,
) -> Result<()> {
    debug!(chat_id = %ctx.msg.chat.id, message_length = text.len(), "Received text message");

    let state = dialogue.get().await?.unwrap_or_default();

    match route_text(text, &state, ctx.localization) {
        TextRoute::Command(command) => handle_command(ctx, &dialogue, command).await,
        TextRoute::CellNumber => {
            take_pending_state(&dialogue).await?;
            handle_cell_input(ctx, text).await
        }
        TextRoute::MaxCell => {
            take_pending_state(&dialogue).await?;
            handle_max_cell_input(ctx, text).await
        }
        TextRoute::UseMenu => {
            send_with_menu(ctx, t_lang(ctx.localization, "use-menu", ctx.language_code)).await
        }
    }
}

async fn handle_unsupported_message(
    ctx: &HandlerContext<'_>,
    dialogue: CellDialogue,
) -> Result<()> {
    debug!(chat_id = %ctx.msg.chat.id, "Received unsupported message type");

    // A photo or sticker is not an answer to a prompt
    take_pending_state(&dialogue).await?;
    send_with_menu(ctx, t_lang(ctx.localization, "use-menu", ctx.language_code)).await
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: CellDialogue,
    settings: Arc<ChatSettingsStore>,
    localization: Arc<LocalizationManager>,
) -> Result<()> {
    let span = observability::telegram_span("message_handler", Some(msg.chat.id.0));

    async move {
        let start_time = std::time::Instant::now();

        let language_code = msg
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_deref());

        let ctx = HandlerContext {
            bot: &bot,
            msg: &msg,
            localization: &localization,
            settings: &settings,
            language_code,
        };

        let result = match msg.text() {
            Some(text) => {
                observability::record_telegram_message("text");
                handle_text_message(&ctx, dialogue, text).await
            }
            None => {
                observability::record_telegram_message("unsupported");
                handle_unsupported_message(&ctx, dialogue).await
            }
        };

        let status = if result.is_ok() { 200 } else { 500 };
        if let Err(e) = &result {
            error_logging::log_telegram_error(e, "message_handler", Some(msg.chat.id.0));
            observability::record_error_metrics("handler", "telegram");
        }
        observability::record_request_metrics("telegram_message", status, start_time.elapsed());

        result
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::create_localization_manager;

    #[test]
    fn test_route_bare_number_without_prompt() {
        let localization =
            create_localization_manager().expect("Failed to create localization manager");
        assert_eq!(
            route_text("105", &CellDialogueState::Start, &localization),
            TextRoute::CellNumber
        );
        assert_eq!(
            route_text("hello", &CellDialogueState::Start, &localization),
            TextRoute::UseMenu
        );
    }

    #[test]
    fn test_route_pending_prompt() {
        let localization =
            create_localization_manager().expect("Failed to create localization manager");
        assert_eq!(
            route_text("500", &CellDialogueState::WaitingForMaxCell, &localization),
            TextRoute::MaxCell
        );
        // non-numeric answers still go to the prompt, which reports the error
        assert_eq!(
            route_text("abc", &CellDialogueState::WaitingForCellNumber, &localization),
            TextRoute::CellNumber
        );
    }

    #[test]
    fn test_commands_and_buttons_override_prompt() {
        let localization =
            create_localization_manager().expect("Failed to create localization manager");
        assert_eq!(
            route_text("/showmax", &CellDialogueState::WaitingForMaxCell, &localization),
            TextRoute::Command(BotCommand::ShowMax)
        );
        assert_eq!(
            route_text(
                "📏 Текущий максимум",
                &CellDialogueState::WaitingForCellNumber,
                &localization,
            ),
            TextRoute::Command(BotCommand::ShowMax)
        );
        assert_eq!(
            route_text("🔍 Check cell", &CellDialogueState::Start, &localization),
            TextRoute::Command(BotCommand::Check)
        );
    }
}
