//! Dialogue Manager module for the two-step "ask, then read the answer" flows
//!
//! Evaluation of the user's answer is kept free of Telegram types
//! ([`evaluate_cell_input`], [`apply_max_cell_input`]); the async handlers
//! only send the rendered reply and clear the pending action.

use anyhow::Result;
use std::time::Instant;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info};

use crate::dialogue::{CellDialogue, CellDialogueState};
use crate::errors::error_logging;
use crate::observability;
use crate::settings::ChatSettingsStore;
use crate::similar_cells::{analyze_cell, SimilarityReport};
use crate::validation::{parse_integer, validate_cell_number};

use super::ui_builder::{create_main_menu_keyboard, format_cell_check_reply, format_max_cell_reply};
use super::HandlerContext;

/// Result of checking one cell number
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellCheckOutcome {
    /// The text is not an integer
    NotANumber,
    /// The number is outside `[1, max_cell]`; nothing was generated
    OutOfRange { max_cell: u64 },
    /// The number is valid but nothing similar fits under the maximum
    NoCandidates,
    Candidates(SimilarityReport),
}

impl CellCheckOutcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            CellCheckOutcome::NotANumber => "not_a_number",
            CellCheckOutcome::OutOfRange { .. } => "out_of_range",
            CellCheckOutcome::NoCandidates => "no_candidates",
            CellCheckOutcome::Candidates(_) => "candidates",
        }
    }
}

/// Result of a maximum cell update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCellOutcome {
    Updated(u64),
    /// Outside `[10, 2000]`; the previous setting is kept
    OutOfRange,
    NotANumber,
}

/// Check a typed cell number against the chat's maximum.
///
/// The range check happens before any generation.
pub fn evaluate_cell_input(text: &str, max_cell: u64) -> CellCheckOutcome {
    let value = match parse_integer(text) {
        Ok(value) => value,
        Err(_) => return CellCheckOutcome::NotANumber,
    };

    let number = match validate_cell_number(value, max_cell) {
        Ok(number) => number,
        Err(_) => return CellCheckOutcome::OutOfRange { max_cell },
    };

    let span = observability::generation_span(number, max_cell);
    let _enter = span.enter();

    let started = Instant::now();
    let report = analyze_cell(number, max_cell);
    observability::record_candidate_generation(
        report.candidates.len(),
        report.rotated,
        started.elapsed(),
    );

    debug!(
        number,
        max_cell,
        candidate_count = report.candidates.len(),
        rotated = report.rotated,
        "Generated similar cells"
    );

    if report.is_empty() {
        CellCheckOutcome::NoCandidates
    } else {
        CellCheckOutcome::Candidates(report)
    }
}

/// Parse and store a new maximum cell number for a chat
pub fn apply_max_cell_input(
    settings: &ChatSettingsStore,
    chat_id: ChatId,
    text: &str,
) -> MaxCellOutcome {
    let value = match parse_integer(text) {
        Ok(value) => value,
        Err(_) => return MaxCellOutcome::NotANumber,
    };

    match settings.set_max_cell(chat_id, value) {
        Ok(max_cell) => MaxCellOutcome::Updated(max_cell),
        Err(_) => MaxCellOutcome::OutOfRange,
    }
}

/// Answer a cell number, either typed after the prompt or sent directly
pub async fn handle_cell_input(ctx: &HandlerContext<'_>, text: &str) -> Result<()> {
    let chat_id = ctx.msg.chat.id;
    let max_cell = ctx.settings.max_cell(chat_id);

    let outcome = evaluate_cell_input(text, max_cell);
    observability::record_cell_check(outcome.label());

    match &outcome {
        CellCheckOutcome::NotANumber | CellCheckOutcome::OutOfRange { .. } => {
            error_logging::log_validation_error(
                &outcome.label(),
                "check_cell",
                Some(chat_id.0),
                "cell_number",
                Some(text),
            );
        }
        CellCheckOutcome::NoCandidates => {
            info!(chat_id = %chat_id, max_cell, "No similar cells found");
        }
        CellCheckOutcome::Candidates(report) => {
            info!(
                chat_id = %chat_id,
                number = report.number,
                candidate_count = report.candidates.len(),
                rotated = report.rotated,
                "Similar cells sent"
            );
        }
    }

    let reply = format_cell_check_reply(&outcome, ctx.localization, ctx.language_code);
    ctx.bot
        .send_message(chat_id, reply)
        .parse_mode(ParseMode::Html)
        .reply_markup(create_main_menu_keyboard(ctx.localization, ctx.language_code))
        .await?;
    Ok(())
}

/// Answer the new maximum typed after `/setmax`
pub async fn handle_max_cell_input(ctx: &HandlerContext<'_>, text: &str) -> Result<()> {
    let chat_id = ctx.msg.chat.id;

    let outcome = apply_max_cell_input(ctx.settings, chat_id, text);
    observability::record_max_cell_update(matches!(outcome, MaxCellOutcome::Updated(_)));

    if !matches!(outcome, MaxCellOutcome::Updated(_)) {
        error_logging::log_validation_error(
            &format!("{:?}", outcome),
            "set_max_cell",
            Some(chat_id.0),
            "max_cell",
            Some(text),
        );
    }

    let reply = format_max_cell_reply(&outcome, ctx.localization, ctx.language_code);
    ctx.bot
        .send_message(chat_id, reply)
        .parse_mode(ParseMode::Html)
        .reply_markup(create_main_menu_keyboard(ctx.localization, ctx.language_code))
        .await?;
    Ok(())
}

/// Consume the pending action of a chat, if any.
///
/// The pending tag is cleared before the answer is evaluated, so a failed
/// answer never leaves the chat waiting.
pub async fn take_pending_state(dialogue: &CellDialogue) -> Result<CellDialogueState> {
    let state = dialogue.get().await?.unwrap_or_default();
    if state.is_pending() {
        dialogue.reset().await?;
        debug!(chat_id = %dialogue.chat_id(), state = ?state, "Pending action consumed");
    }
    Ok(state)
}
