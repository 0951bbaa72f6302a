//! UI Builder module for creating keyboards and formatting messages

use std::sync::Arc;

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove};

use crate::localization::{t_args_lang, t_lang, LocalizationManager, SUPPORTED_LANGUAGES};
use crate::similar_cells::SimilarityReport;
use crate::validation::{MAX_MAX_CELL, MIN_MAX_CELL};

use super::dialogue_manager::{CellCheckOutcome, MaxCellOutcome};

/// Numbers shown per line in a candidate list
pub const CANDIDATES_PER_LINE: usize = 6;

/// Keeps Telegram clients from turning numbers into links or phone numbers
const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Actions reachable from the reply-keyboard main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CheckCell,
    SetMaxCell,
    ShowMaxCell,
    Help,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::CheckCell,
        MenuAction::SetMaxCell,
        MenuAction::ShowMaxCell,
        MenuAction::Help,
    ];

    /// Localization key of the button label
    pub fn label_key(self) -> &'static str {
        match self {
            MenuAction::CheckCell => "menu-check",
            MenuAction::SetMaxCell => "menu-setmax",
            MenuAction::ShowMaxCell => "menu-showmax",
            MenuAction::Help => "menu-help",
        }
    }

    /// Match a message against the button labels of every supported language.
    ///
    /// The keyboard a user sees may have been built for a different language
    /// than the one their client reports now.
    pub fn from_text(text: &str, localization: &LocalizationManager) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|action| {
            SUPPORTED_LANGUAGES.iter().any(|lang| {
                localization.get_message_in_language(action.label_key(), lang, None) == text
            })
        })
    }
}

/// Reply keyboard with the four main menu buttons, two per row
pub fn create_main_menu_keyboard(
    localization: &Arc<LocalizationManager>,
    language_code: Option<&str>,
) -> KeyboardMarkup {
    let buttons: Vec<KeyboardButton> = MenuAction::ALL
        .into_iter()
        .map(|action| KeyboardButton::new(t_lang(localization, action.label_key(), language_code)))
        .collect();

    let rows: Vec<Vec<KeyboardButton>> = buttons.chunks(2).map(|row| row.to_vec()).collect();

    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Hides the main menu while the bot waits for a typed number
pub fn remove_keyboard() -> KeyboardRemove {
    KeyboardRemove::new()
}

/// Lay candidates out in lines of [`CANDIDATES_PER_LINE`]
pub fn format_candidate_lines(candidates: &[u64]) -> Vec<String> {
    candidates
        .chunks(CANDIDATES_PER_LINE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|num| format!("{}{}", ZERO_WIDTH_SPACE, num))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

/// Full reply for a non-empty candidate list, with the rotation notice
pub fn format_similar_cells(
    report: &SimilarityReport,
    localization: &Arc<LocalizationManager>,
    language_code: Option<&str>,
) -> String {
    let mut reply = t_lang(localization, "similar-header", language_code);
    reply.push('\n');

    for line in format_candidate_lines(&report.candidates) {
        reply.push_str(&line);
        reply.push('\n');
    }

    if report.rotated {
        reply.push('\n');
        reply.push_str(&t_lang(localization, "rotation-notice", language_code));
    }

    reply
}

/// Reply text for a cell check
pub fn format_cell_check_reply(
    outcome: &CellCheckOutcome,
    localization: &Arc<LocalizationManager>,
    language_code: Option<&str>,
) -> String {
    match outcome {
        CellCheckOutcome::NotANumber => t_lang(localization, "cell-not-a-number", language_code),
        CellCheckOutcome::OutOfRange { max_cell } => {
            let max = max_cell.to_string();
            t_args_lang(localization, "cell-out-of-range", &[("max", max.as_str())], language_code)
        }
        CellCheckOutcome::NoCandidates => t_lang(localization, "no-similar", language_code),
        CellCheckOutcome::Candidates(report) => {
            format_similar_cells(report, localization, language_code)
        }
    }
}

/// Reply text for a maximum cell update
pub fn format_max_cell_reply(
    outcome: &MaxCellOutcome,
    localization: &Arc<LocalizationManager>,
    language_code: Option<&str>,
) -> String {
    match outcome {
        MaxCellOutcome::Updated(value) => {
            let value = value.to_string();
            t_args_lang(localization, "max-updated", &[("value", value.as_str())], language_code)
        }
        MaxCellOutcome::OutOfRange => {
            let (min, max) = (MIN_MAX_CELL.to_string(), MAX_MAX_CELL.to_string());
            t_args_lang(
                localization,
                "max-out-of-range",
                &[("min", min.as_str()), ("max", max.as_str())],
                language_code,
            )
        }
        MaxCellOutcome::NotANumber => t_lang(localization, "max-not-a-number", language_code),
    }
}

/// Help text with the accepted maximum range filled in
pub fn format_help_message(
    localization: &Arc<LocalizationManager>,
    language_code: Option<&str>,
) -> String {
    let (min, max) = (MIN_MAX_CELL.to_string(), MAX_MAX_CELL.to_string());
    t_args_lang(
        localization,
        "help",
        &[("min", min.as_str()), ("max", max.as_str())],
        language_code,
    )
}
