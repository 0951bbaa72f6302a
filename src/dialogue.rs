//! Dialogue module for the "ask, then wait for the next message" flows.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// What the bot is waiting for in a chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellDialogueState {
    #[default]
    Start,
    /// Next text message is the cell to check
    WaitingForCellNumber,
    /// Next text message is the new maximum cell number
    WaitingForMaxCell,
}

impl CellDialogueState {
    pub fn is_pending(&self) -> bool {
        !matches!(self, CellDialogueState::Start)
    }
}

/// Type alias for our cell dialogue
pub type CellDialogue = Dialogue<CellDialogueState, InMemStorage<CellDialogueState>>;
