//! Terminal colour policy and difficulty styling.

use console::{Style, StyledObject, style};
use is_terminal::IsTerminal;

use crate::types::Difficulty;

pub struct Theme;

impl Theme {
    /// Colours are off when `NO_COLOR` is set or stdout is not a terminal.
    pub fn should_disable_colors() -> bool {
        std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal()
    }

    pub fn difficulty_style(difficulty: Difficulty) -> Style {
        match difficulty {
            Difficulty::Easy => Style::new().green(),
            Difficulty::Medium => Style::new().yellow(),
            Difficulty::Hard => Style::new().red(),
        }
    }

    pub fn heading<D>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }
}
