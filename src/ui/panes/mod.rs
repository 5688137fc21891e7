//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`report`]: The report outline with selection and folded modules
//! - [`diagnostics`]: Errors that stopped the parse early
//! - [`status`]: Status bar with keybindings and position
//!
//! Each pane module exports a primary `render_*` function that draws into a
//! given area and keeps no state of its own.

pub mod diagnostics;
pub mod report;
pub mod status;

pub use diagnostics::render_diagnostics_pane;
pub use report::render_report_pane;
pub use status::render_status_bar;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders};

/// Bordered block whose border reflects focus.
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` so that row `selected` of `total` rows stays inside
/// a window of `height` rows.
pub(crate) fn follow_selection(
    scroll_offset: &mut usize,
    selected: usize,
    total: usize,
    height: usize,
) {
    let height = height.max(1);
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + height {
        *scroll_offset = selected + 1 - height;
    }
    *scroll_offset = (*scroll_offset).min(total.saturating_sub(height));
}

#[cfg(test)]
mod tests {
    use super::follow_selection;

    #[test]
    fn test_follow_selection() {
        let mut scroll = 0;
        follow_selection(&mut scroll, 3, 20, 5);
        assert_eq!(scroll, 0);
        follow_selection(&mut scroll, 7, 20, 5);
        assert_eq!(scroll, 3);
        follow_selection(&mut scroll, 1, 20, 5);
        assert_eq!(scroll, 1);
        follow_selection(&mut scroll, 19, 20, 5);
        assert_eq!(scroll, 15);

        let mut scroll = 4;
        follow_selection(&mut scroll, 0, 3, 10);
        assert_eq!(scroll, 0);
    }
}
