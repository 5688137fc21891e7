//! Diagnostics pane rendering

use super::pane_block;
use crate::parser::parse::ParseError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

/// Render the list of parse errors
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    errors: &[ParseError],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Diagnostics ", is_focused);

    if errors.is_empty() {
        let paragraph = Paragraph::new("(no diagnostics)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(errors.len().saturating_sub(visible_height));

    let items: Vec<ListItem> = errors
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|err| {
            ListItem::new(err.to_string()).style(Style::default().fg(DEFAULT_THEME.error))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
