//! Report outline pane rendering

use super::{follow_selection, pane_block};
use crate::render::line::format_aggregate;
use crate::render::{LineEntry, RenderOptions, ReportLine};
use crate::ui::outline::{subtree_len, Outline};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the report lines that the outline leaves visible
#[allow(clippy::too_many_arguments)]
pub fn render_report_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[ReportLine],
    outline: &Outline,
    options: &RenderOptions,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(title, is_focused);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(empty report)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = outline.visible();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    follow_selection(scroll_offset, outline.selected(), visible.len(), visible_height);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(row, &index)| {
            let line = &lines[index];
            let mut spans = vec![Span::raw(" ".repeat(line.indent(options)))];
            spans.extend(line_spans(lines, index, line, outline));

            let item = ListItem::new(Line::from(spans));
            if row == outline.selected() {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn line_spans(
    lines: &[ReportLine],
    line_index: usize,
    line: &ReportLine,
    outline: &Outline,
) -> Vec<Span<'static>> {
    let number = Style::default().fg(DEFAULT_THEME.number);
    let label = Style::default().fg(DEFAULT_THEME.comment);

    match &line.entry {
        LineEntry::Module { name } => {
            if outline.is_collapsed(line_index) {
                vec![
                    Span::styled(format!("▸ {}", name), Style::default().fg(DEFAULT_THEME.module)),
                    Span::styled(format!(" ({} hidden)", subtree_len(lines, line_index)), label),
                ]
            } else {
                vec![Span::styled(
                    format!("▾ {}", name),
                    Style::default().fg(DEFAULT_THEME.module),
                )]
            }
        }
        LineEntry::Counter { name, index, stats } => vec![
            Span::styled(name.clone(), Style::default().fg(DEFAULT_THEME.counter)),
            Span::styled(format!(":{}", index), label),
            Span::styled(" Count: ", label),
            Span::styled(format!("[{},{}]", stats.start_count, stats.end_count), number),
            Span::styled(" Nanos: ", label),
            Span::styled(format_aggregate(&stats.nanos), number),
            Span::styled(" Cycles: ", label),
            Span::styled(format_aggregate(&stats.cycles), number),
        ],
    }
}
