//! Main TUI application state and logic

use crate::render::Report;
use crate::ui::outline::Outline;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Rows moved by PageUp/PageDown
const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Report,
    Diagnostics,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Report => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Report,
        }
    }
}

/// The main application state
pub struct App {
    /// Shown in the report pane's border
    pub title: String,

    pub report: Report,

    /// Fold and selection state over `report.lines`
    pub outline: Outline,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub report_scroll: usize,
    pub diagnostics_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(report: Report, title: impl Into<String>) -> Self {
        let outline = Outline::new(&report.lines);
        let status_message = if report.is_complete() {
            format!("{} lines", report.lines.len())
        } else {
            format!("{} lines, parse stopped early", report.lines.len())
        };

        App {
            title: format!(" {} ", title.into()),
            report,
            outline,
            focused_pane: FocusedPane::Report,
            report_scroll: 0,
            diagnostics_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Report (top) | Diagnostics (bottom)
        let diagnostics_height = if self.report.is_complete() { 3 } else { 8 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(diagnostics_height)])
            .split(main_chunks[0]);

        super::panes::render_report_pane(
            frame,
            rows[0],
            &self.title,
            &self.report.lines,
            &self.outline,
            &self.report.options,
            self.focused_pane == FocusedPane::Report,
            &mut self.report_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            rows[1],
            &self.report.errors,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.outline.selected(),
            self.outline.visible().len(),
            self.report.errors.len(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Home => {
                if self.focused_pane == FocusedPane::Report {
                    self.outline.select_first();
                } else {
                    self.diagnostics_scroll = 0;
                }
            }
            KeyCode::End => {
                if self.focused_pane == FocusedPane::Report {
                    self.outline.select_last();
                } else {
                    self.diagnostics_scroll = usize::MAX;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_fold(),
            _ => {}
        }
    }

    fn scroll_up(&mut self, n: usize) {
        match self.focused_pane {
            FocusedPane::Report => self.outline.move_up(n),
            FocusedPane::Diagnostics => {
                self.diagnostics_scroll = self.diagnostics_scroll.saturating_sub(n);
            }
        }
    }

    fn scroll_down(&mut self, n: usize) {
        match self.focused_pane {
            FocusedPane::Report => self.outline.move_down(n),
            FocusedPane::Diagnostics => {
                self.diagnostics_scroll = self.diagnostics_scroll.saturating_add(n);
            }
        }
    }

    fn toggle_fold(&mut self) {
        if self.focused_pane != FocusedPane::Report {
            return;
        }
        let Some(index) = self.outline.selected_line() else {
            return;
        };
        if self.outline.toggle_selected(&self.report.lines) {
            let name = self.report.lines[index].name();
            self.status_message = if self.outline.is_collapsed(index) {
                format!("Folded {}", name)
            } else {
                format!("Unfolded {}", name)
            };
        } else {
            self.status_message = "Only modules can be folded".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::payload::{ModuleBuilder, TscStats};
    use crate::render::report;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn sample_app() -> App {
        let image = ModuleBuilder::new("MODULE * inner; TSC y[2];")
            .module(ModuleBuilder::new("TSC x[1];").counter(TscStats::default()))
            .counters([TscStats::default(), TscStats::default()])
            .image();
        let module = image.module().unwrap();
        App::new(report(module, &ReportConfig::default()), "sample")
    }

    #[test]
    fn test_fold_module_line() {
        let mut app = sample_app();
        assert_eq!(app.outline.visible().len(), 4);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.outline.visible(), &[0, 2, 3]);
        assert_eq!(app.status_message, "Folded inner");

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.outline.visible().len(), 4);
        assert_eq!(app.status_message, "Unfolded inner");
    }

    #[test]
    fn test_counter_lines_do_not_fold() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.outline.visible().len(), 4);
        assert_eq!(app.status_message, "Only modules can be folded");
    }

    #[test]
    fn test_focus_and_quit() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Diagnostics);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.outline.selected(), 0);
        assert_eq!(app.diagnostics_scroll, 1);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
