//! Collapsible outline over report lines
//!
//! Report lines arrive in pre-order with a depth each, so a module's subtree
//! is the run of following lines that are deeper than it. Collapsing a module
//! hides that run.

use crate::render::ReportLine;
use rustc_hash::FxHashSet;

/// Indices of the lines that stay visible when the modules at the
/// `collapsed` line indices are folded.
pub fn visible_lines(lines: &[ReportLine], collapsed: &FxHashSet<usize>) -> Vec<usize> {
    let mut visible = Vec::with_capacity(lines.len());
    let mut hidden_below: Option<usize> = None;

    for (index, line) in lines.iter().enumerate() {
        if let Some(depth) = hidden_below {
            if line.depth > depth {
                continue;
            }
            hidden_below = None;
        }
        visible.push(index);
        if line.is_module() && collapsed.contains(&index) {
            hidden_below = Some(line.depth);
        }
    }

    visible
}

/// Number of lines in the subtree below the line at `index`.
pub fn subtree_len(lines: &[ReportLine], index: usize) -> usize {
    let Some(root) = lines.get(index) else {
        return 0;
    };
    lines[index + 1..]
        .iter()
        .take_while(|line| line.depth > root.depth)
        .count()
}

/// Selection and fold state of the report pane
#[derive(Debug, Default)]
pub struct Outline {
    collapsed: FxHashSet<usize>,
    visible: Vec<usize>,
    /// Position of the selection within the visible lines
    selected: usize,
}

impl Outline {
    pub fn new(lines: &[ReportLine]) -> Self {
        let mut outline = Outline::default();
        outline.refresh(lines);
        outline
    }

    fn refresh(&mut self, lines: &[ReportLine]) {
        self.visible = visible_lines(lines, &self.collapsed);
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    /// Line indices currently shown, in order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Line index under the selection.
    pub fn selected_line(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    pub fn is_collapsed(&self, index: usize) -> bool {
        self.collapsed.contains(&index)
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.selected = self.selected.saturating_add(n).min(last);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    /// Fold or unfold the selected module. Returns `false` if the selection
    /// is not a module line.
    pub fn toggle_selected(&mut self, lines: &[ReportLine]) -> bool {
        let Some(index) = self.selected_line() else {
            return false;
        };
        if !lines.get(index).is_some_and(ReportLine::is_module) {
            return false;
        }
        if !self.collapsed.remove(&index) {
            self.collapsed.insert(index);
        }
        self.refresh(lines);
        true
    }
}
