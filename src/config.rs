// Defaults and option bundles for parsing and rendering

use crate::parser::parse::ParseOptions;
use crate::render::RenderOptions;

/// Deepest module nesting the parser will descend into.
/// Top-level fields are depth 0.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Upper bound for any configured nesting depth. Each level of nesting is a
/// level of parser recursion.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Spaces of indentation per nesting level in text reports.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Indentation never exceeds this many columns, however deep the nesting.
pub const DEFAULT_MAX_INDENT: usize = 36;

/// Everything needed to turn a module into a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportConfig {
    pub parse: ParseOptions,
    pub render: RenderOptions,
}

impl ReportConfig {
    /// Set the nesting limit, clamped to [`MAX_NESTING_DEPTH`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.parse.max_depth = max_depth.min(MAX_NESTING_DEPTH);
        self
    }

    pub fn with_indent(mut self, indent_width: usize, max_indent: usize) -> Self {
        self.render.indent_width = indent_width;
        self.render.max_indent = max_indent;
        self
    }
}
