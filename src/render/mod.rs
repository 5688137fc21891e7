//! Report rendering
//!
//! The [`Renderer`] walks a report tree depth first, in declaration order,
//! emitting one [`ReportLine`] per node: a module's line comes before its
//! children, which come before the module's next sibling. The tree is taken
//! by value and each node is dropped as soon as its subtree has been emitted,
//! so a tree can be rendered exactly once.
//!
//! See [`line`] for the text format.

pub mod line;

pub use line::{LineEntry, ReportLine};

use crate::config::{ReportConfig, DEFAULT_INDENT_WIDTH, DEFAULT_MAX_INDENT};
use crate::parser::ast::{Ast, ReportNode};
use crate::parser::parse::{ParseError, Parser};
use crate::payload::PerfModule;

/// Text layout options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level
    pub indent_width: usize,
    /// Upper bound on indentation, in columns
    pub max_indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            indent_width: DEFAULT_INDENT_WIDTH,
            max_indent: DEFAULT_MAX_INDENT,
        }
    }
}

/// Consumes report trees
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer { options }
    }

    /// Flatten the tree into report lines.
    pub fn render_lines(&self, ast: Ast<'_>) -> Vec<ReportLine> {
        let mut lines = Vec::new();
        emit(ast.nodes, 0, &mut lines);
        lines
    }

    /// Render the tree as text, one newline-terminated line per node.
    pub fn render(&self, ast: Ast<'_>) -> String {
        self.render_lines(ast)
            .iter()
            .map(|line| line.format(&self.options) + "\n")
            .collect()
    }
}

fn emit(nodes: Vec<ReportNode<'_>>, depth: usize, lines: &mut Vec<ReportLine>) {
    for node in nodes {
        match node {
            ReportNode::Counter(leaf) => lines.push(ReportLine {
                depth,
                entry: LineEntry::Counter {
                    name: leaf.name.to_string(),
                    index: leaf.index,
                    stats: leaf.record.stats(),
                },
            }),
            ReportNode::Module(branch) => {
                lines.push(ReportLine {
                    depth,
                    entry: LineEntry::Module {
                        name: branch.name.to_string(),
                    },
                });
                emit(branch.children, depth + 1, lines);
            }
        }
    }
}

/// Render a tree with default options.
pub fn render(ast: Ast<'_>) -> String {
    Renderer::default().render(ast)
}

/// A rendered module and whatever stopped its parse early
#[derive(Debug)]
pub struct Report {
    pub lines: Vec<ReportLine>,
    pub errors: Vec<ParseError>,
    pub options: RenderOptions,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Report body as text.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.format(&self.options) + "\n")
            .collect()
    }
}

/// Parse a module and render whatever could be parsed.
pub fn report(module: PerfModule<'_>, config: &ReportConfig) -> Report {
    let parsed = Parser::with_options(config.parse).parse_module(module);
    let lines = Renderer::new(config.render).render_lines(parsed.ast);
    Report {
        lines,
        errors: parsed.errors,
        options: config.render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;
    use crate::payload::{ModuleBuilder, TscStats};

    fn stats(start_count: i64, end_count: i64) -> TscStats {
        TscStats {
            start_count,
            end_count,
            ..TscStats::default()
        }
    }

    #[test]
    fn test_render_counter_array() {
        let bytes: Vec<u8> = [stats(10, 20), stats(5, 15)]
            .iter()
            .flat_map(TscStats::encode)
            .collect();
        let text = render(parse("TSC a[2];", &bytes).ast);
        assert_eq!(
            text,
            "a:0 Count: [10,20], Nanos: [0, 0 < 0.000000 < 0], Cycles: [0, 0 < 0.000000 < 0]\n\
             a:1 Count: [5,15], Nanos: [0, 0 < 0.000000 < 0], Cycles: [0, 0 < 0.000000 < 0]\n"
        );
    }

    #[test]
    fn test_preorder_with_depth() {
        let inner = ModuleBuilder::new("TSC x[1]; MODULE * deeper;")
            .counter(stats(1, 1))
            .module(ModuleBuilder::new("TSC z[1];").counter(stats(3, 3)));
        let bytes = ModuleBuilder::new("MODULE * inner; TSC y[1];")
            .module(inner)
            .counter(stats(2, 2))
            .build();
        let (module, _) = PerfModule::decode(&bytes).unwrap();

        let parsed = parse(module.descriptor, module.payload);
        let lines = Renderer::default().render_lines(parsed.ast);
        let shape: Vec<_> = lines.iter().map(|l| (l.depth, l.name())).collect();
        assert_eq!(
            shape,
            vec![(0, "inner"), (1, "x"), (1, "deeper"), (2, "z"), (0, "y")]
        );
        assert!(lines[0].is_module());
        assert!(!lines[1].is_module());
    }

    #[test]
    fn test_report_keeps_partial_output() {
        let bytes = ModuleBuilder::new("TSC a[1]; TSC b[1]")
            .counters([stats(1, 2), stats(3, 4)])
            .build();
        let (module, _) = PerfModule::decode(&bytes).unwrap();

        let report = report(module, &ReportConfig::default());
        assert!(!report.is_complete());
        assert_eq!(report.lines.len(), 1);
        assert!(report.text().starts_with("a:0 Count: [1,2]"));
    }

    #[test]
    fn test_empty_tree_renders_nothing() {
        assert_eq!(render(Ast::new()), "");
    }
}
