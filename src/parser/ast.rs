// Report tree built by the parser and consumed by the renderer

use crate::payload::{PerfModule, TscView};

/// Byte range of an identifier within the descriptor that declared it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One element of a `TSC name[n];` declaration
#[derive(Debug, PartialEq)]
pub struct CounterLeaf<'a> {
    pub name: &'a str,
    pub span: Span,
    /// Position within the declared array, `0..n`
    pub index: usize,
    /// Offset of the record within its module's payload
    pub offset: usize,
    pub record: TscView<'a>,
}

/// A `MODULE * name;` declaration and the fields of the nested module
#[derive(Debug, PartialEq)]
pub struct ModuleBranch<'a> {
    pub name: &'a str,
    pub span: Span,
    /// Offset of the nested slot within the parent's payload
    pub offset: usize,
    pub module: PerfModule<'a>,
    pub children: Vec<ReportNode<'a>>,
}

/// Report tree node. Siblings are kept in declaration order by the
/// containing `Vec`.
#[derive(Debug, PartialEq)]
pub enum ReportNode<'a> {
    Counter(CounterLeaf<'a>),
    Module(ModuleBranch<'a>),
}

impl<'a> ReportNode<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ReportNode::Counter(leaf) => leaf.name,
            ReportNode::Module(branch) => branch.name,
        }
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        match self {
            ReportNode::Counter(_) => 1,
            ReportNode::Module(branch) => {
                1 + branch.children.iter().map(ReportNode::node_count).sum::<usize>()
            }
        }
    }
}

/// Top-level sibling list of one module.
///
/// Built once by the parser and handed by value to the renderer, which drops
/// it node by node.
#[derive(Debug, Default, PartialEq)]
pub struct Ast<'a> {
    pub nodes: Vec<ReportNode<'a>>,
}

impl<'a> Ast<'a> {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the whole tree.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ReportNode::node_count).sum()
    }
}

impl<'a> IntoIterator for Ast<'a> {
    type Item = ReportNode<'a>;
    type IntoIter = std::vec::IntoIter<ReportNode<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
