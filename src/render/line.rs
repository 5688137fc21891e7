//! Report lines and their text form
//!
//! Counter lines read
//!
//! ```text
//! <indent><name>:<index> Count: [<start>,<end>], Nanos: [<total>, <min> < <avg> < <max>], Cycles: [<total>, <min> < <avg> < <max>]
//! ```
//!
//! and module lines are just `<indent><name>`. Averages are printed with six
//! decimal places. Indentation is `depth * indent_width` spaces, capped at
//! `max_indent` columns.

use super::RenderOptions;
use crate::payload::record::{Aggregate, TscStats};

/// What a report line describes
#[derive(Debug, Clone, PartialEq)]
pub enum LineEntry {
    Counter {
        name: String,
        index: usize,
        stats: TscStats,
    },
    Module {
        name: String,
    },
}

/// One line of a report, tagged with its nesting depth
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub depth: usize,
    pub entry: LineEntry,
}

impl ReportLine {
    pub fn name(&self) -> &str {
        match &self.entry {
            LineEntry::Counter { name, .. } | LineEntry::Module { name } => name,
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self.entry, LineEntry::Module { .. })
    }

    /// Leading spaces for this line.
    pub fn indent(&self, options: &RenderOptions) -> usize {
        self.depth
            .saturating_mul(options.indent_width)
            .min(options.max_indent)
    }

    /// Line text without indentation.
    pub fn body(&self) -> String {
        match &self.entry {
            LineEntry::Module { name } => name.clone(),
            LineEntry::Counter { name, index, stats } => format!(
                "{}:{} Count: [{},{}], Nanos: {}, Cycles: {}",
                name,
                index,
                stats.start_count,
                stats.end_count,
                format_aggregate(&stats.nanos),
                format_aggregate(&stats.cycles),
            ),
        }
    }

    /// Full line text, indentation included, without a trailing newline.
    pub fn format(&self, options: &RenderOptions) -> String {
        format!("{:indent$}{}", "", self.body(), indent = self.indent(options))
    }
}

pub(crate) fn format_aggregate(aggregate: &Aggregate) -> String {
    format!(
        "[{}, {} < {:.6} < {}]",
        aggregate.total, aggregate.min, aggregate.avg, aggregate.max
    )
}
