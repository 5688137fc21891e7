//! Descriptor parser and report tree builder
//!
//! This module provides the [`Parser`], its error type and the parse entry
//! points.
//!
//! # Parser Architecture
//!
//! The grammar is small enough for a flat state machine:
//!
//! ```text
//! schema      := { statement }
//! statement   := tsc_stmt | module_stmt
//! tsc_stmt    := "TSC" identifier "[" integer "]" ";"
//! module_stmt := "MODULE" "*" identifier ";"
//! ```
//!
//! Each token moves the machine one [`ParserState`] forward; whitespace is
//! skipped in every state. The payload is walked in lock step with the
//! grammar: a completed statement appends its nodes and advances the payload
//! [`Cursor`] by exactly the bytes those nodes cover. Nested modules are parsed
//! by recursing on the nested slot's own descriptor and payload, up to
//! [`ParseOptions::max_depth`] levels.
//!
//! Errors never discard work. Nodes completed before a fault stay in the
//! returned [`Parsed::ast`], and the fault is reported in [`Parsed::errors`].

use crate::config::DEFAULT_MAX_DEPTH;
use crate::parser::ast::*;
use crate::parser::lexer::{next_token, Token, TokenKind};
use crate::payload::{Cursor, PayloadError, PerfModule, TscView, TSC_RECORD_SIZE};
use std::fmt;
use thiserror::Error;

/// Parser error type
#[derive(Debug, Error)]
pub enum ParseError {
    /// The token at `offset` is not allowed in the current state
    #[error("expected {expected}, but found {}", describe_remainder(.remainder))]
    Syntax {
        expected: &'static str,
        offset: usize,
        /// Descriptor text from the offending token to the end
        remainder: String,
    },

    /// The payload ends before the declared fields do
    #[error("payload too short for `{field}`: needed {needed} bytes, {available} available")]
    TruncatedPayload {
        field: String,
        needed: usize,
        available: usize,
    },

    /// A nested module would exceed the nesting limit
    #[error("module `{module}` is nested deeper than the limit of {limit}")]
    NestingTooDeep { module: String, limit: usize },

    /// The nested module slot could not be decoded
    #[error("invalid module slot for `{module}`: {source}")]
    InvalidModule {
        module: String,
        #[source]
        source: PayloadError,
    },

    /// An error raised while parsing a nested module
    #[error("in module `{module}`: {source}")]
    InModule {
        module: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// The error with any `InModule` wrappers removed.
    pub fn innermost(&self) -> &ParseError {
        match self {
            ParseError::InModule { source, .. } => source.innermost(),
            other => other,
        }
    }
}

fn describe_remainder(remainder: &str) -> String {
    if remainder.is_empty() {
        "end of descriptor".to_string()
    } else {
        format!("\"{}\"", remainder)
    }
}

/// Progress through one statement of the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Type,
    Pointer,
    Identifier,
    OpenBracket,
    Number,
    CloseBracket,
    Semicolon,
}

impl ParserState {
    /// Token class accepted in this state.
    pub fn expected(self) -> &'static str {
        match self {
            ParserState::Type => "'TSC' or 'MODULE'",
            ParserState::Pointer => "'*'",
            ParserState::Identifier => "an identifier",
            ParserState::OpenBracket => "'['",
            ParserState::Number => "a number",
            ParserState::CloseBracket => "']'",
            ParserState::Semicolon => "';'",
        }
    }
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which declaration keyword opened the current statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declaration {
    Counter,
    Module,
}

/// Parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of parsing one module
#[derive(Debug)]
pub struct Parsed<'a> {
    /// Every node completed before parsing stopped
    pub ast: Ast<'a>,
    pub errors: Vec<ParseError>,
    /// Payload bytes covered by the completed statements
    pub consumed: usize,
}

impl Parsed<'_> {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// State-machine parser for descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Parser { options }
    }

    /// Parse `descriptor` against `payload`.
    pub fn parse<'a>(&self, descriptor: &'a str, payload: &'a [u8]) -> Parsed<'a> {
        self.parse_at_depth(descriptor, payload, 0)
    }

    /// Parse a decoded module.
    pub fn parse_module<'a>(&self, module: PerfModule<'a>) -> Parsed<'a> {
        self.parse(module.descriptor, module.payload)
    }

    fn parse_at_depth<'a>(
        &self,
        descriptor: &'a str,
        payload: &'a [u8],
        depth: usize,
    ) -> Parsed<'a> {
        let mut run = ModuleParse {
            parser: self,
            descriptor,
            cursor: Cursor::new(payload),
            depth,
            ast: Ast::new(),
            errors: Vec::new(),
            state: ParserState::Type,
            declaration: None,
            ident: None,
            count: 0,
        };
        run.run();

        if run.errors.is_empty() && !run.cursor.is_exhausted() {
            tracing::debug!(
                depth,
                "{} payload bytes left after last statement",
                run.cursor.remaining().len()
            );
        }

        Parsed {
            consumed: run.cursor.offset(),
            ast: run.ast,
            errors: run.errors,
        }
    }
}

/// Parse `descriptor` against `payload` with default options.
pub fn parse<'a>(descriptor: &'a str, payload: &'a [u8]) -> Parsed<'a> {
    Parser::new().parse(descriptor, payload)
}

/// Parse a decoded module with default options.
pub fn parse_module(module: PerfModule<'_>) -> Parsed<'_> {
    Parser::new().parse_module(module)
}

/// Working state for one module's descriptor
struct ModuleParse<'p, 'a> {
    parser: &'p Parser,
    descriptor: &'a str,
    cursor: Cursor<'a>,
    depth: usize,
    ast: Ast<'a>,
    errors: Vec<ParseError>,
    state: ParserState,
    declaration: Option<Declaration>,
    ident: Option<Span>,
    count: u64,
}

impl<'a> ModuleParse<'_, 'a> {
    fn run(&mut self) {
        let mut position = 0;
        loop {
            let token = next_token(self.descriptor, position);
            tracing::trace!(kind = ?token.kind, start = token.start, state = %self.state, "token");

            let step = match token.kind {
                TokenKind::Whitespace => Ok(()),
                TokenKind::EndOfInput if self.state == ParserState::Type => break,
                _ => self.step(token),
            };

            if let Err(err) = step {
                tracing::warn!(depth = self.depth, "descriptor parse stopped: {}", err);
                self.errors.push(err);
                break;
            }
            position = token.end;
        }
    }

    fn step(&mut self, token: Token) -> Result<(), ParseError> {
        use ParserState as S;
        use TokenKind as K;

        match (self.state, token.kind) {
            (S::Type, K::Tsc) => {
                self.declaration = Some(Declaration::Counter);
                self.state = S::Identifier;
            }
            (S::Type, K::Module) => {
                self.declaration = Some(Declaration::Module);
                self.state = S::Pointer;
            }
            (S::Pointer, K::Star) => self.state = S::Identifier,
            (S::Identifier, K::Ident) => {
                self.ident = Some(Span::new(token.start, token.end));
                self.state = match self.declaration {
                    Some(Declaration::Counter) => S::OpenBracket,
                    Some(Declaration::Module) => S::Semicolon,
                    None => return Err(self.syntax_error(token)),
                };
            }
            (S::OpenBracket, K::OpenBracket) => self.state = S::Number,
            (S::Number, K::Number) => {
                self.count = token.value.unwrap_or_default();
                self.state = S::CloseBracket;
            }
            (S::CloseBracket, K::CloseBracket) => self.state = S::Semicolon,
            (S::Semicolon, K::Semicolon) => {
                self.finish_statement(token)?;
                self.state = S::Type;
                self.declaration = None;
                self.ident = None;
                self.count = 0;
            }
            _ => return Err(self.syntax_error(token)),
        }
        Ok(())
    }

    fn syntax_error(&self, token: Token) -> ParseError {
        ParseError::Syntax {
            expected: self.state.expected(),
            offset: token.start,
            remainder: self.descriptor[token.start..].to_string(),
        }
    }

    fn finish_statement(&mut self, token: Token) -> Result<(), ParseError> {
        let Some(span) = self.ident else {
            return Err(self.syntax_error(token));
        };
        let descriptor = self.descriptor;
        let name = &descriptor[span.start..span.end];

        match self.declaration {
            Some(Declaration::Counter) => self.push_counters(name, span),
            Some(Declaration::Module) => self.push_module(name, span),
            None => Err(self.syntax_error(token)),
        }
    }

    fn push_counters(&mut self, name: &'a str, span: Span) -> Result<(), ParseError> {
        let available = self.cursor.remaining().len();
        let needed = usize::try_from(self.count)
            .ok()
            .and_then(|count| count.checked_mul(TSC_RECORD_SIZE))
            .unwrap_or(usize::MAX);

        let base = self.cursor.offset();
        let region = self
            .cursor
            .take("counter records", needed)
            .map_err(|_| ParseError::TruncatedPayload {
                field: name.to_string(),
                needed,
                available,
            })?;

        for (index, chunk) in region.chunks_exact(TSC_RECORD_SIZE).enumerate() {
            if let Ok(bytes) = <&[u8; TSC_RECORD_SIZE]>::try_from(chunk) {
                self.ast.nodes.push(ReportNode::Counter(CounterLeaf {
                    name,
                    span,
                    index,
                    offset: base + index * TSC_RECORD_SIZE,
                    record: TscView::new(bytes),
                }));
            }
        }

        tracing::debug!(depth = self.depth, offset = base, count = self.count, "TSC {}", name);
        Ok(())
    }

    fn push_module(&mut self, name: &'a str, span: Span) -> Result<(), ParseError> {
        let invalid = |source: PayloadError| ParseError::InvalidModule {
            module: name.to_string(),
            source,
        };

        let offset = self.cursor.offset();
        let (module, width) = PerfModule::decode(self.cursor.remaining()).map_err(invalid)?;

        let limit = self.parser.options.max_depth;
        let children = if self.depth >= limit {
            let err = ParseError::NestingTooDeep {
                module: name.to_string(),
                limit,
            };
            tracing::warn!(depth = self.depth, "{}", err);
            self.errors.push(err);
            Vec::new()
        } else {
            let nested = self
                .parser
                .parse_at_depth(module.descriptor, module.payload, self.depth + 1);
            self.errors
                .extend(nested.errors.into_iter().map(|source| ParseError::InModule {
                    module: name.to_string(),
                    source: Box::new(source),
                }));
            nested.ast.nodes
        };

        self.ast.nodes.push(ReportNode::Module(ModuleBranch {
            name,
            span,
            offset,
            module,
            children,
        }));
        self.cursor.skip("module slot", width).map_err(invalid)?;

        tracing::debug!(depth = self.depth, offset, width, "MODULE {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{ModuleBuilder, TscStats};

    fn stats(start_count: i64, end_count: i64) -> TscStats {
        TscStats {
            start_count,
            end_count,
            ..TscStats::default()
        }
    }

    fn payload(records: &[TscStats]) -> Vec<u8> {
        records.iter().flat_map(|r| r.encode()).collect()
    }

    fn leaf<'n, 'a>(node: &'n ReportNode<'a>) -> &'n CounterLeaf<'a> {
        match node {
            ReportNode::Counter(leaf) => leaf,
            other => panic!("expected counter, got {:?}", other),
        }
    }

    #[test]
    fn test_counter_array() {
        let bytes = payload(&[stats(10, 20), stats(5, 15)]);
        let parsed = parse("TSC a[2];", &bytes);

        assert!(parsed.is_complete(), "{:?}", parsed.errors);
        assert_eq!(parsed.consumed, 2 * TSC_RECORD_SIZE);
        assert_eq!(parsed.ast.nodes.len(), 2);

        let first = leaf(&parsed.ast.nodes[0]);
        let second = leaf(&parsed.ast.nodes[1]);
        assert_eq!((first.name, first.index, first.offset), ("a", 0, 0));
        assert_eq!((second.name, second.index, second.offset), ("a", 1, 80));
        assert_eq!(first.record.start_count(), 10);
        assert_eq!(second.record.end_count(), 15);
        assert_eq!(first.span, Span::new(4, 5));
    }

    #[test]
    fn test_statements_in_declaration_order() {
        let bytes = payload(&[stats(1, 1), stats(2, 2), stats(3, 3)]);
        let parsed = parse("TSC x[1]; TSC y[2];", &bytes);

        let names: Vec<_> = parsed
            .ast
            .nodes
            .iter()
            .map(|n| (n.name(), leaf(n).index, leaf(n).record.start_count()))
            .collect();
        assert_eq!(names, vec![("x", 0, 1), ("y", 0, 2), ("y", 1, 3)]);
    }

    #[test]
    fn test_zero_length_array() {
        let parsed = parse("TSC none[0];", &[]);
        assert!(parsed.is_complete());
        assert!(parsed.ast.is_empty());
        assert_eq!(parsed.consumed, 0);
    }

    #[test]
    fn test_missing_semicolon_keeps_earlier_siblings() {
        let bytes = payload(&[stats(1, 2), stats(3, 4)]);
        let parsed = parse("TSC a[1]; TSC b[1]", &bytes);

        assert_eq!(parsed.ast.nodes.len(), 1);
        assert_eq!(parsed.consumed, TSC_RECORD_SIZE);
        match &parsed.errors[..] {
            [ParseError::Syntax {
                expected,
                remainder,
                ..
            }] => {
                assert_eq!(*expected, "';'");
                assert!(remainder.is_empty());
            }
            other => panic!("unexpected errors: {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_reports_remainder() {
        let bytes = payload(&[stats(1, 2)]);
        let parsed = parse("TSC a[1]; TSC b 3];", &bytes);

        assert_eq!(parsed.ast.nodes.len(), 1);
        let err = &parsed.errors[0];
        assert!(matches!(
            err,
            ParseError::Syntax { expected: "'['", offset: 16, .. }
        ));
        assert_eq!(err.to_string(), "expected '[', but found \"3];\"");
    }

    #[test]
    fn test_statement_must_start_with_keyword() {
        let parsed = parse("latency[1];", &[]);
        assert!(parsed.ast.is_empty());
        assert!(matches!(
            parsed.errors[0],
            ParseError::Syntax {
                expected: "'TSC' or 'MODULE'",
                offset: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_identifier_cannot_start_with_module_keyword() {
        let bytes = payload(&[stats(1, 2), stats(3, 4)]);
        let parsed = parse("TSC ok[1]; TSC MODULE_rx[1];", &bytes);

        assert_eq!(parsed.ast.nodes.len(), 1);
        assert_eq!(parsed.consumed, TSC_RECORD_SIZE);
        let err = &parsed.errors[0];
        assert!(matches!(
            err,
            ParseError::Syntax {
                expected: "an identifier",
                offset: 15,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "expected an identifier, but found \"MODULE_rx[1];\""
        );
    }

    #[test]
    fn test_module_requires_star() {
        let parsed = parse("MODULE inner;", &[]);
        assert!(matches!(
            parsed.errors[0],
            ParseError::Syntax { expected: "'*'", .. }
        ));
    }

    #[test]
    fn test_whitespace_does_not_change_tree() {
        let bytes = payload(&[stats(7, 8), stats(9, 10)]);
        let tight = parse("TSC a[2];", &bytes);
        let loose = parse("  TSC\n\ta [ 2 ]\n;\n", &bytes);

        assert!(tight.is_complete() && loose.is_complete());
        assert_eq!(tight.consumed, loose.consumed);
        let strip = |parsed: &Parsed<'_>| -> Vec<(String, usize, i64)> {
            parsed
                .ast
                .nodes
                .iter()
                .map(|n| (n.name().to_string(), leaf(n).index, leaf(n).record.start_count()))
                .collect()
        };
        assert_eq!(strip(&tight), strip(&loose));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = payload(&[stats(1, 1)]);
        let parsed = parse("TSC a[1]; TSC b[2];", &bytes);

        assert_eq!(parsed.ast.nodes.len(), 1);
        assert!(matches!(
            &parsed.errors[0],
            ParseError::TruncatedPayload { field, needed: 160, available: 0 } if field == "b"
        ));
    }

    #[test]
    fn test_huge_count_is_rejected_without_allocating() {
        let parsed = parse("TSC a[99999999999999999999999];", &[]);
        assert!(parsed.ast.is_empty());
        assert!(matches!(
            parsed.errors[0],
            ParseError::TruncatedPayload { needed: usize::MAX, .. }
        ));
    }

    #[test]
    fn test_nested_module() {
        let inner = ModuleBuilder::new("TSC x[1];").counter(stats(100, 200));
        let inner_bytes = inner.build();
        let bytes = ModuleBuilder::new("")
            .module(inner)
            .counters([stats(1, 2), stats(3, 4)])
            .build();
        let (outer, _) = PerfModule::decode(&bytes).unwrap();

        let parsed = parse("MODULE * inner; TSC y[2];", outer.payload);
        assert!(parsed.is_complete(), "{:?}", parsed.errors);
        assert_eq!(parsed.consumed, inner_bytes.len() + 2 * TSC_RECORD_SIZE);
        assert_eq!(parsed.ast.nodes.len(), 3);

        let ReportNode::Module(branch) = &parsed.ast.nodes[0] else {
            panic!("expected module first");
        };
        assert_eq!(branch.name, "inner");
        assert_eq!(branch.offset, 0);
        assert_eq!(branch.children.len(), 1);
        assert_eq!(leaf(&branch.children[0]).record.end_count(), 200);

        let y = leaf(&parsed.ast.nodes[2]);
        assert_eq!((y.name, y.index, y.offset), ("y", 1, inner_bytes.len() + 80));
        assert_eq!(parsed.ast.node_count(), 4);
    }

    #[test]
    fn test_nested_error_is_wrapped_and_parent_continues() {
        let inner = ModuleBuilder::new("TSC x[1]").counter(stats(1, 1));
        let bytes = ModuleBuilder::new("")
            .module(inner)
            .counter(stats(2, 2))
            .build();
        let (outer, _) = PerfModule::decode(&bytes).unwrap();

        let parsed = parse("MODULE *inner; TSC y[1];", outer.payload);
        assert_eq!(parsed.ast.nodes.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        let err = &parsed.errors[0];
        assert!(matches!(err, ParseError::InModule { module, .. } if module == "inner"));
        assert!(matches!(err.innermost(), ParseError::Syntax { .. }));
        assert_eq!(
            err.to_string(),
            "in module `inner`: expected ';', but found end of descriptor"
        );
    }

    #[test]
    fn test_nesting_limit() {
        let innermost = ModuleBuilder::new("TSC z[1];").counter(stats(1, 1));
        let middle = ModuleBuilder::new("MODULE * c;").module(innermost);
        let bytes = ModuleBuilder::new("").module(middle).build();
        let (outer, _) = PerfModule::decode(&bytes).unwrap();

        let parser = Parser::with_options(ParseOptions { max_depth: 1 });
        let parsed = parser.parse("MODULE * b;", outer.payload);

        // `b` is parsed at depth 1, its child `c` would be depth 2.
        assert_eq!(parsed.consumed, outer.payload.len());
        let ReportNode::Module(b) = &parsed.ast.nodes[0] else {
            panic!("expected module");
        };
        let ReportNode::Module(c) = &b.children[0] else {
            panic!("expected nested module");
        };
        assert!(c.children.is_empty());
        assert!(matches!(
            parsed.errors[0].innermost(),
            ParseError::NestingTooDeep { module, limit: 1 } if module == "c"
        ));
    }

    #[test]
    fn test_invalid_nested_slot_halts() {
        let parsed = parse("MODULE * broken; TSC a[1];", &[3, 0, 0, 0]);
        assert!(parsed.ast.is_empty());
        assert_eq!(parsed.consumed, 0);
        assert!(matches!(
            &parsed.errors[0],
            ParseError::InvalidModule { module, .. } if module == "broken"
        ));
    }
}
