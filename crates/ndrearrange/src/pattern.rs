//! Pattern notation.
//!
//! ```text
//! pattern := side "->" side
//! side    := item*
//! item    := ident | literal | "..." | "(" (ident | literal | "...")* ")"
//! ident   := [alpha _][alnum _]*
//! literal := [0-9]+            (positive)
//! ```
//!
//! `...` is not variadic: it is shorthand for the single axis named
//! [`ELLIPSIS_AXIS`].

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::PatternError;

/// Separator between the input and output sides.
pub const ARROW: &str = "->";

/// Axis name that `...` stands for.
pub const ELLIPSIS_AXIS: &str = "batch";

/// One leaf axis: a named axis or an anonymous fixed-size placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisLeaf {
    Named(String),
    Literal(usize),
}

impl AxisLeaf {
    /// The axis name, `None` for literals.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for AxisLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Literal(n) => write!(f, "{n}"),
        }
    }
}

/// One top-level item on a side of a pattern.
///
/// A `Group` binds a single tensor dimension that is the row-major merge of
/// its members, the last member varying fastest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisToken {
    Simple(String),
    Literal(usize),
    Group(SmallVec<[AxisLeaf; 4]>),
}

impl AxisToken {
    /// The leaf axes this token expands to, in order.
    pub fn leaves(&self) -> SmallVec<[AxisLeaf; 4]> {
        match self {
            Self::Simple(name) => smallvec::smallvec![AxisLeaf::Named(name.clone())],
            Self::Literal(n) => smallvec::smallvec![AxisLeaf::Literal(*n)],
            Self::Group(members) => members.clone(),
        }
    }

    /// Axis names bound by this token.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let members: &[AxisLeaf] = match self {
            Self::Group(members) => members.as_slice(),
            _ => &[],
        };
        let simple = match self {
            Self::Simple(name) => Some(name.as_str()),
            _ => None,
        };
        simple
            .into_iter()
            .chain(members.iter().filter_map(AxisLeaf::name))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl fmt::Display for AxisToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => f.write_str(name),
            Self::Literal(n) => write!(f, "{n}"),
            Self::Group(members) => {
                f.write_str("(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A parsed pattern.
///
/// Parsing depends only on the string, so a `Pattern` can be parsed once and
/// applied to many tensors.
///
/// ```
/// use ndrearrange::pattern::{AxisToken, Pattern};
///
/// let p: Pattern = "(h w) c -> h w c".parse().unwrap();
/// assert_eq!(p.input().len(), 2);
/// assert!(p.input()[0].is_group());
/// assert_eq!(p.output()[2], AxisToken::Simple("c".to_string()));
/// assert_eq!(p.to_string(), "(h w) c -> h w c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    input: Vec<AxisToken>,
    output: Vec<AxisToken>,
}

impl Pattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the separator count is not exactly one,
    /// a side contains a token outside the grammar, or a name repeats on one
    /// side.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let found = pattern.matches(ARROW).count();
        let Some((lhs, rhs)) = pattern.split_once(ARROW).filter(|_| found == 1) else {
            return Err(PatternError::SeparatorCount { found });
        };

        let input = SideLexer::new(lhs.trim()).tokenize()?;
        let output = SideLexer::new(rhs.trim()).tokenize()?;
        check_unique(&input, "input")?;
        check_unique(&output, "output")?;

        log::trace!("parsed pattern {pattern:?}: input {input:?}, output {output:?}");
        Ok(Self { input, output })
    }

    /// Input-side tokens, one per tensor dimension.
    pub fn input(&self) -> &[AxisToken] {
        &self.input
    }

    /// Output-side tokens, one per result dimension.
    pub fn output(&self) -> &[AxisToken] {
        &self.output
    }

    /// Input leaves with groups expanded.
    pub fn input_leaves(&self) -> Vec<AxisLeaf> {
        self.input.iter().flat_map(AxisToken::leaves).collect()
    }

    /// Output leaves with groups expanded.
    pub fn output_leaves(&self) -> Vec<AxisLeaf> {
        self.output.iter().flat_map(AxisToken::leaves).collect()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.input)?;
        write!(f, " {ARROW} ")?;
        write_side(f, &self.output)
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, tokens: &[AxisToken]) -> fmt::Result {
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{token}")?;
    }
    Ok(())
}

/// Whether `name` is a valid axis identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn check_unique(tokens: &[AxisToken], side: &'static str) -> Result<(), PatternError> {
    let mut seen: Vec<&str> = Vec::new();
    for name in tokens.iter().flat_map(AxisToken::names) {
        if seen.contains(&name) {
            return Err(PatternError::DuplicateAxis {
                name: name.to_string(),
                side,
            });
        }
        seen.push(name);
    }
    Ok(())
}

/// Cursor over one side of a pattern.
struct SideLexer<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> SideLexer<'src> {
    fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    fn remaining(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &self.src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(char::is_whitespace);
    }

    fn side(&self) -> String {
        self.src.to_string()
    }

    fn tokenize(mut self) -> Result<Vec<AxisToken>, PatternError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Ok(tokens);
            };
            let token = match c {
                '(' => self.lex_group()?,
                ')' => {
                    return Err(PatternError::UnmatchedClose {
                        offset: self.pos,
                        side: self.side(),
                    });
                }
                _ => match self.lex_leaf()? {
                    AxisLeaf::Named(name) => AxisToken::Simple(name),
                    AxisLeaf::Literal(n) => AxisToken::Literal(n),
                },
            };
            tokens.push(token);
        }
    }

    fn lex_group(&mut self) -> Result<AxisToken, PatternError> {
        let open = self.pos;
        self.advance();
        let mut members = SmallVec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(PatternError::UnclosedGroup {
                        offset: open,
                        side: self.side(),
                    });
                }
                Some(')') => {
                    self.advance();
                    return Ok(AxisToken::Group(members));
                }
                Some('(') => {
                    return Err(PatternError::NestedGroup {
                        offset: self.pos,
                        side: self.side(),
                    });
                }
                Some(_) => members.push(self.lex_leaf()?),
            }
        }
    }

    fn lex_leaf(&mut self) -> Result<AxisLeaf, PatternError> {
        let start = self.pos;
        match self.peek() {
            Some('.') if self.remaining().starts_with("...") => {
                self.pos += 3;
                self.expect_boundary()?;
                Ok(AxisLeaf::Named(ELLIPSIS_AXIS.to_string()))
            }
            Some(c) if c.is_ascii_digit() => {
                self.advance_while(is_ident_continue);
                let text = &self.src[start..self.pos];
                match text.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(AxisLeaf::Literal(n)),
                    _ => Err(PatternError::InvalidLiteral {
                        literal: text.to_string(),
                    }),
                }
            }
            Some(c) if is_ident_start(c) => {
                let name = self.advance_while(is_ident_continue);
                self.expect_boundary()?;
                Ok(AxisLeaf::Named(name.to_string()))
            }
            Some(found) => Err(PatternError::UnexpectedChar {
                found,
                offset: start,
                side: self.side(),
            }),
            None => Err(PatternError::UnexpectedChar {
                found: ' ',
                offset: start,
                side: self.side(),
            }),
        }
    }

    /// A leaf must be followed by whitespace, a parenthesis, or the end.
    fn expect_boundary(&self) -> Result<(), PatternError> {
        match self.peek() {
            None | Some('(' | ')') => Ok(()),
            Some(c) if c.is_whitespace() => Ok(()),
            Some(found) => Err(PatternError::UnexpectedChar {
                found,
                offset: self.pos,
                side: self.side(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn simple(name: &str) -> AxisToken {
        AxisToken::Simple(name.to_string())
    }

    fn named(name: &str) -> AxisLeaf {
        AxisLeaf::Named(name.to_string())
    }

    #[test]
    fn test_parse_transpose() {
        let p = Pattern::parse("h w -> w h").unwrap();
        assert_eq!(p.input(), &[simple("h"), simple("w")]);
        assert_eq!(p.output(), &[simple("w"), simple("h")]);
    }

    #[test]
    fn test_parse_group() {
        let p = Pattern::parse("(h w) c -> h w c").unwrap();
        assert_eq!(
            p.input(),
            &[AxisToken::Group(smallvec![named("h"), named("w")]), simple("c")]
        );
        assert_eq!(p.input_leaves(), vec![named("h"), named("w"), named("c")]);
    }

    #[test]
    fn test_parse_literal_and_group_literal() {
        let p = Pattern::parse("a 1 c -> (a 2) c").unwrap();
        assert_eq!(p.input()[1], AxisToken::Literal(1));
        assert_eq!(
            p.output()[0],
            AxisToken::Group(smallvec![named("a"), AxisLeaf::Literal(2)])
        );
    }

    #[test]
    fn test_parse_ellipsis_is_batch() {
        let p = Pattern::parse("... c -> c ...").unwrap();
        assert_eq!(p.input(), &[simple(ELLIPSIS_AXIS), simple("c")]);
        assert_eq!(p.output(), &[simple("c"), simple(ELLIPSIS_AXIS)]);
    }

    #[test]
    fn test_parse_tight_spacing() {
        let p = Pattern::parse("(h w)c->c(h w)").unwrap();
        assert_eq!(p.to_string(), "(h w) c -> c (h w)");
    }

    #[test]
    fn test_parse_empty_group_and_sides() {
        let p = Pattern::parse("() a -> a").unwrap();
        assert_eq!(p.input()[0], AxisToken::Group(SmallVec::new()));
        assert_eq!(p.input_leaves(), vec![named("a")]);

        let p = Pattern::parse(" -> ").unwrap();
        assert!(p.input().is_empty());
        assert!(p.output().is_empty());
    }

    #[test]
    fn test_separator_count() {
        assert_eq!(
            Pattern::parse("a b -> b a -> a b"),
            Err(PatternError::SeparatorCount { found: 2 })
        );
        assert_eq!(
            Pattern::parse("a b"),
            Err(PatternError::SeparatorCount { found: 0 })
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = Pattern::parse("a, b -> b a").unwrap_err();
        assert!(matches!(err, PatternError::UnexpectedChar { found: ',', .. }));

        let err = Pattern::parse("a-b -> b").unwrap_err();
        assert!(matches!(err, PatternError::UnexpectedChar { found: '-', .. }));
    }

    #[test]
    fn test_group_errors() {
        assert!(matches!(
            Pattern::parse("(a b -> a b"),
            Err(PatternError::UnclosedGroup { offset: 0, .. })
        ));
        assert!(matches!(
            Pattern::parse("a b) -> a b"),
            Err(PatternError::UnmatchedClose { offset: 3, .. })
        ));
        assert!(matches!(
            Pattern::parse("(a (b c)) -> a b c"),
            Err(PatternError::NestedGroup { offset: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_literals() {
        assert_eq!(
            Pattern::parse("a 0 -> a"),
            Err(PatternError::InvalidLiteral {
                literal: "0".to_string()
            })
        );
        assert_eq!(
            Pattern::parse("a 2x -> a"),
            Err(PatternError::InvalidLiteral {
                literal: "2x".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_axes() {
        assert_eq!(
            Pattern::parse("a a -> a"),
            Err(PatternError::DuplicateAxis {
                name: "a".to_string(),
                side: "input"
            })
        );
        assert_eq!(
            Pattern::parse("a b -> (a b) a"),
            Err(PatternError::DuplicateAxis {
                name: "a".to_string(),
                side: "output"
            })
        );
        assert!(Pattern::parse("... batch -> batch").is_err());
    }

    #[test]
    fn test_literals_may_repeat() {
        assert!(Pattern::parse("a 1 1 -> 1 a").is_ok());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("h"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("Batch_2"));
        assert!(!is_identifier("höhe"));
        assert!(!is_identifier("λ"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("(a)"));
    }

    #[test]
    fn test_non_ascii_axis_rejected() {
        assert_eq!(
            Pattern::parse("höhe w -> w höhe"),
            Err(PatternError::UnexpectedChar {
                found: 'ö',
                offset: 1,
                side: "höhe w".to_string(),
            })
        );
        assert!(matches!(
            Pattern::parse("λ -> λ"),
            Err(PatternError::UnexpectedChar { found: 'λ', offset: 0, .. })
        ));
    }

    #[test]
    fn test_from_str_and_display_roundtrip() {
        let text = "b (h w) c -> b h w c";
        let p: Pattern = text.parse().unwrap();
        assert_eq!(p.to_string(), text);
        assert_eq!(Pattern::parse(&p.to_string()).unwrap(), p);
    }
}
