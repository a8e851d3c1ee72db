// Location expression parser
//
// Grammar:
//
//   location      := operator_expr | span | point
//   operator_expr := ("complement" | "join" | "order") "(" location { "," location } ")"
//   span          := [accession ":"] position ".." position
//   point         := [accession ":"] position
//   position      := ["<" | ">"] integer
//
// Operators nest arbitrarily deep, so the parser keeps open operators on an
// explicit stack instead of recursing. Whitespace between tokens is ignored.

use crate::error::{ParseError, Result};
use crate::models::{AccessionRef, Fuzziness, Location, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'a> {
    /// Operator name or accession (`join`, `AB012345.1`)
    Word(&'a str),
    Number(u64),
    Less,
    Greater,
    DotDot,
    Comma,
    Colon,
    LParen,
    RParen,
    Eof,
}

impl TokenKind<'_> {
    fn describe(&self) -> String {
        match self {
            TokenKind::Word(word) => format!("'{word}'"),
            TokenKind::Number(n) => format!("'{n}'"),
            TokenKind::Less => "'<'".to_string(),
            TokenKind::Greater => "'>'".to_string(),
            TokenKind::DotDot => "'..'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind<'a>,
    /// Byte offset into the expression
    pos: usize,
}

fn tokenize(expr: &str) -> Result<Vec<Token<'_>>> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let pos = i;
        let kind = match bytes[i] {
            b if b.is_ascii_whitespace() => {
                i += 1;
                continue;
            },
            b'<' => TokenKind::Less,
            b'>' => TokenKind::Greater,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'.' => {
                if bytes.get(i + 1) != Some(&b'.') {
                    return Err(ParseError::location_syntax(pos, "expected '..'"));
                }
                i += 2;
                tokens.push(Token {
                    kind: TokenKind::DotDot,
                    pos,
                });
                continue;
            },
            b if b.is_ascii_digit() => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let value = expr[pos..i].parse().map_err(|_| {
                    ParseError::location_syntax(pos, format!("position '{}' is out of range", &expr[pos..i]))
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    pos,
                });
                continue;
            },
            b if b.is_ascii_alphabetic() || b == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                // version suffix of an accession: `.` followed by digits
                if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Word(&expr[pos..i]),
                    pos,
                });
                continue;
            },
            _ => {
                let found = expr[pos..].chars().next().unwrap_or_default();
                return Err(ParseError::location_syntax(
                    pos,
                    format!("unexpected character '{found}'"),
                ));
            },
        };
        i += 1;
        tokens.push(Token { kind, pos });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        pos: expr.len(),
    });
    Ok(tokens)
}

struct Cursor<'a> {
    tokens: Vec<Token<'a>>,
    index: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Token<'a> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Token<'a> {
        // the trailing Eof token absorbs reads past the end
        let last = self.tokens.len() - 1;
        self.tokens[(self.index + n).min(last)]
    }

    fn next(&mut self) -> Token<'a> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Complement,
    Join,
    Order,
}

impl Operator {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "complement" => Some(Operator::Complement),
            "join" => Some(Operator::Join),
            "order" => Some(Operator::Order),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Operator::Complement => "complement",
            Operator::Join => "join",
            Operator::Order => "order",
        }
    }
}

/// An operator whose closing parenthesis has not been seen yet
struct Frame {
    op: Operator,
    pos: usize,
    items: Vec<Location>,
}

impl Frame {
    fn close(self, pos: usize) -> Result<Location> {
        match self.op {
            Operator::Complement => {
                let mut items = self.items;
                match (items.pop(), items.is_empty()) {
                    (Some(inner), true) => Ok(Location::complement(inner)),
                    _ => Err(ParseError::location_syntax(
                        pos,
                        "complement() takes exactly one location",
                    )),
                }
            },
            Operator::Join => Ok(Location::Join(self.items)),
            Operator::Order => Ok(Location::Order(self.items)),
        }
    }
}

fn parse_position(cursor: &mut Cursor<'_>) -> Result<Position> {
    let fuzziness = match cursor.peek().kind {
        TokenKind::Less => Fuzziness::Before,
        TokenKind::Greater => Fuzziness::After,
        _ => Fuzziness::Exact,
    };
    if fuzziness != Fuzziness::Exact {
        cursor.next();
    }

    let token = cursor.next();
    match token.kind {
        TokenKind::Number(value) => Ok(Position { value, fuzziness }),
        other => Err(ParseError::location_syntax(
            token.pos,
            format!("expected a base position, found {}", other.describe()),
        )),
    }
}

fn parse_leaf(cursor: &mut Cursor<'_>, accession: &str) -> Result<Location> {
    let remote = match (cursor.peek().kind, cursor.peek_nth(1).kind) {
        (TokenKind::Word(word), TokenKind::Colon) => {
            cursor.next();
            cursor.next();
            Some(AccessionRef::parse(word))
        },
        (TokenKind::Word(word), TokenKind::LParen) => {
            return Err(ParseError::location_syntax(
                cursor.peek().pos,
                format!("unknown location operator '{word}'"),
            ));
        },
        (TokenKind::Word(word), _) => {
            return Err(ParseError::location_syntax(
                cursor.peek().pos,
                format!("expected ':' after accession '{word}'"),
            ));
        },
        (TokenKind::Number(_) | TokenKind::Less | TokenKind::Greater, _) => None,
        (other, _) => {
            return Err(ParseError::location_syntax(
                cursor.peek().pos,
                format!("expected a location, found {}", other.describe()),
            ));
        },
    };

    // a reference to the enclosing record is the same as no reference
    let remote = remote.filter(|r| !r.refers_to(accession));

    let start = parse_position(cursor)?;
    if cursor.peek().kind != TokenKind::DotDot {
        return Ok(Location::Point { at: start, remote });
    }
    cursor.next();
    let end = parse_position(cursor)?;

    Ok(Location::Span { start, end, remote })
}

/// Parse a location expression.
///
/// `accession` identifies the record the location belongs to. Remote
/// references naming that record collapse to `remote: None`; an empty
/// accession means the record is unknown and never matches.
///
/// # Examples
///
/// ```
/// use gbfeat_parser::{parse_location, Location};
///
/// let location = parse_location("complement(join(1..5,10..15))", "").unwrap();
/// assert_eq!(
///     location,
///     Location::complement(Location::Join(vec![Location::span(1, 5), Location::span(10, 15)]))
/// );
/// ```
pub fn parse_location(expr: &str, accession: &str) -> Result<Location> {
    let mut cursor = Cursor {
        tokens: tokenize(expr)?,
        index: 0,
    };
    let mut frames: Vec<Frame> = Vec::new();

    loop {
        // open operators until a leaf is reached
        let mut current = loop {
            let token = cursor.peek();
            let op = match (token.kind, cursor.peek_nth(1).kind) {
                (TokenKind::Word(name), TokenKind::LParen) => Operator::from_name(name),
                _ => None,
            };
            let Some(op) = op else {
                break parse_leaf(&mut cursor, accession)?;
            };
            cursor.next();
            cursor.next();
            frames.push(Frame {
                op,
                pos: token.pos,
                items: Vec::new(),
            });
        };

        // attach the finished location to its enclosing operators
        loop {
            let Some(frame) = frames.last_mut() else {
                let token = cursor.peek();
                if token.kind != TokenKind::Eof {
                    return Err(ParseError::location_syntax(
                        token.pos,
                        format!("unexpected {} after complete location", token.kind.describe()),
                    ));
                }
                return Ok(current);
            };

            frame.items.push(current);
            let token = cursor.next();
            match token.kind {
                TokenKind::Comma if frame.op == Operator::Complement => {
                    return Err(ParseError::location_syntax(
                        token.pos,
                        "complement() takes exactly one location",
                    ));
                },
                TokenKind::Comma => break,
                TokenKind::RParen => {
                    let done = frames
                        .pop()
                        .ok_or_else(|| ParseError::location_syntax(token.pos, "unbalanced ')'"))?;
                    current = done.close(token.pos)?;
                },
                TokenKind::Eof => {
                    return Err(ParseError::location_syntax(
                        token.pos,
                        format!(
                            "unclosed '{}(' opened at position {}",
                            frame.op.name(),
                            frame.pos
                        ),
                    ));
                },
                other => {
                    return Err(ParseError::location_syntax(
                        token.pos,
                        format!("expected ',' or ')', found {}", other.describe()),
                    ));
                },
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::Strand;

    fn syntax_error(expr: &str) -> (usize, String) {
        match parse_location(expr, "") {
            Err(ParseError::LocationSyntax { position, reason }) => (position, reason),
            other => panic!("expected syntax error for {expr:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_span() {
        assert_eq!(parse_location("1..206", "").unwrap(), Location::span(1, 206));
    }

    #[test]
    fn test_point() {
        assert_eq!(parse_location("467", "").unwrap(), Location::point(467));
    }

    #[test]
    fn test_fuzzy_ends() {
        let location = parse_location("<1..>888", "").unwrap();
        assert_eq!(
            location,
            Location::Span {
                start: Position::before(1),
                end: Position::after(888),
                remote: None,
            }
        );
        assert!(location.is_fuzzy());
    }

    #[test]
    fn test_nested_operators() {
        let location = parse_location("complement(join(1..5,10..15))", "").unwrap();
        assert_eq!(
            location,
            Location::complement(Location::Join(vec![
                Location::span(1, 5),
                Location::span(10, 15),
            ]))
        );
    }

    #[test]
    fn test_join_of_complement() {
        let location = parse_location("join(complement(1..5),6..10)", "").unwrap();
        assert_eq!(
            location,
            Location::Join(vec![
                Location::complement(Location::span(1, 5)),
                Location::span(6, 10),
            ])
        );
    }

    #[test]
    fn test_order_preserves_element_order() {
        let location = parse_location("order(30..40,1..10,20)", "").unwrap();
        assert_eq!(
            location,
            Location::Order(vec![
                Location::span(30, 40),
                Location::span(1, 10),
                Location::point(20),
            ])
        );
    }

    #[test]
    fn test_remote_reference_keeps_version() {
        let location = parse_location("AB012345.1:45..60", "XY999999").unwrap();
        assert_eq!(
            location,
            Location::Span {
                start: Position::exact(45),
                end: Position::exact(60),
                remote: Some(AccessionRef::new("AB012345", Some("1"))),
            }
        );
    }

    #[test]
    fn test_same_record_reference_collapses() {
        let location = parse_location("join(XY999999.2:1..10,AB012345:5..9)", "XY999999").unwrap();
        assert_eq!(
            location,
            Location::Join(vec![
                Location::span(1, 10),
                Location::Span {
                    start: Position::exact(5),
                    end: Position::exact(9),
                    remote: Some(AccessionRef::new("AB012345", None)),
                },
            ])
        );
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let location = parse_location("  join( 1 .. 5 ,\t10..15 ) ", "").unwrap();
        assert_eq!(
            location,
            Location::Join(vec![Location::span(1, 5), Location::span(10, 15)])
        );
    }

    #[test]
    fn test_complement_requires_exactly_one_location() {
        let (position, reason) = syntax_error("complement(1..5,10..15)");
        assert_eq!(position, 15);
        assert!(reason.contains("exactly one"));

        let (position, _) = syntax_error("complement()");
        assert_eq!(position, 11);
    }

    #[test]
    fn test_empty_join_is_rejected() {
        let (position, reason) = syntax_error("join()");
        assert_eq!(position, 5);
        assert!(reason.contains("expected a location"));
    }

    #[test]
    fn test_unclosed_operator() {
        let (position, reason) = syntax_error("join(1..5,10..15");
        assert_eq!(position, 16);
        assert!(reason.contains("unclosed 'join('"));
    }

    #[test]
    fn test_trailing_input() {
        let (position, _) = syntax_error("1..5)");
        assert_eq!(position, 4);
    }

    #[test]
    fn test_unknown_operator() {
        let (position, reason) = syntax_error("bond(1..5)");
        assert_eq!(position, 0);
        assert!(reason.contains("unknown location operator 'bond'"));
    }

    #[test]
    fn test_empty_expression() {
        let (position, _) = syntax_error("");
        assert_eq!(position, 0);
        assert!(parse_location("   ", "").is_err());
    }

    #[test]
    fn test_single_dot_and_bad_characters() {
        assert_eq!(syntax_error("1.5").0, 1);
        assert_eq!(syntax_error("1..5;").0, 4);
        assert_eq!(syntax_error("1..").0, 3);
    }

    #[test]
    fn test_position_overflow() {
        let (_, reason) = syntax_error("1..99999999999999999999999");
        assert!(reason.contains("out of range"));
    }

    #[test]
    fn test_deep_nesting_uses_explicit_stack() {
        let depth = 2_000;
        let expr = format!("{}1..2{}", "join(".repeat(depth), ")".repeat(depth));
        let location = parse_location(&expr, "").unwrap();
        assert_eq!(location.leaves().len(), 1);
        assert_eq!(location.to_string(), expr);
    }

    #[test]
    fn test_very_deep_location_parses_compares_and_drops() {
        let depth = 200_000;
        let expr = format!("{}1..2{}", "complement(".repeat(depth), ")".repeat(depth));

        let location = parse_location(&expr, "").unwrap();
        assert_eq!(location.strand(), Strand::Forward);
        assert_eq!(location.bounds(), Some((1, 2)));
        assert_eq!(location.to_string(), expr);

        let again = parse_location(&expr, "").unwrap();
        assert!(again == location);
        drop(again);
        drop(location);
    }

    #[test]
    fn test_remote_version_kept_verbatim() {
        let location = parse_location("AB012345.01:45..60", "").unwrap();
        assert_eq!(location.to_string(), "AB012345.01:45..60");

        let own = parse_location("AB012345.01:45..60", "AB012345.1").unwrap();
        assert_eq!(own, Location::span(45, 60));
    }
}
