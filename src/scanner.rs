use crate::ast::TokenKind;
use crate::parser::TokenStream;

/// Text between a pair of parentheses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balanced<'a> {
    pub text: &'a str,
    /// False when the input ran out before the matching `)`
    pub terminated: bool,
}

/// Consume a parenthesized span starting at the `(` under the cursor.
///
/// Returns the text strictly inside the outer pair and leaves the stream just
/// past the matching `)`. Unbalanced input yields everything up to the end of
/// the stream with `terminated` unset.
pub fn scan_balanced<'a>(stream: &mut TokenStream<'a>) -> Balanced<'a> {
    debug_assert_eq!(stream.peek_kind(), Some(TokenKind::LParen));
    stream.advance();

    let source = stream.source();
    let start = stream.offset();
    let mut depth = 1usize;

    while let Some(token) = stream.peek() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    stream.advance();
                    return Balanced {
                        text: &source[start..token.offset],
                        terminated: true,
                    };
                }
            }
            _ => {}
        }
        stream.advance();
    }

    Balanced {
        text: &source[start..],
        terminated: false,
    }
}
