use crate::ast::{ArgumentVector, REST, TokenKind};
use crate::error::Result;
use crate::parser::TokenStream;
use crate::scanner::scan_balanced;

/// Highest positional slot; it swallows any further commas
const LAST_POSITIONAL: usize = 9;

/// Split the argument text of an invocation into its slots.
///
/// Only commas outside parentheses separate arguments. Blanks following a
/// separator are not part of the next argument, though they stay in the rest
/// slot. An empty body supplies no arguments at all.
pub fn bind(body: &str) -> Result<ArgumentVector<'_>> {
    let mut args = ArgumentVector::new();
    if body.is_empty() {
        return Ok(args);
    }
    args.set(0, body);

    let mut stream = TokenStream::fragment(body)?;
    let mut slot = 1;
    let mut start = 0;
    let mut rest = None;

    while let Some(token) = stream.peek() {
        match token.kind {
            TokenKind::LParen => {
                scan_balanced(&mut stream);
            }
            TokenKind::Comma if slot < LAST_POSITIONAL => {
                args.set(slot, &body[start..token.offset]);
                rest.get_or_insert(&body[token.offset + 1..]);
                slot += 1;
                stream.advance();
                stream.skip_blank();
                start = stream.offset();
            }
            _ => stream.advance(),
        }
    }

    args.set(slot, &body[start..]);
    args.set(REST, rest.unwrap_or(""));
    Ok(args)
}

/// Splice `$0`-`$9` and `$+` references in `template` with `args`.
///
/// Returns `None` when the template refers to a positional argument that was
/// not supplied; the whole invocation then expands to nothing.
pub fn substitute(template: &str, args: &ArgumentVector) -> Result<Option<String>> {
    let mut out = String::with_capacity(template.len());
    let mut stream = TokenStream::fragment(template)?;
    if substitute_into(&mut stream, args, &mut out)? {
        Ok(Some(out))
    } else {
        Ok(None)
    }
}

fn substitute_into(
    stream: &mut TokenStream,
    args: &ArgumentVector,
    out: &mut String,
) -> Result<bool> {
    while let Some(token) = stream.peek() {
        match token.kind {
            TokenKind::Dollar => {
                stream.advance();
                let Some(next) = stream.peek().filter(|t| t.kind == TokenKind::Word) else {
                    out.push('$');
                    continue;
                };

                let mut chars = next.text.chars();
                match chars.next() {
                    Some(c @ '0'..='9') => {
                        let slot = c as usize - '0' as usize;
                        let Some(arg) = args.get(slot) else {
                            return Ok(false);
                        };
                        out.push_str(arg);
                    }
                    Some('+') => out.push_str(args.rest().unwrap_or("")),
                    _ => {
                        out.push('$');
                        continue;
                    }
                }
                // only the first character names the argument
                out.push_str(chars.as_str());
                stream.advance();
            }
            TokenKind::LParen => {
                out.push('(');
                let span = scan_balanced(stream);
                let mut inner = TokenStream::fragment(span.text)?;
                if !substitute_into(&mut inner, args, out)? {
                    return Ok(false);
                }
                if span.terminated {
                    out.push(')');
                }
            }
            _ => {
                out.push_str(token.text);
                stream.advance();
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(body: &str) -> Vec<Option<&str>> {
        let args = bind(body).unwrap();
        (0..11).map(|i| args.get(i)).collect()
    }

    #[test]
    fn test_bind_nested_commas() {
        let args = bind("this,(is,(just,two),args)").unwrap();
        assert_eq!(args.get(0), Some("this,(is,(just,two),args)"));
        assert_eq!(args.get(1), Some("this"));
        assert_eq!(args.get(2), Some("(is,(just,two),args)"));
        for slot in 3..=9 {
            assert_eq!(args.get(slot), None);
        }
        assert_eq!(args.rest(), Some("(is,(just,two),args)"));
    }

    #[test]
    fn test_bind_strips_blanks_after_comma() {
        let args = bind("a,  b,\n c ").unwrap();
        assert_eq!(args.get(1), Some("a"));
        assert_eq!(args.get(2), Some("b"));
        assert_eq!(args.get(3), Some("c "));
        assert_eq!(args.rest(), Some("  b,\n c "));
    }

    #[test]
    fn test_bind_without_comma() {
        let args = bind("just one").unwrap();
        assert_eq!(args.get(1), Some("just one"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.rest(), Some(""));
    }

    #[test]
    fn test_bind_empty_body() {
        assert!(bound("").iter().all(Option::is_none));
    }

    #[test]
    fn test_bind_trailing_comma_supplies_empty_argument() {
        let args = bind("a,").unwrap();
        assert_eq!(args.get(2), Some(""));
        assert_eq!(args.get(3), None);
    }

    #[test]
    fn test_bind_ninth_slot_absorbs_remainder() {
        let args = bind("1,2,3,4,5,6,7,8,9,10,11").unwrap();
        assert_eq!(args.get(8), Some("8"));
        assert_eq!(args.get(9), Some("9,10,11"));
        assert_eq!(args.rest(), Some("2,3,4,5,6,7,8,9,10,11"));
    }

    #[test]
    fn test_substitute_positional() {
        let args = bind("x, y").unwrap();
        let out = substitute("<a href=\"$1\">$2</a>", &args).unwrap();
        assert_eq!(out.as_deref(), Some("<a href=\"x\">y</a>"));
    }

    #[test]
    fn test_substitute_single_digit_only() {
        let args = bind("a").unwrap();
        assert_eq!(substitute("$12", &args).unwrap().as_deref(), Some("a2"));
    }

    #[test]
    fn test_substitute_rest() {
        let args = bind("first,second,third").unwrap();
        assert_eq!(
            substitute("[$+]", &args).unwrap().as_deref(),
            Some("[second,third]")
        );
        let empty = bind("").unwrap();
        assert_eq!(substitute("[$+]", &empty).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_substitute_literal_dollar() {
        let args = bind("a").unwrap();
        assert_eq!(
            substitute("cost: $x and $", &args).unwrap().as_deref(),
            Some("cost: $x and $")
        );
    }

    #[test]
    fn test_substitute_missing_argument_fails() {
        let args = bind("only").unwrap();
        assert_eq!(substitute("$1 $2", &args).unwrap(), None);
    }

    #[test]
    fn test_substitute_missing_argument_in_nested_span() {
        let args = bind("a,b").unwrap();
        assert_eq!(substitute("$(SOME $(MACRO $1 $2 $3))", &args).unwrap(), None);
    }

    #[test]
    fn test_substitute_keeps_nested_invocations() {
        let args = bind("a,b").unwrap();
        assert_eq!(
            substitute("$(B $1 (x $2))", &args).unwrap().as_deref(),
            Some("$(B a (x b))")
        );
    }

    #[test]
    fn test_substitute_unterminated_span() {
        let args = bind("a").unwrap();
        assert_eq!(substitute("$(B $1", &args).unwrap().as_deref(), Some("$(B a"));
    }
}
