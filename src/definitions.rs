use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::ast::{KeyValuePair, TokenKind};
use crate::error::{Error, Result};
use crate::parser::TokenStream;

/// Longest excerpt of unparsed text quoted in an error
const CONTEXT_LEN: usize = 40;

struct Pending<'a> {
    name: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Pending<'a> {
    fn into_pair(self, source: &'a str) -> KeyValuePair<'a> {
        KeyValuePair {
            name: self.name,
            value: &source[self.start..self.end],
        }
    }
}

/// Parse consecutive `NAME = VALUE` lines from the stream.
///
/// A line that is not a pair continues the value of the pair above it.
/// Returns `None` if the first line is not a pair. Parsing stops without
/// error at a section header, which is left in the stream for the caller.
pub fn parse_pairs<'a>(stream: &mut TokenStream<'a>) -> Option<Vec<KeyValuePair<'a>>> {
    let source = stream.source();
    let mut pairs = Vec::new();
    let mut pending: Option<Pending<'a>> = None;

    while !stream.is_empty() {
        let mark = stream.mark();
        if let Some(next) = match_pair(stream) {
            if let Some(done) = pending.replace(next) {
                pairs.push(done.into_pair(source));
            }
            continue;
        }
        stream.reset(mark);

        let current = pending.as_mut()?;
        if stream.peek_kind() == Some(TokenKind::Header) {
            break;
        }
        current.end = consume_line(stream);
    }

    if let Some(done) = pending {
        pairs.push(done.into_pair(source));
    }
    Some(pairs)
}

fn match_pair<'a>(stream: &mut TokenStream<'a>) -> Option<Pending<'a>> {
    stream.skip_whitespace();
    let name = stream.peek().filter(|t| t.is_identifier())?;
    stream.advance();

    stream.skip_whitespace();
    if stream.peek_kind() != Some(TokenKind::Equals) {
        return None;
    }
    stream.advance();
    stream.skip_whitespace();

    let start = stream.offset();
    let end = consume_line(stream);
    Some(Pending {
        name: name.text,
        start,
        end,
    })
}

/// Consume through the end of the current line, returning the offset where
/// its content stops (before the line terminator).
fn consume_line(stream: &mut TokenStream) -> usize {
    while let Some(token) = stream.peek() {
        stream.advance();
        if token.kind == TokenKind::Newline {
            return token.offset;
        }
    }
    stream.source().len()
}

/// Parse a whole definition source, failing if any of it is left over
pub fn parse_source<'a>(path: &Path, source: &'a str) -> Result<Vec<KeyValuePair<'a>>> {
    let mut stream = TokenStream::definitions(source)?;
    let pairs = parse_pairs(&mut stream).unwrap_or_default();

    if !stream.is_empty() {
        let offset = stream.offset();
        return Err(Error::UnconsumedContent {
            path: path.to_path_buf(),
            offset,
            context: context_at(source, offset),
        });
    }
    Ok(pairs)
}

fn context_at(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[offset..]
        .find(['\r', '\n'])
        .map_or(source.len(), |i| offset + i);
    source[line_start..line_end].chars().take(CONTEXT_LEN).collect()
}

/// Read and parse one definition file
pub fn parse_file(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let pairs = parse_source(path, &source)?;
    debug!(path = %path.display(), count = pairs.len(), "parsed macro definitions");

    Ok(pairs
        .into_iter()
        .map(|pair| (pair.name.to_string(), pair.value.to_string()))
        .collect())
}

/// Read several definition files into one mapping; later definitions win
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<HashMap<String, String>> {
    let mut macros = HashMap::new();
    for path in paths {
        macros.extend(parse_file(path)?);
    }
    debug!(
        files = paths.len(),
        macros = macros.len(),
        "loaded macro definition files"
    );
    Ok(macros)
}
