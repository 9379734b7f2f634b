use std::io::{self, Read};

use tracing::trace;

use crate::args::{bind, substitute};
use crate::ast::TokenKind;
use crate::error::{Error, Result};
use crate::macros::MacroRegistry;
use crate::parser::TokenStream;
use crate::scanner::scan_balanced;

/// Name of the placeholder macro that is inserted verbatim when used bare
const BODY: &str = "BODY";

/// Knobs for an [`Expander`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Maximum nesting of invocations. `None` leaves recursion unbounded.
    pub max_depth: Option<usize>,
    /// Re-emit invocations of undefined macros instead of dropping them
    pub keep_unknown: bool,
}

/// Expands `$(NAME args)` invocations against a macro registry
#[derive(Debug, Clone)]
pub struct Expander<'r> {
    registry: &'r MacroRegistry,
    options: ExpandOptions,
}

impl<'r> Expander<'r> {
    pub fn new(registry: &'r MacroRegistry) -> Self {
        Self {
            registry,
            options: ExpandOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = Some(max_depth);
        self
    }

    pub fn keep_unknown(mut self, keep: bool) -> Self {
        self.options.keep_unknown = keep;
        self
    }

    pub fn options(&self) -> ExpandOptions {
        self.options
    }

    /// Expand documentation text (main entry point)
    pub fn expand_text(&self, input: &str) -> Result<String> {
        let mut stream = TokenStream::document(input)?;
        self.expand(&mut stream)
    }

    /// Expand every invocation left in the stream
    pub fn expand(&self, stream: &mut TokenStream) -> Result<String> {
        let mut out = String::with_capacity(stream.remaining().len());
        self.expand_into(stream, &mut out, 0)?;
        Ok(out)
    }

    /// Expand the text found between the parentheses of one invocation
    pub fn expand_invocation(&self, body: &str) -> Result<String> {
        Ok(self.invoke(body, 0)?.unwrap_or_default())
    }

    fn expand_into(
        &self,
        stream: &mut TokenStream,
        out: &mut String,
        depth: usize,
    ) -> Result<()> {
        while let Some(token) = stream.peek() {
            match token.kind {
                TokenKind::Dollar => {
                    stream.advance();
                    if stream.peek_kind() != Some(TokenKind::LParen) {
                        out.push('$');
                        continue;
                    }

                    let span = scan_balanced(stream);
                    if span.text.is_empty() {
                        continue;
                    }
                    match self.invoke(span.text, depth)? {
                        Some(expanded) => out.push_str(&expanded),
                        None if self.options.keep_unknown => {
                            out.push_str("$(");
                            out.push_str(span.text);
                            if span.terminated {
                                out.push(')');
                            }
                        }
                        None => {}
                    }
                }
                TokenKind::EmbeddedCode => {
                    return Err(Error::EmbeddedCode {
                        offset: token.offset,
                    });
                }
                _ => {
                    out.push_str(token.text);
                    stream.advance();
                }
            }
        }
        Ok(())
    }

    /// Resolve one invocation. `None` means the name is not a defined macro.
    fn invoke(&self, body: &str, depth: usize) -> Result<Option<String>> {
        let mut stream = TokenStream::fragment(body)?;
        let Some(name) = stream.peek().filter(|t| t.is_identifier()) else {
            return Ok(Some(String::new()));
        };
        stream.advance();

        let Some(template) = self.registry.lookup(name.text) else {
            trace!(name = name.text, "undefined macro");
            return Ok(None);
        };

        if name.text == BODY && stream.is_empty() {
            return Ok(Some(template.to_string()));
        }

        // the token after the name separates it from the arguments
        stream.advance();
        stream.skip_blank();
        let args = bind(stream.remaining())?;

        let Some(substituted) = substitute(template, &args)? else {
            trace!(name = name.text, "missing argument, invocation dropped");
            return Ok(Some(String::new()));
        };

        if let Some(limit) = self.options.max_depth.filter(|&limit| depth >= limit) {
            return Err(Error::RecursionLimit { limit });
        }

        let mut rescan = TokenStream::fragment(&substituted)?;
        let mut out = String::with_capacity(substituted.len());
        self.expand_into(&mut rescan, &mut out, depth + 1)?;
        Ok(Some(out))
    }
}

/// Expand documentation text with the given overrides
pub fn expand_text(input: &str, registry: &MacroRegistry) -> Result<String> {
    Expander::new(registry).expand_text(input)
}

/// A reader that serves the expansion of everything read from `inner`
pub struct ExpandingReader<R: Read> {
    inner: R,
    registry: MacroRegistry,
    options: ExpandOptions,
    expanded: Option<io::Cursor<Vec<u8>>>,
}

impl<R: Read> ExpandingReader<R> {
    pub fn new(inner: R, registry: MacroRegistry) -> Self {
        Self {
            inner,
            registry,
            options: ExpandOptions::default(),
            expanded: None,
        }
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    /// Expand the whole input on first use; invocations may span all of it
    fn expanded(&mut self) -> io::Result<&mut io::Cursor<Vec<u8>>> {
        if self.expanded.is_none() {
            let mut input = String::new();
            self.inner.read_to_string(&mut input)?;

            let text = Expander::new(&self.registry)
                .with_options(self.options)
                .expand_text(&input)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            self.expanded = Some(io::Cursor::new(text.into_bytes()));
        }
        Ok(self.expanded.get_or_insert_default())
    }
}

impl<R: Read> Read for ExpandingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.expanded()?.read(buf)
    }
}
