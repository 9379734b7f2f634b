use pest::{Parser, iterators::Pair};
use pest_derive::Parser;

use crate::ast::{Token, TokenKind};
use crate::error::Result;

#[derive(Parser)]
#[grammar = "ddoc.pest"]
pub struct DdocLexer;

impl DdocLexer {
    /// Lex documentation text, recognizing section headers and code fences
    pub fn lex_document(input: &str) -> Result<Vec<Token<'_>>> {
        Self::lex(Rule::document, input)
    }

    /// Lex a macro body or template, where only inline tokens exist
    pub fn lex_fragment(input: &str) -> Result<Vec<Token<'_>>> {
        Self::lex(Rule::fragment, input)
    }

    /// Lex a macro definition file, where only section headers are line-initial
    pub fn lex_definitions(input: &str) -> Result<Vec<Token<'_>>> {
        Self::lex(Rule::definitions, input)
    }

    fn lex(rule: Rule, input: &str) -> Result<Vec<Token<'_>>> {
        let mut pairs = DdocLexer::parse(rule, input).map_err(Box::new)?;
        let Some(root) = pairs.next() else {
            return Ok(Vec::new());
        };

        Ok(root.into_inner().filter_map(Self::token).collect())
    }

    fn token(pair: Pair<'_, Rule>) -> Option<Token<'_>> {
        let kind = match pair.as_rule() {
            Rule::word => TokenKind::Word,
            Rule::whitespace => TokenKind::Whitespace,
            Rule::newline => TokenKind::Newline,
            Rule::dollar => TokenKind::Dollar,
            Rule::lparen => TokenKind::LParen,
            Rule::rparen => TokenKind::RParen,
            Rule::comma => TokenKind::Comma,
            Rule::equals => TokenKind::Equals,
            Rule::header => TokenKind::Header,
            Rule::embedded => TokenKind::EmbeddedCode,
            _ => return None,
        };

        Some(Token {
            kind,
            text: pair.as_str(),
            offset: pair.as_span().start(),
        })
    }
}

/// Saved position of a [`TokenStream`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Cursor over the tokens of one source string
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TokenStream<'a> {
    pub fn document(source: &'a str) -> Result<Self> {
        Ok(Self::from_tokens(source, DdocLexer::lex_document(source)?))
    }

    pub fn fragment(source: &'a str) -> Result<Self> {
        Ok(Self::from_tokens(source, DdocLexer::lex_fragment(source)?))
    }

    pub fn definitions(source: &'a str) -> Result<Self> {
        Ok(Self::from_tokens(source, DdocLexer::lex_definitions(source)?))
    }

    fn from_tokens(source: &'a str, tokens: Vec<Token<'a>>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub fn advance(&mut self) {
        if !self.is_empty() {
            self.pos += 1;
        }
    }

    /// Byte offset of the current token, or the source length once exhausted
    pub fn offset(&self) -> usize {
        self.peek().map_or(self.source.len(), |t| t.offset)
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Unconsumed source text
    pub fn remaining(&self) -> &'a str {
        &self.source[self.offset()..]
    }

    pub fn skip_blank(&mut self) {
        while self.peek().is_some_and(|t| t.is_blank()) {
            self.advance();
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek_kind() == Some(TokenKind::Whitespace) {
            self.advance();
        }
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }
}
