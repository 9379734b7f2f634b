/// Kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Whitespace,
    Newline,
    Dollar,
    LParen,
    RParen,
    Comma,
    Equals,
    /// Section header such as `Params:` at the start of a line
    Header,
    /// Fenced `---` code block
    EmbeddedCode,
}

/// A token borrowed from the lexed source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Absolute byte offset into the lexed source
    pub offset: usize,
}

impl Token<'_> {
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Whether the token is a bare identifier usable as a macro name
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Word && is_identifier(self.text)
    }
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Number of slots in an [`ArgumentVector`]
pub const ARG_SLOTS: usize = 11;

/// Slot holding everything after the first top-level comma (`$+`)
pub const REST: usize = 10;

/// Arguments of one invocation.
///
/// Slot 0 is the whole argument text, slots 1 to 9 are positional and slot
/// [`REST`] is the rest argument. `None` means "not supplied", which is not the
/// same as an empty argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector<'a>([Option<&'a str>; ARG_SLOTS]);

impl<'a> ArgumentVector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: usize) -> Option<&'a str> {
        self.0.get(slot).copied().flatten()
    }

    pub fn set(&mut self, slot: usize, text: &'a str) {
        self.0[slot] = Some(text);
    }

    pub fn rest(&self) -> Option<&'a str> {
        self.0[REST]
    }
}

/// A `NAME = VALUE` pair from a macro definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair<'a> {
    pub name: &'a str,
    pub value: &'a str,
}
