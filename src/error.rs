use std::path::PathBuf;

use thiserror::Error;

use crate::parser::Rule;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to lex input: {0}")]
    Lex(#[from] Box<pest::error::Error<Rule>>),

    /// Code fences must be converted to macro form before expansion
    #[error("embedded code block reached the expander at offset {offset}")]
    EmbeddedCode { offset: usize },

    #[error("macro expansion nested deeper than {limit} levels")]
    RecursionLimit { limit: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unparsed content in {} at offset {offset}: {context:?}", .path.display())]
    UnconsumedContent {
        path: PathBuf,
        offset: usize,
        context: String,
    },
}
