//! ```
//! use ddocrs::{MacroRegistry, expand_text};
//!
//! let mut registry = MacroRegistry::new();
//! registry.define("GREET", "Hello, $(B $1)!");
//! let html = expand_text("$(GREET world)", &registry).unwrap();
//! assert_eq!(html, "Hello, <b>world</b>!");
//! ```

pub mod args;
pub mod ast;
pub mod definitions;
pub mod error;
pub mod macros;
pub mod parser;
pub mod processor;
pub mod scanner;

pub use ast::{ArgumentVector, KeyValuePair, Token, TokenKind};
pub use error::{Error, Result};
pub use macros::{MacroRegistry, builtin_macros, lookup};
pub use parser::TokenStream;
pub use processor::{ExpandOptions, Expander, ExpandingReader, expand_text};
