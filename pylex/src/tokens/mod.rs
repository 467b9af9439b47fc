//! Token model for pylex
//!
//! A [`Token`] is a classified lexeme with its 1-based line and character column. The fixed
//! keyword, builtin and operator tables live beside it in [`token`]; [`TokenStream`] wraps a
//! completed scan for counting, navigation and source reconstruction.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenKind};
pub use token_stream::TokenStream;
