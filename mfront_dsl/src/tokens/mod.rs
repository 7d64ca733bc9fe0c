//! Token system for the MFront DSL
//!
//! A [`Token`] is an immutable record of one lexeme: its line, its column, its
//! raw text and a [`TokenFlag`] classification. String literals keep their
//! quotes; comments are separate tokens until the comment stripping pass
//! folds documentation into the `comment` field of neighbouring tokens.
//!
//! A [`TokenStream`] owns the tokens of one source unit and exposes a cursor
//! with checkpoints. Keyword handlers move the cursor; they never edit the
//! tokens themselves.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenFlag};
pub use token_stream::TokenStream;
