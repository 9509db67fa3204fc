//! Declaration parser for C# source files.
//!
//! Tokenizes with logos and builds a declaration tree (namespaces, types and
//! member signatures). Bodies and initializers are skipped, so the parser is
//! purely syntactic and never resolves names or types.

pub mod ast;
pub mod error;
pub mod parser;
mod preprocessor;
pub mod tokenizer;

#[cfg(test)]
mod tests_declarations;

pub use error::{ParseError, ParseResult, TokenSpan};
pub use parser::{parse, Parser};
pub use tokenizer::{tokenize, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let source = "interface IFoo";
        let tokens = tokenize(source).expect("Failed to tokenize");
        assert_eq!(tokens.len(), 2);
    }
}
