//! Evaluates the value-producing subset of JavaScript/TypeScript used by state
//! modules (`initState.ts`) into a [`slicegen_value::Heap`].

pub mod error;
pub mod init_state;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use init_state::{load_init_state, InitState, LoadError, LoadResult};
pub use lexer::{lex, Token};
pub use parser::{parse_module, parse_value, Module, Parser};
