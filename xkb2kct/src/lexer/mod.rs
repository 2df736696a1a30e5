pub mod token;
pub mod lexer;

pub use token::Token;
pub use lexer::Lexer;
