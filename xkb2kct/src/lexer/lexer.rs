use super::Token;
use crate::errors::KctError;
use logos::{Lexer as LogosLexer, Logos};

pub struct Lexer<'a> {
    inner: LogosLexer<'a, Token>,
    current_line: usize,
    last_start: usize,
    pub input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: Token::lexer(input),
            current_line: 1,
            last_start: 0,
            input,
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, KctError> {
        let next = self.inner.next();
        let span = self.inner.span();

        // Count newlines between the previous token start and this one
        let passed = &self.input[self.last_start..span.start];
        self.current_line += passed.matches('\n').count();
        self.last_start = span.start;

        match next {
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(())) => Err(KctError::Parse {
                line: self.current_line,
                message: format!("Unexpected token: '{}'", &self.input[span.start..span.end]),
            }),
            None => Ok(None),
        }
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn peek(&self) -> Option<Token> {
        self.inner.clone().next().and_then(|r| r.ok())
    }

    pub fn collect_all(mut self) -> Result<Vec<Token>, KctError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}
