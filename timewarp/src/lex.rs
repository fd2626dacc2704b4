use std::collections::VecDeque;
use std::io::BufRead;

use derive_more::Display;
use logos::Logos;

use crate::error::Result;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum RawToken {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("'")]
    Quote,

    #[regex(r#""[^"]*""#)]
    Text,
    #[regex(r#"[^\s('"`;)]+"#)]
    Atom,

    #[error]
    #[regex(r"\s+", logos::skip)]
    #[regex(r";[^\n]*", logos::skip)]
    Error,
}

/// A token handed to the parser. String literals stay in `Atom` with their
/// quotes; classifying atom text is the parser's job.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum Token {
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
    #[display(fmt = "'")]
    Quote,
    #[display(fmt = "{}", _0)]
    Atom(String),
    #[display(fmt = "#<eof>")]
    Eof,
}

/// Lazy token stream over a line-oriented source.
///
/// Once the source runs dry, or a line contains a character no token starts
/// with, every further call yields [`Token::Eof`].
pub struct Tokenizer<R> {
    source: R,
    line: String,
    pending: VecDeque<Token>,
    exhausted: bool,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(source: R) -> Self {
        Tokenizer {
            source,
            line: String::new(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fill(&mut self) -> std::io::Result<()> {
        while self.pending.is_empty() && !self.exhausted {
            self.line.clear();
            if self.source.read_line(&mut self.line)? == 0 {
                self.exhausted = true;
                break;
            }
            let mut lexer = RawToken::lexer(&self.line);
            while let Some(raw) = lexer.next() {
                let token = match raw {
                    RawToken::LParen => Token::LParen,
                    RawToken::RParen => Token::RParen,
                    RawToken::Quote => Token::Quote,
                    RawToken::Text | RawToken::Atom => Token::Atom(lexer.slice().to_owned()),
                    RawToken::Error => {
                        log::debug!("no token matches {:?}, ending input", lexer.slice());
                        self.exhausted = true;
                        break;
                    }
                };
                self.pending.push_back(token);
            }
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for Tokenizer<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.fill() {
            self.exhausted = true;
            return Some(Err(err.into()));
        }
        Some(Ok(self.pending.pop_front().unwrap_or(Token::Eof)))
    }
}

pub fn tokenize(src: &str) -> Tokenizer<&[u8]> {
    Tokenizer::new(src.as_bytes())
}
