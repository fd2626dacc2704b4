use std::io::BufRead;

use crate::error::{Result, SyntaxError};
use crate::lex::{Token, Tokenizer};
use crate::symtab::{intern, ToSymbol};
use crate::value::Value;

/// Reads successive top-level expressions from a token stream, pulling one
/// token at a time.
pub struct Reader<R> {
    tokens: Tokenizer<R>,
}

impl<R: BufRead> Reader<R> {
    pub fn new(source: R) -> Self {
        Reader {
            tokens: Tokenizer::new(source),
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.tokens.next().unwrap_or(Ok(Token::Eof))
    }

    fn parse_token(&mut self, token: Token) -> Result<Value> {
        match token {
            Token::LParen => self.parse_lst(),
            Token::RParen => Err(SyntaxError::UnmatchedCloseParen.into()),
            Token::Quote => {
                let next = self.next_token()?;
                let quoted = self.parse_token(next)?;
                Ok(Value::List(vec![Value::Symbol("quote".to_symbol()), quoted]))
            }
            Token::Eof => Err(SyntaxError::UnexpectedEof.into()),
            Token::Atom(text) => atom(&text),
        }
    }

    fn parse_lst(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.next_token()? {
                Token::RParen => return Ok(Value::List(items)),
                Token::Eof => return Err(SyntaxError::ExpectedCloseParen.into()),
                token => items.push(self.parse_token(token)?),
            }
        }
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::Eof) => None,
            Ok(token) => Some(self.parse_token(token)),
            Err(err) => Some(Err(err)),
        }
    }
}

/// Parse the first expression of `src`.
pub fn read_str(src: &str) -> Result<Value> {
    Reader::new(src.as_bytes())
        .next()
        .unwrap_or(Err(SyntaxError::UnexpectedEof.into()))
}

/// Classify atom text: boolean, string literal, integer, float, symbol.
pub fn atom(text: &str) -> Result<Value> {
    match text {
        "" => Err(SyntaxError::InvalidAtom(text.to_owned()).into()),
        "#t" => Ok(Value::Bool(true)),
        "#f" => Ok(Value::Bool(false)),
        _ if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') => {
            Ok(Value::text(&unescape(&text[1..text.len() - 1])))
        }
        _ => {
            if let Ok(i) = text.parse::<i64>() {
                Ok(Value::Int(i))
            } else if let Ok(x) = text.parse::<f64>() {
                Ok(Value::Float(x))
            } else {
                Ok(Value::Symbol(intern(text)))
            }
        }
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
