//! The lexer, which reads source code and outputs tokens.
//!
//! The rules are the default TeX category codes restricted to what math input needs:
//!
//! - `\` followed by a run of ASCII letters is a control word.
//!     Whitespace after a control word is skipped.
//! - `\` followed by any other character is a control symbol.
//! - `%` starts a comment which runs until the end of the line.
//! - Whitespace characters are space tokens.
//! - Everything else is a character token.
//!
//! Unlike the TeX lexer, category codes cannot change during lexing,
//!     so a whole formula can be lexed up front.

use crate::error::LexError;
use crate::token::Span;
use crate::token::Token;
use std::iter::Peekable;
use std::str::CharIndices;

/// The lexer.
///
/// This is an iterator over the tokens in a piece of source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    trim_next_whitespace: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
            trim_next_whitespace: false,
        }
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            None => self.source.len(),
            Some((i, _)) => *i,
        }
    }

    fn read_control_sequence(&mut self, start: usize) -> Result<Token, LexError> {
        let first = match self.chars.next() {
            None => {
                return Err(LexError {
                    span: Span::new(start, self.source.len()),
                })
            }
            Some((_, c)) => c,
        };
        if !first.is_ascii_alphabetic() {
            self.trim_next_whitespace = false;
            let end = self.offset();
            return Ok(Token::new_control_sequence(first, Span::new(start, end)));
        }
        let mut name = String::from(first);
        while let Some((_, c)) = self.chars.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(*c);
            self.chars.next();
        }
        self.trim_next_whitespace = true;
        let end = self.offset();
        Ok(Token::new_control_sequence(name, Span::new(start, end)))
    }

    fn skip_comment(&mut self) {
        for (_, c) in self.chars.by_ref() {
            if c == '\n' {
                break;
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((i, c)) = self.chars.next() {
            let token = match c {
                '\\' => self.read_control_sequence(i),
                '%' => {
                    self.skip_comment();
                    continue;
                }
                c if c.is_whitespace() => {
                    if self.trim_next_whitespace {
                        continue;
                    }
                    Ok(Token::new_space(c, Span::new(i, i + c.len_utf8())))
                }
                c => {
                    self.trim_next_whitespace = false;
                    Ok(Token::new_character(c, Span::new(i, i + c.len_utf8())))
                }
            };
            return Some(token);
        }
        None
    }
}

/// Lex the provided source code into a list of tokens.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Value;

    fn cs(name: &str) -> Value {
        Value::ControlSequence(name.into())
    }

    macro_rules! lexer_test {
        ($name: ident, $input: expr, $( $want: expr ),* $(,)?) => {
            #[test]
            fn $name() {
                let got: Vec<Value> = lex($input)
                    .unwrap()
                    .into_iter()
                    .map(|t| t.value().clone())
                    .collect();
                let want: Vec<Value> = vec![$( $want ),*];
                assert_eq!(got, want);
            }
        };
    }

    lexer_test!(
        greek,
        r"\alpha+\beta",
        cs("alpha"),
        Value::Character('+'),
        cs("beta"),
    );
    lexer_test!(
        whitespace_after_control_word_is_trimmed,
        "\\bf  \n x",
        cs("bf"),
        Value::Character('x'),
    );
    lexer_test!(
        whitespace_after_control_symbol_is_kept,
        r"\, x",
        cs(","),
        Value::Space(' '),
        Value::Character('x'),
    );
    lexer_test!(
        control_space,
        r"a\ b",
        Value::Character('a'),
        cs(" "),
        Value::Character('b'),
    );
    lexer_test!(
        comment,
        "a% comment \\undefined\nb",
        Value::Character('a'),
        Value::Character('b'),
    );
    lexer_test!(
        digits_after_control_word,
        r"\sqrt2",
        cs("sqrt"),
        Value::Character('2'),
    );

    #[test]
    fn spans() {
        let tokens = lex(r"x+\alpha").unwrap();
        let spans: Vec<Span> = tokens.iter().map(Token::span).collect();
        assert_eq!(
            spans,
            vec![Span::new(0, 1), Span::new(1, 2), Span::new(2, 8)]
        );
    }

    #[test]
    fn trailing_backslash() {
        let err = lex(r"x\").unwrap_err();
        assert_eq!(err.span, Span::new(1, 2));
    }
}
