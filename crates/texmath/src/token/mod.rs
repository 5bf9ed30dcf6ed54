//! TeX math tokens.
//!
//! Tokens are the atoms handed to the dispatcher.
//! They are produced by the [lexer] from source code, and by the expander
//!     when it rewrites a macro invocation.

pub mod lexer;

use std::borrow::Cow;

/// The value of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A literal character like `x`, `+` or `{`.
    Character(char),
    /// A whitespace character.
    Space(char),
    /// A control sequence; the name is stored without the leading backslash.
    ControlSequence(String),
}

impl Value {
    /// Returns the text used to look up this value in keyed symbol maps.
    ///
    /// For characters this is the character itself and for control sequences
    ///     it is the name without the backslash.
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Value::Character(c) | Value::Space(c) => Cow::Owned(c.to_string()),
            Value::ControlSequence(name) => Cow::Borrowed(name),
        }
    }

    /// Returns the text of the value as it would appear in source code.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Value::Character(c) | Value::Space(c) => Cow::Owned(c.to_string()),
            Value::ControlSequence(name) => Cow::Owned(format!["\\{name}"]),
        }
    }

    /// Returns the character if this value is a character or a space.
    pub fn char(&self) -> Option<char> {
        match self {
            Value::Character(c) | Value::Space(c) => Some(*c),
            Value::ControlSequence(_) => None,
        }
    }

    /// Returns true if this is a control word: a control sequence whose name is made of letters.
    pub fn is_control_word(&self) -> bool {
        match self {
            Value::ControlSequence(name) => {
                !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
            }
            _ => false,
        }
    }
}

/// Location of a token in the source code, as a range of byte offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }
}

/// A TeX math token.
///
/// Two tokens are equal if their values are equal; the span is ignored.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    value: Value,
    span: Span,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write![f, "{}", self.value.text()]
    }
}

impl Token {
    pub fn new(value: Value, span: Span) -> Token {
        Token { value, span }
    }

    pub fn new_character(c: char, span: Span) -> Token {
        Token::new(Value::Character(c), span)
    }

    pub fn new_space(c: char, span: Span) -> Token {
        Token::new(Value::Space(c), span)
    }

    pub fn new_control_sequence<T: Into<String>>(name: T, span: Span) -> Token {
        Token::new(Value::ControlSequence(name.into()), span)
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the character if the token is the character `c`.
    pub fn is_character(&self, c: char) -> bool {
        self.value == Value::Character(c)
    }

    pub fn is_space(&self) -> bool {
        matches!(self.value, Value::Space(_))
    }

    /// Returns the name of the control sequence, if the token is a control sequence.
    pub fn control_sequence_name(&self) -> Option<&str> {
        match &self.value {
            Value::ControlSequence(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the same token relocated to the provided span.
    pub fn with_span(mut self, span: Span) -> Token {
        self.span = span;
        self
    }
}

/// Writes a list of tokens back into source code.
///
/// A space is inserted after a control word when the next token is a letter,
///     so that the output lexes back into the same tokens.
pub fn write_tokens<'a, T>(tokens: T) -> String
where
    T: IntoIterator<Item = &'a Token>,
{
    let mut s = String::new();
    let mut last_was_control_word = false;
    for token in tokens {
        if last_was_control_word {
            if let Value::Character(c) = token.value() {
                if c.is_ascii_alphabetic() {
                    s.push(' ');
                }
            }
        }
        s.push_str(&token.value().text());
        last_was_control_word = token.value().is_control_word();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! write_tokens_test {
        ($name: ident, $input: expr, $want: expr) => {
            #[test]
            fn $name() {
                let tokens: Vec<Token> = $input
                    .into_iter()
                    .map(|value| Token::new(value, Span::default()))
                    .collect();
                let got = write_tokens(&tokens);
                assert_eq!(got, $want);
            }
        };
    }

    write_tokens_test!(
        characters,
        vec![Value::Character('a'), Value::Character('+')],
        "a+"
    );
    write_tokens_test!(
        control_word_then_letter,
        vec![
            Value::ControlSequence("bf".into()),
            Value::Character('x'),
        ],
        r"\bf x"
    );
    write_tokens_test!(
        control_word_then_brace,
        vec![
            Value::ControlSequence("alpha".into()),
            Value::Character('{'),
        ],
        r"\alpha{"
    );
    write_tokens_test!(
        control_symbol_then_letter,
        vec![Value::ControlSequence(",".into()), Value::Character('x')],
        r"\,x"
    );

    #[test]
    fn equality_ignores_span() {
        let a = Token::new_character('x', Span::new(0, 1));
        let b = Token::new_character('x', Span::new(7, 8));
        assert_eq!(a, b);
    }

    #[test]
    fn keys() {
        assert_eq!(Value::ControlSequence("alpha".into()).key(), "alpha");
        assert_eq!(Value::ControlSequence("alpha".into()).text(), r"\alpha");
        assert_eq!(Value::Character('(').key(), "(");
    }
}
