//! Implementation of TeX style macros.
//!
//! A macro is a template with `#1..#9` placeholders.
//! Expanding a macro substitutes the raw tokens of the captured arguments into the template.
//! No expansion happens inside the arguments before substitution:
//!     the output is pushed back onto the input and re-dispatched,
//!     so expansion is a fixpoint process driven by ordinary parsing.

use crate::error::{
    ArgumentCountError, InvalidTemplateError, MaxExpansionDepthError, ParseError,
};
use crate::token::{self, lexer, Token, Value};

/// Maximum number of arguments a macro can take.
pub const MAX_ARGUMENTS: usize = 9;

/// A TeX style macro.
#[derive(Debug, Clone)]
pub struct Macro {
    template: String,
    arg_count: usize,
    default_first_arg: Option<String>,
    default_tokens: Vec<Value>,
    replacements: Vec<Replacement>,
}

/// A token list or parameter in a replacement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// A list of tokens.
    Tokens(Vec<Value>),

    /// A parameter.
    ///
    /// The index is zero based and always less than the number of arguments of the macro.
    Parameter(usize),
}

impl Macro {
    /// Create a new macro from a template like `{\bf #1}`.
    pub fn new<T: Into<String>>(template: T, arg_count: usize) -> Result<Macro, InvalidTemplateError> {
        let template = template.into();
        let tokens = lex_template(&template)?;
        Macro::build(template, &tokens, arg_count, None)
    }

    /// Create a new macro whose first argument is optional.
    ///
    /// When the call site does not supply a `[...]` argument the default is used.
    pub fn with_default<T: Into<String>, D: Into<String>>(
        template: T,
        arg_count: usize,
        default_first_arg: D,
    ) -> Result<Macro, InvalidTemplateError> {
        let template = template.into();
        let tokens = lex_template(&template)?;
        let default = default_first_arg.into();
        let default_tokens = lex_template(&default)?;
        Macro::build(template, &tokens, arg_count, Some((default, default_tokens)))
    }

    /// Create a new macro from an already lexed template.
    ///
    /// This is used for macros defined inside a formula, e.g. by `\newcommand`.
    pub fn from_tokens(
        template: &[Token],
        arg_count: usize,
        default_first_arg: Option<&[Token]>,
    ) -> Result<Macro, InvalidTemplateError> {
        let default = default_first_arg.map(|tokens| (token::write_tokens(tokens), tokens.to_vec()));
        Macro::build(token::write_tokens(template), template, arg_count, default)
    }

    fn build(
        template: String,
        tokens: &[Token],
        arg_count: usize,
        default: Option<(String, Vec<Token>)>,
    ) -> Result<Macro, InvalidTemplateError> {
        let invalid = |reason: String| InvalidTemplateError {
            template: template.clone(),
            reason,
        };
        if arg_count > MAX_ARGUMENTS {
            return Err(invalid(format![
                "a macro can take at most {MAX_ARGUMENTS} arguments, not {arg_count}"
            ]));
        }
        if default.is_some() && arg_count == 0 {
            return Err(invalid(
                "a macro with a default first argument must take at least one argument".into(),
            ));
        }
        let mut replacements = vec![];
        let mut current: Vec<Value> = vec![];
        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            if !token.is_character('#') {
                current.push(token.value().clone());
                continue;
            }
            match iter.next().map(Token::value) {
                Some(Value::Character('#')) => {
                    current.push(Value::Character('#'));
                }
                Some(Value::Character(c)) if c.is_ascii_digit() => {
                    let n = *c as usize - '0' as usize;
                    if n == 0 || n > arg_count {
                        return Err(invalid(format![
                            "#{n} is not a valid parameter for a macro with {arg_count} argument(s)"
                        ]));
                    }
                    if !current.is_empty() {
                        replacements.push(Replacement::Tokens(std::mem::take(&mut current)));
                    }
                    replacements.push(Replacement::Parameter(n - 1));
                }
                _ => {
                    return Err(invalid(
                        "`#` must be followed by a digit or another `#`".into(),
                    ));
                }
            }
        }
        if !current.is_empty() {
            replacements.push(Replacement::Tokens(current));
        }
        let (default_first_arg, default_tokens) = match default {
            None => (None, vec![]),
            Some((s, tokens)) => (Some(s), tokens.into_iter().map(|t| t.value().clone()).collect()),
        };
        Ok(Macro {
            template,
            arg_count,
            default_first_arg,
            default_tokens,
            replacements,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    pub fn default_first_arg(&self) -> Option<&str> {
        self.default_first_arg.as_deref()
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Returns the default first argument as tokens located at the call site.
    pub fn default_argument(&self, call_site: &Token) -> Option<Vec<Token>> {
        self.default_first_arg.as_ref()?;
        Some(
            self.default_tokens
                .iter()
                .map(|value| Token::new(value.clone(), call_site.span()))
                .collect(),
        )
    }

    /// Expands the macro.
    ///
    /// The number of arguments must equal the number the macro declares.
    /// The `depth` is the nesting depth of this expansion: 1 for a macro invoked
    ///     from source code, 2 for a macro invoked from the output of that macro, and so on.
    /// Template tokens in the output are located at the call site;
    ///     argument tokens keep their own locations.
    pub fn expand(
        &self,
        call_site: &Token,
        arguments: &[Vec<Token>],
        depth: usize,
        max_depth: usize,
    ) -> Result<Vec<Token>, ParseError> {
        if arguments.len() != self.arg_count {
            return Err(ArgumentCountError {
                token: call_site.clone(),
                expected: self.arg_count,
                got: arguments.len(),
            }
            .into());
        }
        if depth > max_depth {
            return Err(MaxExpansionDepthError {
                token: call_site.clone(),
                limit: max_depth,
            }
            .into());
        }
        let mut output_size = 0;
        for replacement in &self.replacements {
            output_size += match replacement {
                Replacement::Tokens(values) => values.len(),
                Replacement::Parameter(i) => arguments[*i].len(),
            };
        }
        let mut output = Vec::with_capacity(output_size);
        for replacement in &self.replacements {
            match replacement {
                Replacement::Tokens(values) => {
                    output.extend(
                        values
                            .iter()
                            .map(|value| Token::new(value.clone(), call_site.span())),
                    );
                }
                Replacement::Parameter(i) => {
                    output.extend(arguments[*i].iter().cloned());
                }
            }
        }
        Ok(output)
    }
}

fn lex_template(template: &str) -> Result<Vec<Token>, InvalidTemplateError> {
    lexer::lex(template).map_err(|err| InvalidTemplateError {
        template: template.into(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;

    fn tokens(source: &str) -> Vec<Token> {
        lexer::lex(source).unwrap()
    }

    fn call_site() -> Token {
        Token::new_control_sequence("m", Span::new(0, 2))
    }

    #[test]
    fn mathbf_expansion() {
        let m = Macro::new(r"{\bf #1}", 1).unwrap();
        let got = m.expand(&call_site(), &[tokens("x")], 1, 100).unwrap();
        assert_eq!(got, tokens(r"{\bf x}"));
    }

    #[test]
    fn arguments_are_substituted_verbatim() {
        let m = Macro::new(r"\mathrel{\mathop{#2}\limits^{#1}}", 2).unwrap();
        let got = m
            .expand(&call_site(), &[tokens(r"\alpha"), tokens(r"\mathbf{y}")], 1, 100)
            .unwrap();
        assert_eq!(
            got,
            tokens(r"\mathrel{\mathop{\mathbf{y}}\limits^{\alpha}}")
        );
    }

    #[test]
    fn argument_count() {
        let m = Macro::new("#1+#2", 2).unwrap();
        for n in [0, 1, 3] {
            let arguments: Vec<Vec<Token>> = (0..n).map(|_| tokens("a")).collect();
            match m.expand(&call_site(), &arguments, 1, 100) {
                Err(ParseError::ArgumentCount(err)) => {
                    assert_eq!(err.expected, 2);
                    assert_eq!(err.got, n);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        let got = m
            .expand(&call_site(), &[tokens("a"), tokens("b")], 1, 100)
            .unwrap();
        assert_eq!(got, tokens("a+b"));
    }

    #[test]
    fn depth_limit() {
        let m = Macro::new(r"\loop #1", 1).unwrap();
        assert!(m.expand(&call_site(), &[tokens("x")], 100, 100).is_ok());
        match m.expand(&call_site(), &[tokens("x")], 101, 100) {
            Err(ParseError::MaxExpansionDepth(err)) => assert_eq!(err.limit, 100),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn template_tokens_are_located_at_call_site() {
        let m = Macro::new(r"\alpha #1", 1).unwrap();
        let argument = vec![Token::new_character('x', Span::new(10, 11))];
        let got = m.expand(&call_site(), &[argument], 1, 100).unwrap();
        assert_eq!(got[0].span(), Span::new(0, 2));
        assert_eq!(got[1].span(), Span::new(10, 11));
    }

    #[test]
    fn double_hash_is_literal() {
        let m = Macro::new("a##b", 0).unwrap();
        assert_eq!(
            m.replacements(),
            &[Replacement::Tokens(vec![
                Value::Character('a'),
                Value::Character('#'),
                Value::Character('b'),
            ])]
        );
    }

    #[test]
    fn default_first_argument() {
        let m = Macro::with_default("#1^#2", 2, "n").unwrap();
        assert_eq!(m.default_first_arg(), Some("n"));
        assert_eq!(m.default_argument(&call_site()), Some(tokens("n")));
        assert!(Macro::new("x", 0).unwrap().default_argument(&call_site()).is_none());
    }

    macro_rules! invalid_template_test {
        ($name: ident, $template: expr, $arg_count: expr) => {
            #[test]
            fn $name() {
                assert!(Macro::new($template, $arg_count).is_err());
            }
        };
    }

    invalid_template_test!(parameter_out_of_range, "#1#3", 2);
    invalid_template_test!(parameter_zero, "#0", 1);
    invalid_template_test!(trailing_hash, "x#", 1);
    invalid_template_test!(hash_then_letter, "#a", 1);
    invalid_template_test!(too_many_arguments, "x", 10);
    invalid_template_test!(trailing_backslash, "x\\", 0);

    #[test]
    fn default_needs_an_argument() {
        assert!(Macro::with_default("x", 0, "y").is_err());
    }
}
