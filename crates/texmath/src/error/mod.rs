//! Error handling
//!
//! Errors come in two families.
//! A [ConfigError] is raised while building the registry of symbol maps or the engine,
//!     and indicates a bug in a package.
//! A [ParseError] is raised while parsing a formula and aborts only that formula;
//!     the session that produced it can be reused.
//!
//! Every user facing error implements the [TexError] trait, which is used to
//!     render diagnostics pointing at the offending source code.

use crate::symbolmap;
use crate::token::{Span, Token};

pub mod display;

/// The type of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// An error at a particular token.
    ///
    /// For example, a control sequence is not defined.
    Token(Token),
    /// An end-of-input error.
    ///
    /// For example, a command expects an argument but there is no more input.
    EndOfInput,
    /// Some external condition does not hold.
    ///
    /// For example, a handler referenced by a symbol map is not registered.
    FailedPrecondition,
}

/// Implementations of this trait describe an error in TeX math source code.
pub trait TexError: std::fmt::Debug {
    fn kind(&self) -> Kind;

    fn title(&self) -> String;

    fn notes(&self) -> Vec<String> {
        vec![]
    }

    fn source_annotation(&self) -> String {
        match self.kind() {
            Kind::Token(t) => match t.value().char() {
                Some(c) => format!["character `{c}`"],
                None => "control sequence".to_string(),
            },
            Kind::EndOfInput => "input ended here".into(),
            Kind::FailedPrecondition => "error occurred while running this command".into(),
        }
    }
}

/// Error returned when a key is registered twice in a symbol map without overwriting.
#[derive(Debug, Clone, thiserror::Error)]
#[error("duplicate key `{key}` in symbol map `{map}`")]
pub struct DuplicateKeyError {
    pub map: String,
    pub key: String,
}

/// Error returned when a name is defined twice.
#[derive(Debug, Clone, thiserror::Error)]
#[error("a {what} named `{name}` is already defined")]
pub struct NameCollisionError {
    pub name: String,
    /// What kind of thing collided, e.g. "symbol map" or "package".
    pub what: &'static str,
}

/// Error returned when a symbol map is referred to but not defined.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown symbol map `{name}`{}", referrer_suffix(.referrer))]
pub struct UnknownMapError {
    pub name: String,
    /// The package that referred to the map, if known.
    pub referrer: Option<String>,
}

/// Error returned when a package is requested but not registered.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown package `{name}`")]
pub struct UnknownPackageError {
    pub name: String,
    pub close_names: Vec<String>,
}

/// Error returned when a handler is referred to but not in the handler table.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown handler `{name}`{}", referrer_suffix(.referrer))]
pub struct UnknownHandlerError {
    pub name: String,
    /// The symbol map or package that referred to the handler, if known.
    pub referrer: Option<String>,
}

/// Error returned when a mapping is registered in a map of an incompatible kind.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cannot register {mapping} mapping for `{key}` in {kind:?} symbol map `{map}`")]
pub struct KindMismatchError {
    pub map: String,
    pub key: String,
    pub kind: symbolmap::Kind,
    pub mapping: &'static str,
}

/// Error returned when the regex of a pattern map does not compile.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid pattern for symbol map `{map}`: {source}")]
pub struct InvalidPatternError {
    pub map: String,
    pub source: regex::Error,
}

/// Error returned when a macro template is malformed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid macro template `{template}`: {reason}")]
pub struct InvalidTemplateError {
    pub template: String,
    pub reason: String,
}

fn referrer_suffix(referrer: &Option<String>) -> String {
    match referrer {
        None => String::new(),
        Some(referrer) => format![" (referenced by `{referrer}`)"],
    }
}

/// A configuration-time error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),
    #[error(transparent)]
    NameCollision(#[from] NameCollisionError),
    #[error(transparent)]
    UnknownMap(#[from] UnknownMapError),
    #[error(transparent)]
    UnknownPackage(#[from] UnknownPackageError),
    #[error(transparent)]
    UnknownHandler(#[from] UnknownHandlerError),
    #[error(transparent)]
    KindMismatch(#[from] KindMismatchError),
    #[error(transparent)]
    InvalidPattern(#[from] InvalidPatternError),
    #[error(transparent)]
    InvalidTemplate(#[from] InvalidTemplateError),
}

/// Error returned when no active symbol map resolves a token.
///
/// This is surfaced to the user as an undefined control sequence.
#[derive(Debug, Clone, thiserror::Error)]
#[error("undefined control sequence {token}")]
pub struct UnresolvedTokenError {
    pub token: Token,
    /// Defined names that are spelled similarly to the token.
    pub close_names: Vec<String>,
}

impl TexError for UnresolvedTokenError {
    fn kind(&self) -> Kind {
        Kind::Token(self.token.clone())
    }

    fn title(&self) -> String {
        match self.token.value().char() {
            None => format!["undefined control sequence {}", self.token],
            Some(c) => format!["no symbol map resolves the character `{c}`"],
        }
    }

    fn notes(&self) -> Vec<String> {
        let mut notes = vec![];
        if let Some(close_name) = self.close_names.first() {
            notes.push(format![
                "did you mean \\{}?",
                crate::color::paint(close_name, crate::color::Paint::Emphasis)
            ]);
        }
        notes
    }
}

/// Error returned when a macro is invoked with the wrong number of arguments.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{token} expects {expected} argument(s) but {got} were provided")]
pub struct ArgumentCountError {
    pub token: Token,
    pub expected: usize,
    pub got: usize,
}

impl TexError for ArgumentCountError {
    fn kind(&self) -> Kind {
        Kind::Token(self.token.clone())
    }

    fn title(&self) -> String {
        format!["missing argument for {}", self.token]
    }

    fn notes(&self) -> Vec<String> {
        vec![format![
            "the macro expects {} argument(s) and {} were found",
            self.expected, self.got
        ]]
    }
}

/// Error returned when macro expansion nests deeper than the configured limit.
#[derive(Debug, Clone, thiserror::Error)]
#[error("maximum macro expansion depth of {limit} exceeded while expanding {token}")]
pub struct MaxExpansionDepthError {
    pub token: Token,
    pub limit: usize,
}

impl TexError for MaxExpansionDepthError {
    fn kind(&self) -> Kind {
        Kind::Token(self.token.clone())
    }

    fn title(&self) -> String {
        format!["maximum macro expansion depth of {} exceeded", self.limit]
    }

    fn notes(&self) -> Vec<String> {
        vec![format![
            "this probably means {} is defined in terms of itself",
            self.token
        ]]
    }
}

/// Error returned when a single parse performs more macro expansions than the configured limit.
#[derive(Debug, Clone, thiserror::Error)]
#[error("maximum number of macro expansions ({limit}) exceeded while expanding {token}")]
pub struct MaxExpansionsError {
    pub token: Token,
    pub limit: usize,
}

impl TexError for MaxExpansionsError {
    fn kind(&self) -> Kind {
        Kind::Token(self.token.clone())
    }

    fn title(&self) -> String {
        format!["maximum number of macro expansions ({}) exceeded", self.limit]
    }

    fn notes(&self) -> Vec<String> {
        vec!["is there a recursive macro call in this formula?".into()]
    }
}

impl TexError for UnknownHandlerError {
    fn kind(&self) -> Kind {
        Kind::FailedPrecondition
    }

    fn title(&self) -> String {
        self.to_string()
    }
}

/// A generic error at a particular token.
///
/// Handlers use this for errors that do not need a dedicated type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{title}")]
pub struct SimpleTokenError {
    pub token: Token,
    pub title: String,
    pub notes: Vec<String>,
}

impl SimpleTokenError {
    /// Create a new simple token error.
    pub fn new<T: AsRef<str>>(token: Token, title: T) -> SimpleTokenError {
        SimpleTokenError {
            token,
            title: title.as_ref().into(),
            notes: vec![],
        }
    }

    pub fn with_note<T: Into<String>>(mut self, note: T) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl TexError for SimpleTokenError {
    fn kind(&self) -> Kind {
        Kind::Token(self.token.clone())
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn notes(&self) -> Vec<String> {
        self.notes.clone()
    }
}

/// Error returned when the input ended prematurely.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unexpected end of input while {doing}")]
pub struct EndOfInputError {
    /// What was being done when the input ended, e.g. "reading the argument of \frac".
    pub doing: String,
    pub notes: Vec<String>,
}

impl EndOfInputError {
    pub fn new<T: Into<String>>(doing: T) -> EndOfInputError {
        EndOfInputError {
            doing: doing.into(),
            notes: vec![],
        }
    }

    pub fn with_note<T: Into<String>>(mut self, note: T) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl TexError for EndOfInputError {
    fn kind(&self) -> Kind {
        Kind::EndOfInput
    }

    fn title(&self) -> String {
        self.to_string()
    }

    fn notes(&self) -> Vec<String> {
        self.notes.clone()
    }
}

/// Error returned by the lexer when a backslash is the last character of the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("control sequence name missing after `\\`")]
pub struct LexError {
    pub span: Span,
}

/// A parse-time error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    UnresolvedToken(#[from] UnresolvedTokenError),
    #[error(transparent)]
    ArgumentCount(#[from] ArgumentCountError),
    #[error(transparent)]
    MaxExpansionDepth(#[from] MaxExpansionDepthError),
    #[error(transparent)]
    MaxExpansions(#[from] MaxExpansionsError),
    #[error(transparent)]
    UnknownHandler(#[from] UnknownHandlerError),
    #[error(transparent)]
    Token(#[from] SimpleTokenError),
    #[error(transparent)]
    EndOfInput(#[from] EndOfInputError),
    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    fn inner(&self) -> Option<&dyn TexError> {
        let e: &dyn TexError = match self {
            ParseError::UnresolvedToken(e) => e,
            ParseError::ArgumentCount(e) => e,
            ParseError::MaxExpansionDepth(e) => e,
            ParseError::MaxExpansions(e) => e,
            ParseError::UnknownHandler(e) => e,
            ParseError::Token(e) => e,
            ParseError::EndOfInput(e) => e,
            ParseError::Lex(_) => return None,
        };
        Some(e)
    }

    /// Returns the location in the source code the error points at, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lex(e) => Some(e.span),
            _ => match self.kind() {
                Kind::Token(token) => Some(token.span()),
                _ => None,
            },
        }
    }

    /// Renders the error as a diagnostic for the provided source code.
    pub fn render(&self, source: &str) -> String {
        display::format_error(self, source)
    }
}

impl TexError for ParseError {
    fn kind(&self) -> Kind {
        match self.inner() {
            Some(e) => e.kind(),
            None => Kind::FailedPrecondition,
        }
    }

    fn title(&self) -> String {
        match self.inner() {
            Some(e) => e.title(),
            None => self.to_string(),
        }
    }

    fn notes(&self) -> Vec<String> {
        match self.inner() {
            Some(e) => e.notes(),
            None => vec![],
        }
    }

    fn source_annotation(&self) -> String {
        match self.inner() {
            Some(e) => e.source_annotation(),
            None => "a control sequence name must follow the backslash".into(),
        }
    }
}
