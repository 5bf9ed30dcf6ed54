//! Mappings: the resolved meaning of a token.

use crate::texmacro::Macro;
use std::collections::BTreeMap;

/// A scalar value bound to a mapping, either as an attribute or as a handler parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write![f, "null"],
            Value::Bool(b) => write![f, "{b}"],
            Value::Int(i) => write![f, "{i}"],
            Value::Float(x) => write![f, "{x}"],
            Value::Str(s) => write![f, "{s}"],
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        match o {
            None => Value::Null,
            Some(t) => t.into(),
        }
    }
}

/// Style attributes attached to a character or delimiter.
///
/// The map is ordered so that output built from it is deterministic.
pub type Attributes = BTreeMap<String, Value>;

/// Builds an [Attributes] map from a list of pairs.
pub fn attributes<const N: usize>(pairs: [(&str, Value); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// The resolved meaning of a token.
///
/// Every token resolves to exactly one of these variants.
#[derive(Debug, Clone)]
pub enum Mapping {
    /// Render the token as a single glyph.
    Character { glyph: String, attributes: Attributes },
    /// Like a character, but usable in stretchy and fence contexts.
    Delimiter { glyph: String, attributes: Attributes },
    /// A rewrite rule.
    Macro(Macro),
    /// Invoke the named handler with these bound parameters.
    CommandHandler { handler: String, params: Vec<Value> },
    /// Like [Mapping::CommandHandler], but for `\begin{name}...\end{name}` constructs.
    EnvironmentHandler { handler: String, params: Vec<Value> },
}

impl Mapping {
    pub fn character<T: Into<String>>(glyph: T) -> Mapping {
        Mapping::Character {
            glyph: glyph.into(),
            attributes: Default::default(),
        }
    }

    pub fn character_with<T: Into<String>>(glyph: T, attributes: Attributes) -> Mapping {
        Mapping::Character {
            glyph: glyph.into(),
            attributes,
        }
    }

    pub fn delimiter<T: Into<String>>(glyph: T) -> Mapping {
        Mapping::Delimiter {
            glyph: glyph.into(),
            attributes: Default::default(),
        }
    }

    pub fn delimiter_with<T: Into<String>>(glyph: T, attributes: Attributes) -> Mapping {
        Mapping::Delimiter {
            glyph: glyph.into(),
            attributes,
        }
    }

    pub fn command<T: Into<String>>(handler: T) -> Mapping {
        Mapping::CommandHandler {
            handler: handler.into(),
            params: vec![],
        }
    }

    pub fn command_with<T: Into<String>>(handler: T, params: Vec<Value>) -> Mapping {
        Mapping::CommandHandler {
            handler: handler.into(),
            params,
        }
    }

    pub fn environment<T: Into<String>>(handler: T, params: Vec<Value>) -> Mapping {
        Mapping::EnvironmentHandler {
            handler: handler.into(),
            params,
        }
    }

    /// Returns the name of the handler this mapping invokes, if any.
    pub fn handler(&self) -> Option<&str> {
        match self {
            Mapping::CommandHandler { handler, .. } | Mapping::EnvironmentHandler { handler, .. } => {
                Some(handler)
            }
            _ => None,
        }
    }

    /// Returns the parameters bound to a handler mapping, or an empty slice.
    pub fn params(&self) -> &[Value] {
        match self {
            Mapping::CommandHandler { params, .. } | Mapping::EnvironmentHandler { params, .. } => {
                params
            }
            _ => &[],
        }
    }

    /// Returns the glyph and attributes of a character or delimiter mapping.
    pub fn glyph(&self) -> Option<(&str, &Attributes)> {
        match self {
            Mapping::Character { glyph, attributes } | Mapping::Delimiter { glyph, attributes } => {
                Some((glyph, attributes))
            }
            _ => None,
        }
    }

    /// A short name for the variant, used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Mapping::Character { .. } => "character",
            Mapping::Delimiter { .. } => "delimiter",
            Mapping::Macro(_) => "macro",
            Mapping::CommandHandler { .. } => "command handler",
            Mapping::EnvironmentHandler { .. } => "environment handler",
        }
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mapping::Character { glyph, attributes } | Mapping::Delimiter { glyph, attributes } => {
                write![f, "{} `{}`", self.variant_name(), glyph]?;
                if !attributes.is_empty() {
                    write![f, " with attributes"]?;
                    for (k, v) in attributes {
                        write![f, " {k}={v}"]?;
                    }
                }
                Ok(())
            }
            Mapping::Macro(m) => {
                write![f, "macro with {} argument(s) and replacement `{}`", m.arg_count(), m.template()]?;
                if let Some(default) = m.default_first_arg() {
                    write![f, "; the first argument is optional with default `{default}`"]?;
                }
                Ok(())
            }
            Mapping::CommandHandler { handler, params }
            | Mapping::EnvironmentHandler { handler, params } => {
                write![f, "{} `{}`", self.variant_name(), handler]?;
                if !params.is_empty() {
                    let params: Vec<String> = params.iter().map(Value::to_string).collect();
                    write![f, " with parameters [{}]", params.join(", ")]?;
                }
                Ok(())
            }
        }
    }
}
