//! Symbol maps: named tables from tokens to [Mappings](Mapping).
//!
//! A keyed symbol map holds an ordered table of entries.
//! A pattern symbol map holds a regex and a single handler name;
//!     it matches any token whose text satisfies the regex and delegates to the handler.
//!
//! Maps are built declaratively: a package supplies the full table when the map is created.

use crate::error::{ConfigError, DuplicateKeyError, InvalidPatternError, KindMismatchError};
use crate::mapping::{Mapping, Value};
use crate::token::Token;
use std::collections::HashMap;

/// The kind of a symbol map.
///
/// The kind determines which [Mapping] variants the map accepts, and how tokens are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    Character,
    Delimiter,
    Macro,
    Command,
    Environment,
    Pattern,
}

impl Kind {
    /// Returns true if a map of this kind can hold the mapping.
    pub fn accepts(&self, mapping: &Mapping) -> bool {
        matches!(
            (self, mapping),
            (Kind::Character, Mapping::Character { .. })
                | (Kind::Delimiter, Mapping::Delimiter { .. })
                | (Kind::Macro | Kind::Command, Mapping::Macro(_))
                | (Kind::Macro | Kind::Command, Mapping::CommandHandler { .. })
                | (Kind::Environment, Mapping::EnvironmentHandler { .. })
                | (Kind::Environment, Mapping::Macro(_))
        )
    }
}

#[derive(Debug, Clone)]
enum Table {
    Keyed {
        entries: Vec<(String, Mapping)>,
        index: HashMap<String, usize>,
    },
    Pattern {
        regex: regex::Regex,
        pattern: String,
        handler: String,
    },
}

/// A named table of token to mapping entries of a single kind.
#[derive(Debug, Clone)]
pub struct SymbolMap {
    name: String,
    kind: Kind,
    handler: Option<String>,
    mergeable: bool,
    table: Table,
}

impl SymbolMap {
    /// Create a new keyed symbol map from a table of entries.
    ///
    /// Fails if a key appears twice or if a mapping does not fit the kind of the map.
    pub fn new<N, K, I>(name: N, kind: Kind, entries: I) -> Result<SymbolMap, ConfigError>
    where
        N: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (K, Mapping)>,
    {
        let mut map = SymbolMap {
            name: name.into(),
            kind,
            handler: None,
            mergeable: false,
            table: Table::Keyed {
                entries: vec![],
                index: Default::default(),
            },
        };
        if kind == Kind::Pattern {
            return Err(KindMismatchError {
                map: map.name,
                key: "".into(),
                kind,
                mapping: "keyed",
            }
            .into());
        }
        for (key, mapping) in entries {
            map.register(key, mapping, false)?;
        }
        Ok(map)
    }

    /// Create a new pattern symbol map.
    ///
    /// The regex must match the whole text of a token, so `[a-z]` only matches single letters.
    pub fn new_pattern<N, P, H>(name: N, pattern: P, handler: H) -> Result<SymbolMap, ConfigError>
    where
        N: Into<String>,
        P: Into<String>,
        H: Into<String>,
    {
        let name = name.into();
        let pattern = pattern.into();
        let regex = match regex::Regex::new(&format!["^(?:{pattern})$"]) {
            Ok(regex) => regex,
            Err(source) => return Err(InvalidPatternError { map: name, source }.into()),
        };
        Ok(SymbolMap {
            name,
            kind: Kind::Pattern,
            handler: None,
            mergeable: false,
            table: Table::Pattern {
                regex,
                pattern,
                handler: handler.into(),
            },
        })
    }

    /// Sets the handler that receives the character and delimiter mappings of this map.
    pub fn with_handler<H: Into<String>>(mut self, handler: H) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Marks the map as mergeable.
    ///
    /// Defining a mergeable map under a name that already holds a mergeable map
    ///     merges the entries instead of failing.
    pub fn mergeable(mut self) -> Self {
        self.mergeable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The handler that receives character and delimiter mappings from this map.
    ///
    /// For pattern maps this is the single handler the pattern delegates to.
    pub fn handler(&self) -> Option<&str> {
        match &self.table {
            Table::Pattern { handler, .. } => Some(handler),
            Table::Keyed { .. } => self.handler.as_deref(),
        }
    }

    pub fn is_mergeable(&self) -> bool {
        self.mergeable
    }

    /// Returns the regex source of a pattern map.
    pub fn pattern(&self) -> Option<&str> {
        match &self.table {
            Table::Pattern { pattern, .. } => Some(pattern),
            Table::Keyed { .. } => None,
        }
    }

    /// Returns the text a token is keyed by in this map.
    ///
    /// Delimiter maps key control sequences with their backslash, so that `\langle`
    ///     and `(` can live in the same table.
    pub fn key_for<'t>(&self, token: &'t Token) -> std::borrow::Cow<'t, str> {
        match self.kind {
            Kind::Delimiter | Kind::Pattern => token.value().text(),
            _ => token.value().key(),
        }
    }

    /// Point lookup for keyed maps.
    ///
    /// Always returns [None] for pattern maps.
    pub fn lookup(&self, token: &Token) -> Option<&Mapping> {
        self.get(&self.key_for(token))
    }

    /// Lookup by key text.
    pub fn get(&self, key: &str) -> Option<&Mapping> {
        match &self.table {
            Table::Keyed { entries, index } => index.get(key).map(|i| &entries[*i].1),
            Table::Pattern { .. } => None,
        }
    }

    /// Pattern matching for pattern maps.
    ///
    /// If the token matches, returns a command handler mapping bound to the map's handler,
    ///     with the matched text as the single parameter.
    /// Always returns [None] for keyed maps.
    pub fn matches(&self, token: &Token) -> Option<Mapping> {
        match &self.table {
            Table::Keyed { .. } => None,
            Table::Pattern { regex, handler, .. } => {
                let text = self.key_for(token);
                if regex.is_match(&text) {
                    Some(Mapping::CommandHandler {
                        handler: handler.clone(),
                        params: vec![Value::Str(text.into_owned())],
                    })
                } else {
                    None
                }
            }
        }
    }

    /// Register a mapping under a key.
    ///
    /// If the key already exists and `overwrite` is false this fails with a duplicate key error.
    /// Overwriting keeps the entry at its original position.
    pub fn register<K: Into<String>>(
        &mut self,
        key: K,
        mapping: Mapping,
        overwrite: bool,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        if !self.kind.accepts(&mapping) {
            return Err(KindMismatchError {
                map: self.name.clone(),
                key,
                kind: self.kind,
                mapping: mapping.variant_name(),
            }
            .into());
        }
        let (entries, index) = match &mut self.table {
            Table::Keyed { entries, index } => (entries, index),
            Table::Pattern { .. } => {
                return Err(KindMismatchError {
                    map: self.name.clone(),
                    key,
                    kind: self.kind,
                    mapping: mapping.variant_name(),
                }
                .into())
            }
        };
        match index.get(&key) {
            Some(i) => {
                if !overwrite {
                    return Err(DuplicateKeyError {
                        map: self.name.clone(),
                        key,
                    }
                    .into());
                }
                entries[*i].1 = mapping;
            }
            None => {
                index.insert(key.clone(), entries.len());
                entries.push((key, mapping));
            }
        }
        Ok(())
    }

    /// Iterates over the entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Mapping)> {
        let entries: &[(String, Mapping)] = match &self.table {
            Table::Keyed { entries, .. } => entries,
            Table::Pattern { .. } => &[],
        };
        entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    pub fn len(&self) -> usize {
        match &self.table {
            Table::Keyed { entries, .. } => entries.len(),
            Table::Pattern { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the names of all handlers this map refers to.
    pub fn referenced_handlers(&self) -> Vec<&str> {
        let mut handlers: Vec<&str> = self.handler().into_iter().collect();
        for (_, mapping) in self.entries() {
            if let Some(handler) = mapping.handler() {
                handlers.push(handler);
            }
        }
        handlers
    }
}
