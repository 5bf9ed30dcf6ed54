//! Named handler functions.
//!
//! Symbol maps refer to handlers by name.
//! At parse time the name is looked up in a [HandlerTable] and the function is invoked
//!     with the token that triggered it, the mapping it resolved to, and the live [ParseState].
//! All tree construction happens in handlers, through the [TreeBuilder](crate::tree::TreeBuilder).
//!
//! The engine checks at startup that every handler name referenced by the registry
//!     is in the handler table, so a missing handler is a configuration error rather than
//!     a surprise in the middle of a parse.

use crate::error::{ConfigError, NameCollisionError, ParseError, UnknownHandlerError};
use crate::mapping::{Attributes, Mapping, Value};
use crate::registry::Registry;
use crate::token::Token;
use crate::vm::ParseState;
use std::borrow::Cow;
use std::collections::HashMap;

/// The Rust type of handler functions.
pub type HandlerFn = fn(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError>;

/// The invocation of a handler.
#[derive(Debug, Clone)]
pub struct Call<'c> {
    /// The token that triggered the invocation.
    pub token: Token,
    /// The mapping the token resolved to.
    pub mapping: Cow<'c, Mapping>,
    /// For environment handlers, the name of the environment being opened.
    pub environment: Option<String>,
}

impl<'c> Call<'c> {
    pub fn new(token: Token, mapping: Cow<'c, Mapping>) -> Call<'c> {
        Call {
            token,
            mapping,
            environment: None,
        }
    }

    /// The parameters bound to the mapping.
    pub fn params(&self) -> &[Value] {
        self.mapping.params()
    }

    /// Returns the parameter at the index if it is a string.
    pub fn str_param(&self, i: usize) -> Option<&str> {
        self.params().get(i).and_then(Value::as_str)
    }

    /// Returns the glyph and attributes of a character or delimiter mapping.
    pub fn glyph(&self) -> Option<(&str, &Attributes)> {
        self.mapping.glyph()
    }
}

/// A handler function together with its documentation.
#[derive(Clone, Copy)]
pub struct Handler {
    func: HandlerFn,
    doc: Option<&'static str>,
}

impl Handler {
    pub fn new(func: HandlerFn) -> Handler {
        Handler { func, doc: None }
    }

    pub fn with_doc(mut self, doc: &'static str) -> Handler {
        self.doc = Some(doc);
        self
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }

    pub fn call(&self, call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        (self.func)(call, state)
    }
}

impl From<HandlerFn> for Handler {
    fn from(func: HandlerFn) -> Self {
        Handler::new(func)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").field("doc", &self.doc).finish()
    }
}

/// Table of handlers keyed by name.
#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Handler>,
}

impl HandlerTable {
    pub fn new() -> HandlerTable {
        Default::default()
    }

    /// Registers a handler.
    ///
    /// Fails if a handler with the same name is already registered.
    pub fn register<N: Into<String>, H: Into<Handler>>(
        &mut self,
        name: N,
        handler: H,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(NameCollisionError {
                name,
                what: "handler",
            }
            .into());
        }
        self.handlers.insert(name, handler.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the names of all registered handlers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invokes the named handler.
    pub fn invoke(
        &self,
        name: &str,
        call: Call<'_>,
        state: &mut ParseState<'_>,
    ) -> Result<(), ParseError> {
        match self.handlers.get(name) {
            None => Err(UnknownHandlerError {
                name: name.into(),
                referrer: Some(call.token.to_string()),
            }
            .into()),
            Some(handler) => {
                log::trace!("invoking handler `{name}` for {}", call.token);
                handler.call(call, state)
            }
        }
    }

    /// Checks that every handler the registry refers to is in this table.
    ///
    /// This covers handler mappings, pattern maps, map handlers and configuration fallbacks.
    pub fn validate(&self, registry: &Registry) -> Result<(), ConfigError> {
        let mut maps: Vec<_> = registry.maps().collect();
        maps.sort_by(|a, b| a.name().cmp(b.name()));
        for map in maps {
            for handler in map.referenced_handlers() {
                if !self.handlers.contains_key(handler) {
                    return Err(UnknownHandlerError {
                        name: handler.into(),
                        referrer: Some(map.name().into()),
                    }
                    .into());
                }
            }
        }
        for configuration in registry.packages() {
            for handler in configuration.all_fallbacks() {
                if !self.handlers.contains_key(handler) {
                    return Err(UnknownHandlerError {
                        name: handler.into(),
                        referrer: Some(configuration.name().into()),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{Category, Configuration};
    use crate::registry::Package;
    use crate::symbolmap::{Kind, SymbolMap};

    fn noop(_: Call<'_>, _: &mut ParseState<'_>) -> Result<(), ParseError> {
        Ok(())
    }

    fn registry(fallback: &str) -> Registry {
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(
                vec![
                    SymbolMap::new_pattern("letter", "[a-z]", "variable").unwrap(),
                    SymbolMap::new(
                        "greek",
                        Kind::Character,
                        [("alpha", Mapping::character("\u{03B1}"))],
                    )
                    .unwrap()
                    .with_handler("mathchar0mi"),
                    SymbolMap::new("macros", Kind::Command, [("frac", Mapping::command("Frac"))])
                        .unwrap(),
                ],
                Configuration::new("base")
                    .with(Category::Character, ["letter"])
                    .with(Category::Macro, ["macros", "greek"])
                    .with_fallback(Category::Character, fallback),
            ))
            .unwrap();
        registry
    }

    fn table(names: &[&str]) -> HandlerTable {
        let mut table = HandlerTable::new();
        for name in names {
            table.register(*name, noop as HandlerFn).unwrap();
        }
        table
    }

    #[test]
    fn validate_success() {
        let table = table(&["variable", "mathchar0mi", "Frac", "Other"]);
        assert!(table.validate(&registry("Other")).is_ok());
    }

    macro_rules! validate_failure_test {
        ($name: ident, $missing: expr, $referrer: expr) => {
            #[test]
            fn $name() {
                let mut names = vec!["variable", "mathchar0mi", "Frac", "Other"];
                names.retain(|name| *name != $missing);
                match table(&names).validate(&registry("Other")) {
                    Err(ConfigError::UnknownHandler(err)) => {
                        assert_eq!(err.name, $missing);
                        assert_eq!(err.referrer.as_deref(), Some($referrer));
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
        };
    }

    validate_failure_test!(missing_pattern_handler, "variable", "letter");
    validate_failure_test!(missing_map_handler, "mathchar0mi", "greek");
    validate_failure_test!(missing_command_handler, "Frac", "macros");
    validate_failure_test!(missing_fallback, "Other", "base");

    #[test]
    fn duplicate_registration() {
        let mut table = table(&["Frac"]);
        assert!(table.register("Frac", noop as HandlerFn).is_err());
        assert_eq!(table.names(), vec!["Frac"]);
    }

    #[test]
    fn doc() {
        let handler = Handler::new(noop).with_doc("does nothing");
        assert_eq!(handler.doc(), Some("does nothing"));
    }
}
