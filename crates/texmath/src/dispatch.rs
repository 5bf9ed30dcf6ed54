//! Resolution of tokens to mappings.

use crate::configuration::{Category, ConfigurationSet};
use crate::error::UnresolvedTokenError;
use crate::mapping::Mapping;
use crate::registry::Registry;
use crate::symbolmap::SymbolMap;
use crate::token::Token;
use std::borrow::Cow;

/// A successful resolution: the mapping, and the symbol map it came from.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub map: &'a SymbolMap,
    pub mapping: Cow<'a, Mapping>,
}

/// Walks the effective symbol map lists of a configuration set.
///
/// Resolution is a pure function of the registry, the configuration set and the token.
/// The dispatcher holds no mutable state, so it is [Copy] and can be created freely.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    configuration: &'a ConfigurationSet,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, configuration: &'a ConfigurationSet) -> Dispatcher<'a> {
        Dispatcher {
            registry,
            configuration,
        }
    }

    /// The symbol maps searched for a category, in precedence order.
    pub fn maps(&self, category: Category) -> impl Iterator<Item = &'a SymbolMap> + 'a {
        let registry = self.registry;
        self.configuration
            .maps(category)
            .iter()
            .filter_map(move |name| registry.get(name))
    }

    /// Returns the first mapping for the token in the category, or an unresolved token error.
    ///
    /// Keyed maps are consulted with a point lookup, pattern maps with a match.
    pub fn resolve(
        &self,
        token: &Token,
        category: Category,
    ) -> Result<Resolution<'a>, UnresolvedTokenError> {
        for map in self.maps(category) {
            if let Some(mapping) = map.lookup(token) {
                log::trace!(
                    "resolved {token} in category {category} to {mapping} from `{}`",
                    map.name()
                );
                return Ok(Resolution {
                    map,
                    mapping: Cow::Borrowed(mapping),
                });
            }
            if let Some(mapping) = map.matches(token) {
                log::trace!(
                    "resolved {token} in category {category} by pattern `{}`",
                    map.name()
                );
                return Ok(Resolution {
                    map,
                    mapping: Cow::Owned(mapping),
                });
            }
        }
        Err(UnresolvedTokenError {
            token: token.clone(),
            close_names: vec![],
        })
    }

    /// Returns every key that resolves in the category.
    ///
    /// This is used for spelling suggestions, so pattern maps are skipped.
    pub fn known_keys(&self, category: Category) -> impl Iterator<Item = &'a str> + 'a {
        self.maps(category)
            .flat_map(|map| map.entries().map(|(key, _)| key))
    }
}
