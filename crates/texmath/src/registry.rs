//! The registry of symbol maps and package configurations.
//!
//! The registry is populated during initialization, when each package registers its maps,
//!     its extensions to other packages' maps, and its configuration.
//! After that it is frozen: engines own it behind an [Arc](std::sync::Arc)
//!     and share it read-only between sessions.

use crate::configuration::Configuration;
use crate::error::{ConfigError, NameCollisionError, UnknownMapError};
use crate::mapping::Mapping;
use crate::symbolmap::SymbolMap;
use std::collections::HashMap;

/// A named, independently authored bundle of symbol maps plus their category precedence.
#[derive(Debug, Clone)]
pub struct Package {
    maps: Vec<SymbolMap>,
    extensions: Vec<(String, Vec<(String, Mapping)>)>,
    configuration: Configuration,
}

impl Package {
    /// Create a new package.
    ///
    /// The package's name is the name of its configuration.
    pub fn new(maps: Vec<SymbolMap>, configuration: Configuration) -> Package {
        Package {
            maps,
            extensions: vec![],
            configuration,
        }
    }

    /// Adds entries to an existing symbol map when the package is registered.
    ///
    /// The map may be defined by another package or by this one.
    pub fn with_extension<N, K, I>(mut self, map: N, entries: I) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (K, Mapping)>,
    {
        self.extensions.push((
            map.into(),
            entries.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        ));
        self
    }

    pub fn name(&self) -> &str {
        self.configuration.name()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}

/// Store of all symbol maps, keyed by unique name, and all package configurations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    maps: HashMap<String, SymbolMap>,
    packages: Vec<Configuration>,
}

impl Registry {
    pub fn new() -> Registry {
        Default::default()
    }

    /// Defines a new symbol map.
    ///
    /// Fails if a map with the same name already exists,
    ///     unless both the existing and the new map are mergeable.
    /// In that case the entries of the new map are merged into the existing map,
    ///     overwriting entries with the same key.
    pub fn define(&mut self, map: SymbolMap) -> Result<(), ConfigError> {
        define(&mut self.maps, map)
    }

    /// Returns the symbol map with the provided name.
    pub fn get(&self, name: &str) -> Option<&SymbolMap> {
        self.maps.get(name)
    }

    /// Merges entries into an existing symbol map.
    ///
    /// Later extensions overwrite earlier entries for the same key.
    pub fn extend<I, K>(&mut self, name: &str, entries: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, Mapping)>,
        K: Into<String>,
    {
        let map = match self.maps.get_mut(name) {
            None => {
                return Err(UnknownMapError {
                    name: name.into(),
                    referrer: None,
                }
                .into())
            }
            Some(map) => map,
        };
        // Validate everything on a copy so that a failed extension leaves the map untouched.
        let mut extended = map.clone();
        let mut n = 0_usize;
        for (key, mapping) in entries {
            extended.register(key, mapping, true)?;
            n += 1;
        }
        *map = extended;
        log::debug!("extended symbol map `{name}` with {n} entries");
        Ok(())
    }

    /// Registers a package: its maps, its extensions and its configuration.
    ///
    /// Everything is validated before anything is committed,
    ///     so a package that fails to register leaves the registry unchanged.
    pub fn register_package(&mut self, package: Package) -> Result<(), ConfigError> {
        let Package {
            maps,
            extensions,
            configuration,
        } = package;
        let name = configuration.name().to_string();
        if self.configuration(&name).is_some() {
            return Err(NameCollisionError {
                name,
                what: "package",
            }
            .into());
        }

        let mut staged: HashMap<String, SymbolMap> = HashMap::new();
        for map in maps {
            if staged.contains_key(map.name()) {
                define(&mut staged, map)?;
            } else if let Some(existing) = self.maps.get(map.name()) {
                let mut existing = existing.clone();
                merge(&mut existing, map)?;
                staged.insert(existing.name().to_string(), existing);
            } else {
                define(&mut staged, map)?;
            }
        }
        for (target, entries) in extensions {
            if !staged.contains_key(&target) {
                let existing = match self.maps.get(&target) {
                    None => {
                        return Err(UnknownMapError {
                            name: target,
                            referrer: Some(name),
                        }
                        .into())
                    }
                    Some(existing) => existing.clone(),
                };
                staged.insert(target.clone(), existing);
            }
            if let Some(map) = staged.get_mut(&target) {
                for (key, mapping) in entries {
                    map.register(key, mapping, true)?;
                }
            }
        }
        for map in configuration.all_maps() {
            if !staged.contains_key(map) && !self.maps.contains_key(map) {
                return Err(UnknownMapError {
                    name: map.into(),
                    referrer: Some(name),
                }
                .into());
            }
        }

        log::debug!(
            "registering package `{name}` with {} new or updated symbol maps",
            staged.len()
        );
        self.maps.extend(staged);
        self.packages.push(configuration);
        Ok(())
    }

    /// Returns the configuration of the package with the provided name.
    pub fn configuration(&self, package: &str) -> Option<&Configuration> {
        self.packages.iter().find(|c| c.name() == package)
    }

    /// Iterates over the configurations of all registered packages, in registration order.
    pub fn packages(&self) -> impl Iterator<Item = &Configuration> {
        self.packages.iter()
    }

    /// Iterates over all symbol maps, in no particular order.
    pub fn maps(&self) -> impl Iterator<Item = &SymbolMap> {
        self.maps.values()
    }
}

fn define(maps: &mut HashMap<String, SymbolMap>, map: SymbolMap) -> Result<(), ConfigError> {
    match maps.get_mut(map.name()) {
        None => {
            log::debug!(
                "defining {:?} symbol map `{}` with {} entries",
                map.kind(),
                map.name(),
                map.len()
            );
            maps.insert(map.name().to_string(), map);
            Ok(())
        }
        Some(existing) => {
            let mut merged = existing.clone();
            merge(&mut merged, map)?;
            *existing = merged;
            Ok(())
        }
    }
}

fn merge(existing: &mut SymbolMap, map: SymbolMap) -> Result<(), ConfigError> {
    if !existing.is_mergeable() || !map.is_mergeable() {
        return Err(NameCollisionError {
            name: map.name().to_string(),
            what: "symbol map",
        }
        .into());
    }
    log::debug!(
        "merging {} entries into symbol map `{}`",
        map.len(),
        map.name()
    );
    for (key, mapping) in map.entries() {
        existing.register(key, mapping.clone(), true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Category;
    use crate::symbolmap::Kind;

    fn mathchar0mi() -> SymbolMap {
        SymbolMap::new(
            "mathchar0mi",
            Kind::Character,
            [
                ("alpha", Mapping::character("\u{03B1}")),
                ("beta", Mapping::character("\u{03B2}")),
            ],
        )
        .unwrap()
    }

    fn glyph<'a>(registry: &'a Registry, map: &str, key: &str) -> Option<&'a str> {
        registry
            .get(map)
            .and_then(|m| m.get(key))
            .and_then(Mapping::glyph)
            .map(|(g, _)| g)
    }

    #[test]
    fn define_and_get() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        assert_eq!(glyph(&registry, "mathchar0mi", "alpha"), Some("\u{03B1}"));
        assert!(registry.get("mathchar0mo").is_none());
    }

    #[test]
    fn define_name_collision() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        match registry.define(mathchar0mi()) {
            Err(ConfigError::NameCollision(err)) => assert_eq!(err.name, "mathchar0mi"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn define_mergeable() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi().mergeable()).unwrap();
        let more = SymbolMap::new(
            "mathchar0mi",
            Kind::Character,
            [
                ("beta", Mapping::character("B")),
                ("gamma", Mapping::character("\u{03B3}")),
            ],
        )
        .unwrap()
        .mergeable();
        registry.define(more).unwrap();
        assert_eq!(glyph(&registry, "mathchar0mi", "alpha"), Some("\u{03B1}"));
        assert_eq!(glyph(&registry, "mathchar0mi", "beta"), Some("B"));
        assert_eq!(glyph(&registry, "mathchar0mi", "gamma"), Some("\u{03B3}"));
    }

    #[test]
    fn define_mergeable_requires_both() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        assert!(registry.define(mathchar0mi().mergeable()).is_err());
    }

    #[test]
    fn extend_adds_without_altering_other_entries() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        assert_eq!(glyph(&registry, "mathchar0mi", "gimel"), None);
        registry
            .extend("mathchar0mi", [("gimel", Mapping::character("\u{2137}"))])
            .unwrap();
        assert_eq!(glyph(&registry, "mathchar0mi", "gimel"), Some("\u{2137}"));
        assert_eq!(glyph(&registry, "mathchar0mi", "alpha"), Some("\u{03B1}"));
        assert_eq!(glyph(&registry, "mathchar0mi", "beta"), Some("\u{03B2}"));
    }

    #[test]
    fn extend_last_writer_wins() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        registry
            .extend("mathchar0mi", [("alpha", Mapping::character("A1"))])
            .unwrap();
        registry
            .extend("mathchar0mi", [("alpha", Mapping::character("A2"))])
            .unwrap();
        assert_eq!(glyph(&registry, "mathchar0mi", "alpha"), Some("A2"));
    }

    #[test]
    fn extend_unknown_map() {
        let mut registry = Registry::new();
        match registry.extend("nope", [("a", Mapping::character("a"))]) {
            Err(ConfigError::UnknownMap(err)) => assert_eq!(err.name, "nope"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn extend_failure_leaves_map_untouched() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        let result = registry.extend(
            "mathchar0mi",
            [
                ("gimel", Mapping::character("\u{2137}")),
                ("frac", Mapping::command("Frac")),
            ],
        );
        assert!(matches!(result, Err(ConfigError::KindMismatch(_))));
        assert_eq!(glyph(&registry, "mathchar0mi", "gimel"), None);
    }

    #[test]
    fn register_package_is_atomic() {
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(
                vec![mathchar0mi()],
                Configuration::new("base").with(Category::Macro, ["mathchar0mi"]),
            ))
            .unwrap();

        let bad = Package::new(
            vec![SymbolMap::new("extra", Kind::Character, [("x", Mapping::character("x"))]).unwrap()],
            Configuration::new("bad").with(Category::Macro, ["extra", "missing"]),
        )
        .with_extension("mathchar0mi", [("gimel", Mapping::character("\u{2137}"))]);
        match registry.register_package(bad) {
            Err(ConfigError::UnknownMap(err)) => {
                assert_eq!(err.name, "missing");
                assert_eq!(err.referrer.as_deref(), Some("bad"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(registry.get("extra").is_none());
        assert!(registry.configuration("bad").is_none());
        assert_eq!(glyph(&registry, "mathchar0mi", "gimel"), None);
    }

    #[test]
    fn register_package_with_extension() {
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(
                vec![mathchar0mi()],
                Configuration::new("base").with(Category::Macro, ["mathchar0mi"]),
            ))
            .unwrap();
        registry
            .register_package(
                Package::new(vec![], Configuration::new("hebrew"))
                    .with_extension("mathchar0mi", [("gimel", Mapping::character("\u{2137}"))]),
            )
            .unwrap();
        assert_eq!(glyph(&registry, "mathchar0mi", "gimel"), Some("\u{2137}"));
        let names: Vec<&str> = registry.packages().map(Configuration::name).collect();
        assert_eq!(names, vec!["base", "hebrew"]);
    }

    #[test]
    fn register_package_twice() {
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(vec![], Configuration::new("base")))
            .unwrap();
        let result = registry.register_package(Package::new(vec![], Configuration::new("base")));
        assert!(matches!(result, Err(ConfigError::NameCollision(_))));
    }

    #[test]
    fn register_package_map_collision() {
        let mut registry = Registry::new();
        registry.define(mathchar0mi()).unwrap();
        let result = registry.register_package(Package::new(
            vec![mathchar0mi()],
            Configuration::new("other"),
        ));
        assert!(matches!(result, Err(ConfigError::NameCollision(_))));
    }
}
