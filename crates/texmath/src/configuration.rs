//! Configurations and their composition into configuration sets.
//!
//! A [Configuration] is declared once per package.
//! It lists, per [Category], which symbol maps the package activates and in what order.
//!
//! A [ConfigurationSet] is built per session from a list of package names.
//! For each category it concatenates the lists of the packages in load order,
//!     keeping only the first occurrence of each map name.
//! Packages loaded later can add maps but never change the precedence of maps
//!     that are already active.

use crate::error::{ConfigError, UnknownMapError, UnknownPackageError};
use crate::registry::Registry;
use crate::spellcheck;
use std::collections::HashSet;

/// A parallel search space with its own precedence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Character,
    Delimiter,
    Macro,
    Environment,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Character,
        Category::Delimiter,
        Category::Macro,
        Category::Environment,
    ];

    fn index(self) -> usize {
        match self {
            Category::Character => 0,
            Category::Delimiter => 1,
            Category::Macro => 2,
            Category::Environment => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Character => "character",
            Category::Delimiter => "delimiter",
            Category::Macro => "macro",
            Category::Environment => "environment",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write![f, "{}", self.name()]
    }
}

/// The configuration of a single package.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    name: String,
    maps: [Vec<String>; 4],
    fallbacks: [Option<String>; 4],
}

impl Configuration {
    pub fn new<N: Into<String>>(name: N) -> Configuration {
        Configuration {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends symbol maps to the search list of a category.
    pub fn with<I, S>(mut self, category: Category, maps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.maps[category.index()].extend(maps.into_iter().map(Into::into));
        self
    }

    /// Sets the handler invoked when no symbol map in the category resolves a token.
    pub fn with_fallback<H: Into<String>>(mut self, category: Category, handler: H) -> Self {
        self.fallbacks[category.index()] = Some(handler.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maps(&self, category: Category) -> &[String] {
        &self.maps[category.index()]
    }

    pub fn fallback(&self, category: Category) -> Option<&str> {
        self.fallbacks[category.index()].as_deref()
    }

    /// Iterates over every map name in every category.
    pub fn all_maps(&self) -> impl Iterator<Item = &str> {
        self.maps.iter().flatten().map(String::as_str)
    }

    /// Iterates over every fallback handler.
    pub fn all_fallbacks(&self) -> impl Iterator<Item = &str> {
        self.fallbacks.iter().flatten().map(String::as_str)
    }
}

/// The effective configuration of a session.
///
/// This is immutable once built.
#[derive(Debug, Clone)]
pub struct ConfigurationSet {
    packages: Vec<String>,
    maps: [Vec<String>; 4],
    fallbacks: [Option<String>; 4],
}

impl ConfigurationSet {
    /// Composes the configurations of the provided packages, in order.
    ///
    /// For fallbacks the last package that declares one for a category wins.
    pub fn new<S: AsRef<str>>(
        registry: &Registry,
        packages: &[S],
    ) -> Result<ConfigurationSet, ConfigError> {
        let mut set = ConfigurationSet {
            packages: vec![],
            maps: Default::default(),
            fallbacks: Default::default(),
        };
        let mut seen_maps: [HashSet<String>; 4] = Default::default();
        for package in packages {
            let package = package.as_ref();
            if set.packages.iter().any(|p| p == package) {
                log::warn!("package `{package}` requested more than once; ignoring repeats");
                continue;
            }
            let configuration = match registry.configuration(package) {
                Some(configuration) => configuration,
                None => {
                    return Err(UnknownPackageError {
                        name: package.into(),
                        close_names: spellcheck::find_close_words(
                            registry.packages().map(Configuration::name),
                            package,
                        ),
                    }
                    .into())
                }
            };
            for category in Category::ALL {
                let i = category.index();
                for map in configuration.maps(category) {
                    if registry.get(map).is_none() {
                        return Err(UnknownMapError {
                            name: map.clone(),
                            referrer: Some(package.into()),
                        }
                        .into());
                    }
                    if seen_maps[i].insert(map.clone()) {
                        set.maps[i].push(map.clone());
                    }
                }
                if let Some(fallback) = configuration.fallback(category) {
                    set.fallbacks[i] = Some(fallback.to_string());
                }
            }
            set.packages.push(package.into());
        }
        log::debug!(
            "built configuration set for packages {:?}: {:?}",
            set.packages,
            set.maps
        );
        Ok(set)
    }

    /// The effective ordered list of symbol maps for a category.
    pub fn maps(&self, category: Category) -> &[String] {
        &self.maps[category.index()]
    }

    pub fn fallback(&self, category: Category) -> Option<&str> {
        self.fallbacks[category.index()].as_deref()
    }

    /// The packages in load order.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Mapping;
    use crate::registry::Package;
    use crate::symbolmap::{Kind, SymbolMap};

    fn map(name: &str) -> SymbolMap {
        SymbolMap::new(name, Kind::Character, [("x", Mapping::character(name))]).unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(
                vec![map("a1"), map("a2"), map("shared")],
                Configuration::new("a")
                    .with(Category::Macro, ["a1", "shared", "a2"])
                    .with(Category::Character, ["a1"])
                    .with_fallback(Category::Character, "OtherA"),
            ))
            .unwrap();
        registry
            .register_package(Package::new(
                vec![map("b1")],
                Configuration::new("b")
                    .with(Category::Macro, ["b1", "shared", "a1"])
                    .with_fallback(Category::Macro, "Undefined"),
            ))
            .unwrap();
        registry
            .register_package(Package::new(
                vec![],
                Configuration::new("c").with_fallback(Category::Character, "OtherC"),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn concatenates_in_load_order() {
        let set = ConfigurationSet::new(&registry(), &["a", "b"]).unwrap();
        assert_eq!(set.maps(Category::Macro), &["a1", "shared", "a2", "b1"]);
        assert_eq!(set.maps(Category::Character), &["a1"]);
        assert!(set.maps(Category::Environment).is_empty());
        assert_eq!(set.packages(), &["a", "b"]);
    }

    #[test]
    fn later_package_does_not_reorder() {
        let set = ConfigurationSet::new(&registry(), &["b", "a"]).unwrap();
        assert_eq!(set.maps(Category::Macro), &["b1", "shared", "a1", "a2"]);
    }

    #[test]
    fn repeated_package_is_ignored() {
        let set = ConfigurationSet::new(&registry(), &["a", "a"]).unwrap();
        assert_eq!(set.packages(), &["a"]);
    }

    #[test]
    fn last_fallback_wins() {
        let set = ConfigurationSet::new(&registry(), &["a", "b", "c"]).unwrap();
        assert_eq!(set.fallback(Category::Character), Some("OtherC"));
        assert_eq!(set.fallback(Category::Macro), Some("Undefined"));
        let set = ConfigurationSet::new(&registry(), &["c", "a"]).unwrap();
        assert_eq!(set.fallback(Category::Character), Some("OtherA"));
        assert_eq!(set.fallback(Category::Delimiter), None);
    }

    #[test]
    fn unknown_package() {
        match ConfigurationSet::new(&registry(), &["a", "bb"]) {
            Err(ConfigError::UnknownPackage(err)) => {
                assert_eq!(err.name, "bb");
                assert_eq!(err.close_names.first().map(String::as_str), Some("b"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
