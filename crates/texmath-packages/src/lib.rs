//! # Texmath packages
//!
//! This crate contains the packages of TeX math commands built on Texmath:
//!
//! - [base]: letters, numbers, symbols, fractions, roots, scripts, fonts, spacing and matrices.
//! - [ams]: the AMS symbols, generalized fractions and alignment environments.
//! - [color]: `\color`, `\textcolor` and `\colorbox`.
//! - [newcommand]: `\newcommand`, `\def`, `\let` and `\newenvironment`.
//! - [noundefined]: renders undefined commands in red instead of failing.
//! - [boldsymbol]: `\boldsymbol`.
//! - [unicode]: `\unicode`.
//!
//! The [new_engine] function returns an engine with all of the packages registered.
//! Which of them are active is decided per session:
//!
//! ```
//! let engine = texmath_packages::new_engine().unwrap();
//! let mut session = engine.session(&["base", "ams"]).unwrap();
//! let tree = session.parse_tree(r"\binom{n}{k}").unwrap();
//! assert_eq!(tree.to_string(), "mrow(mo(() mfrac[linethickness=0](mi(n) mi(k)) mo()))");
//! ```

use texmath::prelude::*;

pub mod ams;
pub mod base;
pub mod boldsymbol;
pub mod color;
pub mod newcommand;
pub mod noundefined;
pub mod unicode;

/// Names of all of the packages in this crate, in registration order.
pub const ALL_PACKAGES: [&str; 7] = [
    base::NAME,
    ams::NAME,
    color::NAME,
    newcommand::NAME,
    noundefined::NAME,
    boldsymbol::NAME,
    unicode::NAME,
];

/// Returns a registry with all of the packages in this crate registered.
///
/// The base package is registered first, as other packages extend its maps.
pub fn new_registry() -> Result<Registry, ConfigError> {
    let mut registry = Registry::new();
    for package in [
        base::package()?,
        ams::package()?,
        color::package()?,
        newcommand::package()?,
        noundefined::package()?,
        boldsymbol::package()?,
        unicode::package()?,
    ] {
        log::debug!("registering package `{}`", package.name());
        registry.register_package(package)?;
    }
    Ok(registry)
}

/// Returns a handler table with the handlers of all of the packages in this crate.
pub fn new_handler_table() -> Result<HandlerTable, ConfigError> {
    let mut table = HandlerTable::new();
    for (name, handler) in base::handlers()
        .into_iter()
        .chain(ams::handlers())
        .chain(color::handlers())
        .chain(newcommand::handlers())
        .chain(noundefined::handlers())
        .chain(boldsymbol::handlers())
        .chain(unicode::handlers())
    {
        table.register(name, handler)?;
    }
    Ok(table)
}

/// Returns an engine with all of the packages in this crate.
pub fn new_engine() -> Result<Engine, ConfigError> {
    Engine::new(new_registry()?, new_handler_table()?)
}

pub(crate) fn error<T: AsRef<str>>(token: &Token, title: T) -> ParseError {
    SimpleTokenError::new(token.clone(), title).into()
}
