//! # Texmath: symbol dispatch and macro expansion for TeX math notation.
//!
//! This crate implements the core of a TeX math parser:
//!     a registry of named symbol maps grouped into packages,
//!     the dispatcher that resolves each token of a formula against the active maps,
//!     and the macro engine that expands user and package macros.
//! Building the output tree is delegated to a [tree::TreeBuilder].
//!
//! The packages of commands themselves (`\frac`, `\sqrt`, the AMS environments, ...)
//!     live in the `texmath-packages` crate.
//!
//! A typical use looks like this:
//!
//! 1. Build a [registry::Registry] by registering [registry::Package]s.
//! 2. Build a [handler::HandlerTable] with the functions the packages refer to.
//! 3. Freeze both into a [vm::Engine]. This checks that every handler is present.
//! 4. Create a [vm::Session] for the packages a document enables and parse formulas with it.

pub mod configuration;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod mapping;
pub mod options;
pub mod registry;
pub mod spellcheck;
pub mod symbolmap;
pub mod texmacro;
pub mod token;
pub mod tree;
pub mod vm;

mod color;

/// Module that re-exports the types most handlers need.
///
/// ```
/// use texmath::prelude::*;
/// ```
pub mod prelude {
    pub use super::configuration::{Category, Configuration};
    pub use super::error::{ConfigError, EndOfInputError, ParseError, SimpleTokenError};
    pub use super::handler::{Call, HandlerFn, HandlerTable};
    pub use super::mapping::{attributes, Attributes, Mapping, Value};
    pub use super::registry::{Package, Registry};
    pub use super::symbolmap::{Kind, SymbolMap};
    pub use super::texmacro::Macro;
    pub use super::token::Token;
    pub use super::tree::{CharKind, Script, Separator, TreeBuilder};
    pub use super::vm::{Action, Engine, GroupKind, Meaning, ParseState, Session};
}
