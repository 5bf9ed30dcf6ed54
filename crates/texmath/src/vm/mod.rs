//! The engine, sessions and the parse loop.
//!
//! An [Engine] owns the frozen registry and handler table.
//! It is cheap to clone and can be shared between threads.
//! A [Session] is created from an engine and a list of packages;
//!     it owns its configuration set and the definitions made by the formulas it parses.
//!
//! Each call to [Session::parse] runs one parse loop over a [ParseState].
//! The loop pops tokens and deferred actions from a work-list and dispatches them.
//! Macro expansion pushes the expanded tokens back onto the work-list, so expansion
//!     is driven by the same loop that handles everything else and never recurses.

mod stack;

use crate::configuration::{Category, ConfigurationSet};
use crate::dispatch::Dispatcher;
use crate::error::{
    ArgumentCountError, ConfigError, MaxExpansionsError, ParseError, SimpleTokenError,
    UnresolvedTokenError,
};
use crate::handler::{Call, HandlerTable};
use crate::mapping::{Attributes, Mapping, Value};
use crate::options::Options;
use crate::registry::Registry;
use crate::spellcheck;
use crate::texmacro::Macro;
use crate::token::{self, lexer, Token};
use crate::tree::{CharKind, Recorder, Separator, Tree, TreeBuilder};
use stack::{Item, Stack};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// A frozen registry and handler table, ready to create sessions.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<Registry>,
    handlers: Arc<HandlerTable>,
    options: Options,
}

impl Engine {
    /// Creates a new engine.
    ///
    /// This runs the startup self-check: every handler referenced by the registry
    ///     must be in the handler table.
    pub fn new(registry: Registry, handlers: HandlerTable) -> Result<Engine, ConfigError> {
        handlers.validate(&registry)?;
        log::debug!(
            "created engine with {} packages and {} handlers",
            registry.packages().count(),
            handlers.len()
        );
        Ok(Engine {
            registry: Arc::new(registry),
            handlers: Arc::new(handlers),
            options: Default::default(),
        })
    }

    pub fn with_options(mut self, options: Options) -> Engine {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Creates a session with the provided packages active, in order.
    pub fn session<S: AsRef<str>>(&self, packages: &[S]) -> Result<Session, ConfigError> {
        let configuration = ConfigurationSet::new(&self.registry, packages)?;
        Ok(Session {
            engine: self.clone(),
            configuration,
            definitions: Default::default(),
        })
    }
}

/// The meaning of a control sequence or character at some point in a parse.
#[derive(Debug, Clone)]
pub enum Meaning {
    /// A mapping.
    Mapping {
        /// The symbol map the mapping came from, or [None] for session-local definitions.
        map: Option<String>,
        /// The handler of that symbol map.
        handler: Option<String>,
        mapping: Mapping,
    },
    /// An alias for a character, created by `\let`.
    Alias(token::Value),
}

impl Meaning {
    /// A session-local meaning with no map handler.
    pub fn local(mapping: Mapping) -> Meaning {
        Meaning::Mapping {
            map: None,
            handler: None,
            mapping,
        }
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        match self {
            Meaning::Mapping { mapping, .. } => Some(mapping),
            Meaning::Alias(_) => None,
        }
    }

    pub fn map(&self) -> Option<&str> {
        match self {
            Meaning::Mapping { map, .. } => map.as_deref(),
            Meaning::Alias(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Definitions {
    commands: HashMap<String, Meaning>,
    environments: HashMap<String, Mapping>,
}

/// A parsing session.
///
/// Definitions made by a formula, e.g. with `\newcommand`, persist across calls to [Session::parse].
#[derive(Debug, Clone)]
pub struct Session {
    engine: Engine,
    configuration: ConfigurationSet,
    definitions: Definitions,
}

impl Session {
    /// Parses a formula, sending tree construction calls to the builder.
    ///
    /// An error aborts this formula only; the session can be used for the next one.
    pub fn parse(&mut self, source: &str, builder: &mut dyn TreeBuilder) -> Result<(), ParseError> {
        let tokens = lexer::lex(source)?;
        let mut state = ParseState {
            registry: &self.engine.registry,
            handlers: &self.engine.handlers,
            configuration: &self.configuration,
            options: &self.engine.options,
            definitions: &mut self.definitions,
            builder,
            stack: Stack::new(tokens),
            groups: vec![Group::new(GroupKind::Top, None, None)],
            depth: 0,
            expansions: 0,
        };
        state.run()?;
        log::debug!(
            "parsed formula with {} macro expansion(s)",
            state.expansions
        );
        Ok(())
    }

    /// Parses a formula into a recorded [Tree].
    pub fn parse_tree(&mut self, source: &str) -> Result<Tree, ParseError> {
        let mut recorder = Recorder::new();
        self.parse(source, &mut recorder)?;
        Ok(recorder.into_tree())
    }

    /// Clears all session-local definitions.
    pub fn reset(&mut self) {
        self.definitions = Default::default();
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn configuration(&self) -> &ConfigurationSet {
        &self.configuration
    }

    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.engine.registry, &self.configuration)
    }
}

/// The kind of a group on the group stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// The whole formula.
    Top,
    /// A group opened by `{`.
    Brace,
    /// A group opened for an argument pushed by a handler.
    Argument,
    /// A group opened by `\left`.
    Left,
    /// An environment opened by `\begin{name}`.
    Environment(String),
}

impl GroupKind {
    fn builds_group(&self) -> bool {
        matches!(self, GroupKind::Brace | GroupKind::Argument | GroupKind::Left)
    }

    fn missing_close(&self) -> String {
        match self {
            GroupKind::Top => "Unexpected end of group".into(),
            GroupKind::Brace | GroupKind::Argument => "Missing close brace".into(),
            GroupKind::Left => r"Missing \right".into(),
            GroupKind::Environment(name) => format![r"Missing \end{{{name}}}"],
        }
    }
}

#[derive(Debug)]
struct Group {
    kind: GroupKind,
    opener: Option<Token>,
    font: Option<String>,
    /// The font at the start of the group; cells of an environment reset to it.
    cell_font: Option<String>,
    /// Number of nodes opened inside the group that close with it, e.g. by `\color`.
    implicit: usize,
    /// Set by an infix command like `\over`: the number of implicit nodes opened before it.
    infix: Option<usize>,
    on_close: Vec<Action>,
}

impl Group {
    fn new(kind: GroupKind, opener: Option<Token>, font: Option<String>) -> Group {
        Group {
            kind,
            opener,
            cell_font: font.clone(),
            font,
            implicit: 0,
            infix: None,
            on_close: vec![],
        }
    }
}

/// A deferred operation on the work-list.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open a group for an argument.
    OpenArgument(Token),
    /// Close the group opened for an argument.
    CloseArgument(Token),
    /// Set the font of the current group.
    SetFont(Option<String>),
    /// Open a node on the tree builder.
    OpenNode { name: String, attributes: Attributes },
    CloseNode,
    CloseAtom,
    /// Close a group opened directly on the tree builder.
    CloseGroup,
    /// End an environment opened directly on the tree builder.
    EndEnvironmentNode(String),
    Append {
        kind: CharKind,
        glyph: String,
        attributes: Attributes,
    },
    /// Close the environment group with the name.
    EndEnvironment { name: String, token: Token },
}

/// The state of a parse in progress.
///
/// Handlers receive a mutable reference to this.
/// It gives them access to the pending input, the group stack, the session-local definitions
///     and the tree builder.
pub struct ParseState<'a> {
    registry: &'a Registry,
    handlers: &'a HandlerTable,
    configuration: &'a ConfigurationSet,
    options: &'a Options,
    definitions: &'a mut Definitions,
    builder: &'a mut dyn TreeBuilder,
    stack: Stack,
    groups: Vec<Group>,
    depth: usize,
    expansions: usize,
}

impl<'a> ParseState<'a> {
    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(item) = self.stack.pop() {
            match item {
                Item::Token(token, depth) => {
                    self.depth = depth;
                    self.dispatch(token)?;
                }
                Item::Action(action) => self.perform_action(action)?,
            }
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        if let Some(group) = self.groups.last() {
            if group.kind != GroupKind::Top {
                let title = group.kind.missing_close();
                return Err(match &group.opener {
                    Some(opener) => SimpleTokenError::new(opener.clone(), title).into(),
                    None => crate::error::EndOfInputError::new("parsing the formula")
                        .with_note(title)
                        .into(),
                });
            }
        }
        self.close_implicit_nodes();
        Ok(())
    }

    fn dispatcher(&self) -> Dispatcher<'a> {
        Dispatcher::new(self.registry, self.configuration)
    }

    fn dispatch(&mut self, token: Token) -> Result<(), ParseError> {
        let dispatcher = self.dispatcher();
        let configuration = self.configuration;
        match token.control_sequence_name() {
            Some(name) => {
                if let Some(meaning) = self.definitions.commands.get(name).cloned() {
                    return self.perform_meaning(token, meaning);
                }
                for category in [Category::Macro, Category::Character] {
                    if let Ok(resolution) = dispatcher.resolve(&token, category) {
                        return self.perform(token, resolution.map.handler(), resolution.mapping);
                    }
                }
                match configuration.fallback(Category::Macro) {
                    Some(fallback) => self.invoke_fallback(fallback, token),
                    None => Err(self.unresolved(token).into()),
                }
            }
            None => match dispatcher.resolve(&token, Category::Character) {
                Ok(resolution) => self.perform(token, resolution.map.handler(), resolution.mapping),
                Err(err) => match configuration.fallback(Category::Character) {
                    Some(fallback) => self.invoke_fallback(fallback, token),
                    None => Err(err.into()),
                },
            },
        }
    }

    fn unresolved(&self, token: Token) -> UnresolvedTokenError {
        let dispatcher = self.dispatcher();
        let close_names = match token.control_sequence_name() {
            None => vec![],
            Some(name) => {
                let mut dictionary: Vec<&str> = dispatcher
                    .known_keys(Category::Macro)
                    .chain(dispatcher.known_keys(Category::Character))
                    .collect();
                dictionary.extend(self.definitions.commands.keys().map(String::as_str));
                spellcheck::find_close_words(dictionary, name)
            }
        };
        UnresolvedTokenError { token, close_names }
    }

    fn perform_meaning(&mut self, token: Token, meaning: Meaning) -> Result<(), ParseError> {
        match meaning {
            Meaning::Mapping {
                handler, mapping, ..
            } => self.perform(token, handler.as_deref(), Cow::Owned(mapping)),
            Meaning::Alias(value) => {
                let span = token.span();
                self.stack.push_tokens(vec![Token::new(value, span)], self.depth);
                Ok(())
            }
        }
    }

    fn perform(
        &mut self,
        token: Token,
        map_handler: Option<&str>,
        mapping: Cow<'_, Mapping>,
    ) -> Result<(), ParseError> {
        if let Mapping::Macro(m) = mapping.as_ref() {
            return self.expand(token, m);
        }
        let handler = match mapping.as_ref() {
            Mapping::CommandHandler { handler, .. } | Mapping::EnvironmentHandler { handler, .. } => {
                Some(handler.clone())
            }
            _ => map_handler.map(String::from),
        };
        match handler {
            Some(handler) => self.invoke(&handler, Call::new(token, mapping)),
            None => {
                if let Some((glyph, attributes)) = mapping.glyph() {
                    let attributes = self.font_attributes(attributes);
                    self.builder
                        .append_character(CharKind::Identifier, glyph, &attributes);
                }
                Ok(())
            }
        }
    }

    fn invoke_fallback(&mut self, fallback: &str, token: Token) -> Result<(), ParseError> {
        log::trace!("no symbol map resolves {token}; using fallback `{fallback}`");
        let mapping = Mapping::command(fallback);
        self.invoke(fallback, Call::new(token, Cow::Owned(mapping)))
    }

    /// Invokes the named handler.
    pub fn invoke(&mut self, handler: &str, call: Call<'_>) -> Result<(), ParseError> {
        let handlers = self.handlers;
        handlers.invoke(handler, call, self)
    }

    /// Expands a macro invoked by the token, reading its arguments from the input.
    ///
    /// The expansion is pushed back onto the input.
    pub fn expand(&mut self, token: Token, m: &Macro) -> Result<(), ParseError> {
        self.expansions += 1;
        if self.expansions > self.options.max_expansions {
            return Err(MaxExpansionsError {
                token,
                limit: self.options.max_expansions,
            }
            .into());
        }
        let arguments = self.read_macro_arguments(&token, m)?;
        let depth = self.depth + 1;
        let output = m.expand(&token, &arguments, depth, self.options.max_expansion_depth)?;
        log::trace!(
            target: "expansion",
            "{token} at depth {depth} -> {}",
            token::write_tokens(&output)
        );
        self.stack.push_tokens(output, depth);
        Ok(())
    }

    fn read_macro_arguments(&mut self, token: &Token, m: &Macro) -> Result<Vec<Vec<Token>>, ParseError> {
        let mut arguments = Vec::with_capacity(m.arg_count());
        if let Some(default) = m.default_argument(token) {
            arguments.push(match self.read_optional_argument(token)? {
                Some(argument) => argument,
                None => default,
            });
        }
        while arguments.len() < m.arg_count() {
            match self.try_read_argument()? {
                Some(argument) => arguments.push(argument),
                None => {
                    return Err(ArgumentCountError {
                        token: token.clone(),
                        expected: m.arg_count(),
                        got: arguments.len(),
                    }
                    .into())
                }
            }
        }
        Ok(arguments)
    }

    fn perform_action(&mut self, action: Action) -> Result<(), ParseError> {
        match action {
            Action::OpenArgument(token) => self.open_group(GroupKind::Argument, token),
            Action::CloseArgument(token) => self.close_group(&GroupKind::Argument, &token)?,
            Action::SetFont(font) => self.set_font(font),
            Action::OpenNode { name, attributes } => self.builder.open_node(&name, &attributes),
            Action::CloseNode => self.builder.close_node(),
            Action::CloseAtom => self.builder.close_atom(),
            Action::CloseGroup => self.builder.close_group(),
            Action::EndEnvironmentNode(name) => self.builder.end_environment(&name),
            Action::Append {
                kind,
                glyph,
                attributes,
            } => self.builder.append_character(kind, &glyph, &attributes),
            Action::EndEnvironment { name, token } => self.close_environment(&name, &token)?,
        }
        Ok(())
    }

    // Input

    /// Pops the next token, unless the input is exhausted or the next item is a deferred action.
    pub fn next_token(&mut self) -> Option<Token> {
        self.stack.next_token()
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Option<&Token> {
        self.stack.peek_token()
    }

    pub fn skip_spaces(&mut self) {
        while self.stack.peek_token().map_or(false, Token::is_space) {
            self.stack.next_token();
        }
    }

    /// Skips spaces and pops the next token.
    pub fn next_non_space(&mut self) -> Option<Token> {
        self.skip_spaces();
        self.stack.next_token()
    }

    fn try_read_argument(&mut self) -> Result<Option<Vec<Token>>, ParseError> {
        self.skip_spaces();
        let missing = match self.stack.peek_token() {
            None => true,
            Some(next) => next.is_character('}'),
        };
        if missing {
            return Ok(None);
        }
        let first = match self.stack.next_token() {
            None => return Ok(None),
            Some(first) => first,
        };
        if !first.is_character('{') {
            return Ok(Some(vec![first]));
        }
        let mut tokens = vec![];
        let mut depth = 0_usize;
        loop {
            match self.stack.next_token() {
                None => return Err(SimpleTokenError::new(first, "Missing close brace").into()),
                Some(next) => {
                    if next.is_character('{') {
                        depth += 1;
                    } else if next.is_character('}') {
                        if depth == 0 {
                            return Ok(Some(tokens));
                        }
                        depth -= 1;
                    }
                    tokens.push(next);
                }
            }
        }
    }

    /// Reads an argument: a single token, or the contents of a `{...}` group.
    pub fn read_argument(&mut self, token: &Token) -> Result<Vec<Token>, ParseError> {
        match self.try_read_argument()? {
            Some(argument) => Ok(argument),
            None => Err(SimpleTokenError::new(token.clone(), format!["Missing argument for {token}"]).into()),
        }
    }

    /// Reads an optional `[...]` argument.
    pub fn read_optional_argument(&mut self, token: &Token) -> Result<Option<Vec<Token>>, ParseError> {
        self.skip_spaces();
        if !self.stack.peek_token().map_or(false, |next| next.is_character('[')) {
            return Ok(None);
        }
        let open = match self.stack.next_token() {
            None => return Ok(None),
            Some(open) => open,
        };
        let mut tokens = vec![];
        let mut depth = 0_usize;
        loop {
            match self.stack.next_token() {
                None => {
                    return Err(SimpleTokenError::new(
                        open,
                        format!["Couldn't find closing ']' for argument to {token}"],
                    )
                    .into())
                }
                Some(next) => {
                    if next.is_character('{') {
                        depth += 1;
                    } else if next.is_character('}') {
                        depth = depth.saturating_sub(1);
                    } else if next.is_character(']') && depth == 0 {
                        return Ok(Some(tokens));
                    }
                    tokens.push(next);
                }
            }
        }
    }

    /// Reads an argument and returns it as source text.
    pub fn read_text_argument(&mut self, token: &Token) -> Result<String, ParseError> {
        let argument = self.read_argument(token)?;
        Ok(token::write_tokens(&argument))
    }

    /// Reads a delimiter, e.g. the `(` after `\left`.
    pub fn read_delimiter(&mut self, token: &Token) -> Result<(String, Attributes), ParseError> {
        let unrecognized = |at: Token| -> ParseError {
            SimpleTokenError::new(at, format!["Missing or unrecognized delimiter for {token}"]).into()
        };
        let next = match self.next_non_space() {
            None => return Err(unrecognized(token.clone())),
            Some(next) => next,
        };
        match self.resolve_delimiter(&next) {
            None => Err(unrecognized(next)),
            Some(delimiter) => Ok(delimiter),
        }
    }

    /// Resolves a token in the delimiter category.
    pub fn resolve_delimiter(&self, token: &Token) -> Option<(String, Attributes)> {
        let resolution = self.dispatcher().resolve(token, Category::Delimiter).ok()?;
        let (glyph, attributes) = resolution.mapping.glyph()?;
        Some((glyph.to_string(), attributes.clone()))
    }

    /// Resolves delimiter source text like `\{` in the delimiter category.
    pub fn delimiter_glyph(&self, text: &str) -> Option<(String, Attributes)> {
        let tokens = lexer::lex(text).ok()?;
        match tokens.as_slice() {
            [token] => self.resolve_delimiter(token),
            _ => None,
        }
    }

    /// Pushes tokens onto the input, at the current expansion depth.
    pub fn push_tokens(&mut self, tokens: Vec<Token>) {
        self.stack.push_tokens(tokens, self.depth);
    }

    /// Pushes an argument onto the input, wrapped in its own group.
    pub fn push_argument(&mut self, argument: Vec<Token>, token: &Token) {
        self.stack.push_action(Action::CloseArgument(token.clone()));
        self.stack.push_tokens(argument, self.depth);
        self.stack.push_action(Action::OpenArgument(token.clone()));
    }

    /// Pushes an argument onto the input, wrapped in its own group with the provided font.
    pub fn push_argument_with_font(&mut self, argument: Vec<Token>, token: &Token, font: &str) {
        self.stack.push_action(Action::CloseArgument(token.clone()));
        self.stack.push_tokens(argument, self.depth);
        self.stack.push_action(Action::SetFont(Some(font.into())));
        self.stack.push_action(Action::OpenArgument(token.clone()));
    }

    pub fn push_action(&mut self, action: Action) {
        self.stack.push_action(action);
    }

    // Groups

    pub fn current_group(&self) -> &GroupKind {
        match self.groups.last() {
            Some(group) => &group.kind,
            None => &GroupKind::Top,
        }
    }

    /// Opens a group.
    ///
    /// The group inherits the font of the enclosing group.
    pub fn open_group(&mut self, kind: GroupKind, opener: Token) {
        if kind.builds_group() {
            self.builder.open_group();
        }
        let font = self.font().map(String::from);
        self.groups.push(Group::new(kind, Some(opener), font));
    }

    /// Opens an environment group.
    ///
    /// The actions run, in order, when the environment is closed.
    pub fn open_environment(&mut self, name: &str, opener: Token, on_close: Vec<Action>) {
        let font = self.font().map(String::from);
        let mut group = Group::new(GroupKind::Environment(name.into()), Some(opener), font);
        group.on_close = on_close;
        self.groups.push(group);
    }

    /// Fails if the current group is not of the provided kind.
    pub fn check_group(&self, kind: &GroupKind, token: &Token) -> Result<(), ParseError> {
        let found = self.current_group();
        if found == kind {
            return Ok(());
        }
        let title = match (kind, found) {
            (GroupKind::Environment(wanted), GroupKind::Environment(found)) => {
                format![r"\begin{{{found}}} ended with \end{{{wanted}}}"]
            }
            (GroupKind::Brace | GroupKind::Argument, GroupKind::Top) => {
                "Extra close brace or missing open brace".into()
            }
            (GroupKind::Left, GroupKind::Top) => r"Extra \right or missing \left".into(),
            (GroupKind::Environment(wanted), GroupKind::Top) => {
                format![r"Extra \end{{{wanted}}} or missing \begin{{{wanted}}}"]
            }
            (_, found) => found.missing_close(),
        };
        Err(SimpleTokenError::new(token.clone(), title).into())
    }

    /// Closes the current group, which must be of the provided kind.
    pub fn close_group(&mut self, kind: &GroupKind, token: &Token) -> Result<(), ParseError> {
        self.check_group(kind, token)?;
        self.close_implicit_nodes();
        if let Some(group) = self.groups.pop() {
            if group.kind.builds_group() {
                self.builder.close_group();
            }
            for action in group.on_close {
                self.perform_action(action)?;
            }
        }
        Ok(())
    }

    /// Closes the current group, which must be the environment with the provided name.
    pub fn close_environment(&mut self, name: &str, token: &Token) -> Result<(), ParseError> {
        self.close_group(&GroupKind::Environment(name.into()), token)
    }

    /// Opens a node that is closed when the current group closes.
    pub fn open_implicit_node(&mut self, name: &str, attributes: &Attributes) {
        self.builder.open_node(name, attributes);
        if let Some(group) = self.groups.last_mut() {
            group.implicit += 1;
        }
    }

    /// Closes the nodes opened with [ParseState::open_implicit_node] in the current group,
    ///     and the infix node opened with [ParseState::open_infix].
    pub fn close_implicit_nodes(&mut self) {
        let (n, infix) = match self.groups.last_mut() {
            Some(group) => (std::mem::take(&mut group.implicit), group.infix.take()),
            None => (0, None),
        };
        for _ in 0..n {
            self.builder.close_node();
        }
        if let Some(before) = infix {
            self.builder.close_infix();
            for _ in 0..before {
                self.builder.close_node();
            }
        }
    }

    /// Turns the current group, or cell of an environment, into an infix node like a fraction.
    ///
    /// What was parsed so far becomes the first child of the node,
    ///     and the rest of the group becomes the second.
    /// A group can hold only one infix node.
    pub fn open_infix(
        &mut self,
        token: &Token,
        name: &str,
        attributes: &Attributes,
        fences: Option<[(&str, &Attributes); 2]>,
    ) -> Result<(), ParseError> {
        let group = match self.groups.last_mut() {
            None => return Ok(()),
            Some(group) => group,
        };
        if group.infix.is_some() {
            return Err(SimpleTokenError::new(token.clone(), format!["Ambiguous use of {token}"]).into());
        }
        group.infix = Some(std::mem::take(&mut group.implicit));
        self.builder.open_infix(name, attributes, fences);
        Ok(())
    }

    /// Emits a separator.
    ///
    /// Cell separators are only allowed directly inside an environment.
    /// Inside an environment a separator also ends the font and the implicit nodes of the cell.
    pub fn separator(&mut self, separator: Separator, token: &Token) -> Result<(), ParseError> {
        let in_environment = matches!(self.current_group(), GroupKind::Environment(_));
        if !in_environment && separator == Separator::Cell {
            return Err(SimpleTokenError::new(token.clone(), "Misplaced &").into());
        }
        self.close_implicit_nodes();
        if in_environment {
            if let Some(group) = self.groups.last_mut() {
                group.font = group.cell_font.clone();
            }
        }
        self.builder.separator(separator);
        Ok(())
    }

    /// The font of the current group, e.g. `bold`.
    pub fn font(&self) -> Option<&str> {
        self.groups.last().and_then(|group| group.font.as_deref())
    }

    pub fn set_font(&mut self, font: Option<String>) {
        if let Some(group) = self.groups.last_mut() {
            group.font = font;
        }
    }

    /// Returns the attributes with a `mathvariant` for the current font added,
    ///     unless they already have one.
    pub fn font_attributes(&self, attributes: &Attributes) -> Attributes {
        let mut attributes = attributes.clone();
        if let Some(font) = self.font() {
            attributes
                .entry("mathvariant".to_string())
                .or_insert_with(|| Value::Str(font.into()));
        }
        attributes
    }

    // Tree

    pub fn builder(&mut self) -> &mut dyn TreeBuilder {
        &mut *self.builder
    }

    pub fn append(&mut self, kind: CharKind, glyph: &str, attributes: &Attributes) {
        self.builder.append_character(kind, glyph, attributes);
    }

    pub fn annotate_previous(&mut self, name: &str, value: Value) -> bool {
        self.builder.annotate_previous(name, value)
    }

    // Definitions and lookup

    /// Returns the current meaning of a token, ignoring fallbacks.
    pub fn meaning(&self, token: &Token) -> Option<Meaning> {
        let categories: &[Category] = match token.control_sequence_name() {
            Some(name) => {
                if let Some(meaning) = self.definitions.commands.get(name) {
                    return Some(meaning.clone());
                }
                &[Category::Macro, Category::Character]
            }
            None => &[Category::Character],
        };
        let dispatcher = self.dispatcher();
        for category in categories {
            if let Ok(resolution) = dispatcher.resolve(token, *category) {
                return Some(Meaning::Mapping {
                    map: Some(resolution.map.name().into()),
                    handler: resolution.map.handler().map(String::from),
                    mapping: resolution.mapping.into_owned(),
                });
            }
        }
        None
    }

    /// Returns true if the token has a meaning.
    pub fn is_defined(&self, token: &Token) -> bool {
        self.meaning(token).is_some()
    }

    /// Defines a control sequence for the rest of the session.
    pub fn define_command(&mut self, name: &str, meaning: Meaning) {
        log::debug!("defining \\{name} for this session");
        self.definitions.commands.insert(name.into(), meaning);
    }

    /// Defines an environment for the rest of the session.
    pub fn define_environment(&mut self, name: &str, mapping: Mapping) {
        log::debug!("defining environment `{name}` for this session");
        self.definitions.environments.insert(name.into(), mapping);
    }

    /// Returns the mapping for an environment name.
    ///
    /// Session-local definitions come first, then the environment category.
    pub fn resolve_environment(&self, name: &str) -> Option<Mapping> {
        if let Some(mapping) = self.definitions.environments.get(name) {
            return Some(mapping.clone());
        }
        self.dispatcher()
            .maps(Category::Environment)
            .find_map(|map| map.get(name))
            .cloned()
    }

    /// Runs `\begin{name}` for an environment mapping.
    pub fn begin_environment(
        &mut self,
        token: Token,
        name: &str,
        mapping: Mapping,
    ) -> Result<(), ParseError> {
        match &mapping {
            Mapping::Macro(m) => {
                self.open_environment(name, token.clone(), vec![]);
                self.expand(token, m)
            }
            Mapping::EnvironmentHandler { handler, .. } => {
                let handler = handler.clone();
                let mut call = Call::new(token, Cow::Owned(mapping));
                call.environment = Some(name.into());
                self.invoke(&handler, call)
            }
            _ => Err(SimpleTokenError::new(token, format!["Unknown environment '{name}'"]).into()),
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn configuration(&self) -> &'a ConfigurationSet {
        self.configuration
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// The expansion depth of the token being handled.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use crate::handler::HandlerFn;
    use crate::registry::Package;
    use crate::symbolmap::{Kind, SymbolMap};
    use crate::tree::Script;

    fn variable(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        let glyph = call.str_param(0).unwrap_or_default().to_string();
        let attributes = state.font_attributes(&Default::default());
        state.append(CharKind::Identifier, &glyph, &attributes);
        Ok(())
    }

    fn operator(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        if let Some((glyph, attributes)) = call.glyph() {
            state.append(CharKind::Operator, glyph, attributes);
        }
        Ok(())
    }

    fn other(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        let glyph = call.token.to_string();
        state.append(CharKind::Operator, &glyph, &Default::default());
        Ok(())
    }

    fn open(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        state.open_group(GroupKind::Brace, call.token);
        Ok(())
    }

    fn close(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        state.close_group(&GroupKind::Brace, &call.token)
    }

    fn superscript(_: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        state.builder().script(Script::Superscript);
        Ok(())
    }

    fn frac(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        let numerator = state.read_argument(&call.token)?;
        let denominator = state.read_argument(&call.token)?;
        state.builder().open_node("mfrac", &Default::default());
        state.push_action(Action::CloseNode);
        state.push_argument(denominator, &call.token);
        state.push_argument(numerator, &call.token);
        Ok(())
    }

    fn set_font(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        state.set_font(call.str_param(0).map(String::from));
        Ok(())
    }

    fn define(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
        let name = state.next_token().ok_or_else(|| {
            ParseError::from(SimpleTokenError::new(call.token.clone(), "missing name"))
        })?;
        let body = state.read_argument(&call.token)?;
        let m = Macro::from_tokens(&body, 0, None).map_err(|err| {
            ParseError::from(SimpleTokenError::new(call.token.clone(), err.to_string()))
        })?;
        state.define_command(
            name.control_sequence_name().unwrap_or_default(),
            Meaning::local(Mapping::Macro(m)),
        );
        Ok(())
    }

    fn engine() -> Engine {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(
                vec![
                    SymbolMap::new_pattern("letter", "(?i)[a-z]", "variable").unwrap(),
                    SymbolMap::new(
                        "special",
                        Kind::Command,
                        [
                            ("{", Mapping::command("Open")),
                            ("}", Mapping::command("Close")),
                            ("^", Mapping::command("Superscript")),
                        ],
                    )
                    .unwrap(),
                    SymbolMap::new(
                        "greek",
                        Kind::Character,
                        [
                            ("alpha", Mapping::character("\u{03B1}")),
                            ("beta", Mapping::character("\u{03B2}")),
                        ],
                    )
                    .unwrap(),
                    SymbolMap::new("ops", Kind::Character, [("times", Mapping::character("\u{D7}"))])
                        .unwrap()
                        .with_handler("operator"),
                    SymbolMap::new(
                        "macros",
                        Kind::Command,
                        [
                            ("frac", Mapping::command("Frac")),
                            ("bf", Mapping::command_with("SetFont", vec!["bold".into()])),
                            ("def", Mapping::command("Def")),
                            (
                                "mathbf",
                                Mapping::Macro(Macro::new(r"{\bf #1}", 1).unwrap()),
                            ),
                            ("loop", Mapping::Macro(Macro::new(r"\loop", 0).unwrap())),
                            (
                                "wide",
                                Mapping::Macro(Macro::new(r"\narrow\narrow", 0).unwrap()),
                            ),
                            (
                                "narrow",
                                Mapping::Macro(Macro::new(r"", 0).unwrap()),
                            ),
                            (
                                "pow",
                                Mapping::Macro(Macro::with_default("#2^#1", 2, "k").unwrap()),
                            ),
                        ],
                    )
                    .unwrap(),
                ],
                Configuration::new("test")
                    .with(Category::Character, ["special", "letter"])
                    .with(Category::Macro, ["macros", "greek", "ops"])
                    .with_fallback(Category::Character, "Other"),
            ))
            .unwrap();
        let mut handlers = HandlerTable::new();
        let entries: [(&str, HandlerFn); 9] = [
            ("variable", variable),
            ("operator", operator),
            ("Other", other),
            ("Open", open),
            ("Close", close),
            ("Superscript", superscript),
            ("Frac", frac),
            ("SetFont", set_font),
            ("Def", define),
        ];
        for (name, handler) in entries {
            handlers.register(name, handler).unwrap();
        }
        Engine::new(registry, handlers).unwrap()
    }

    fn parse(source: &str) -> Result<String, ParseError> {
        let mut session = engine().session(&["test"]).unwrap();
        session.parse_tree(source).map(|tree| tree.to_string())
    }

    macro_rules! parse_tests {
        ($( ($name: ident, $input: expr, $want: expr) ),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(parse($input).unwrap(), $want);
                }
            )*
        };
    }

    parse_tests![
        (greek_and_fallback, r"\alpha+\beta", "mi(\u{3b1}) mo(+) mi(\u{3b2})"),
        (map_handler, r"a\times b", "mi(a) mo(\u{d7}) mi(b)"),
        (letters, "xy", "mi(x) mi(y)"),
        (group, "{xy}z", "mrow(mi(x) mi(y)) mi(z)"),
        (macro_expansion, r"\mathbf{x}y", "mi[mathvariant=bold](x) mi(y)"),
        (frac_basic, r"\frac{a}{bc}", "mfrac(mi(a) mrow(mi(b) mi(c)))"),
        (frac_single_tokens, r"\frac ab", "mfrac(mi(a) mi(b))"),
        (frac_of_macro, r"\frac{\mathbf{a}}b", "mfrac(mi[mathvariant=bold](a) mi(b))"),
        (script, "x^{ab}", "msup(mi(x) mrow(mi(a) mi(b)))"),
        (font_is_scoped_to_group, r"{\bf a}b", "mi[mathvariant=bold](a) mi(b)"),
        (font_is_scoped_to_argument, r"\frac{\bf a}{b}", "mfrac(mi[mathvariant=bold](a) mi(b))"),
        (default_argument_used, r"\pow{x}", "msup(mi(x) mi(k))"),
        (default_argument_overridden, r"\pow[n]{x}", "msup(mi(x) mi(n))"),
        (empty_expansion, r"a\wide b", "mi(a) mi(b)"),
        (session_definition, r"\def\x{\alpha}\x\x", "mi(\u{3b1}) mi(\u{3b1})"),
        (spaces_are_skipped_before_arguments, r"\frac {a} {b}", "mfrac(mi(a) mi(b))"),
    ];

    fn parse_err(source: &str) -> ParseError {
        match parse(source) {
            Ok(tree) => panic!("parsing {source} succeeded with {tree}"),
            Err(err) => err,
        }
    }

    #[test]
    fn unresolved_with_suggestion() {
        match parse_err(r"\alpah") {
            ParseError::UnresolvedToken(err) => {
                assert_eq!(err.token, Token::new_control_sequence("alpah", Default::default()));
                assert_eq!(err.close_names.first().map(String::as_str), Some("alpha"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn recursion_guard() {
        match parse_err(r"\loop") {
            ParseError::MaxExpansionDepth(err) => assert_eq!(err.limit, 100),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn max_expansions() {
        let engine = engine().with_options(Options {
            max_expansion_depth: 100,
            max_expansions: 3,
        });
        let mut session = engine.session(&["test"]).unwrap();
        assert!(session.parse_tree(r"\wide").is_ok());
        match session.parse_tree(r"\wide\wide") {
            Err(ParseError::MaxExpansions(err)) => assert_eq!(err.limit, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn macro_argument_count() {
        match parse_err(r"{\mathbf}") {
            ParseError::ArgumentCount(err) => {
                assert_eq!(err.expected, 1);
                assert_eq!(err.got, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn argument_capture_stops_at_group_end() {
        let err = parse_err(r"\frac{a\frac}{b}");
        assert_eq!(err.title(), r"Missing argument for \frac");
    }

    macro_rules! end_of_input_tests {
        ($( ($name: ident, $input: expr, $want: expr) ),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(parse_err($input).title(), $want);
                }
            )*
        };
    }

    use crate::error::TexError;

    end_of_input_tests![
        (missing_close_brace, "{a", "Missing close brace"),
        (missing_close_brace_in_argument, r"\frac{a", "Missing close brace"),
        (extra_close_brace, "a}", "Extra close brace or missing open brace"),
    ];

    #[test]
    fn session_survives_errors_and_keeps_definitions() {
        let mut session = engine().session(&["test"]).unwrap();
        session.parse_tree(r"\def\x{a}").unwrap();
        assert!(session.parse_tree(r"\x\undefined").is_err());
        assert_eq!(session.parse_tree(r"\x").unwrap().to_string(), "mi(a)");
        session.reset();
        assert!(session.parse_tree(r"\x").is_err());
    }

    #[test]
    fn sessions_are_independent() {
        let engine = engine();
        let mut first = engine.session(&["test"]).unwrap();
        let mut second = engine.session(&["test"]).unwrap();
        first.parse_tree(r"\def\x{a}").unwrap();
        assert!(second.parse_tree(r"\x").is_err());
    }

    #[test]
    fn sessions_run_on_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        let engine = engine();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    let mut session = engine.session(&["test"]).unwrap();
                    session.parse_tree(r"\frac{\alpha}{b}").unwrap().to_string()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "mfrac(mi(\u{3b1}) mi(b))");
        }
    }

    #[test]
    fn unknown_handler_is_a_config_error() {
        let mut registry = Registry::new();
        registry
            .register_package(Package::new(
                vec![SymbolMap::new("m", Kind::Command, [("x", Mapping::command("Missing"))])
                    .unwrap()],
                Configuration::new("p").with(Category::Macro, ["m"]),
            ))
            .unwrap();
        match Engine::new(registry, HandlerTable::new()) {
            Err(ConfigError::UnknownHandler(err)) => {
                assert_eq!(err.name, "Missing");
                assert_eq!(err.referrer.as_deref(), Some("m"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
