//! The newcommand package: defining commands and environments inside formulas.
//!
//! All of the definitions made here are session-local:
//!     they persist across formulas parsed by the same session, until the session is reset.
//!
//! - `\newcommand{\name}[n][default]{body}` and `\renewcommand`.
//! - `\def\name#1#2{body}`, with undelimited parameters only.
//! - `\let\name=\other`, which copies the current meaning of `\other`.
//! - `\newenvironment{name}[n][default]{begin}{end}` and `\renewenvironment`.

use crate::base::environment::USER_ENVIRONMENT_HANDLER;
use crate::error;
use texmath::handler::Handler;
use texmath::prelude::*;
use texmath::token;

pub const NAME: &str = "newcommand";

/// Returns the newcommand package.
pub fn package() -> Result<Package, ConfigError> {
    let map = SymbolMap::new(
        "newcommand",
        Kind::Command,
        [
            ("newcommand", Mapping::command_with("NewCommand", vec![false.into()])),
            ("renewcommand", Mapping::command_with("NewCommand", vec![true.into()])),
            ("newenvironment", Mapping::command_with("NewEnvironment", vec![false.into()])),
            ("renewenvironment", Mapping::command_with("NewEnvironment", vec![true.into()])),
            ("def", Mapping::command("MacroDef")),
            ("let", Mapping::command("Let")),
        ],
    )?;
    Ok(Package::new(
        vec![map],
        Configuration::new(NAME).with(Category::Macro, ["newcommand"]),
    ))
}

/// Reads the name of the command being defined, either `\name` or `{\name}`.
fn read_command_name(state: &mut ParseState<'_>, token: &Token) -> Result<Token, ParseError> {
    let argument = state.read_argument(token)?;
    match argument.as_slice() {
        [name] if name.control_sequence_name().is_some() => Ok(name.clone()),
        _ => Err(error(
            token,
            format!["First argument to {token} must be a control sequence"],
        )),
    }
}

/// Reads the optional `[n]` argument count.
fn read_arg_count(state: &mut ParseState<'_>, token: &Token) -> Result<usize, ParseError> {
    let argument = match state.read_optional_argument(token)? {
        None => return Ok(0),
        Some(argument) => argument,
    };
    let text = token::write_tokens(&argument);
    match text.trim().parse::<usize>() {
        Ok(n) if n <= texmath::texmacro::MAX_ARGUMENTS => Ok(n),
        _ => Err(error(
            token,
            format!["Illegal number of parameters specified in {token}"],
        )),
    }
}

fn is_renew(call: &Call<'_>) -> bool {
    call.params().first().and_then(Value::as_bool).unwrap_or(false)
}

/// Handler for `\newcommand` and `\renewcommand`.
fn new_command(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = read_command_name(state, &call.token)?;
    let arg_count = read_arg_count(state, &call.token)?;
    let default = state.read_optional_argument(&call.token)?;
    let body = state.read_argument(&call.token)?;
    if !is_renew(&call) && state.is_defined(&name) {
        return Err(error(&name, format!["Command {name} already defined"]));
    }
    let m = Macro::from_tokens(&body, arg_count, default.as_deref())
        .map_err(|err| error(&call.token, err.to_string()))?;
    let name = name.control_sequence_name().unwrap_or_default();
    state.define_command(name, Meaning::local(Mapping::Macro(m)));
    Ok(())
}

/// Handler for `\def`.
fn macro_def(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = match state.next_non_space() {
        Some(name) if name.control_sequence_name().is_some() => name,
        _ => {
            return Err(error(
                &call.token,
                format!["{} must be followed by a control sequence", call.token],
            ))
        }
    };
    let mut arg_count = 0_usize;
    loop {
        state.skip_spaces();
        match state.peek_token() {
            Some(next) if next.is_character('#') => {}
            _ => break,
        }
        state.next_token();
        let expected = char::from_digit(arg_count as u32 + 1, 10);
        match state.next_token() {
            Some(digit) if expected.map_or(false, |c| digit.is_character(c)) => arg_count += 1,
            _ => {
                return Err(error(
                    &name,
                    format!["Parameters for {name} must be numbered sequentially"],
                ))
            }
        }
    }
    let body = state.read_argument(&call.token)?;
    let m = Macro::from_tokens(&body, arg_count, None)
        .map_err(|err| error(&call.token, err.to_string()))?;
    state.define_command(
        name.control_sequence_name().unwrap_or_default(),
        Meaning::local(Mapping::Macro(m)),
    );
    Ok(())
}

/// Handler for `\let`.
///
/// A control sequence target is copied with its current meaning;
///     a character target makes the name an alias for the character.
fn let_(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = match state.next_non_space() {
        Some(name) if name.control_sequence_name().is_some() => name,
        _ => {
            return Err(error(
                &call.token,
                format!["{} must be followed by a control sequence", call.token],
            ))
        }
    };
    state.skip_spaces();
    if state.peek_token().map_or(false, |t| t.is_character('=')) {
        state.next_token();
    }
    let target = match state.next_non_space() {
        None => {
            return Err(error(
                &call.token,
                format!["Missing target for {}", call.token],
            ))
        }
        Some(target) => target,
    };
    let meaning = match target.value() {
        token::Value::ControlSequence(_) => match state.meaning(&target) {
            None => {
                return Err(error(
                    &target,
                    format!["Undefined control sequence {target}"],
                ))
            }
            Some(meaning) => meaning,
        },
        value => Meaning::Alias(value.clone()),
    };
    state.define_command(name.control_sequence_name().unwrap_or_default(), meaning);
    Ok(())
}

/// Handler for `\newenvironment` and `\renewenvironment`.
fn new_environment(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = state.read_text_argument(&call.token)?.trim().to_string();
    let arg_count = read_arg_count(state, &call.token)?;
    let default = state
        .read_optional_argument(&call.token)?
        .map(|tokens| token::write_tokens(&tokens));
    let begin = state.read_text_argument(&call.token)?;
    let end = state.read_text_argument(&call.token)?;
    if !is_renew(&call) && state.resolve_environment(&name).is_some() {
        return Err(error(
            &call.token,
            format!["Environment '{name}' already defined"],
        ));
    }
    // A bad begin template is an error at definition time.
    begin_macro(&begin, arg_count, default.as_deref())
        .map_err(|err| error(&call.token, err.to_string()))?;
    state.define_environment(
        &name,
        Mapping::environment(
            USER_ENVIRONMENT_HANDLER,
            vec![
                begin.into(),
                end.into(),
                (arg_count as i64).into(),
                default.into(),
            ],
        ),
    );
    Ok(())
}

fn begin_macro(
    begin: &str,
    arg_count: usize,
    default: Option<&str>,
) -> Result<Macro, texmath::error::InvalidTemplateError> {
    match default {
        None => Macro::new(begin, arg_count),
        Some(default) => Macro::with_default(begin, arg_count, default),
    }
}

/// Handler for `\begin` of an environment defined by `\newenvironment`.
///
/// Parameters: the begin code, the end code, the argument count and the optional default.
fn begin_user_environment(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = call.environment.clone().unwrap_or_default();
    let params = call.params();
    let begin = params.first().and_then(Value::as_str).unwrap_or_default();
    let arg_count = params.get(2).and_then(Value::as_int).unwrap_or(0);
    let default = params.get(3).and_then(Value::as_str);
    let m = begin_macro(begin, arg_count.max(0) as usize, default)
        .map_err(|err| error(&call.token, err.to_string()))?;
    state.open_environment(&name, call.token.clone(), vec![]);
    state.expand(call.token, &m)
}

/// Returns the handlers of the newcommand package.
pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![
        (
            "NewCommand",
            Handler::new(new_command).with_doc("Define a macro with optional arguments"),
        ),
        (
            "MacroDef",
            Handler::new(macro_def).with_doc("Define a macro, TeX style"),
        ),
        (
            "Let",
            Handler::new(let_).with_doc("Copy the meaning of a token"),
        ),
        (
            "NewEnvironment",
            Handler::new(new_environment).with_doc("Define an environment"),
        ),
        (
            USER_ENVIRONMENT_HANDLER,
            Handler::new(begin_user_environment)
                .with_doc(r"Begin an environment defined with \newenvironment"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath::tree::Recorder;
    use texmath_testing::*;

    test_suite![
        packages("base", "newcommand"),
        tree_tests(
            (
                newcommand_no_arguments,
                r"\newcommand{\half}{\frac12}\half",
                "mfrac(mn(1) mn(2))"
            ),
            (
                newcommand_unbraced_name,
                r"\newcommand\sq[1]{#1^2}\sq{x}",
                "msup(mi(x) mn(2))"
            ),
            (
                newcommand_default_argument,
                r"\newcommand{\pow}[2][2]{#2^#1}\pow{x}+\pow[3]{y}",
                "msup(mi(x) mn(2)) mo(+) msup(mi(y) mn(3))"
            ),
            (
                def_with_parameters,
                r"\def\pair#1#2{(#1,#2)}\pair ab",
                "mo(() mi(a) mo(,) mi(b) mo())"
            ),
            (
                let_copies_symbol,
                r"\let\a=\alpha\a",
                "mi(\u{3b1})"
            ),
            (
                let_copies_meaning_at_definition,
                r"\def\x{a}\let\y\x\def\x{b}\y\x",
                "mi(a) mi(b)"
            ),
            (
                let_character_alias,
                r"\let\plus+a\plus b",
                "mi(a) mo(+) mi(b)"
            ),
            (
                environment_without_arguments,
                r"\newenvironment{bracketed}{[}{]}\begin{bracketed}x\end{bracketed}",
                "mo([) mi(x) mo(])"
            ),
            (
                environment_with_argument,
                r"\newenvironment{sub}[1]{#1_}{}\begin{sub}{x}i\end{sub}",
                "msub(mi(x) mi(i))"
            ),
            (
                renewcommand,
                r"\renewcommand{\alpha}{a}\alpha",
                "mi(a)"
            ),
        ),
        parse_equality_tests(
            (
                newcommand_expands_like_its_body,
                r"\newcommand{\half}{\frac{1}{2}}\half",
                r"\frac{1}{2}"
            ),
        ),
        failure_tests(
            (newcommand_existing, r"\newcommand{\alpha}{a}"),
            (newcommand_not_a_command, r"\newcommand{x}{a}"),
            (newcommand_bad_count, r"\newcommand{\foo}[x]{a}"),
            (newcommand_parameter_out_of_range, r"\newcommand{\foo}[1]{#2}\foo a"),
            (def_out_of_order_parameters, r"\def\foo#2{a}"),
            (let_undefined, r"\let\a\undefinedcommand"),
            (newenvironment_existing, r"\newenvironment{matrix}{}{}"),
            (user_environment_mismatched_end, r"\newenvironment{e}{}{}\begin{e}x\end{matrix}"),
            (recursive_macro, r"\def\loop{\loop}\loop"),
        ),
    ];

    #[test]
    fn definitions_persist_until_reset() {
        let engine = new_engine().unwrap();
        let mut session = engine.session(&["base", "newcommand"]).unwrap();
        session.parse_tree(r"\newcommand{\foo}{x}").unwrap();
        let tree = session.parse_tree(r"\foo").unwrap();
        assert_eq!(tree.to_string(), "mi(x)");

        session.reset();
        let mut recorder = Recorder::new();
        assert!(session.parse(r"\foo", &mut recorder).is_err());
    }

    #[test]
    fn failed_parse_keeps_earlier_definitions() {
        let engine = new_engine().unwrap();
        let mut session = engine.session(&["base", "newcommand"]).unwrap();
        session.parse_tree(r"\def\foo{y}").unwrap();
        assert!(session.parse_tree(r"\foo}").is_err());
        assert_eq!(session.parse_tree(r"\foo").unwrap().to_string(), "mi(y)");
    }
}
