//! The noundefined package.
//!
//! With this package active, an undefined control sequence is rendered as its own name in red
//!     instead of failing the parse.

use texmath::handler::Handler;
use texmath::prelude::*;

pub const NAME: &str = "noundefined";

/// Returns the noundefined package, which only installs a macro fallback.
pub fn package() -> Result<Package, ConfigError> {
    Ok(Package::new(
        vec![],
        Configuration::new(NAME).with_fallback(Category::Macro, "Undefined"),
    ))
}

fn undefined(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    log::debug!("rendering undefined control sequence {}", call.token);
    let text = call.token.value().text();
    state.append(
        CharKind::Text,
        &text,
        &attributes([("mathcolor", "red".into())]),
    );
    Ok(())
}

pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![(
        "Undefined",
        Handler::new(undefined).with_doc("An undefined control sequence, shown in red"),
    )]
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        packages("base", "noundefined"),
        tree_tests(
            (undefined, r"\foo x", r"mtext[mathcolor=red](\foo) mi(x)"),
            (defined_commands_are_unchanged, r"\alpha", "mi(\u{3b1})"),
            (
                undefined_in_argument,
                r"\frac{\foo}{2}",
                r"mfrac(mtext[mathcolor=red](\foo) mn(2))"
            ),
        ),
        failure_tests(
            (undefined_environment_still_fails, r"\begin{foo}\end{foo}"),
        ),
    ];
}
