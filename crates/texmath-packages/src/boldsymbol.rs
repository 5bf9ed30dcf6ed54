//! The boldsymbol package: `\boldsymbol`.

use texmath::handler::Handler;
use texmath::prelude::*;

pub const NAME: &str = "boldsymbol";

/// Font applied to the argument of `\boldsymbol`.
pub const BOLD_SYMBOL_FONT: &str = "bold-italic";

pub fn package() -> Result<Package, ConfigError> {
    let map = SymbolMap::new(
        "boldsymbol",
        Kind::Command,
        [("boldsymbol", Mapping::command("BoldSymbol"))],
    )?;
    Ok(Package::new(
        vec![map],
        Configuration::new(NAME).with(Category::Macro, ["boldsymbol"]),
    ))
}

fn bold_symbol(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let argument = state.read_argument(&call.token)?;
    state.push_argument_with_font(argument, &call.token, BOLD_SYMBOL_FONT);
    Ok(())
}

pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![(
        "BoldSymbol",
        Handler::new(bold_symbol).with_doc("Typeset the argument in bold italic"),
    )]
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        packages("base", "boldsymbol"),
        tree_tests(
            (letter, r"\boldsymbol{x}", "mi[mathvariant=bold-italic](x)"),
            (
                several_letters,
                r"\boldsymbol{xy}z",
                "mrow(mi[mathvariant=bold-italic](x) mi[mathvariant=bold-italic](y)) mi(z)"
            ),
            (
                operator,
                r"\boldsymbol{+}",
                "mo[mathvariant=bold-italic](+)"
            ),
        ),
        failure_tests(
            (missing_argument, r"\boldsymbol"),
        ),
    ];
}
