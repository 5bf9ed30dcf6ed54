//! The color package: `\color`, `\textcolor` and `\colorbox`.

use crate::error;
use texmath::handler::Handler;
use texmath::prelude::*;

pub mod model;

pub const NAME: &str = "color";

/// Returns the color package.
pub fn package() -> Result<Package, ConfigError> {
    let map = SymbolMap::new(
        "color",
        Kind::Command,
        [
            ("color", Mapping::command("Color")),
            (
                "textcolor",
                Mapping::Macro(Macro::with_default(r"{\color[#1]{#2}#3}", 3, "named")?),
            ),
            ("colorbox", Mapping::command("ColorBox")),
        ],
    )?;
    Ok(Package::new(
        vec![map],
        Configuration::new(NAME).with(Category::Macro, ["color"]),
    ))
}

/// Reads an optional color model and a color, and returns the CSS color.
fn read_color(state: &mut ParseState<'_>, token: &Token) -> Result<String, ParseError> {
    let model = match state.read_optional_argument(token)? {
        None => "named".to_string(),
        Some(tokens) => texmath::token::write_tokens(&tokens),
    };
    let spec = state.read_text_argument(token)?;
    model::to_css(&model, &spec).map_err(|err| error(token, err.to_string()))
}

/// Handler for `\color`, which colors the rest of the current group.
fn color(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let css = read_color(state, &call.token)?;
    state.open_implicit_node("mstyle", &attributes([("mathcolor", css.into())]));
    Ok(())
}

/// Handler for `\colorbox`.
fn color_box(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let css = read_color(state, &call.token)?;
    let text = state.read_text_argument(&call.token)?;
    let builder = state.builder();
    builder.open_node("mpadded", &attributes([("mathbackground", css.into())]));
    builder.append_character(CharKind::Text, &text, &Default::default());
    builder.close_node();
    Ok(())
}

/// Returns the handlers of the color package.
pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![
        (
            "Color",
            Handler::new(color).with_doc("Color the rest of the group"),
        ),
        (
            "ColorBox",
            Handler::new(color_box).with_doc("Text on a colored background"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        packages("base", "color"),
        tree_tests(
            (
                color_in_group,
                r"{\color{red}x+y}z",
                "mstyle[mathcolor=red](mi(x) mo(+) mi(y)) mi(z)"
            ),
            (
                color_named,
                r"\color{Apricot}x",
                "mstyle[mathcolor=#FBB982](mi(x))"
            ),
            (
                color_rgb,
                r"\color[rgb]{1,0,0}x",
                "mstyle[mathcolor=#FF0000](mi(x))"
            ),
            (
                color_in_matrix_cell,
                r"\begin{matrix}\color{red}a&b\end{matrix}",
                "matrix[c](mstyle[mathcolor=red](mi(a)) & mi(b))"
            ),
            (
                textcolor,
                r"\textcolor{blue}{x}y",
                "mstyle[mathcolor=blue](mi(x)) mi(y)"
            ),
            (
                textcolor_with_model,
                r"\textcolor[HTML]{00ff00}{x}",
                "mstyle[mathcolor=#00FF00](mi(x))"
            ),
            (
                colorbox,
                r"\colorbox{yellow}{hi}",
                "mpadded[mathbackground=yellow](mtext(hi))"
            ),
        ),
        parse_equality_tests(
            (textcolor_is_a_group, r"\textcolor{red}{x}", r"{\color{red}x}"),
        ),
        failure_tests(
            (unknown_model, r"\color[cmyk]{0,0,0,1}x"),
            (bad_rgb, r"\color[rgb]{2,0,0}x"),
            (missing_color, r"\color"),
        ),
    ];
}
