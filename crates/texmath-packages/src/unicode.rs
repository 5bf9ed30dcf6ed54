//! The unicode package: `\unicode{x2137}` or `\unicode{8503}` emits a code point as text.
//!
//! The optional `[font]` argument is accepted and ignored.

use crate::error;
use texmath::handler::Handler;
use texmath::prelude::*;

pub const NAME: &str = "unicode";

pub fn package() -> Result<Package, ConfigError> {
    let map = SymbolMap::new(
        "unicode",
        Kind::Command,
        [("unicode", Mapping::command("Unicode"))],
    )?;
    Ok(Package::new(
        vec![map],
        Configuration::new(NAME).with(Category::Macro, ["unicode"]),
    ))
}

/// Parses a code point written in decimal, or in hexadecimal after an `x`.
fn parse_code_point(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn unicode(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.read_optional_argument(&call.token)?;
    let text = state.read_text_argument(&call.token)?;
    let code_point = match parse_code_point(&text) {
        None => {
            return Err(error(
                &call.token,
                format!["Argument to {} must be a number", call.token],
            ))
        }
        Some(code_point) => code_point,
    };
    let c = match char::from_u32(code_point) {
        None => {
            return Err(error(
                &call.token,
                format!["Invalid unicode code point {code_point:#X}"],
            ))
        }
        Some(c) => c,
    };
    let attributes = state.font_attributes(&Default::default());
    state.append(CharKind::Text, &c.to_string(), &attributes);
    Ok(())
}

pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![(
        "Unicode",
        Handler::new(unicode).with_doc("A character given by its code point"),
    )]
}
