//! Math styles, fonts, sizes and named functions.

use texmath::prelude::*;

/// Handler for `\displaystyle` and friends.
///
/// Parameters: the style name, whether it is a display style, and the script level.
/// The style applies to the rest of the current group.
pub fn set_style(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let params = call.params();
    let display = params.get(1).and_then(Value::as_bool).unwrap_or(false);
    let level = params.get(2).and_then(Value::as_int).unwrap_or(0);
    state.open_implicit_node(
        "mstyle",
        &attributes([("displaystyle", display.into()), ("scriptlevel", level.into())]),
    );
    Ok(())
}

/// Handler for font switches like `\bf`.
///
/// The font applies to the rest of the current group.
pub fn set_font(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.set_font(call.str_param(0).map(String::from));
    Ok(())
}

/// Handler for size switches like `\large`.
pub fn set_size(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let size = call.params().first().and_then(Value::as_float).unwrap_or(1.0);
    state.open_implicit_node("mstyle", &attributes([("mathsize", format!["{size}em"].into())]));
    Ok(())
}

fn name_of(call: &Call<'_>) -> String {
    match call.str_param(0) {
        Some(name) => name.to_string(),
        None => call.token.value().key().into_owned(),
    }
}

/// Handler for function names like `\sin`, which are upright identifiers.
pub fn named_fn(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = name_of(&call);
    state.append(
        CharKind::Identifier,
        &name,
        &attributes([("texClass", "OP".into())]),
    );
    Ok(())
}

/// Handler for operator names like `\lim`, which take limits in display style.
pub fn named_op(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = name_of(&call).replace("&thinsp;", "\u{2006}");
    state.append(
        CharKind::Operator,
        &name,
        &attributes([
            ("movablelimits", true.into()),
            ("movesupsub", true.into()),
            ("texClass", "OP".into()),
        ]),
    );
    Ok(())
}
