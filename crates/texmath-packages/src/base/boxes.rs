//! Text boxes, phantoms and other wrappers.

use super::spacing::{parse_dimension, read_dimension};
use crate::error;
use texmath::prelude::*;

/// Handler for `\text`, `\hbox` and `\mbox`.
///
/// The argument is emitted as text, in the current font.
pub fn hbox(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let text = state.read_text_argument(&call.token)?;
    let attributes = state.font_attributes(&Default::default());
    state.append(CharKind::Text, &text, &attributes);
    Ok(())
}

/// Handler for `\fbox`: text in a frame.
pub fn fbox(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let text = state.read_text_argument(&call.token)?;
    let builder = state.builder();
    builder.open_node("menclose", &attributes([("notation", "box".into())]));
    builder.append_character(CharKind::Text, &text, &Default::default());
    builder.close_node();
    Ok(())
}

/// Handler that wraps its argument in a node.
///
/// Parameters: the name of the node, followed by attribute name and value pairs.
pub fn wrap(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let params = call.params();
    let node = params.first().and_then(Value::as_str).unwrap_or("mrow");
    let attributes: Attributes = params[1.min(params.len())..]
        .chunks(2)
        .filter_map(|pair| match pair {
            [Value::Str(name), value] => Some((name.clone(), value.clone())),
            _ => None,
        })
        .collect();
    let argument = state.read_argument(&call.token)?;
    state.builder().open_node(node, &attributes);
    state.push_action(Action::CloseNode);
    state.push_argument(argument, &call.token);
    Ok(())
}

/// Handler for `\phantom`, `\vphantom` and `\hphantom`.
///
/// Parameters: whether the phantom keeps the vertical and the horizontal size of its argument.
pub fn phantom(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let params = call.params();
    let vertical = params.first().and_then(Value::as_bool).unwrap_or(true);
    let horizontal = params.get(1).and_then(Value::as_bool).unwrap_or(true);
    let argument = state.read_argument(&call.token)?;
    let padding = match (vertical, horizontal) {
        (true, false) => Some(attributes([("width", "0".into())])),
        (false, true) => Some(attributes([("depth", "0".into()), ("height", "0".into())])),
        _ => None,
    };
    if let Some(padding) = padding {
        state.builder().open_node("mpadded", &padding);
        state.push_action(Action::CloseNode);
    }
    state.builder().open_node("mphantom", &Default::default());
    state.push_action(Action::CloseNode);
    state.push_argument(argument, &call.token);
    Ok(())
}

fn split_sign(dimension: &str) -> (bool, &str) {
    match dimension.strip_prefix('-') {
        Some(magnitude) => (true, magnitude),
        None => (false, dimension.strip_prefix('+').unwrap_or(dimension)),
    }
}

/// Handler for `\raise` and `\lower`, which shift their argument vertically.
pub fn raise_lower(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let dimension = read_dimension(state, &call.token)?;
    let argument = state.read_argument(&call.token)?;
    let (negative, magnitude) = split_sign(&dimension);
    let lower = call.token.control_sequence_name() == Some("lower");
    let padding = if negative == lower {
        [
            ("height", format!["+{magnitude}"]),
            ("depth", format!["-{magnitude}"]),
            ("voffset", magnitude.to_string()),
        ]
    } else {
        [
            ("height", format!["-{magnitude}"]),
            ("depth", format!["+{magnitude}"]),
            ("voffset", format!["-{magnitude}"]),
        ]
    };
    let padding = attributes(padding.map(|(name, value)| (name, value.into())));
    state.builder().open_node("mpadded", &padding);
    state.push_action(Action::CloseNode);
    state.push_argument(argument, &call.token);
    Ok(())
}

/// Handler for `\moveleft` and `\moveright`, which shift their argument horizontally.
pub fn move_left_right(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let dimension = read_dimension(state, &call.token)?;
    let argument = state.read_argument(&call.token)?;
    let (negative, magnitude) = split_sign(&dimension);
    let left = call.token.control_sequence_name() == Some("moveleft");
    let (lspace, width) = if negative == left {
        (magnitude.to_string(), format!["+{magnitude}"])
    } else {
        (format!["-{magnitude}"], format!["-{magnitude}"])
    };
    state.builder().open_node(
        "mpadded",
        &attributes([("lspace", lspace.into()), ("width", width.into())]),
    );
    state.push_action(Action::CloseNode);
    state.push_argument(argument, &call.token);
    Ok(())
}

/// Handler for `\strut`: an empty box with the height and depth of a line.
pub fn strut(_: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let builder = state.builder();
    builder.open_node(
        "mpadded",
        &attributes([
            ("depth", "3pt".into()),
            ("height", "8.6pt".into()),
            ("width", "0".into()),
        ]),
    );
    builder.open_group();
    builder.close_group();
    builder.close_node();
    Ok(())
}

/// Handler for `\Rule{width}{height}{depth}` and `\Space{width}{height}{depth}`.
///
/// A rule is a space with a black background.
pub fn rule(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let mut padding = Attributes::new();
    for name in ["width", "height", "depth"] {
        let text = state.read_text_argument(&call.token)?;
        let dimension = parse_dimension(&text).ok_or_else(|| {
            error(&call.token, format!["Bad {name} for {}: {text}", call.token])
        })?;
        padding.insert(name.into(), dimension.into());
    }
    if call.token.control_sequence_name() == Some("Rule") {
        padding.insert("mathbackground".into(), "black".into());
    }
    let builder = state.builder();
    builder.open_node("mspace", &padding);
    builder.close_node();
    Ok(())
}

const MML_ATTRIBUTE: &str = r#"([a-zA-Z]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s,"']+))"#;

/// Handler for `\mmlToken{kind}[attributes]{text}`, which emits a character node directly.
///
/// The attributes are written as `name="value"` pairs.
pub fn mml_token(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let kind = state.read_text_argument(&call.token)?;
    let attribute_text = state
        .read_optional_argument(&call.token)?
        .map(|tokens| texmath::token::write_tokens(&tokens))
        .unwrap_or_default();
    let text = state.read_text_argument(&call.token)?;
    let kind = match kind.trim() {
        "mi" => CharKind::Identifier,
        "mn" => CharKind::Number,
        "mo" => CharKind::Operator,
        "mtext" => CharKind::Text,
        other => {
            return Err(error(&call.token, format!["{other} is not a token element"]));
        }
    };
    let mut token_attributes = Attributes::new();
    if let Ok(regex) = regex::Regex::new(MML_ATTRIBUTE) {
        for captures in regex.captures_iter(&attribute_text) {
            let value = (2..=4).find_map(|i| captures.get(i)).map_or("", |m| m.as_str());
            token_attributes.insert(captures[1].to_string(), value.into());
        }
    }
    state.append(kind, &text, &token_attributes);
    Ok(())
}
