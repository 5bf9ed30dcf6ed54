//! Handlers for letters, numbers, symbols and the special characters of TeX math.

use crate::error;
use texmath::prelude::*;

/// Handler for single letters matched by the `letter` pattern map.
pub fn variable(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let glyph = call.str_param(0).unwrap_or_default().to_string();
    let attributes = state.font_attributes(&Default::default());
    state.append(CharKind::Identifier, &glyph, &attributes);
    Ok(())
}

/// Handler for numbers.
///
/// The pattern map matches the first character of the number.
/// The rest of the number is read greedily: digits, and at most one decimal point.
pub fn digit(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let mut number = call.str_param(0).unwrap_or_default().to_string();
    let mut seen_point = number.contains('.');
    loop {
        let c = match state.peek_token().map(Token::value) {
            Some(texmath::token::Value::Character(c)) => *c,
            _ => break,
        };
        if c.is_ascii_digit() {
            number.push(c);
        } else if c == '.' && !seen_point {
            seen_point = true;
            number.push(c);
        } else {
            break;
        }
        state.next_token();
    }
    let attributes = state.font_attributes(&Default::default());
    let kind = if number == "." {
        CharKind::Operator
    } else {
        CharKind::Number
    };
    state.append(kind, &number, &attributes);
    Ok(())
}

pub fn mathchar0mi(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if let Some((glyph, attributes)) = call.glyph() {
        let attributes = state.font_attributes(attributes);
        state.append(CharKind::Identifier, glyph, &attributes);
    }
    Ok(())
}

pub fn mathchar0mo(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if let Some((glyph, attributes)) = call.glyph() {
        state.append(CharKind::Operator, glyph, attributes);
    }
    Ok(())
}

/// Handler for upper-case greek letters and escaped characters.
///
/// These are upright unless a font is active.
pub fn mathchar7(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if let Some((glyph, attributes)) = call.glyph() {
        let mut attributes = state.font_attributes(attributes);
        attributes
            .entry("mathvariant".to_string())
            .or_insert_with(|| "normal".into());
        state.append(CharKind::Identifier, glyph, &attributes);
    }
    Ok(())
}

pub fn delimiter(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if let Some((glyph, attributes)) = call.glyph() {
        state.append(CharKind::Operator, glyph, attributes);
    }
    Ok(())
}

/// Fallback handler for characters no symbol map resolves.
///
/// The character is emitted as an operator, after a lookup in the `remap` map.
pub fn other(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let remapped = state
        .registry()
        .get("remap")
        .and_then(|map| map.lookup(&call.token))
        .and_then(Mapping::glyph)
        .map(|(glyph, _)| glyph.to_string());
    let glyph = remapped.unwrap_or_else(|| call.token.value().key().into_owned());
    let attributes = state.font_attributes(&Default::default());
    state.append(CharKind::Operator, &glyph, &attributes);
    Ok(())
}

pub fn open(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.open_group(GroupKind::Brace, call.token);
    Ok(())
}

pub fn close(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.close_group(&GroupKind::Brace, &call.token)
}

/// Handler for `~` and `\space`: a non-breaking space.
pub fn tilde(_: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.append(CharKind::Text, "\u{00A0}", &Default::default());
    Ok(())
}

/// Spaces are ignored in math mode.
pub fn space(_: Call<'_>, _: &mut ParseState<'_>) -> Result<(), ParseError> {
    Ok(())
}

pub fn hash(call: Call<'_>, _: &mut ParseState<'_>) -> Result<(), ParseError> {
    Err(error(
        &call.token,
        "You can't use 'macro parameter character #' in math mode",
    ))
}

fn is_prime(token: &Token) -> bool {
    token.is_character('\'') || token.is_character('\u{2019}')
}

/// Handler for `'`.
///
/// Consecutive primes are combined into a single superscript.
pub fn prime(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let mut n = 1;
    while state.peek_token().map_or(false, is_prime) {
        state.next_token();
        n += 1;
    }
    let glyph = match n {
        1 => "\u{2032}".to_string(),
        2 => "\u{2033}".to_string(),
        3 => "\u{2034}".to_string(),
        4 => "\u{2057}".to_string(),
        n => "\u{2032}".repeat(n),
    };
    if !state.builder().script(Script::Superscript) {
        return Err(error(&call.token, "Prime causes double exponent: use braces to clarify"));
    }
    state.append(CharKind::Operator, &glyph, &Default::default());
    Ok(())
}

/// Handler for `&`.
pub fn entry(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.separator(Separator::Cell, &call.token)
}

/// Handler for `\not`.
///
/// The negated form of the next symbol is taken from the `not_remap` map.
/// Symbols without a negated form get a combining long solidus overlay.
pub fn not(_: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let next = match state.next_non_space() {
        None => {
            state.append(CharKind::Operator, "\u{29F8}", &Default::default());
            return Ok(());
        }
        Some(next) => next,
    };
    let meaning = state.meaning(&next);
    let symbol = match (&meaning, next.value().char()) {
        (Some(meaning), _) => meaning
            .mapping()
            .and_then(Mapping::glyph)
            .map(|(glyph, attributes)| (glyph.to_string(), attributes.clone())),
        (None, Some(c)) => {
            let remapped = state
                .registry()
                .get("remap")
                .and_then(|map| map.get(&c.to_string()))
                .and_then(Mapping::glyph)
                .map(|(glyph, _)| glyph.to_string());
            Some((remapped.unwrap_or_else(|| c.to_string()), Attributes::new()))
        }
        (None, None) => None,
    };
    let (glyph, attributes) = match symbol {
        Some(symbol) => symbol,
        None => {
            state.push_tokens(vec![next]);
            state.append(CharKind::Operator, "\u{29F8}", &Default::default());
            return Ok(());
        }
    };
    let negated = state
        .registry()
        .get("not_remap")
        .and_then(|map| map.get(&glyph))
        .and_then(Mapping::glyph)
        .map(|(negated, _)| negated.to_string())
        .unwrap_or_else(|| format!["{glyph}\u{0338}"]);
    state.append(CharKind::Operator, &negated, &attributes);
    Ok(())
}

/// Handler for `\dots`.
///
/// The dots are centered when followed by a binary operator or relation.
pub fn dots(_: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    state.skip_spaces();
    let centered = match state.peek_token().cloned() {
        None => false,
        Some(next) => match next.value().char() {
            Some(c) => "+-=<>".contains(c),
            None => state
                .meaning(&next)
                .map_or(false, |meaning| meaning.map() == Some("mathchar0mo")),
        },
    };
    let glyph = if centered { "\u{22EF}" } else { "\u{2026}" };
    state.append(CharKind::Operator, glyph, &Default::default());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        tree_tests(
            (letters, "ab", "mi(a) mi(b)"),
            (number, "3.14", "mn(3.14)"),
            (number_with_two_points, "1.2.3", "mn(1.2) mn(.3)"),
            (lone_point, ".", "mo(.)"),
            (greek, r"\alpha", "mi(\u{3b1})"),
            (ord_symbol, r"\infty", "mi[mathvariant=normal](\u{221e})"),
            (upper_greek, r"\Gamma", "mi[mathvariant=normal](\u{393})"),
            (upper_greek_with_font, r"{\bf\Gamma}", "mi[mathvariant=bold](\u{393})"),
            (escaped_character, r"\%", "mi[mathvariant=normal](%)"),
            (
                big_operator,
                r"\sum",
                "mo[movesupsub=true,texClass=OP](\u{2211})"
            ),
            (relation, r"a\leq b", "mi(a) mo(\u{2264}) mi(b)"),
            (remapped_minus, "a-b", "mi(a) mo(\u{2212}) mi(b)"),
            (other, "a+b", "mi(a) mo(+) mi(b)"),
            (spaces_ignored, "a  +\n b", "mi(a) mo(+) mi(b)"),
            (brace_group, "{ab}c", "mrow(mi(a) mi(b)) mi(c)"),
            (empty_group, "{}", "mrow()"),
            (tilde, "a~b", "mi(a) mtext(\u{a0}) mi(b)"),
            (prime, "f'", "msup(mi(f) mo(\u{2032}))"),
            (double_prime, "f''", "msup(mi(f) mo(\u{2033}))"),
            (five_primes, "f'''''", "msup(mi(f) mo(\u{2032}\u{2032}\u{2032}\u{2032}\u{2032}))"),
            (escaped_brace, r"\{a\}", "mo({) mi(a) mo(})"),
            (not_equals, r"a\not=b", "mi(a) mo(\u{2260}) mi(b)"),
            (not_in, r"\not\in", "mo(\u{2209})"),
            (not_without_negation, r"\not\cdot", "mo(\u{22c5}\u{338})"),
            (not_at_end, r"a\not", "mi(a) mo(\u{29f8})"),
            (dots_before_operator, r"a\dots+b", "mi(a) mo(\u{22ef}) mo(+) mi(b)"),
            (dots_at_end, r"a,\dots", "mi(a) mo(,) mo(\u{2026})"),
            (dots_before_relation, r"\dots\leq", "mo(\u{22ef}) mo(\u{2264})"),
        ),
        failure_tests(
            (unbalanced_close, "a}"),
            (unbalanced_open, "{a"),
            (hash, "#"),
            (misplaced_ampersand, "a&b"),
            (undefined, r"\alpah"),
        ),
    ];
}
