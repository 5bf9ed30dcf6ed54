//! Horizontal spacing: `\,`, `\quad`, `\hskip` and friends.

use crate::error;
use texmath::prelude::*;

/// Handler for fixed width spaces.
pub fn spacer(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let width = call.str_param(0).unwrap_or("0em").to_string();
    state.builder().space(&width);
    Ok(())
}

const DIMENSION: &str =
    r"^\s*([-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?))\s*(pt|em|ex|mu|px|pc|in|mm|cm)\s*$";

/// Formats a length in ems, with at most four decimal places.
pub(crate) fn ems(value: f64) -> String {
    let s = format!["{value:.4}"];
    let s = s.trim_end_matches('0').trim_end_matches('.');
    let s = if s == "-0" { "0" } else { s };
    format!["{s}em"]
}

/// Parses a TeX dimension like `2em` or `-3mu`.
///
/// Math units are converted to ems, at 18 to the em.
pub fn parse_dimension(text: &str) -> Option<String> {
    let regex = regex::Regex::new(DIMENSION).ok()?;
    let captures = regex.captures(text)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    match captures.get(2)?.as_str() {
        "mu" => Some(ems(value / 18.0)),
        "em" => Some(ems(value)),
        unit => Some(format!["{value}{unit}"]),
    }
}

/// Reads the text of a dimension that is not enclosed in braces, like `3mu` in `\kern3mu`.
fn read_bare_dimension(state: &mut ParseState<'_>) -> String {
    let mut text = String::new();
    let mut letters = 0;
    loop {
        let c = match state.peek_token().map(Token::value) {
            Some(texmath::token::Value::Character(c)) => *c,
            _ => break,
        };
        let accept = if letters > 0 {
            c.is_ascii_alphabetic() && letters < 2
        } else {
            c.is_ascii_digit() || "+-.,".contains(c) || c.is_ascii_alphabetic()
        };
        if !accept {
            break;
        }
        if c.is_ascii_alphabetic() {
            letters += 1;
        }
        text.push(if c == ',' { '.' } else { c });
        state.next_token();
    }
    text
}

/// Reads a dimension, either braced or bare, and converts it with [parse_dimension].
pub fn read_dimension(state: &mut ParseState<'_>, token: &Token) -> Result<String, ParseError> {
    state.skip_spaces();
    let braced = state.peek_token().map_or(false, |t| t.is_character('{'));
    let text = if braced {
        state.read_text_argument(token)?
    } else {
        read_bare_dimension(state)
    };
    parse_dimension(&text)
        .ok_or_else(|| error(token, format!["Missing dimension or its units for {token}"]))
}

/// Handler for `\hskip`, `\hspace`, `\kern`, `\mskip`, `\mspace` and `\mkern`.
pub fn hskip(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let width = read_dimension(state, &call.token)?;
    state.builder().space(&width);
    Ok(())
}

/// Handler for `\hfill`, `\hfil` and `\hfilll`, which only make sense between the cells of an environment.
pub fn hfill(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if !matches!(state.current_group(), GroupKind::Environment(_)) {
        return Err(error(&call.token, format!["Unsupported use of {}", call.token]));
    }
    state.builder().space("fill");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_engine;
    use texmath_testing::*;

    #[test]
    fn dimensions() {
        assert_eq!(parse_dimension("2em"), Some("2em".to_string()));
        assert_eq!(parse_dimension(" 1.5 em "), Some("1.5em".to_string()));
        assert_eq!(parse_dimension("3mu"), Some("0.1667em".to_string()));
        assert_eq!(parse_dimension("-18mu"), Some("-1em".to_string()));
        assert_eq!(parse_dimension("10pt"), Some("10pt".to_string()));
        assert_eq!(parse_dimension(".5ex"), Some("0.5ex".to_string()));
        assert_eq!(parse_dimension("2"), None);
        assert_eq!(parse_dimension("em"), None);
        assert_eq!(parse_dimension("2furlongs"), None);
    }

    test_suite![
        tree_tests(
            (thin_space, r"a\,b", "mi(a) mspace(0.1667em) mi(b)"),
            (negative_space, r"a\!b", "mi(a) mspace(-0.1667em) mi(b)"),
            (quad, r"\quad", "mspace(1em)"),
            (hspace, r"\hspace{2em}x", "mspace(2em) mi(x)"),
            (kern_bare, r"\kern3mu x", "mspace(0.1667em) mi(x)"),
            (mkern_negative, r"\mkern-18mu", "mspace(-1em)"),
            (hskip_points, r"\hskip 10pt", "mspace(10pt)"),
            (
                hfill_in_cell,
                r"\begin{array}{c}\hfill x\end{array}",
                "array[c](mspace(fill) mi(x))"
            ),
        ),
        failure_tests(
            (hspace_without_units, r"\hspace{2}"),
            (kern_without_dimension, r"\kern x"),
            (hfill_outside_environment, r"a\hfill b"),
        ),
    ];
}
