//! `\begin`, `\end` and the array environments.

use crate::error;
use texmath::prelude::*;
use texmath::token::lexer;

/// The handler of environments defined with `\newenvironment`.
pub const USER_ENVIRONMENT_HANDLER: &str = "BeginEnv";

/// Handler for `\begin` and `\end`.
pub fn begin_end(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let begin = call.params().first().and_then(Value::as_bool).unwrap_or(true);
    let name = state.read_text_argument(&call.token)?.trim().to_string();
    let mapping = state.resolve_environment(&name);
    if begin {
        return match mapping {
            None => Err(error(&call.token, format!["Unknown environment '{name}'"])),
            Some(mapping) => state.begin_environment(call.token, &name, mapping),
        };
    }
    let end_code = match &mapping {
        Some(Mapping::EnvironmentHandler { handler, params }) if handler == USER_ENVIRONMENT_HANDLER => {
            params.get(1).and_then(Value::as_str).map(String::from)
        }
        _ => None,
    };
    match end_code {
        None => state.close_environment(&name, &call.token),
        Some(end_code) => {
            let span = call.token.span();
            let tokens = lexer::lex(&end_code)?
                .into_iter()
                .map(|token| token.with_span(span))
                .collect();
            state.push_action(Action::EndEnvironment {
                name,
                token: call.token,
            });
            state.push_tokens(tokens);
            Ok(())
        }
    }
}

fn fence_glyph(state: &ParseState<'_>, text: Option<&str>) -> Option<(String, Attributes)> {
    text.and_then(|text| state.delimiter_glyph(text))
        .filter(|(glyph, _)| !glyph.is_empty())
}

fn open_array(
    state: &mut ParseState<'_>,
    token: Token,
    name: &str,
    open: Option<&str>,
    close: Option<&str>,
    align: &str,
) {
    let open = fence_glyph(state, open);
    let close = fence_glyph(state, close);
    let builder = state.builder();
    builder.open_group();
    if let Some((glyph, attributes)) = open {
        builder.append_character(CharKind::Operator, &glyph, &attributes);
    }
    builder.begin_environment(name, &[align.into()]);
    let mut on_close = vec![Action::EndEnvironmentNode(name.into())];
    if let Some((glyph, attributes)) = close {
        on_close.push(Action::Append {
            kind: CharKind::Operator,
            glyph,
            attributes,
        });
    }
    on_close.push(Action::CloseGroup);
    state.open_environment(name, token, on_close);
}

/// Handler for matrix-like environments.
///
/// Parameters: the open delimiter, the close delimiter and the column alignment.
/// Null delimiters are omitted.
pub fn array(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = call.environment.clone().unwrap_or_default();
    let params = call.params();
    let open = params.first().and_then(Value::as_str);
    let close = params.get(1).and_then(Value::as_str);
    let align = params.get(2).and_then(Value::as_str).unwrap_or("c");
    open_array(state, call.token.clone(), &name, open, close, align);
    Ok(())
}

/// Handler for the `array` environment, which reads its column alignment from an argument.
pub fn aligned_array(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = call.environment.clone().unwrap_or_default();
    let align: String = state
        .read_text_argument(&call.token)?
        .chars()
        .filter(|c| matches!(c, 'l' | 'c' | 'r'))
        .collect();
    open_array(state, call.token, &name, None, None, &align);
    Ok(())
}

/// Handler for `\\` and `\cr`.
///
/// `\\` accepts an optional spacing argument, which is ignored.
pub fn cr(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if call.token.control_sequence_name() == Some("\\") {
        state.read_optional_argument(&call.token)?;
    }
    state.separator(Separator::Row, &call.token)
}

/// Handler for plain TeX arrays like `\matrix{a&b\cr c&d}`, which take their body as an argument.
///
/// Parameters: the name of the array, the open delimiter, the close delimiter and the column alignment.
pub fn plain_array(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let params = call.params();
    let name = params.first().and_then(Value::as_str).unwrap_or("matrix").to_string();
    let open = params.get(1).and_then(Value::as_str).map(String::from);
    let close = params.get(2).and_then(Value::as_str).map(String::from);
    let align = params.get(3).and_then(Value::as_str).unwrap_or("c").to_string();
    let body = state.read_argument(&call.token)?;
    open_array(state, call.token.clone(), &name, open.as_deref(), close.as_deref(), &align);
    state.push_action(Action::EndEnvironment {
        name,
        token: call.token,
    });
    state.push_tokens(body);
    Ok(())
}

/// Handler for `\hline` and `\hdashline`.
///
/// Parameters: `dashed` for a dashed line.
pub fn hline(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if !matches!(state.current_group(), GroupKind::Environment(_)) {
        return Err(error(&call.token, format!["Misplaced {}", call.token]));
    }
    let separator = match call.str_param(0) {
        Some("dashed") => Separator::HDashLine,
        _ => Separator::HLine,
    };
    state.separator(separator, &call.token)
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        tree_tests(
            (
                matrix,
                r"\begin{matrix}a&b\\c&d\end{matrix}",
                r"matrix[c](mi(a) & mi(b) \\ mi(c) & mi(d))"
            ),
            (
                pmatrix,
                r"\begin{pmatrix}a\end{pmatrix}",
                "mrow(mo(() pmatrix[c](mi(a)) mo()))"
            ),
            (
                vmatrix,
                r"\begin{vmatrix}a\end{vmatrix}",
                "mrow(mo[texClass=ORD](|) vmatrix[c](mi(a)) mo[texClass=ORD](|))"
            ),
            (
                cases,
                r"\begin{cases}1&x\end{cases}",
                "mrow(mo({) cases[ll](mn(1) & mi(x)))"
            ),
            (
                array,
                r"\begin{array}{|l|r|}a&b\end{array}",
                "array[lr](mi(a) & mi(b))"
            ),
            (
                hline,
                r"\begin{array}{c}\hline a\end{array}",
                "array[c](hline mi(a))"
            ),
            (
                row_spacing_argument,
                r"\begin{matrix}a\\[2pt]b\end{matrix}",
                r"matrix[c](mi(a) \\ mi(b))"
            ),
            (
                font_resets_in_cells,
                r"\begin{matrix}\bf a&b\end{matrix}",
                "matrix[c](mi[mathvariant=bold](a) & mi(b))"
            ),
            (
                style_closes_at_cell_end,
                r"\begin{matrix}\scriptstyle a&b\end{matrix}",
                "matrix[c](mstyle[displaystyle=false,scriptlevel=1](mi(a)) & mi(b))"
            ),
            (
                nested,
                r"\begin{matrix}\begin{matrix}a\end{matrix}\end{matrix}",
                "matrix[c](matrix[c](mi(a)))"
            ),
            (
                spaces_in_name,
                r"\begin{ matrix }a\end{matrix}",
                "matrix[c](mi(a))"
            ),
            (top_level_newline, r"a\\b", r"mi(a) \\ mi(b)"),
            (
                hdashline,
                r"\begin{array}{c}a\\\hdashline b\end{array}",
                r"array[c](mi(a) \\ hdashline mi(b))"
            ),
            (
                plain_matrix,
                r"\matrix{a&b\cr c&d}",
                r"matrix[c](mi(a) & mi(b) \\ mi(c) & mi(d))"
            ),
            (
                eqalign,
                r"\eqalign{a&=b}",
                "eqalign[rl](mi(a) & mo(=) mi(b))"
            ),
            (
                displaylines,
                r"\displaylines{a\cr b}",
                r"displaylines[c](mi(a) \\ mi(b))"
            ),
        ),
        parse_equality_tests(
            (
                plain_pmatrix,
                r"\pmatrix{a&b}",
                r"\begin{pmatrix}a&b\end{pmatrix}"
            ),
            (
                plain_cases,
                r"\cases{1&x\cr 0&y}",
                r"\begin{cases}1&x\\0&y\end{cases}"
            ),
        ),
        failure_tests(
            (unknown_environment, r"\begin{foo}a\end{foo}"),
            (mismatched_end, r"\begin{matrix}a\end{pmatrix}"),
            (missing_end, r"\begin{matrix}a"),
            (end_without_begin, r"a\end{matrix}"),
            (brace_closes_environment, r"{\begin{matrix}a}\end{matrix}"),
            (misplaced_hline, r"\hline"),
            (misplaced_hdashline, r"a\hdashline"),
            (plain_matrix_without_body, r"\matrix"),
            (plain_matrix_unclosed, r"\matrix{a&b"),
        ),
    ];
}
