//! Fractions, roots, accents, atoms and fenced groups.
//!
//! Handlers here read their arguments eagerly, open a node on the tree builder,
//!     and then push the arguments back onto the input followed by the action that closes the node.
//! The arguments are pushed in reverse order, as the work-list is a stack.

use super::spacing::{ems, read_dimension};
use crate::error;
use texmath::prelude::*;

/// Handler for `\frac`.
pub fn frac(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let numerator = state.read_argument(&call.token)?;
    let denominator = state.read_argument(&call.token)?;
    state.builder().open_node("mfrac", &Default::default());
    state.push_action(Action::CloseNode);
    state.push_argument(denominator, &call.token);
    state.push_argument(numerator, &call.token);
    Ok(())
}

/// Handler for `\sqrt`, with an optional index: `\sqrt[3]{x}`.
pub fn sqrt(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let index = state.read_optional_argument(&call.token)?;
    let base = state.read_argument(&call.token)?;
    open_root(state, &call.token, base, index)
}

/// Handler for the plain TeX root `\root 3 \of x`.
pub fn root(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let index = read_up_to(state, &call.token, "of")?;
    let base = state.read_argument(&call.token)?;
    open_root(state, &call.token, base, Some(index))
}

fn open_root(
    state: &mut ParseState<'_>,
    token: &Token,
    base: Vec<Token>,
    index: Option<Vec<Token>>,
) -> Result<(), ParseError> {
    state.push_action(Action::CloseNode);
    match index {
        None => {
            state.builder().open_node("msqrt", &Default::default());
        }
        Some(index) => {
            let (index, padding) = root_moves(index)?;
            state.builder().open_node("mroot", &Default::default());
            if padding.is_empty() {
                state.push_argument(index, token);
            } else {
                state.push_action(Action::CloseNode);
                state.push_argument(index, token);
                state.push_action(Action::OpenNode {
                    name: "mpadded".into(),
                    attributes: padding,
                });
            }
        }
    }
    state.push_argument(base, token);
    Ok(())
}

/// Takes `\uproot` and `\leftroot` out of a root index.
///
/// Returns the rest of the index and the padding that moves it, in fifteenths of an em.
fn root_moves(index: Vec<Token>) -> Result<(Vec<Token>, Attributes), ParseError> {
    let mut kept = Vec::with_capacity(index.len());
    let mut padding = Attributes::new();
    let mut tokens = index.into_iter().peekable();
    while let Some(next) = tokens.next() {
        let up = match next.control_sequence_name() {
            Some("uproot") => true,
            Some("leftroot") => false,
            _ => {
                kept.push(next);
                continue;
            }
        };
        while tokens.peek().map_or(false, Token::is_space) {
            tokens.next();
        }
        let mut text = String::new();
        match tokens.next() {
            Some(open) if open.is_character('{') => {
                let mut depth = 0_usize;
                for token in tokens.by_ref() {
                    if token.is_character('{') {
                        depth += 1;
                    } else if token.is_character('}') {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                    text.push_str(&token.value().text());
                }
            }
            Some(token) => text.push_str(&token.value().text()),
            None => {}
        }
        let n: i64 = text
            .trim()
            .parse()
            .map_err(|_| error(&next, format!["The argument to {next} must be an integer"]))?;
        let offset = ems(n as f64 / 15.0);
        let offset = if n >= 0 { format!["+{offset}"] } else { offset };
        if up {
            padding.insert("height".into(), offset.clone().into());
            padding.insert("voffset".into(), offset.into());
        } else {
            padding.insert("width".into(), offset.into());
        }
    }
    Ok((kept, padding))
}

/// Handler for `\uproot` and `\leftroot` outside of a root index.
///
/// Inside an index they are taken out before the index is parsed.
pub fn move_root(call: Call<'_>, _: &mut ParseState<'_>) -> Result<(), ParseError> {
    Err(error(
        &call.token,
        format!["{} can appear only within a root", call.token],
    ))
}

/// Reads the tokens up to the control sequence with the name, at the current brace depth.
///
/// The control sequence itself is dropped.
fn read_up_to(state: &mut ParseState<'_>, token: &Token, name: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = vec![];
    let mut depth = 0_usize;
    loop {
        let next = match state.next_token() {
            None => return Err(error(token, format!["Missing \\{name} for {token}"])),
            Some(next) => next,
        };
        if depth == 0 && next.control_sequence_name() == Some(name) {
            return Ok(tokens);
        }
        if next.is_character('{') {
            depth += 1;
        } else if next.is_character('}') {
            if depth == 0 {
                return Err(error(token, format!["Missing \\{name} for {token}"]));
            }
            depth -= 1;
        }
        tokens.push(next);
    }
}

/// Handler for `\over`, `\atop`, `\above`, their `withdelims` forms, and `\choose` and friends.
///
/// Everything before the command in the current group becomes the numerator,
///     and everything after it the denominator.
/// Parameters: the open and close delimiters, for `\choose`, `\brace` and `\brack`.
pub fn over(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = call.token.control_sequence_name().unwrap_or("over").to_string();
    let fixed = match (call.str_param(0), call.str_param(1)) {
        (Some(open), Some(close)) => Some((open.to_string(), close.to_string())),
        _ => None,
    };
    let mut fences = match &fixed {
        Some((open, close)) => {
            let open = state.delimiter_glyph(open);
            let close = state.delimiter_glyph(close);
            open.zip(close)
        }
        None => None,
    };
    if name.ends_with("withdelims") {
        let open = state.read_delimiter(&call.token)?;
        let close = state.read_delimiter(&call.token)?;
        fences = Some((open, close));
    }
    let thickness = if name.starts_with("above") {
        Some(read_dimension(state, &call.token)?)
    } else if name.starts_with("atop") || fixed.is_some() {
        Some("0".to_string())
    } else {
        None
    };
    let fraction_attributes = match thickness {
        None => Attributes::new(),
        Some(thickness) => attributes([("linethickness", thickness.into())]),
    };
    let fences = fences.filter(|((open, _), (close, _))| !open.is_empty() || !close.is_empty());
    let fences = fences
        .as_ref()
        .map(|((open, open_attributes), (close, close_attributes))| {
            [(open.as_str(), open_attributes), (close.as_str(), close_attributes)]
        });
    state.open_infix(&call.token, "mfrac", &fraction_attributes, fences)
}

/// Handler for `\buildrel top \over base`.
pub fn build_rel(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let top = read_up_to(state, &call.token, "over")?;
    let base = state.read_argument(&call.token)?;
    let builder = state.builder();
    builder.open_atom("REL");
    builder.open_node("mover", &Default::default());
    state.push_action(Action::CloseAtom);
    state.push_action(Action::CloseNode);
    state.push_argument(top, &call.token);
    state.push_argument(base, &call.token);
    Ok(())
}

/// Handler for `\mathchoice`, which keeps one argument for each of the four styles.
pub fn mathchoice(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let mut choices = Vec::with_capacity(4);
    for _ in 0..4 {
        choices.push(state.read_argument(&call.token)?);
    }
    state.builder().open_node("mathchoice", &Default::default());
    state.push_action(Action::CloseNode);
    for choice in choices.into_iter().rev() {
        state.push_argument(choice, &call.token);
    }
    Ok(())
}

/// Handler for `\overline`, `\underbrace` and friends.
///
/// Parameters: the glyph, and `over` or `under`.
pub fn under_over(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let glyph = call.str_param(0).unwrap_or_default().to_string();
    let node = match call.str_param(1) {
        Some("under") => "munder",
        _ => "mover",
    };
    let base = state.read_argument(&call.token)?;
    state.builder().open_node(node, &Default::default());
    state.push_action(Action::CloseNode);
    state.push_action(Action::Append {
        kind: CharKind::Operator,
        glyph,
        attributes: attributes([("stretchy", true.into())]),
    });
    state.push_argument(base, &call.token);
    Ok(())
}

fn stack(call: Call<'_>, state: &mut ParseState<'_>, node: &str) -> Result<(), ParseError> {
    let script = state.read_argument(&call.token)?;
    let base = state.read_argument(&call.token)?;
    state.builder().open_node(node, &Default::default());
    state.push_action(Action::CloseNode);
    state.push_argument(script, &call.token);
    state.push_argument(base, &call.token);
    Ok(())
}

/// Handler for `\overset{top}{base}`.
pub fn overset(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    stack(call, state, "mover")
}

/// Handler for `\underset{bottom}{base}`.
pub fn underset(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    stack(call, state, "munder")
}

/// Handler for accents like `\hat`.
///
/// Parameters: the glyph, and whether the accent stretches over its base.
pub fn accent(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let glyph = call.str_param(0).unwrap_or_default().to_string();
    let wide = call.params().get(1).and_then(Value::as_bool).unwrap_or(false);
    let base = state.read_argument(&call.token)?;
    state
        .builder()
        .open_node("mover", &attributes([("accent", true.into())]));
    state.push_action(Action::CloseNode);
    state.push_action(Action::Append {
        kind: CharKind::Operator,
        glyph,
        attributes: attributes([("stretchy", wide.into())]),
    });
    state.push_argument(base, &call.token);
    Ok(())
}

/// Handler for `\mathrel` and the other class commands.
pub fn tex_atom(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let class = call.str_param(0).unwrap_or("ORD").to_string();
    let argument = state.read_argument(&call.token)?;
    state.builder().open_atom(&class);
    state.push_action(Action::CloseAtom);
    state.push_argument(argument, &call.token);
    Ok(())
}

/// Handler for `\big` and friends.
///
/// Parameters: the class of the delimiter, and its size.
pub fn make_big(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let class = call.str_param(0).unwrap_or("ORD").to_string();
    let size = call.str_param(1).unwrap_or("1.2em").to_string();
    let (glyph, mut attributes) = state.read_delimiter(&call.token)?;
    attributes.insert("maxsize".into(), size.clone().into());
    attributes.insert("minsize".into(), size.into());
    let builder = state.builder();
    builder.open_atom(&class);
    builder.append_character(CharKind::Operator, &glyph, &attributes);
    builder.close_atom();
    Ok(())
}

fn fence(mut attributes: Attributes) -> Attributes {
    attributes.insert("fence".into(), true.into());
    attributes.insert("stretchy".into(), true.into());
    attributes
}

/// Handler for `\left` and `\right`.
pub fn left_right(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if call.str_param(0) == Some("right") {
        state.check_group(&GroupKind::Left, &call.token)?;
        let (glyph, attributes) = state.read_delimiter(&call.token)?;
        state.close_implicit_nodes();
        state.append(CharKind::Operator, &glyph, &fence(attributes));
        return state.close_group(&GroupKind::Left, &call.token);
    }
    let (glyph, attributes) = state.read_delimiter(&call.token)?;
    state.open_group(GroupKind::Left, call.token);
    state.append(CharKind::Operator, &glyph, &fence(attributes));
    Ok(())
}

/// Handler for `\middle`.
pub fn middle(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    if state.current_group() != &GroupKind::Left {
        return Err(error(&call.token, r"\middle must be within \left and \right"));
    }
    let (glyph, mut attributes) = state.read_delimiter(&call.token)?;
    state.close_implicit_nodes();
    attributes.insert("stretchy".into(), true.into());
    state.append(CharKind::Operator, &glyph, &attributes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        tree_tests(
            (frac, r"\frac{a}{b+c}", "mfrac(mi(a) mrow(mi(b) mo(+) mi(c)))"),
            (frac_single_tokens, r"\frac12", "mfrac(mn(1) mn(2))"),
            (nested_frac, r"\frac{\frac ab}c", "mfrac(mfrac(mi(a) mi(b)) mi(c))"),
            (sqrt, r"\sqrt{x}", "msqrt(mi(x))"),
            (root, r"\sqrt[3]{x}", "mroot(mi(x) mn(3))"),
            (overline, r"\overline{ab}", "mover(mrow(mi(a) mi(b)) mo[stretchy=true](\u{af}))"),
            (underbrace, r"\underbrace x", "munder(mi(x) mo[stretchy=true](\u{23df}))"),
            (overset, r"\overset{*}{=}", "mover(mo(=) mo(\u{2217}))"),
            (underset, r"\underset{a}{b}", "munder(mi(b) mi(a))"),
            (
                accent,
                r"\hat{x}",
                "mover[accent=true](mi(x) mo[stretchy=false](^))"
            ),
            (
                wide_accent,
                r"\widehat{xy}",
                "mover[accent=true](mrow(mi(x) mi(y)) mo[stretchy=true](^))"
            ),
            (atom, r"\mathrel{x}", "TeXAtom[REL](mi(x))"),
            (
                stackrel,
                r"\stackrel{a}{=}",
                "TeXAtom[REL](msup(TeXAtom[OP][movablelimits=false,movesupsub=true](mo(=)) mi(a)))"
            ),
            (
                big,
                r"\big(",
                "TeXAtom[ORD](mo[maxsize=1.2em,minsize=1.2em](())"
            ),
            (
                bigl_langle,
                r"\Bigl\langle",
                "TeXAtom[OPEN](mo[maxsize=1.623em,minsize=1.623em](\u{27e8}))"
            ),
            (
                left_right,
                r"\left(x\right)",
                "mrow(mo[fence=true,stretchy=true](() mi(x) mo[fence=true,stretchy=true]()))"
            ),
            (
                left_right_empty,
                r"\left.x\right|",
                "mrow(mo[fence=true,stretchy=true]() mi(x) mo[fence=true,stretchy=true,texClass=ORD](|))"
            ),
            (
                middle,
                r"\left(a\middle|b\right)",
                "mrow(mo[fence=true,stretchy=true](() mi(a) mo[stretchy=true,texClass=ORD](|) mi(b) mo[fence=true,stretchy=true]()))"
            ),
            (
                left_right_closes_style,
                r"\left(\displaystyle x\right)",
                "mrow(mo[fence=true,stretchy=true](() mstyle[displaystyle=true,scriptlevel=0](mi(x)) mo[fence=true,stretchy=true]()))"
            ),
            (plain_root, r"\root 3 \of x", "mroot(mi(x) mn(3))"),
            (plain_root_braced_base, r"\root n+1 \of {xy}", "mroot(mrow(mi(x) mi(y)) mrow(mi(n) mo(+) mn(1)))"),
            (
                uproot,
                r"\sqrt[\uproot2 3]{x}",
                "mroot(mi(x) mpadded[height=+0.1333em,voffset=+0.1333em](mn(3)))"
            ),
            (
                leftroot,
                r"\sqrt[\leftroot{-3}n]{x}",
                "mroot(mi(x) mpadded[width=-0.2em](mi(n)))"
            ),
            (
                uproot_in_plain_root,
                r"\root \uproot{15}3\of x",
                "mroot(mi(x) mpadded[height=+1em,voffset=+1em](mn(3)))"
            ),
            (over, r"a \over b", "mfrac(mi(a) mi(b))"),
            (
                over_takes_the_group,
                r"1+{a+b \over c}",
                "mn(1) mo(+) mfrac(mrow(mi(a) mo(+) mi(b)) mi(c))"
            ),
            (over_after_script, r"a^2 \over b", "mfrac(msup(mi(a) mn(2)) mi(b))"),
            (atop, r"a \atop b", "mfrac[linethickness=0](mi(a) mi(b))"),
            (above, r"a \above 2pt b", "mfrac[linethickness=2pt](mi(a) mi(b))"),
            (
                choose,
                r"{n \choose k}",
                "mrow(mo(() mfrac[linethickness=0](mi(n) mi(k)) mo()))"
            ),
            (
                brack,
                r"n \brack k",
                "mrow(mo([) mfrac[linethickness=0](mi(n) mi(k)) mo(]))"
            ),
            (
                brace,
                r"n \brace k",
                "mrow(mo({) mfrac[linethickness=0](mi(n) mi(k)) mo(}))"
            ),
            (
                overwithdelims,
                r"a \overwithdelims [ ] b",
                "mrow(mo([) mfrac(mi(a) mi(b)) mo(]))"
            ),
            (
                abovewithdelims,
                r"a \abovewithdelims ( ) 1pt b",
                "mrow(mo(() mfrac[linethickness=1pt](mi(a) mi(b)) mo()))"
            ),
            (
                over_in_left_right,
                r"\left(a \over b\right)",
                "mrow(mo[fence=true,stretchy=true](() mfrac(mi(a) mi(b)) mo[fence=true,stretchy=true]()))"
            ),
            (
                over_in_cell,
                r"\begin{matrix}a&b\over c\end{matrix}",
                "matrix[c](mi(a) & mfrac(mi(b) mi(c)))"
            ),
            (
                over_in_each_cell,
                r"\begin{matrix}a\over b&c\over d\end{matrix}",
                "matrix[c](mfrac(mi(a) mi(b)) & mfrac(mi(c) mi(d)))"
            ),
            (
                buildrel,
                r"\buildrel a \over =",
                "TeXAtom[REL](mover(mo(=) mi(a)))"
            ),
            (
                mathchoice,
                r"\mathchoice{a}{b}{c}{d}",
                "mathchoice(mi(a) mi(b) mi(c) mi(d))"
            ),
        ),
        failure_tests(
            (frac_missing_argument, r"\frac{a}"),
            (frac_unclosed_argument, r"\frac{a"),
            (sqrt_unclosed_index, r"\sqrt[3{x}"),
            (right_without_left, r"x\right)"),
            (left_without_right, r"\left(x"),
            (bad_delimiter, r"\left x\right)"),
            (missing_delimiter, r"\left"),
            (middle_outside_left, r"a\middle|b"),
            (brace_mismatch_in_left, r"\left(x}\right)"),
            (root_without_of, r"\root 3 x"),
            (root_of_outside_group, r"{\root 3} \of x"),
            (uproot_outside_root, r"\uproot2 x"),
            (uproot_not_integer, r"\sqrt[\uproot{a}3]{x}"),
            (ambiguous_over, r"a \over b \over c"),
            (ambiguous_choose, r"{a \over b \choose c}"),
            (above_without_dimension, r"a \above b"),
            (overwithdelims_bad_delimiter, r"a \overwithdelims x ) b"),
            (buildrel_without_over, r"\buildrel a ="),
            (mathchoice_missing_argument, r"\mathchoice{a}{b}{c}"),
        ),
    ];
}
