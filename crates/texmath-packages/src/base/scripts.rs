//! Superscripts, subscripts and limits.

use crate::error;
use texmath::prelude::*;

fn script(call: Call<'_>, state: &mut ParseState<'_>, script: Script) -> Result<(), ParseError> {
    state.skip_spaces();
    let missing = match state.peek_token() {
        None => true,
        Some(next) => next.is_character('}'),
    };
    if missing {
        return Err(error(&call.token, "Missing superscript or subscript argument"));
    }
    if !state.builder().script(script) {
        return Err(error(&call.token, double_script_message(script)));
    }
    Ok(())
}

fn double_script_message(script: Script) -> &'static str {
    match script {
        Script::Superscript => "Double exponent: use braces to clarify",
        Script::Subscript => "Double subscripts: use braces to clarify",
    }
}

/// Handler for `^`.
///
/// The previous item becomes the base and the next item becomes the script.
pub fn superscript(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    script(call, state, Script::Superscript)
}

/// Handler for `_`.
pub fn subscript(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    script(call, state, Script::Subscript)
}

/// Handler for `\limits` and `\nolimits`.
///
/// These change how scripts attach to the previous operator.
pub fn limits(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let limits = call.params().first().and_then(Value::as_bool).unwrap_or(true);
    if !state.annotate_previous("movablelimits", false.into()) {
        return Err(error(
            &call.token,
            format!["{} is allowed only on operators", call.token],
        ));
    }
    state.annotate_previous("movesupsub", limits.into());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        tree_tests(
            (superscript, "x^2", "msup(mi(x) mn(2))"),
            (subscript, "x_i", "msub(mi(x) mi(i))"),
            (group_script, "x^{ab}", "msup(mi(x) mrow(mi(a) mi(b)))"),
            (script_of_group, "{ab}^c", "msup(mrow(mi(a) mi(b)) mi(c))"),
            (space_before_script, "x^ 2", "msup(mi(x) mn(2))"),
            (script_without_base, "^2", "msup(mrow() mn(2))"),
            (nested_scripts, "x^{y^z}", "msup(mi(x) msup(mi(y) mi(z)))"),
            (sub_then_sup, "x_i^2", "msup(msub(mi(x) mi(i)) mn(2))"),
            (sup_then_sub, "x^2_i", "msub(msup(mi(x) mn(2)) mi(i))"),
            (braced_double_exponent, "{x^2}^3", "msup(msup(mi(x) mn(2)) mn(3))"),
            (prime_then_exponent, "f'^2", "msup(msup(mi(f) mo(\u{2032})) mn(2))"),
            (command_script, r"x^\alpha", "msup(mi(x) mi(\u{3b1}))"),
            (
                limits,
                r"\sum\limits_i",
                "msub(mo[movablelimits=false,movesupsub=true,texClass=OP](\u{2211}) mi(i))"
            ),
            (
                nolimits,
                r"\sum\nolimits^n",
                "msup(mo[movablelimits=false,movesupsub=false,texClass=OP](\u{2211}) mi(n))"
            ),
        ),
        failure_tests(
            (double_caret, "x^^2"),
            (double_exponent, "x^2^3"),
            (double_subscript, "x_1_2"),
            (double_subscript_around_exponent, "x_1^2_3"),
            (exponent_then_prime, "x^2'"),
            (missing_script, "x^"),
            (script_before_close, "{x^}"),
            (script_at_end_of_argument, r"\frac{x^}{y}"),
            (limits_without_operator, r"\limits"),
        ),
    ];
}
