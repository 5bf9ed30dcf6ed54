//! The AMS math package.
//!
//! This package adds the extra symbols of the AMS fonts, generalized fractions and binomials,
//!     `\operatorname`, and the alignment environments.

use texmath::handler::Handler;
use texmath::prelude::*;

pub const NAME: &str = "ams";

fn normal(glyph: &str) -> Mapping {
    Mapping::character_with(glyph, attributes([("mathvariant", "normal".into())]))
}

fn mathchar0mi() -> Result<SymbolMap, ConfigError> {
    Ok(SymbolMap::new(
        "ams-mathchar0mi",
        Kind::Character,
        [
            ("digamma", Mapping::character("\u{03DD}")),
            ("varkappa", Mapping::character("\u{03F0}")),
            ("hslash", Mapping::character("\u{210F}")),
            ("nexists", normal("\u{2204}")),
            ("mho", normal("\u{2127}")),
            ("Finv", normal("\u{2132}")),
            ("Game", normal("\u{2141}")),
            ("complement", normal("\u{2201}")),
            ("eth", normal("\u{00F0}")),
            ("square", normal("\u{25A1}")),
            ("Box", normal("\u{25A1}")),
            ("blacksquare", normal("\u{25A0}")),
            ("lozenge", normal("\u{25CA}")),
            ("measuredangle", normal("\u{2221}")),
            ("varnothing", normal("\u{2205}")),
            ("backprime", normal("\u{2035}")),
            ("circledS", normal("\u{24C8}")),
            ("blacktriangle", normal("\u{25B4}")),
            ("bigstar", normal("\u{2605}")),
        ],
    )?
    .with_handler("mathchar0mi"))
}

fn mathchar0mo() -> Result<SymbolMap, ConfigError> {
    Ok(SymbolMap::new(
        "ams-mathchar0mo",
        Kind::Character,
        [
            (
                "iiiint",
                Mapping::character_with("\u{2A0C}", attributes([("texClass", "OP".into())])),
            ),
            ("leqq", Mapping::character("\u{2266}")),
            ("geqq", Mapping::character("\u{2267}")),
            ("leqslant", Mapping::character("\u{2A7D}")),
            ("geqslant", Mapping::character("\u{2A7E}")),
            ("lesssim", Mapping::character("\u{2272}")),
            ("gtrsim", Mapping::character("\u{2273}")),
            ("approxeq", Mapping::character("\u{224A}")),
            ("therefore", Mapping::character("\u{2234}")),
            ("because", Mapping::character("\u{2235}")),
            ("nless", Mapping::character("\u{226E}")),
            ("ngtr", Mapping::character("\u{226F}")),
            ("nleq", Mapping::character("\u{2270}")),
            ("ngeq", Mapping::character("\u{2271}")),
            ("subsetneq", Mapping::character("\u{228A}")),
            ("supsetneq", Mapping::character("\u{228B}")),
            ("nsubseteq", Mapping::character("\u{2288}")),
            ("nsupseteq", Mapping::character("\u{2289}")),
            ("vDash", Mapping::character("\u{22A8}")),
            ("Vdash", Mapping::character("\u{22A9}")),
            ("nmid", Mapping::character("\u{2224}")),
            ("nparallel", Mapping::character("\u{2226}")),
            ("ncong", Mapping::character("\u{2247}")),
            ("nsim", Mapping::character("\u{2241}")),
            ("lhd", Mapping::character("\u{22B2}")),
            ("rhd", Mapping::character("\u{22B3}")),
            ("unlhd", Mapping::character("\u{22B4}")),
            ("unrhd", Mapping::character("\u{22B5}")),
            ("ltimes", Mapping::character("\u{22C9}")),
            ("rtimes", Mapping::character("\u{22CA}")),
            ("boxplus", Mapping::character("\u{229E}")),
            ("boxminus", Mapping::character("\u{229F}")),
            ("boxtimes", Mapping::character("\u{22A0}")),
            ("boxdot", Mapping::character("\u{22A1}")),
            ("dotplus", Mapping::character("\u{2214}")),
            ("circledast", Mapping::character("\u{229B}")),
            ("circledcirc", Mapping::character("\u{229A}")),
            ("leftleftarrows", Mapping::character("\u{21C7}")),
            ("rightrightarrows", Mapping::character("\u{21C9}")),
            ("twoheadleftarrow", Mapping::character("\u{219E}")),
            ("twoheadrightarrow", Mapping::character("\u{21A0}")),
            ("rightsquigarrow", Mapping::character("\u{21DD}")),
            ("leadsto", Mapping::character("\u{21DD}")),
            ("curvearrowleft", Mapping::character("\u{21B6}")),
            ("curvearrowright", Mapping::character("\u{21B7}")),
        ],
    )?
    .with_handler("mathchar0mo"))
}

fn delimiter() -> Result<SymbolMap, ConfigError> {
    let ord = |glyph: &str| Mapping::delimiter_with(glyph, attributes([("texClass", "ORD".into())]));
    Ok(SymbolMap::new(
        "ams-delimiter",
        Kind::Delimiter,
        [
            (r"\ulcorner", Mapping::delimiter("\u{231C}")),
            (r"\urcorner", Mapping::delimiter("\u{231D}")),
            (r"\llcorner", Mapping::delimiter("\u{231E}")),
            (r"\lrcorner", Mapping::delimiter("\u{231F}")),
            (r"\lvert", ord("|")),
            (r"\rvert", ord("|")),
            (r"\lVert", ord("\u{2225}")),
            (r"\rVert", ord("\u{2225}")),
        ],
    )?
    .with_handler("delimiter"))
}

fn macros() -> Result<SymbolMap, ConfigError> {
    let genfrac = |open: &str, close: &str, thickness: &str, style: &str| {
        Mapping::command_with(
            "Genfrac",
            vec![open.into(), close.into(), thickness.into(), style.into()],
        )
    };
    SymbolMap::new(
        "ams-macros",
        Kind::Command,
        [
            ("dfrac", genfrac("", "", "", "0")),
            ("tfrac", genfrac("", "", "", "1")),
            ("binom", genfrac("(", ")", "0", "")),
            ("dbinom", genfrac("(", ")", "0", "0")),
            ("tbinom", genfrac("(", ")", "0", "1")),
            ("operatorname", Mapping::command("OperatorName")),
            (
                "boxed",
                Mapping::command_with(
                    "Wrap",
                    vec!["menclose".into(), "notation".into(), "box".into()],
                ),
            ),
            (
                "implies",
                Mapping::Macro(Macro::new(r"\;\Longrightarrow\;", 0)?),
            ),
            (
                "impliedby",
                Mapping::Macro(Macro::new(r"\;\Longleftarrow\;", 0)?),
            ),
        ],
    )
}

fn environment() -> Result<SymbolMap, ConfigError> {
    let array = |align: &str| {
        Mapping::environment("Array", vec![Value::Null, Value::Null, align.into()])
    };
    SymbolMap::new(
        "ams-environment",
        Kind::Environment,
        [
            ("align", array("rl")),
            ("align*", array("rl")),
            ("aligned", array("rl")),
            ("split", array("rl")),
            ("gather", array("c")),
            ("gather*", array("c")),
            ("gathered", array("c")),
            ("smallmatrix", array("c")),
        ],
    )
}

/// Returns the AMS package.
///
/// The package also adds the Hebrew letters to the base `mathchar0mi` map.
pub fn package() -> Result<Package, ConfigError> {
    Ok(Package::new(
        vec![mathchar0mi()?, mathchar0mo()?, delimiter()?, macros()?, environment()?],
        Configuration::new(NAME)
            .with(Category::Delimiter, ["ams-delimiter"])
            .with(
                Category::Macro,
                ["ams-macros", "ams-mathchar0mi", "ams-mathchar0mo", "ams-delimiter"],
            )
            .with(Category::Environment, ["ams-environment"]),
    )
    .with_extension(
        "mathchar0mi",
        [
            ("beth", normal("\u{2136}")),
            ("daleth", normal("\u{2138}")),
            ("gimel", normal("\u{2137}")),
        ],
    ))
}

fn fence(state: &ParseState<'_>, text: &str) -> Option<(String, Attributes)> {
    if text.is_empty() {
        return None;
    }
    Some(
        state
            .delimiter_glyph(text)
            .unwrap_or_else(|| (text.to_string(), Attributes::new())),
    )
}

/// Handler for `\dfrac`, `\binom` and the other generalized fractions.
///
/// Parameters: the open delimiter, the close delimiter, the line thickness and the style.
/// Empty parameters are omitted; style `0` is display style and style `1` is text style.
fn genfrac(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let param = |i: usize| call.str_param(i).unwrap_or_default().to_string();
    let (thickness, style) = (param(2), param(3));
    let open = fence(state, &param(0));
    let close = fence(state, &param(1));
    let numerator = state.read_argument(&call.token)?;
    let denominator = state.read_argument(&call.token)?;

    if !style.is_empty() {
        state.builder().open_node(
            "mstyle",
            &attributes([
                ("displaystyle", (style == "0").into()),
                ("scriptlevel", 0_i64.into()),
            ]),
        );
        state.push_action(Action::CloseNode);
    }
    if open.is_some() || close.is_some() {
        state.builder().open_group();
        state.push_action(Action::CloseGroup);
        if let Some((glyph, attributes)) = open {
            state.append(CharKind::Operator, &glyph, &attributes);
        }
        if let Some((glyph, attributes)) = close {
            state.push_action(Action::Append {
                kind: CharKind::Operator,
                glyph,
                attributes,
            });
        }
    }
    let frac_attributes = if thickness.is_empty() {
        Attributes::new()
    } else {
        attributes([("linethickness", thickness.into())])
    };
    state.builder().open_node("mfrac", &frac_attributes);
    state.push_action(Action::CloseNode);
    state.push_argument(denominator, &call.token);
    state.push_argument(numerator, &call.token);
    Ok(())
}

/// Handler for `\operatorname`.
fn operator_name(call: Call<'_>, state: &mut ParseState<'_>) -> Result<(), ParseError> {
    let name = state.read_text_argument(&call.token)?;
    state.append(
        CharKind::Identifier,
        name.trim(),
        &attributes([("texClass", "OP".into())]),
    );
    Ok(())
}

/// Returns the handlers the AMS package refers to, beyond those of the base package.
pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![
        (
            "Genfrac",
            Handler::new(genfrac).with_doc("A fraction with optional delimiters, thickness and style"),
        ),
        (
            "OperatorName",
            Handler::new(operator_name).with_doc("A custom function name"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::new_engine;
    use texmath_testing::*;

    test_suite![
        packages("base", "ams"),
        tree_tests(
            (symbol, r"\leqslant", "mo(\u{2a7d})"),
            (ord_symbol, r"\varnothing", "mi[mathvariant=normal](\u{2205})"),
            (hebrew_extension, r"\beth", "mi[mathvariant=normal](\u{2136})"),
            (
                dfrac,
                r"\dfrac ab",
                "mstyle[displaystyle=true,scriptlevel=0](mfrac(mi(a) mi(b)))"
            ),
            (
                tfrac,
                r"\tfrac ab",
                "mstyle[displaystyle=false,scriptlevel=0](mfrac(mi(a) mi(b)))"
            ),
            (
                binom,
                r"\binom{n}{k}",
                "mrow(mo(() mfrac[linethickness=0](mi(n) mi(k)) mo()))"
            ),
            (
                dbinom,
                r"\dbinom nk",
                "mstyle[displaystyle=true,scriptlevel=0](mrow(mo(() mfrac[linethickness=0](mi(n) mi(k)) mo())))"
            ),
            (operatorname, r"\operatorname{sgn}x", "mi[texClass=OP](sgn) mi(x)"),
            (boxed, r"\boxed{x}", "menclose[notation=box](mi(x))"),
            (
                align,
                r"\begin{align*}a&=b\\c&=d\end{align*}",
                r"align*[rl](mi(a) & mo(=) mi(b) \\ mi(c) & mo(=) mi(d))"
            ),
            (
                lvert,
                r"\left\lvert x\right\rvert",
                "mrow(mo[fence=true,stretchy=true,texClass=ORD](|) mi(x) mo[fence=true,stretchy=true,texClass=ORD](|))"
            ),
            (corner, r"\ulcorner", "mo(\u{231c})"),
        ),
        parse_equality_tests(
            (implies, r"\implies", r"\;\Longrightarrow\;"),
            (choose_and_binom, r"{n \choose k}", r"\binom{n}{k}"),
        ),
        failure_tests(
            (binom_missing_argument, r"\binom{n}"),
        ),
    ];

    #[test]
    fn hebrew_letters_extend_the_base_map() -> Result<(), texmath::error::ConfigError> {
        use texmath::configuration::Category;
        use texmath::token::{Span, Token};
        let engine = new_engine()?;
        let session = engine.session(&["base", "ams"])?;
        let dispatcher = session.dispatcher();
        let gimel = Token::new_control_sequence("gimel", Span::default());
        let resolution = dispatcher.resolve(&gimel, Category::Macro);
        assert_eq!(
            resolution.map(|r| r.map.name().to_string()).ok(),
            Some("mathchar0mi".to_string())
        );
        let alpha = Token::new_control_sequence("alpha", Span::default());
        let resolution = dispatcher.resolve(&alpha, Category::Macro);
        assert_eq!(
            resolution.map(|r| r.map.name().to_string()).ok(),
            Some("mathchar0mi".to_string())
        );
        Ok(())
    }

    mod without_ams {
        use crate::new_engine;
        use texmath_testing::*;

        test_suite![
            packages("base"),
            failure_tests(
                (ams_symbol, r"\leqslant"),
                (ams_environment, r"\begin{align}a\end{align}"),
            ),
        ];
    }
}
