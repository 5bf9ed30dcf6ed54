//! Symbol tables of the base package.

use texmath::prelude::*;

fn normal(glyph: &str) -> Mapping {
    Mapping::character_with(glyph, attributes([("mathvariant", "normal".into())]))
}

fn large_op(glyph: &str) -> Mapping {
    Mapping::character_with(
        glyph,
        attributes([("movesupsub", true.into()), ("texClass", "OP".into())]),
    )
}

fn integral(glyph: &str) -> Mapping {
    Mapping::character_with(glyph, attributes([("texClass", "OP".into())]))
}

fn small_op(glyph: &str) -> Mapping {
    Mapping::character_with(glyph, attributes([("largeop", false.into())]))
}

fn punct(glyph: &str) -> Mapping {
    Mapping::character_with(glyph, attributes([("texClass", "PUNCT".into())]))
}

fn ord_delimiter(glyph: &str) -> Mapping {
    Mapping::delimiter_with(glyph, attributes([("texClass", "ORD".into())]))
}

/// Characters read directly from the input that trigger handlers.
pub fn special() -> Result<SymbolMap, ConfigError> {
    SymbolMap::new(
        "special",
        Kind::Command,
        [
            ("{", Mapping::command("Open")),
            ("}", Mapping::command("Close")),
            ("~", Mapping::command("Tilde")),
            ("^", Mapping::command("Superscript")),
            ("_", Mapping::command("Subscript")),
            (" ", Mapping::command("Space")),
            ("\t", Mapping::command("Space")),
            ("\r", Mapping::command("Space")),
            ("\n", Mapping::command("Space")),
            ("'", Mapping::command("Prime")),
            ("&", Mapping::command("Entry")),
            ("#", Mapping::command("Hash")),
            ("\u{00A0}", Mapping::command("Space")),
            ("\u{2019}", Mapping::command("Prime")),
        ],
    )
}

pub fn remap() -> Result<SymbolMap, ConfigError> {
    SymbolMap::new(
        "remap",
        Kind::Character,
        [
            ("-", Mapping::character("\u{2212}")),
            ("*", Mapping::character("\u{2217}")),
            ("`", Mapping::character("\u{2018}")),
        ],
    )
}

pub fn mathchar0mi() -> Result<SymbolMap, ConfigError> {
    Ok(SymbolMap::new(
        "mathchar0mi",
        Kind::Character,
        [
            // Lower-case greek
            ("alpha", Mapping::character("\u{03B1}")),
            ("beta", Mapping::character("\u{03B2}")),
            ("gamma", Mapping::character("\u{03B3}")),
            ("delta", Mapping::character("\u{03B4}")),
            ("epsilon", Mapping::character("\u{03F5}")),
            ("zeta", Mapping::character("\u{03B6}")),
            ("eta", Mapping::character("\u{03B7}")),
            ("theta", Mapping::character("\u{03B8}")),
            ("iota", Mapping::character("\u{03B9}")),
            ("kappa", Mapping::character("\u{03BA}")),
            ("lambda", Mapping::character("\u{03BB}")),
            ("mu", Mapping::character("\u{03BC}")),
            ("nu", Mapping::character("\u{03BD}")),
            ("xi", Mapping::character("\u{03BE}")),
            ("omicron", Mapping::character("\u{03BF}")),
            ("pi", Mapping::character("\u{03C0}")),
            ("rho", Mapping::character("\u{03C1}")),
            ("sigma", Mapping::character("\u{03C3}")),
            ("tau", Mapping::character("\u{03C4}")),
            ("upsilon", Mapping::character("\u{03C5}")),
            ("phi", Mapping::character("\u{03D5}")),
            ("chi", Mapping::character("\u{03C7}")),
            ("psi", Mapping::character("\u{03C8}")),
            ("omega", Mapping::character("\u{03C9}")),
            ("varepsilon", Mapping::character("\u{03B5}")),
            ("vartheta", Mapping::character("\u{03D1}")),
            ("varpi", Mapping::character("\u{03D6}")),
            ("varrho", Mapping::character("\u{03F1}")),
            ("varsigma", Mapping::character("\u{03C2}")),
            ("varphi", Mapping::character("\u{03C6}")),
            // Ord symbols
            ("S", normal("\u{00A7}")),
            ("aleph", normal("\u{2135}")),
            ("hbar", Mapping::character("\u{210F}")),
            ("imath", Mapping::character("\u{0131}")),
            ("jmath", Mapping::character("\u{0237}")),
            ("ell", Mapping::character("\u{2113}")),
            ("wp", normal("\u{2118}")),
            ("Re", normal("\u{211C}")),
            ("Im", normal("\u{2111}")),
            ("partial", normal("\u{2202}")),
            ("infty", normal("\u{221E}")),
            ("prime", normal("\u{2032}")),
            ("emptyset", normal("\u{2205}")),
            ("nabla", normal("\u{2207}")),
            ("top", normal("\u{22A4}")),
            ("bot", normal("\u{22A5}")),
            ("angle", normal("\u{2220}")),
            ("triangle", normal("\u{25B3}")),
            ("backslash", normal("\u{2216}")),
            ("forall", normal("\u{2200}")),
            ("exists", normal("\u{2203}")),
            ("neg", normal("\u{00AC}")),
            ("lnot", normal("\u{00AC}")),
            ("flat", normal("\u{266D}")),
            ("natural", normal("\u{266E}")),
            ("sharp", normal("\u{266F}")),
            ("clubsuit", normal("\u{2663}")),
            ("diamondsuit", normal("\u{2662}")),
            ("heartsuit", normal("\u{2661}")),
            ("spadesuit", normal("\u{2660}")),
        ],
    )?
    .with_handler("mathchar0mi"))
}

pub fn mathchar0mo() -> Result<SymbolMap, ConfigError> {
    Ok(SymbolMap::new(
        "mathchar0mo",
        Kind::Character,
        [
            ("surd", Mapping::character("\u{221A}")),
            // Big operators
            ("coprod", large_op("\u{2210}")),
            ("bigvee", large_op("\u{22C1}")),
            ("bigwedge", large_op("\u{22C0}")),
            ("biguplus", large_op("\u{2A04}")),
            ("bigcap", large_op("\u{22C2}")),
            ("bigcup", large_op("\u{22C3}")),
            ("int", integral("\u{222B}")),
            (
                "intop",
                Mapping::character_with(
                    "\u{222B}",
                    attributes([
                        ("movablelimits", true.into()),
                        ("movesupsub", true.into()),
                        ("texClass", "OP".into()),
                    ]),
                ),
            ),
            ("iint", integral("\u{222C}")),
            ("iiint", integral("\u{222D}")),
            ("prod", large_op("\u{220F}")),
            ("sum", large_op("\u{2211}")),
            ("bigotimes", large_op("\u{2A02}")),
            ("bigoplus", large_op("\u{2A01}")),
            ("bigodot", large_op("\u{2A00}")),
            ("oint", integral("\u{222E}")),
            ("bigsqcup", large_op("\u{2A06}")),
            ("smallint", small_op("\u{222B}")),
            // Binary operations
            ("triangleleft", Mapping::character("\u{25C3}")),
            ("triangleright", Mapping::character("\u{25B9}")),
            ("bigtriangleup", Mapping::character("\u{25B3}")),
            ("bigtriangledown", Mapping::character("\u{25BD}")),
            ("wedge", Mapping::character("\u{2227}")),
            ("land", Mapping::character("\u{2227}")),
            ("vee", Mapping::character("\u{2228}")),
            ("lor", Mapping::character("\u{2228}")),
            ("cap", Mapping::character("\u{2229}")),
            ("cup", Mapping::character("\u{222A}")),
            ("ddagger", Mapping::character("\u{2021}")),
            ("dagger", Mapping::character("\u{2020}")),
            ("sqcap", Mapping::character("\u{2293}")),
            ("sqcup", Mapping::character("\u{2294}")),
            ("uplus", Mapping::character("\u{228E}")),
            ("amalg", Mapping::character("\u{2A3F}")),
            ("diamond", Mapping::character("\u{22C4}")),
            ("bullet", Mapping::character("\u{2219}")),
            ("wr", Mapping::character("\u{2240}")),
            ("div", Mapping::character("\u{00F7}")),
            ("odot", small_op("\u{2299}")),
            ("oslash", small_op("\u{2298}")),
            ("otimes", small_op("\u{2297}")),
            ("ominus", small_op("\u{2296}")),
            ("oplus", small_op("\u{2295}")),
            ("mp", Mapping::character("\u{2213}")),
            ("pm", Mapping::character("\u{00B1}")),
            ("circ", Mapping::character("\u{2218}")),
            ("bigcirc", Mapping::character("\u{25EF}")),
            ("setminus", Mapping::character("\u{2216}")),
            ("cdot", Mapping::character("\u{22C5}")),
            ("ast", Mapping::character("\u{2217}")),
            ("times", Mapping::character("\u{00D7}")),
            ("star", Mapping::character("\u{22C6}")),
            // Relations
            ("propto", Mapping::character("\u{221D}")),
            ("sqsubseteq", Mapping::character("\u{2291}")),
            ("sqsupseteq", Mapping::character("\u{2292}")),
            ("parallel", Mapping::character("\u{2225}")),
            ("mid", Mapping::character("\u{2223}")),
            ("dashv", Mapping::character("\u{22A3}")),
            ("vdash", Mapping::character("\u{22A2}")),
            ("leq", Mapping::character("\u{2264}")),
            ("le", Mapping::character("\u{2264}")),
            ("geq", Mapping::character("\u{2265}")),
            ("ge", Mapping::character("\u{2265}")),
            ("lt", Mapping::character("<")),
            ("gt", Mapping::character(">")),
            ("succ", Mapping::character("\u{227B}")),
            ("prec", Mapping::character("\u{227A}")),
            ("approx", Mapping::character("\u{2248}")),
            ("succeq", Mapping::character("\u{2AB0}")),
            ("preceq", Mapping::character("\u{2AAF}")),
            ("supset", Mapping::character("\u{2283}")),
            ("subset", Mapping::character("\u{2282}")),
            ("supseteq", Mapping::character("\u{2287}")),
            ("subseteq", Mapping::character("\u{2286}")),
            ("in", Mapping::character("\u{2208}")),
            ("ni", Mapping::character("\u{220B}")),
            ("notin", Mapping::character("\u{2209}")),
            ("owns", Mapping::character("\u{220B}")),
            ("gg", Mapping::character("\u{226B}")),
            ("ll", Mapping::character("\u{226A}")),
            ("sim", Mapping::character("\u{223C}")),
            ("simeq", Mapping::character("\u{2243}")),
            ("perp", Mapping::character("\u{22A5}")),
            ("equiv", Mapping::character("\u{2261}")),
            ("asymp", Mapping::character("\u{224D}")),
            ("smile", Mapping::character("\u{2323}")),
            ("frown", Mapping::character("\u{2322}")),
            ("ne", Mapping::character("\u{2260}")),
            ("neq", Mapping::character("\u{2260}")),
            ("cong", Mapping::character("\u{2245}")),
            ("doteq", Mapping::character("\u{2250}")),
            ("bowtie", Mapping::character("\u{22C8}")),
            ("models", Mapping::character("\u{22A8}")),
            ("notChar", Mapping::character("\u{29F8}")),
            // Arrows
            ("Leftrightarrow", Mapping::character("\u{21D4}")),
            ("Leftarrow", Mapping::character("\u{21D0}")),
            ("Rightarrow", Mapping::character("\u{21D2}")),
            ("leftrightarrow", Mapping::character("\u{2194}")),
            ("leftarrow", Mapping::character("\u{2190}")),
            ("gets", Mapping::character("\u{2190}")),
            ("rightarrow", Mapping::character("\u{2192}")),
            ("to", Mapping::character("\u{2192}")),
            ("mapsto", Mapping::character("\u{21A6}")),
            ("leftharpoonup", Mapping::character("\u{21BC}")),
            ("leftharpoondown", Mapping::character("\u{21BD}")),
            ("rightharpoonup", Mapping::character("\u{21C0}")),
            ("rightharpoondown", Mapping::character("\u{21C1}")),
            ("nearrow", Mapping::character("\u{2197}")),
            ("searrow", Mapping::character("\u{2198}")),
            ("nwarrow", Mapping::character("\u{2196}")),
            ("swarrow", Mapping::character("\u{2199}")),
            ("rightleftharpoons", Mapping::character("\u{21CC}")),
            ("hookrightarrow", Mapping::character("\u{21AA}")),
            ("hookleftarrow", Mapping::character("\u{21A9}")),
            ("longleftarrow", Mapping::character("\u{27F5}")),
            ("Longleftarrow", Mapping::character("\u{27F8}")),
            ("longrightarrow", Mapping::character("\u{27F6}")),
            ("Longrightarrow", Mapping::character("\u{27F9}")),
            ("Longleftrightarrow", Mapping::character("\u{27FA}")),
            ("longleftrightarrow", Mapping::character("\u{27F7}")),
            ("longmapsto", Mapping::character("\u{27FC}")),
            // Misc.
            ("ldots", Mapping::character("\u{2026}")),
            ("cdots", Mapping::character("\u{22EF}")),
            ("vdots", Mapping::character("\u{22EE}")),
            ("ddots", Mapping::character("\u{22F1}")),
            ("dotsc", Mapping::character("\u{2026}")),
            ("dotsb", Mapping::character("\u{22EF}")),
            ("dotsm", Mapping::character("\u{22EF}")),
            ("dotsi", Mapping::character("\u{22EF}")),
            ("dotso", Mapping::character("\u{2026}")),
            ("ldotp", punct(".")),
            ("cdotp", punct("\u{22C5}")),
            ("colon", punct(":")),
        ],
    )?
    .with_handler("mathchar0mo"))
}

pub fn mathchar7() -> Result<SymbolMap, ConfigError> {
    Ok(SymbolMap::new(
        "mathchar7",
        Kind::Character,
        [
            ("Gamma", Mapping::character("\u{0393}")),
            ("Delta", Mapping::character("\u{0394}")),
            ("Theta", Mapping::character("\u{0398}")),
            ("Lambda", Mapping::character("\u{039B}")),
            ("Xi", Mapping::character("\u{039E}")),
            ("Pi", Mapping::character("\u{03A0}")),
            ("Sigma", Mapping::character("\u{03A3}")),
            ("Upsilon", Mapping::character("\u{03A5}")),
            ("Phi", Mapping::character("\u{03A6}")),
            ("Psi", Mapping::character("\u{03A8}")),
            ("Omega", Mapping::character("\u{03A9}")),
            ("_", Mapping::character("_")),
            ("#", Mapping::character("#")),
            ("$", Mapping::character("$")),
            ("%", Mapping::character("%")),
            ("&", Mapping::character("&")),
            ("And", Mapping::character("&")),
        ],
    )?
    .with_handler("mathchar7"))
}

/// Delimiters, keyed by their source text.
pub fn delimiter() -> Result<SymbolMap, ConfigError> {
    Ok(SymbolMap::new(
        "delimiter",
        Kind::Delimiter,
        [
            ("(", Mapping::delimiter("(")),
            (")", Mapping::delimiter(")")),
            ("[", Mapping::delimiter("[")),
            ("]", Mapping::delimiter("]")),
            ("<", Mapping::delimiter("\u{27E8}")),
            (">", Mapping::delimiter("\u{27E9}")),
            (r"\lt", Mapping::delimiter("\u{27E8}")),
            (r"\gt", Mapping::delimiter("\u{27E9}")),
            ("/", Mapping::delimiter("/")),
            ("|", ord_delimiter("|")),
            (".", Mapping::delimiter("")),
            (r"\\", Mapping::delimiter("\\")),
            (r"\lmoustache", Mapping::delimiter("\u{23B0}")),
            (r"\rmoustache", Mapping::delimiter("\u{23B1}")),
            (r"\lgroup", Mapping::delimiter("\u{27EE}")),
            (r"\rgroup", Mapping::delimiter("\u{27EF}")),
            (r"\arrowvert", Mapping::delimiter("\u{23D0}")),
            (r"\Arrowvert", Mapping::delimiter("\u{2016}")),
            (r"\bracevert", Mapping::delimiter("\u{23AA}")),
            (r"\Vert", ord_delimiter("\u{2225}")),
            (r"\|", ord_delimiter("\u{2225}")),
            (r"\vert", ord_delimiter("|")),
            (r"\uparrow", Mapping::delimiter("\u{2191}")),
            (r"\downarrow", Mapping::delimiter("\u{2193}")),
            (r"\updownarrow", Mapping::delimiter("\u{2195}")),
            (r"\Uparrow", Mapping::delimiter("\u{21D1}")),
            (r"\Downarrow", Mapping::delimiter("\u{21D3}")),
            (r"\Updownarrow", Mapping::delimiter("\u{21D5}")),
            (r"\backslash", Mapping::delimiter("\\")),
            (r"\rangle", Mapping::delimiter("\u{27E9}")),
            (r"\langle", Mapping::delimiter("\u{27E8}")),
            (r"\rbrace", Mapping::delimiter("}")),
            (r"\lbrace", Mapping::delimiter("{")),
            (r"\}", Mapping::delimiter("}")),
            (r"\{", Mapping::delimiter("{")),
            (r"\rceil", Mapping::delimiter("\u{2309}")),
            (r"\lceil", Mapping::delimiter("\u{2308}")),
            (r"\rfloor", Mapping::delimiter("\u{230B}")),
            (r"\lfloor", Mapping::delimiter("\u{230A}")),
            (r"\lbrack", Mapping::delimiter("[")),
            (r"\rbrack", Mapping::delimiter("]")),
        ],
    )?
    .with_handler("delimiter"))
}

fn font_macro(template: &str) -> Result<Mapping, ConfigError> {
    Ok(Mapping::Macro(Macro::new(template, 1)?))
}

pub fn macros() -> Result<SymbolMap, ConfigError> {
    let style = |style: &str, display: bool, level: i64| {
        Mapping::command_with("SetStyle", vec![style.into(), display.into(), level.into()])
    };
    let font = |variant: &str| Mapping::command_with("SetFont", vec![variant.into()]);
    let size = |size: f64| Mapping::command_with("SetSize", vec![size.into()]);
    let named_fn = Mapping::command("NamedFn");
    let named_op = Mapping::command("NamedOp");
    let under_over = |glyph: &str, position: &str| {
        Mapping::command_with("UnderOver", vec![glyph.into(), position.into()])
    };
    let spacer = |width: &str| Mapping::command_with("Spacer", vec![width.into()]);
    let big = |class: &str, size: &str| Mapping::command_with("MakeBig", vec![class.into(), size.into()]);
    let atom = |class: &str| Mapping::command_with("TeXAtom", vec![class.into()]);
    let accent = |glyph: &str, wide: bool| Mapping::command_with("Accent", vec![glyph.into(), wide.into()]);
    let phantom = |vertical: bool, horizontal: bool| {
        Mapping::command_with("Phantom", vec![vertical.into(), horizontal.into()])
    };
    let over = |open: &str, close: &str| Mapping::command_with("Over", vec![open.into(), close.into()]);
    let plain_array = |name: &str, open: Option<&str>, close: Option<&str>, align: &str| {
        Mapping::command_with(
            "PlainArray",
            vec![name.into(), open.into(), close.into(), align.into()],
        )
    };
    SymbolMap::new(
        "macros",
        Kind::Command,
        [
            ("displaystyle", style("D", true, 0)),
            ("textstyle", style("T", false, 0)),
            ("scriptstyle", style("S", false, 1)),
            ("scriptscriptstyle", style("SS", false, 2)),
            ("rm", font("normal")),
            ("mit", font("italic")),
            ("oldstyle", font("-tex-oldstyle")),
            ("cal", font("-tex-calligraphic")),
            ("it", font("-tex-mathit")),
            ("bf", font("bold")),
            ("bbFont", font("double-struck")),
            ("scr", font("script")),
            ("frak", font("fraktur")),
            ("sf", font("sans-serif")),
            ("tt", font("monospace")),
            ("tiny", size(0.5)),
            ("Tiny", size(0.6)),
            ("scriptsize", size(0.7)),
            ("small", size(0.85)),
            ("normalsize", size(1.0)),
            ("large", size(1.2)),
            ("Large", size(1.44)),
            ("LARGE", size(1.73)),
            ("huge", size(2.07)),
            ("Huge", size(2.49)),
            ("arcsin", named_fn.clone()),
            ("arccos", named_fn.clone()),
            ("arctan", named_fn.clone()),
            ("arg", named_fn.clone()),
            ("cos", named_fn.clone()),
            ("cosh", named_fn.clone()),
            ("cot", named_fn.clone()),
            ("coth", named_fn.clone()),
            ("csc", named_fn.clone()),
            ("deg", named_fn.clone()),
            ("det", named_op.clone()),
            ("dim", named_fn.clone()),
            ("exp", named_fn.clone()),
            ("gcd", named_op.clone()),
            ("hom", named_fn.clone()),
            ("inf", named_op.clone()),
            ("ker", named_fn.clone()),
            ("lg", named_fn.clone()),
            ("lim", named_op.clone()),
            ("liminf", Mapping::command_with("NamedOp", vec!["lim&thinsp;inf".into()])),
            ("limsup", Mapping::command_with("NamedOp", vec!["lim&thinsp;sup".into()])),
            ("ln", named_fn.clone()),
            ("log", named_fn.clone()),
            ("max", named_op.clone()),
            ("min", named_op.clone()),
            ("Pr", named_op.clone()),
            ("sec", named_fn.clone()),
            ("sin", named_fn.clone()),
            ("sinh", named_fn.clone()),
            ("sup", named_op),
            ("tan", named_fn.clone()),
            ("tanh", named_fn),
            ("limits", Mapping::command_with("Limits", vec![true.into()])),
            ("nolimits", Mapping::command_with("Limits", vec![false.into()])),
            ("overline", under_over("\u{00AF}", "over")),
            ("underline", under_over("_", "under")),
            ("overbrace", under_over("\u{23DE}", "over")),
            ("underbrace", under_over("\u{23DF}", "under")),
            ("overparen", under_over("\u{23DC}", "over")),
            ("underparen", under_over("\u{23DD}", "under")),
            ("overrightarrow", under_over("\u{2192}", "over")),
            ("underrightarrow", under_over("\u{2192}", "under")),
            ("overleftarrow", under_over("\u{2190}", "over")),
            ("underleftarrow", under_over("\u{2190}", "under")),
            ("overleftrightarrow", under_over("\u{2194}", "over")),
            ("underleftrightarrow", under_over("\u{2194}", "under")),
            ("overset", Mapping::command("Overset")),
            ("underset", Mapping::command("Underset")),
            (
                "stackrel",
                Mapping::Macro(Macro::new(r"\mathrel{\mathop{#2}\limits^{#1}}", 2)?),
            ),
            ("over", Mapping::command("Over")),
            ("overwithdelims", Mapping::command("Over")),
            ("atop", Mapping::command("Over")),
            ("atopwithdelims", Mapping::command("Over")),
            ("above", Mapping::command("Over")),
            ("abovewithdelims", Mapping::command("Over")),
            ("brace", over(r"\{", r"\}")),
            ("brack", over("[", "]")),
            ("choose", over("(", ")")),
            ("buildrel", Mapping::command("BuildRel")),
            ("frac", Mapping::command("Frac")),
            ("sqrt", Mapping::command("Sqrt")),
            ("root", Mapping::command("Root")),
            ("uproot", Mapping::command("MoveRoot")),
            ("leftroot", Mapping::command("MoveRoot")),
            ("mathchoice", Mapping::command("MathChoice")),
            ("left", Mapping::command_with("LeftRight", vec!["left".into()])),
            ("right", Mapping::command_with("LeftRight", vec!["right".into()])),
            ("middle", Mapping::command("Middle")),
            (",", spacer("0.1667em")),
            (":", spacer("0.2222em")),
            (">", spacer("0.2222em")),
            (";", spacer("0.2778em")),
            ("!", spacer("-0.1667em")),
            ("enspace", spacer("0.5em")),
            ("quad", spacer("1em")),
            ("qquad", spacer("2em")),
            ("thinspace", spacer("0.1667em")),
            ("negthinspace", spacer("-0.1667em")),
            ("hskip", Mapping::command("Hskip")),
            ("hspace", Mapping::command("Hskip")),
            ("kern", Mapping::command("Hskip")),
            ("mskip", Mapping::command("Hskip")),
            ("mspace", Mapping::command("Hskip")),
            ("mkern", Mapping::command("Hskip")),
            ("hfill", Mapping::command("HFill")),
            ("hfil", Mapping::command("HFill")),
            ("hfilll", Mapping::command("HFill")),
            ("big", big("ORD", "1.2em")),
            ("Big", big("ORD", "1.623em")),
            ("bigg", big("ORD", "2.047em")),
            ("Bigg", big("ORD", "2.470em")),
            ("bigl", big("OPEN", "1.2em")),
            ("Bigl", big("OPEN", "1.623em")),
            ("biggl", big("OPEN", "2.047em")),
            ("Biggl", big("OPEN", "2.470em")),
            ("bigr", big("CLOSE", "1.2em")),
            ("Bigr", big("CLOSE", "1.623em")),
            ("biggr", big("CLOSE", "2.047em")),
            ("Biggr", big("CLOSE", "2.470em")),
            ("bigm", big("REL", "1.2em")),
            ("Bigm", big("REL", "1.623em")),
            ("biggm", big("REL", "2.047em")),
            ("Biggm", big("REL", "2.470em")),
            ("mathord", atom("ORD")),
            ("mathop", atom("OP")),
            ("mathopen", atom("OPEN")),
            ("mathclose", atom("CLOSE")),
            ("mathbin", atom("BIN")),
            ("mathrel", atom("REL")),
            ("mathpunct", atom("PUNCT")),
            ("mathinner", atom("INNER")),
            ("vcenter", atom("VCENTER")),
            ("hbox", Mapping::command("HBox")),
            ("text", Mapping::command("HBox")),
            ("mbox", Mapping::command("HBox")),
            ("fbox", Mapping::command("FBox")),
            ("mathstrut", Mapping::Macro(Macro::new(r"\vphantom{(}", 0)?)),
            ("strut", Mapping::command("Strut")),
            ("Rule", Mapping::command("Rule")),
            ("Space", Mapping::command("Rule")),
            ("raise", Mapping::command("RaiseLower")),
            ("lower", Mapping::command("RaiseLower")),
            ("moveleft", Mapping::command("MoveLeftRight")),
            ("moveright", Mapping::command("MoveLeftRight")),
            (
                "llap",
                Mapping::command_with(
                    "Wrap",
                    vec!["mpadded".into(), "width".into(), "0".into(), "lspace".into(), "-1width".into()],
                ),
            ),
            (
                "rlap",
                Mapping::command_with("Wrap", vec!["mpadded".into(), "width".into(), "0".into()]),
            ),
            ("mmlToken", Mapping::command("MmlToken")),
            ("phantom", phantom(true, true)),
            ("vphantom", phantom(true, false)),
            ("hphantom", phantom(false, true)),
            (
                "smash",
                Mapping::command_with(
                    "Wrap",
                    vec!["mpadded".into(), "height".into(), "0".into(), "depth".into(), "0".into()],
                ),
            ),
            ("acute", accent("\u{00B4}", false)),
            ("grave", accent("`", false)),
            ("ddot", accent("\u{00A8}", false)),
            ("tilde", accent("~", false)),
            ("bar", accent("\u{00AF}", false)),
            ("breve", accent("\u{02D8}", false)),
            ("check", accent("\u{02C7}", false)),
            ("hat", accent("^", false)),
            ("vec", accent("\u{2192}", false)),
            ("dot", accent("\u{02D9}", false)),
            ("widetilde", accent("~", true)),
            ("widehat", accent("^", true)),
            ("cr", Mapping::command("Cr")),
            ("\\", Mapping::command("Cr")),
            ("newline", Mapping::command("Cr")),
            ("hline", Mapping::command_with("HLine", vec!["solid".into()])),
            ("hdashline", Mapping::command_with("HLine", vec!["dashed".into()])),
            ("matrix", plain_array("matrix", None, None, "c")),
            ("pmatrix", plain_array("pmatrix", Some("("), Some(")"), "c")),
            ("cases", plain_array("cases", Some(r"\{"), Some("."), "ll")),
            ("eqalign", plain_array("eqalign", None, None, "rl")),
            ("displaylines", plain_array("displaylines", None, None, "c")),
            (
                "bmod",
                Mapping::Macro(Macro::new(
                    r#"\mmlToken{mo}[lspace="thickmathspace" rspace="thickmathspace"]{mod}"#,
                    0,
                )?),
            ),
            (
                "pmod",
                Mapping::Macro(Macro::new(r"\pod{\mmlToken{mi}{mod}\kern 6mu #1}", 1)?),
            ),
            (
                "mod",
                Mapping::Macro(Macro::new(
                    r"\mathchoice{\kern18mu}{\kern12mu}{\kern12mu}{\kern12mu}\mmlToken{mi}{mod}\,\,#1",
                    1,
                )?),
            ),
            (
                "pod",
                Mapping::Macro(Macro::new(
                    r"\mathchoice{\kern18mu}{\kern8mu}{\kern8mu}{\kern8mu}(#1)",
                    1,
                )?),
            ),
            ("iff", Mapping::Macro(Macro::new(r"\;\Longleftrightarrow\;", 0)?)),
            (
                "skew",
                Mapping::Macro(Macro::new(r"{{#2{#3\mkern#1mu}\mkern-#1mu}{}}", 3)?),
            ),
            ("pmb", Mapping::Macro(Macro::new(r"\rlap{#1}\kern1px{#1}", 1)?)),
            (
                "TeX",
                Mapping::Macro(Macro::new(r"T\kern-.14em\lower.5ex{E}\kern-.115em X", 0)?),
            ),
            (
                "LaTeX",
                Mapping::Macro(Macro::new(
                    r"L\kern-.325em\raise.21em{\scriptstyle{A}}\kern-.17em\TeX",
                    0,
                )?),
            ),
            ("mathcal", font_macro(r"{\cal #1}")?),
            ("mathscr", font_macro(r"{\scr #1}")?),
            ("mathrm", font_macro(r"{\rm #1}")?),
            ("mathbf", font_macro(r"{\bf #1}")?),
            ("mathbb", font_macro(r"{\bbFont #1}")?),
            ("Bbb", font_macro(r"{\bbFont #1}")?),
            ("mathit", font_macro(r"{\it #1}")?),
            ("mathfrak", font_macro(r"{\frak #1}")?),
            ("mathsf", font_macro(r"{\sf #1}")?),
            ("mathtt", font_macro(r"{\tt #1}")?),
            ("textrm", font_macro(r"\mathord{\rm\text{#1}}")?),
            ("textit", font_macro(r"\mathord{\it\text{#1}}")?),
            ("textbf", font_macro(r"\mathord{\bf\text{#1}}")?),
            ("textsf", font_macro(r"\mathord{\sf\text{#1}}")?),
            ("texttt", font_macro(r"\mathord{\tt\text{#1}}")?),
            (" ", Mapping::Macro(Macro::new(r"\text{ }", 0)?)),
            ("not", Mapping::command("Not")),
            ("dots", Mapping::command("Dots")),
            ("space", Mapping::command("Tilde")),
            ("\u{00A0}", Mapping::command("Tilde")),
            ("begin", Mapping::command_with("BeginEnd", vec![true.into()])),
            ("end", Mapping::command_with("BeginEnd", vec![false.into()])),
        ],
    )
}

pub fn environment() -> Result<SymbolMap, ConfigError> {
    let array = |open: Option<&str>, close: Option<&str>, align: &str| {
        Mapping::environment("Array", vec![open.into(), close.into(), align.into()])
    };
    SymbolMap::new(
        "environment",
        Kind::Environment,
        [
            ("array", Mapping::environment("AlignedArray", vec![])),
            ("matrix", array(None, None, "c")),
            ("pmatrix", array(Some("("), Some(")"), "c")),
            ("bmatrix", array(Some("["), Some("]"), "c")),
            ("Bmatrix", array(Some(r"\{"), Some(r"\}"), "c")),
            ("vmatrix", array(Some(r"\vert"), Some(r"\vert"), "c")),
            ("Vmatrix", array(Some(r"\Vert"), Some(r"\Vert"), "c")),
            ("cases", array(Some(r"\{"), Some("."), "ll")),
        ],
    )
}

/// Negated forms of relations, used by `\not`.
pub fn not_remap() -> Result<SymbolMap, ConfigError> {
    SymbolMap::new(
        "not_remap",
        Kind::Character,
        [
            ("\u{2190}", Mapping::character("\u{219A}")),
            ("\u{2192}", Mapping::character("\u{219B}")),
            ("\u{2194}", Mapping::character("\u{21AE}")),
            ("\u{21D0}", Mapping::character("\u{21CD}")),
            ("\u{21D2}", Mapping::character("\u{21CF}")),
            ("\u{21D4}", Mapping::character("\u{21CE}")),
            ("\u{2208}", Mapping::character("\u{2209}")),
            ("\u{220B}", Mapping::character("\u{220C}")),
            ("\u{2223}", Mapping::character("\u{2224}")),
            ("\u{2225}", Mapping::character("\u{2226}")),
            ("\u{223C}", Mapping::character("\u{2241}")),
            ("~", Mapping::character("\u{2241}")),
            ("\u{2243}", Mapping::character("\u{2244}")),
            ("\u{2245}", Mapping::character("\u{2247}")),
            ("\u{2248}", Mapping::character("\u{2249}")),
            ("\u{224D}", Mapping::character("\u{226D}")),
            ("=", Mapping::character("\u{2260}")),
            ("\u{2261}", Mapping::character("\u{2262}")),
            ("<", Mapping::character("\u{226E}")),
            (">", Mapping::character("\u{226F}")),
            ("\u{2264}", Mapping::character("\u{2270}")),
            ("\u{2265}", Mapping::character("\u{2271}")),
            ("\u{2272}", Mapping::character("\u{2274}")),
            ("\u{2273}", Mapping::character("\u{2275}")),
            ("\u{2276}", Mapping::character("\u{2278}")),
            ("\u{2277}", Mapping::character("\u{2279}")),
            ("\u{227A}", Mapping::character("\u{2280}")),
            ("\u{227B}", Mapping::character("\u{2281}")),
            ("\u{2282}", Mapping::character("\u{2284}")),
            ("\u{2283}", Mapping::character("\u{2285}")),
            ("\u{2286}", Mapping::character("\u{2288}")),
            ("\u{2287}", Mapping::character("\u{2289}")),
            ("\u{22A2}", Mapping::character("\u{22AC}")),
            ("\u{22A8}", Mapping::character("\u{22AD}")),
            ("\u{22A9}", Mapping::character("\u{22AE}")),
            ("\u{22AB}", Mapping::character("\u{22AF}")),
            ("\u{227C}", Mapping::character("\u{22E0}")),
            ("\u{227D}", Mapping::character("\u{22E1}")),
            ("\u{2291}", Mapping::character("\u{22E2}")),
            ("\u{2292}", Mapping::character("\u{22E3}")),
            ("\u{22B2}", Mapping::character("\u{22EA}")),
            ("\u{22B3}", Mapping::character("\u{22EB}")),
            ("\u{22B4}", Mapping::character("\u{22EC}")),
            ("\u{22B5}", Mapping::character("\u{22ED}")),
            ("\u{2203}", Mapping::character("\u{2204}")),
        ],
    )
}
