//! The base package: the commands every formula can use.
//!
//! This package defines letters, numbers and the special characters,
//!     the greek letters and the common math symbols,
//!     fractions, roots, scripts, fonts and spacing,
//!     `\left ... \right`,
//!     and the matrix environments.
//!
//! Every other package is loaded on top of this one.

use texmath::handler::Handler;
use texmath::prelude::*;

pub mod boxes;
pub mod characters;
pub mod environment;
pub mod layout;
pub mod mappings;
pub mod scripts;
pub mod spacing;
pub mod style;

/// Name of the package.
pub const NAME: &str = "base";

/// Returns the base package.
pub fn package() -> Result<Package, ConfigError> {
    let maps = vec![
        SymbolMap::new_pattern("letter", "(?i)[a-z]", "variable")?,
        SymbolMap::new_pattern("digit", "[0-9.]", "digit")?,
        mappings::special()?,
        mappings::remap()?,
        mappings::mathchar0mi()?,
        mappings::mathchar0mo()?,
        mappings::mathchar7()?,
        mappings::delimiter()?,
        mappings::macros()?,
        mappings::environment()?,
        mappings::not_remap()?,
    ];
    Ok(Package::new(
        maps,
        Configuration::new(NAME)
            .with(Category::Character, ["special", "letter", "digit"])
            .with(Category::Delimiter, ["delimiter"])
            .with(
                Category::Macro,
                ["macros", "mathchar0mi", "mathchar0mo", "mathchar7", "delimiter"],
            )
            .with(Category::Environment, ["environment"])
            .with_fallback(Category::Character, "Other"),
    ))
}

/// Returns the handlers the base package refers to.
pub fn handlers() -> Vec<(&'static str, Handler)> {
    vec![
        (
            "variable",
            Handler::new(characters::variable).with_doc("A letter, as an identifier"),
        ),
        (
            "digit",
            Handler::new(characters::digit).with_doc("A number, read greedily"),
        ),
        (
            "mathchar0mi",
            Handler::new(characters::mathchar0mi).with_doc("A symbol, as an identifier"),
        ),
        (
            "mathchar0mo",
            Handler::new(characters::mathchar0mo).with_doc("A symbol, as an operator"),
        ),
        (
            "mathchar7",
            Handler::new(characters::mathchar7)
                .with_doc("A symbol, as an identifier that is upright unless a font is active"),
        ),
        (
            "delimiter",
            Handler::new(characters::delimiter).with_doc("A delimiter used outside of a fence"),
        ),
        (
            "Other",
            Handler::new(characters::other).with_doc("Any other character, as an operator"),
        ),
        (
            "Open",
            Handler::new(characters::open).with_doc("Open a group"),
        ),
        (
            "Close",
            Handler::new(characters::close).with_doc("Close a group"),
        ),
        (
            "Tilde",
            Handler::new(characters::tilde).with_doc("A non-breaking space"),
        ),
        (
            "Space",
            Handler::new(characters::space).with_doc("Whitespace, which is ignored"),
        ),
        (
            "Hash",
            Handler::new(characters::hash).with_doc("The macro parameter character, an error"),
        ),
        (
            "Prime",
            Handler::new(characters::prime).with_doc("One or more primes, as a superscript"),
        ),
        (
            "Entry",
            Handler::new(characters::entry).with_doc("End a cell of an environment"),
        ),
        (
            "Not",
            Handler::new(characters::not).with_doc("Negate the next symbol"),
        ),
        (
            "Dots",
            Handler::new(characters::dots).with_doc("Dots, centered before an operator"),
        ),
        (
            "Superscript",
            Handler::new(scripts::superscript).with_doc("Attach a superscript"),
        ),
        (
            "Subscript",
            Handler::new(scripts::subscript).with_doc("Attach a subscript"),
        ),
        (
            "Limits",
            Handler::new(scripts::limits).with_doc("Change how scripts attach to an operator"),
        ),
        (
            "SetStyle",
            Handler::new(style::set_style).with_doc("Set the math style for the rest of the group"),
        ),
        (
            "SetFont",
            Handler::new(style::set_font).with_doc("Set the font for the rest of the group"),
        ),
        (
            "SetSize",
            Handler::new(style::set_size).with_doc("Set the size for the rest of the group"),
        ),
        (
            "NamedFn",
            Handler::new(style::named_fn).with_doc("A function name like sin"),
        ),
        (
            "NamedOp",
            Handler::new(style::named_op).with_doc("An operator name like lim"),
        ),
        ("Frac", Handler::new(layout::frac).with_doc("A fraction")),
        (
            "Over",
            Handler::new(layout::over).with_doc("A fraction of everything before and after, in the group"),
        ),
        (
            "Root",
            Handler::new(layout::root).with_doc(r"A root with its index before \of"),
        ),
        (
            "MoveRoot",
            Handler::new(layout::move_root).with_doc("Move the index of a root"),
        ),
        (
            "BuildRel",
            Handler::new(layout::build_rel).with_doc("A relation with an expression over it"),
        ),
        (
            "MathChoice",
            Handler::new(layout::mathchoice).with_doc("An expression for each of the four styles"),
        ),
        (
            "Sqrt",
            Handler::new(layout::sqrt).with_doc("A square root, or a root with an index"),
        ),
        (
            "UnderOver",
            Handler::new(layout::under_over).with_doc("A line, brace or arrow over or under"),
        ),
        (
            "Overset",
            Handler::new(layout::overset).with_doc("An expression over another"),
        ),
        (
            "Underset",
            Handler::new(layout::underset).with_doc("An expression under another"),
        ),
        (
            "Accent",
            Handler::new(layout::accent).with_doc("An accent over an expression"),
        ),
        (
            "TeXAtom",
            Handler::new(layout::tex_atom).with_doc("An expression with a math class"),
        ),
        (
            "MakeBig",
            Handler::new(layout::make_big).with_doc("A delimiter at a fixed size"),
        ),
        (
            "LeftRight",
            Handler::new(layout::left_right).with_doc("Open or close a fenced group"),
        ),
        (
            "Middle",
            Handler::new(layout::middle).with_doc("A delimiter inside a fenced group"),
        ),
        (
            "Spacer",
            Handler::new(spacing::spacer).with_doc("A fixed width space"),
        ),
        (
            "Hskip",
            Handler::new(spacing::hskip).with_doc("A space with an explicit width"),
        ),
        (
            "HFill",
            Handler::new(spacing::hfill).with_doc("A space that fills its cell"),
        ),
        ("HBox", Handler::new(boxes::hbox).with_doc("Text")),
        ("FBox", Handler::new(boxes::fbox).with_doc("Text in a frame")),
        (
            "Wrap",
            Handler::new(boxes::wrap).with_doc("Wrap an expression in a node"),
        ),
        (
            "Phantom",
            Handler::new(boxes::phantom).with_doc("An invisible expression that takes up space"),
        ),
        (
            "RaiseLower",
            Handler::new(boxes::raise_lower).with_doc("Shift an expression up or down"),
        ),
        (
            "MoveLeftRight",
            Handler::new(boxes::move_left_right).with_doc("Shift an expression left or right"),
        ),
        ("Strut", Handler::new(boxes::strut).with_doc("An empty box as tall as a line")),
        (
            "Rule",
            Handler::new(boxes::rule).with_doc("A box with an explicit width, height and depth"),
        ),
        (
            "MmlToken",
            Handler::new(boxes::mml_token).with_doc("A character node with explicit attributes"),
        ),
        (
            "BeginEnd",
            Handler::new(environment::begin_end).with_doc(r"\begin or \end an environment"),
        ),
        (
            "Array",
            Handler::new(environment::array).with_doc("A matrix-like environment"),
        ),
        (
            "AlignedArray",
            Handler::new(environment::aligned_array)
                .with_doc("An array with an explicit column alignment"),
        ),
        (
            "PlainArray",
            Handler::new(environment::plain_array).with_doc("A matrix-like array with its body as an argument"),
        ),
        ("Cr", Handler::new(environment::cr).with_doc("End a row")),
        (
            "HLine",
            Handler::new(environment::hline).with_doc("A solid or dashed line in an environment"),
        ),
    ]
}
