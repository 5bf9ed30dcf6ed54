//! Color models: converting a color specification to a CSS color.

/// An invalid color model or specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Color model '{0}' not defined")]
    UnknownModel(String),
    #[error("Color values for the {model} model require {expected} numbers")]
    ComponentCount { model: String, expected: usize },
    #[error("Color values for the {model} model must be between {min} and {max}")]
    OutOfRange {
        model: String,
        min: &'static str,
        max: &'static str,
    },
    #[error("HTML colors must be 6 hexadecimal digits, got '{0}'")]
    InvalidHtml(String),
}

/// The named colors of the dvips driver.
///
/// Names not in this list are passed through as CSS color names.
const NAMED_COLORS: [(&str, &str); 68] = [
    ("Apricot", "#FBB982"),
    ("Aquamarine", "#00B5BE"),
    ("Bittersweet", "#C04F17"),
    ("Black", "#221E1F"),
    ("Blue", "#2D2F92"),
    ("BlueGreen", "#00B3B8"),
    ("BlueViolet", "#473992"),
    ("BrickRed", "#B6321C"),
    ("Brown", "#792500"),
    ("BurntOrange", "#F7921D"),
    ("CadetBlue", "#74729A"),
    ("CarnationPink", "#F282B4"),
    ("Cerulean", "#00A2E3"),
    ("CornflowerBlue", "#41B0E4"),
    ("Cyan", "#00AEEF"),
    ("Dandelion", "#FDBC42"),
    ("DarkOrchid", "#A4538A"),
    ("Emerald", "#00A99D"),
    ("ForestGreen", "#009B55"),
    ("Fuchsia", "#8C368C"),
    ("Goldenrod", "#FFDF42"),
    ("Gray", "#949698"),
    ("Green", "#00A64F"),
    ("GreenYellow", "#DFE674"),
    ("JungleGreen", "#00A99A"),
    ("Lavender", "#F49EC4"),
    ("LimeGreen", "#8DC73E"),
    ("Magenta", "#EC008C"),
    ("Mahogany", "#A9341F"),
    ("Maroon", "#AF3235"),
    ("Melon", "#F89E7B"),
    ("MidnightBlue", "#006795"),
    ("Mulberry", "#A93C93"),
    ("NavyBlue", "#006EB8"),
    ("OliveGreen", "#3C8031"),
    ("Orange", "#F58137"),
    ("OrangeRed", "#ED135A"),
    ("Orchid", "#AF72B0"),
    ("Peach", "#F7965A"),
    ("Periwinkle", "#7977B8"),
    ("PineGreen", "#008B72"),
    ("Plum", "#92268F"),
    ("ProcessBlue", "#00B0F0"),
    ("Purple", "#99479B"),
    ("RawSienna", "#974006"),
    ("Red", "#ED1B23"),
    ("RedOrange", "#F26035"),
    ("RedViolet", "#A1246B"),
    ("Rhodamine", "#EF559F"),
    ("RoyalBlue", "#0071BC"),
    ("RoyalPurple", "#613F99"),
    ("RubineRed", "#ED017D"),
    ("Salmon", "#F69289"),
    ("SeaGreen", "#3FBC9D"),
    ("Sepia", "#671800"),
    ("SkyBlue", "#46C5DD"),
    ("SpringGreen", "#C6DC67"),
    ("Tan", "#DA9D76"),
    ("TealBlue", "#00AEB3"),
    ("Thistle", "#D883B7"),
    ("Turquoise", "#00B4CE"),
    ("Violet", "#58429B"),
    ("VioletRed", "#EF58A0"),
    ("White", "#FFFFFF"),
    ("WildStrawberry", "#EE2967"),
    ("Yellow", "#FFF200"),
    ("YellowGreen", "#98CC70"),
    ("YellowOrange", "#FAA21A"),
];

/// Converts a color in the provided model to a CSS color.
///
/// The supported models are `named`, `rgb` (three numbers between 0 and 1),
///     `RGB` (three integers between 0 and 255), `gray` (one number between 0 and 1)
///     and `HTML` (six hexadecimal digits).
pub fn to_css(model: &str, spec: &str) -> Result<String, ColorError> {
    let spec = spec.trim();
    match model.trim() {
        "named" => Ok(named(spec)),
        "rgb" => {
            let [r, g, b] = components::<3>("rgb", spec)?;
            let convert = |v: &str| unit_interval("rgb", v);
            Ok(hex([convert(r)?, convert(g)?, convert(b)?]))
        }
        "RGB" => {
            let [r, g, b] = components::<3>("RGB", spec)?;
            let convert = |v: &str| -> Result<u8, ColorError> {
                v.parse::<u8>().map_err(|_| ColorError::OutOfRange {
                    model: "RGB".into(),
                    min: "0",
                    max: "255",
                })
            };
            Ok(hex([convert(r)?, convert(g)?, convert(b)?]))
        }
        "gray" => {
            let [v] = components::<1>("gray", spec)?;
            let v = unit_interval("gray", v)?;
            Ok(hex([v, v, v]))
        }
        "HTML" => {
            if spec.len() != 6 || !spec.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ColorError::InvalidHtml(spec.into()));
            }
            Ok(format!["#{}", spec.to_ascii_uppercase()])
        }
        other => Err(ColorError::UnknownModel(other.into())),
    }
}

fn named(name: &str) -> String {
    match NAMED_COLORS.iter().find(|(n, _)| *n == name) {
        Some((_, css)) => css.to_string(),
        None => name.to_string(),
    }
}

fn components<'a, const N: usize>(model: &str, spec: &'a str) -> Result<[&'a str; N], ColorError> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    parts.try_into().map_err(|_| ColorError::ComponentCount {
        model: model.into(),
        expected: N,
    })
}

fn unit_interval(model: &str, value: &str) -> Result<u8, ColorError> {
    let out_of_range = || ColorError::OutOfRange {
        model: model.into(),
        min: "0",
        max: "1",
    };
    let value: f64 = value.parse().map_err(|_| out_of_range())?;
    if !(0.0..=1.0).contains(&value) {
        return Err(out_of_range());
    }
    Ok((value * 255.0).round() as u8)
}

fn hex(rgb: [u8; 3]) -> String {
    format!["#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2]]
}
