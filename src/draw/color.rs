//! RGBA color type and CSS-style color parsing.

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use sapin::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let translucent: Color = "rgba(0, 0, 255, 0.5)".parse().unwrap();
/// assert_eq!(translucent.a, 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    /// Returns this color with its alpha multiplied by `opacity` (clamped to 0.0-1.0).
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parses a CSS color string.
    ///
    /// Accepted forms: any CSS named color (`"limegreen"`, `"navajowhite"`),
    /// hex notation (`"#0f0"`, `"#0f08"`, `"#034017"`, `"#03401780"`), and the
    /// `rgb()`, `rgba()`, `hsl()` and `hsla()` functions in both the comma
    /// (`rgb(255, 0, 0)`) and space (`rgb(255 0 0 / 50%)`) syntax.
    /// Out-of-range channels are clamped as browsers do.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let spec = input.trim().to_ascii_lowercase();
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(input.to_string()));
        }
        if let Some((name, rest)) = spec.split_once('(') {
            let color = rest
                .strip_suffix(')')
                .and_then(|args| match name.trim_end() {
                    "rgb" | "rgba" => parse_rgb_function(args),
                    "hsl" | "hsla" => parse_hsl_function(args),
                    _ => None,
                });
            return color.ok_or_else(|| ColorError::InvalidFunction(input.to_string()));
        }
        name_to_color(&spec).ok_or_else(|| ColorError::UnknownName(input.to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

/// Errors produced while parsing a color string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Unknown color name '{0}'")]
    UnknownName(String),

    #[error("Invalid hex color '{0}'")]
    InvalidHex(String),

    #[error("Invalid color function '{0}'")]
    InvalidFunction(String),
}

/// Predefined black color (R=0.0, G=0.0, B=0.0)
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined white color (R=1.0, G=1.0, B=1.0)
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Fully transparent color
pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

// CSS Color Module Level 4 named colors, sorted for binary search.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

/// Maps a CSS color name to a [`Color`].
///
/// Matching is case-insensitive. `"transparent"` maps to [`TRANSPARENT`].
pub fn name_to_color(name: &str) -> Option<Color> {
    let name = name.to_ascii_lowercase();
    if name == "transparent" {
        return Some(TRANSPARENT);
    }
    NAMED_COLORS
        .binary_search_by(|(candidate, _)| candidate.cmp(&name.as_str()))
        .ok()
        .map(|index| {
            let [r, g, b] = NAMED_COLORS[index].1;
            Color::from_rgb8(r, g, b)
        })
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Color::from_rgb8(r, g, b).with_opacity(f64::from(a) / 255.0))
}

/// Splits function arguments into three components and an optional alpha.
///
/// Handles the legacy comma form `a, b, c[, alpha]` and the modern space form
/// `a b c[ / alpha]`.
fn split_components(args: &str) -> Option<([&str; 3], Option<&str>)> {
    let (parts, alpha): (Vec<&str>, Option<&str>) = if args.contains(',') {
        let mut parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let alpha = if parts.len() == 4 { parts.pop() } else { None };
        (parts, alpha)
    } else {
        let (components, alpha) = match args.split_once('/') {
            Some((components, alpha)) => (components, Some(alpha.trim())),
            None => (args, None),
        };
        (components.split_whitespace().collect(), alpha)
    };

    match (parts.as_slice(), alpha) {
        (_, Some("")) => None,
        ([a, b, c], alpha) if !a.is_empty() && !b.is_empty() && !c.is_empty() => {
            Some(([*a, *b, *c], alpha))
        }
        _ => None,
    }
}

fn number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn percentage(token: &str) -> Option<f64> {
    token.strip_suffix('%').and_then(number).map(|value| value / 100.0)
}

/// Alpha as a number or a percentage, clamped to 0.0-1.0.
fn alpha_component(token: Option<&str>) -> Option<f64> {
    match token {
        None => Some(1.0),
        Some(token) => percentage(token)
            .or_else(|| number(token))
            .map(|alpha| alpha.clamp(0.0, 1.0)),
    }
}

fn parse_rgb_function(args: &str) -> Option<Color> {
    let (channels, alpha) = split_components(args)?;
    // 0-255 or a percentage, returned as 0.0-1.0
    let channel = |token: &str| {
        percentage(token)
            .or_else(|| number(token).map(|value| value / 255.0))
            .map(|value| value.clamp(0.0, 1.0))
    };
    Some(Color::new(
        channel(channels[0])?,
        channel(channels[1])?,
        channel(channels[2])?,
        alpha_component(alpha)?,
    ))
}

fn hue_degrees(token: &str) -> Option<f64> {
    if let Some(value) = token.strip_suffix("deg") {
        number(value)
    } else if let Some(value) = token.strip_suffix("grad") {
        number(value).map(|grad| grad * 0.9)
    } else if let Some(value) = token.strip_suffix("rad") {
        number(value).map(f64::to_degrees)
    } else if let Some(value) = token.strip_suffix("turn") {
        number(value).map(|turn| turn * 360.0)
    } else {
        number(token)
    }
}

fn parse_hsl_function(args: &str) -> Option<Color> {
    let ([hue, saturation, lightness], alpha) = split_components(args)?;
    // Percentages, or bare numbers on the same 0-100 scale
    let fraction = |token: &str| {
        percentage(token)
            .or_else(|| number(token).map(|value| value / 100.0))
            .map(|value| value.clamp(0.0, 1.0))
    };
    let (r, g, b) = hsl_to_rgb(hue_degrees(hue)?, fraction(saturation)?, fraction(lightness)?);
    Some(Color::new(r, g, b, alpha_component(alpha)?))
}

/// Converts hue (degrees), saturation and lightness (0.0-1.0) to RGB.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0);
    let chroma = saturation * lightness.min(1.0 - lightness);
    let channel = |n: f64| {
        let k = (n + hue / 30.0) % 12.0;
        lightness - chroma * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };
    (channel(0.0), channel(8.0), channel(4.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Color, expected: (f64, f64, f64, f64)) {
        let (r, g, b, a) = expected;
        for (got, want) in [(actual.r, r), (actual.g, g), (actual.b, b), (actual.a, a)] {
            assert!((got - want).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn named_colors_follow_css_values() {
        assert_eq!(Color::parse("green").unwrap(), Color::from_rgb8(0, 128, 0));
        assert_eq!(Color::parse("LimeGreen").unwrap(), Color::from_rgb8(50, 205, 50));
        assert_eq!(Color::parse("transparent").unwrap(), TRANSPARENT);
        assert_eq!(Color::parse("  white ").unwrap(), WHITE);
    }

    #[test]
    fn every_css_keyword_is_known() {
        assert_eq!(NAMED_COLORS.len(), 148);
        assert_eq!(Color::parse("darkgreen").unwrap(), Color::from_rgb8(0, 100, 0));
        assert_eq!(Color::parse("navajowhite").unwrap(), Color::from_rgb8(255, 222, 173));
        assert_eq!(Color::parse("RebeccaPurple").unwrap(), Color::from_rgb8(102, 51, 153));
        assert_eq!(Color::parse("aliceblue").unwrap(), Color::from_rgb8(240, 248, 255));
        assert_eq!(Color::parse("yellowgreen").unwrap(), Color::from_rgb8(154, 205, 50));
    }

    #[test]
    fn hex_colors_support_short_and_long_forms() {
        assert_eq!(Color::parse("#034017").unwrap(), Color::from_rgb8(3, 64, 23));
        assert_eq!(Color::parse("#f00").unwrap(), Color::from_rgb8(255, 0, 0));

        let half = Color::parse("#00000080").unwrap();
        assert!((half.a - 128.0 / 255.0).abs() < 1e-9);

        let short_alpha = Color::parse("#fff0").unwrap();
        assert_eq!(short_alpha.a, 0.0);
    }

    #[test]
    fn rgb_functions_parse_channels_and_alpha() {
        assert_eq!(Color::parse("rgb(255, 0, 0)").unwrap(), Color::from_rgb8(255, 0, 0));

        let blue = Color::parse("rgba(0,0,255,0.25)").unwrap();
        assert_eq!(blue.b, 1.0);
        assert_eq!(blue.a, 0.25);

        assert_eq!(Color::parse("rgb(255 0 0)").unwrap(), Color::from_rgb8(255, 0, 0));
        assert_close(
            Color::parse("rgb(100% 50% 0% / 25%)").unwrap(),
            (1.0, 0.5, 0.0, 0.25),
        );
        assert_close(Color::parse("rgba(0 0 0 / 0.5)").unwrap(), (0.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(Color::parse("rgb(300, 0, 0)").unwrap(), Color::from_rgb8(255, 0, 0));
        assert_eq!(Color::parse("rgba(0, 0, 0, 2)").unwrap().a, 1.0);
        assert_eq!(Color::parse("rgb(-20 0 0)").unwrap().r, 0.0);
    }

    #[test]
    fn hsl_functions_convert_to_rgb() {
        assert_close(
            Color::parse("hsl(120, 100%, 25%)").unwrap(),
            (0.0, 0.5, 0.0, 1.0),
        );
        assert_close(
            Color::parse("hsl(0 100% 50% / 50%)").unwrap(),
            (1.0, 0.0, 0.0, 0.5),
        );
        assert_close(
            Color::parse("hsla(240deg, 100%, 50%, 0.5)").unwrap(),
            (0.0, 0.0, 1.0, 0.5),
        );
        assert_close(
            Color::parse("hsl(0.5turn 100% 50%)").unwrap(),
            (0.0, 1.0, 1.0, 1.0),
        );
        // Hue wraps around the circle
        assert_close(
            Color::parse("hsl(-240, 100%, 50%)").unwrap(),
            (0.0, 1.0, 0.0, 1.0),
        );
        assert_close(Color::parse("hsl(0, 0%, 100%)").unwrap(), (1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn invalid_colors_are_reported_by_form() {
        assert_eq!(
            Color::parse("blurple"),
            Err(ColorError::UnknownName("blurple".into()))
        );
        assert_eq!(Color::parse("#12345"), Err(ColorError::InvalidHex("#12345".into())));
        assert_eq!(Color::parse("#gg0000"), Err(ColorError::InvalidHex("#gg0000".into())));
        for input in [
            "rgb(1, 2)",
            "rgb(1, , 3)",
            "rgb(1 2 3 /)",
            "rgb(1, 2, 3, 4, 5)",
            "hsl(red, 10%, 10%)",
            "cmyk(0, 0, 0, 1)",
            "rgb(1 2 3",
        ] {
            assert_eq!(
                Color::parse(input),
                Err(ColorError::InvalidFunction(input.into())),
                "{input}"
            );
        }
    }

    #[test]
    fn with_opacity_scales_existing_alpha() {
        let color = Color::new(1.0, 1.0, 1.0, 0.5).with_opacity(0.5);
        assert_eq!(color.a, 0.25);
        assert_eq!(BLACK.with_opacity(3.0).a, 1.0);
    }
}
