use serde::Serialize;

use crate::config::GradientConfig;

use super::{Emotion, EmotionalState, Intensity};

pub const DARK_NEUTRAL: &str = "#121212";
pub const NEAR_BLACK: &str = "#0a0a0a";
pub const DEFAULT_GRADIENT: [&str; 2] = ["#1e1b2e", "#3a2f4f"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Linear { angle_deg: u16, stops: Vec<String> },
    Radial { center: String, edge: String },
}

impl Background {
    pub fn to_css(&self) -> String {
        match self {
            Background::Linear { angle_deg, stops } => {
                format!("linear-gradient({}deg, {})", angle_deg, stops.join(", "))
            }
            Background::Radial { center, edge } => {
                format!("radial-gradient(circle at center, {} 0%, {} 100%)", center, edge)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientDeriver {
    config: GradientConfig,
}

impl GradientDeriver {
    pub fn new(config: GradientConfig) -> Self {
        Self { config }
    }

    /// Base color dimmed toward `min_lightness` as intensity drops. Zero or less is always
    /// the dark neutral, whatever the hue.
    pub fn color(&self, emotion: Emotion, intensity: i32) -> String {
        if intensity <= 0 {
            return DARK_NEUTRAL.to_string();
        }

        let Some((r, g, b)) = parse_hex(emotion.base_color()) else {
            return DARK_NEUTRAL.to_string();
        };

        let (hue, saturation, lightness) = rgb_to_hsl(r, g, b);
        let t = intensity.min(100) as f64 / 100.0;
        let min = self.config.min_lightness;
        let scaled = min + (lightness - min) * t;

        let (r, g, b) = hsl_to_rgb(hue, saturation, scaled);
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn background(&self, state: &EmotionalState) -> Background {
        let selected: Vec<(Emotion, Intensity)> = state
            .ranked()
            .into_iter()
            .filter(|(_, value)| *value > self.config.threshold)
            .take(self.config.max_stops)
            .collect();

        match selected.as_slice() {
            [] => Background::Linear {
                angle_deg: self.config.angle_deg,
                stops: DEFAULT_GRADIENT.iter().map(|stop| stop.to_string()).collect(),
            },
            [(emotion, value)] => Background::Radial {
                center: self.color(*emotion, *value as i32),
                edge: NEAR_BLACK.to_string(),
            },
            many => Background::Linear {
                angle_deg: self.config.angle_deg,
                stops: many
                    .iter()
                    .map(|(emotion, value)| self.color(*emotion, *value as i32))
                    .collect(),
            },
        }
    }
}

impl Default for GradientDeriver {
    fn default() -> Self {
        Self::new(GradientConfig::default())
    }
}

pub fn derive_color(emotion: Emotion, intensity: i32) -> String {
    GradientDeriver::default().color(emotion, intensity)
}

pub fn derive_background(state: &EmotionalState) -> Background {
    GradientDeriver::default().background(state)
}

pub(crate) fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

pub(crate) fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, lightness);
    }

    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (hue / 6.0, saturation, lightness)
}

pub(crate) fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let to_byte = |channel: f64| (channel * 255.0).round().clamp(0.0, 255.0) as u8;

    if saturation == 0.0 {
        let gray = to_byte(lightness);
        return (gray, gray, gray);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    (
        to_byte(hue_to_channel(p, q, hue + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, hue)),
        to_byte(hue_to_channel(p, q, hue - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::{derive_background, derive_color, hsl_to_rgb, parse_hex, rgb_to_hsl, Background, DARK_NEUTRAL};
    use crate::_test_mock::state_mock::StateTestHelpers;
    use crate::modules::emotion::{Emotion, EmotionalState};

    #[test]
    fn test_hsl_round_trip_for_catalog() {
        for emotion in Emotion::all() {
            let (r, g, b) = parse_hex(emotion.base_color()).unwrap();
            let (h, s, l) = rgb_to_hsl(r, g, b);
            assert_eq!(hsl_to_rgb(h, s, l), (r, g, b), "{}", emotion);
        }
    }

    #[test]
    fn test_zero_intensity_is_dark_neutral() {
        for emotion in Emotion::all() {
            assert_eq!(derive_color(emotion, 0), DARK_NEUTRAL);
            assert_eq!(derive_color(emotion, -5), DARK_NEUTRAL);
        }
    }

    #[test]
    fn test_full_intensity_is_base_color() {
        for emotion in Emotion::all() {
            assert_eq!(derive_color(emotion, 100), emotion.base_color());
            assert_eq!(derive_color(emotion, 250), emotion.base_color());
        }
    }

    #[test]
    fn test_lightness_increases_with_intensity() {
        let joy = StateTestHelpers::emotion("joy");
        let lightness = |intensity| {
            let (r, g, b) = parse_hex(&derive_color(joy, intensity)).unwrap();
            rgb_to_hsl(r, g, b).2
        };
        assert!(lightness(10) < lightness(50));
        assert!(lightness(50) < lightness(90));
    }

    #[test]
    fn test_background_variants() {
        assert!(matches!(derive_background(&EmotionalState::zeroed()), Background::Linear { ref stops, .. } if stops.len() == 2));

        let single = StateTestHelpers::state_with(&[("joy", 80), ("fear", 20)]);
        assert!(matches!(derive_background(&single), Background::Radial { .. }));

        let many = StateTestHelpers::state_with(&[("joy", 80), ("fear", 30), ("anger", 60), ("hope", 50), ("awe", 90)]);
        match derive_background(&many) {
            Background::Linear { stops, angle_deg } => {
                assert_eq!(angle_deg, 135);
                assert_eq!(stops.len(), 4);
                assert_eq!(stops[0], derive_color(StateTestHelpers::emotion("awe"), 90));
                assert_eq!(stops[3], derive_color(StateTestHelpers::emotion("hope"), 50));
            }
            other => panic!("expected linear gradient, got {:?}", other),
        }
    }

    #[test]
    fn test_css_rendering() {
        let radial = Background::Radial { center: "#ff0000".to_string(), edge: "#0a0a0a".to_string() };
        assert_eq!(radial.to_css(), "radial-gradient(circle at center, #ff0000 0%, #0a0a0a 100%)");
    }
}
