use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Clamp, FromColor, Lch, Srgb};

use crate::data::model::RoleColumnSet;

/// Bar colour of the totals chart.
pub const TOTALS_BAR: Color32 = Color32::from_rgb(139, 0, 0);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue step between consecutive series, in degrees (the golden angle).
const HUE_STEP: f32 = 137.508;
const HUE_START: f32 = 25.0;
const CHROMA: f32 = 62.0;
/// Even series are drawn darker than odd ones so neighbours stay apart
/// even when their hues come close.
const LIGHTNESS: [f32; 2] = [48.0, 66.0];

/// Colour of the `index`-th role series. Depends on the index alone, so
/// adding roles never recolours the earlier ones.
pub fn series_color(index: usize) -> Color32 {
    let hue = (HUE_START + index as f32 * HUE_STEP) % 360.0;
    let lch: Lch = Lch::new(LIGHTNESS[index % 2], CHROMA, hue);
    let rgb: Srgb<u8> = Srgb::<f32>::from_color(lch).clamp().into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Colours for the first `n` role series.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n).map(series_color).collect()
}

// ---------------------------------------------------------------------------
// Color mapping: role column → Color32
// ---------------------------------------------------------------------------

/// One stable colour per role, so a role keeps its colour while other
/// roles are toggled on and off.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(roles: &RoleColumnSet) -> Self {
        let palette = generate_palette(roles.len());
        let mapping = roles.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, role: &str) -> Color32 {
        self.mapping
            .get(role)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::classify;

    #[test]
    fn palette_has_distinct_colours() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_role_gets_default() {
        let cm = ColorMap::new(&classify(&["PROMOTOR A", "PROMOTOR B"]));
        assert_ne!(cm.color_for("PROMOTOR A"), cm.color_for("PROMOTOR B"));
        assert_eq!(cm.color_for("OUTRO"), Color32::GRAY);
    }

    #[test]
    fn earlier_colours_survive_more_roles() {
        let small = generate_palette(3);
        let large = generate_palette(8);
        assert_eq!(small[..], large[..3]);
        assert_eq!(large[5], series_color(5));
    }

    #[test]
    fn neighbours_alternate_lightness() {
        let luma = |c: Color32| {
            0.299 * c.r() as f32 + 0.587 * c.g() as f32 + 0.114 * c.b() as f32
        };
        let p = generate_palette(6);
        for pair in p.windows(2) {
            assert!((luma(pair[0]) - luma(pair[1])).abs() > 10.0);
        }
    }
}
