use std::collections::BTreeMap;

use eframe::egui::Color32;
use egui_plot::MarkerShape;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Sex, Species};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Species → Color32
// ---------------------------------------------------------------------------

/// Maps species to colours for the scatter plots.
#[derive(Debug, Clone)]
pub struct SpeciesPalette {
    mapping: BTreeMap<Species, Color32>,
    default_color: Color32,
}

impl SpeciesPalette {
    /// Fixed hues: Adelie red, Chinstrap blue, Gentoo green.
    pub fn fixed() -> Self {
        let mapping = BTreeMap::from([
            (Species::Adelie, Color32::RED),
            (Species::Chinstrap, Color32::BLUE),
            (Species::Gentoo, Color32::GREEN),
        ]);
        SpeciesPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Evenly spaced hues, one per species.
    pub fn generated() -> Self {
        let mapping = Species::ALL
            .into_iter()
            .zip(generate_palette(Species::ALL.len()))
            .collect();
        SpeciesPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a species.
    pub fn color_for(&self, species: Species) -> Color32 {
        self.mapping
            .get(&species)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Marker shape used for each sex; unknown sex gets its own shape.
pub fn marker_for(sex: Option<Sex>) -> MarkerShape {
    match sex {
        Some(Sex::Male) => MarkerShape::Circle,
        Some(Sex::Female) => MarkerShape::Cross,
        None => MarkerShape::Square,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_palette_is_distinct() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_fixed_palette() {
        let p = SpeciesPalette::fixed();
        assert_eq!(p.color_for(Species::Adelie), Color32::RED);
        assert_eq!(p.color_for(Species::Chinstrap), Color32::BLUE);
        assert_eq!(p.color_for(Species::Gentoo), Color32::GREEN);
        let g = SpeciesPalette::generated();
        assert_ne!(g.color_for(Species::Adelie), g.color_for(Species::Gentoo));
    }

    #[test]
    fn test_markers_differ_by_sex() {
        assert_ne!(marker_for(Some(Sex::Male)), marker_for(Some(Sex::Female)));
        assert_ne!(marker_for(None), marker_for(Some(Sex::Male)));
    }
}
