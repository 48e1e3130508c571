use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Dimension, SalesTable};

// ---------------------------------------------------------------------------
// Theme and fixed category palettes
// ---------------------------------------------------------------------------

pub const HEADER_PURPLE: Color32 = Color32::from_rgb(0x8B, 0x00, 0x8B);
pub const BACKGROUND_LAVENDER: Color32 = Color32::from_rgb(0xE6, 0xE6, 0xFA);
pub const TITLE_TEXT: Color32 = Color32::from_rgb(0xE6, 0xF5, 0xFB);

pub const BLUE: Color32 = Color32::from_rgb(0x4A, 0x90, 0xE2);
pub const HONEY: Color32 = Color32::from_rgb(0xFF, 0xDB, 0x58);
pub const PASTEL_YELLOW: Color32 = Color32::from_rgb(0xFF, 0xFA, 0xA0);

/// Delta arrow colours.
pub const INCREASING: Color32 = BLUE;
pub const DECREASING: Color32 = PASTEL_YELLOW;

pub const GENDER_COLORS: &[(&str, Color32)] = &[("Male", BLUE), ("Female", HONEY)];

pub const CITY_COLORS: &[(&str, Color32)] = &[
    ("Mandalay", BLUE),
    ("Naypyitaw", HONEY),
    ("Yangon", Color32::from_rgb(0xB0, 0xD8, 0xEE)),
];

/// Handed out to product lines in order of first appearance.
pub const PRODUCT_SEQUENCE: [Color32; 6] = [
    BLUE,
    Color32::from_rgb(0x6F, 0xAF, 0xDE),
    Color32::from_rgb(0x92, 0xC5, 0xE6),
    PASTEL_YELLOW,
    HONEY,
    Color32::from_rgb(0xE6, 0xF5, 0xFB),
];

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

/// `#RRGGBB` form, used in exported snapshots.
pub fn to_hex(c: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", c.r(), c.g(), c.b())
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of one dimension to colours: explicit entries first, the
/// rest from an evenly spaced palette.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a map for `values`, looking each up in `fixed` before falling back.
    pub fn new<'v>(
        dimension: Dimension,
        fixed: &[(&str, Color32)],
        values: impl IntoIterator<Item = &'v str>,
    ) -> Self {
        let mut mapping = BTreeMap::new();
        let mut unmapped = Vec::new();
        for value in values {
            match fixed.iter().find(|(name, _)| *name == value) {
                Some((_, color)) => {
                    mapping.insert(value.to_string(), *color);
                }
                None => unmapped.push(value.to_string()),
            }
        }
        if !unmapped.is_empty() {
            log::debug!("{dimension}: {} values use the automatic palette", unmapped.len());
        }
        let palette = generate_palette(unmapped.len());
        mapping.extend(unmapped.into_iter().zip(palette));

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.clone(), *c))
            .collect()
    }
}

/// One colour map per categorical dimension.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    pub gender: ColorMap,
    pub city: ColorMap,
    pub product_line: ColorMap,
}

impl CategoryColors {
    /// Colour map for every categorical dimension of `table`.
    pub fn for_table(table: &SalesTable) -> Self {
        let genders = table.unique_values(Dimension::Gender);
        let cities = table.unique_values(Dimension::City);
        let lines = table.values_in_source_order(Dimension::ProductLine);
        if lines.len() > PRODUCT_SEQUENCE.len() {
            log::warn!(
                "{} product lines but only {} fixed colours",
                lines.len(),
                PRODUCT_SEQUENCE.len()
            );
        }
        let product_fixed: Vec<(&str, Color32)> = lines
            .iter()
            .map(String::as_str)
            .zip(PRODUCT_SEQUENCE)
            .collect();

        Self {
            gender: ColorMap::new(
                Dimension::Gender,
                GENDER_COLORS,
                genders.iter().map(String::as_str),
            ),
            city: ColorMap::new(Dimension::City, CITY_COLORS, cities.iter().map(String::as_str)),
            product_line: ColorMap::new(
                Dimension::ProductLine,
                &product_fixed,
                lines.iter().map(String::as_str),
            ),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &ColorMap {
        match dimension {
            Dimension::Gender => &self.gender,
            Dimension::City => &self.city,
            Dimension::ProductLine => &self.product_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_table;

    #[test]
    fn fixed_entries_win_and_unknown_values_fall_back() {
        let map = ColorMap::new(Dimension::Gender, GENDER_COLORS, ["Female", "Male", "Other"]);
        assert_eq!(map.color_for("Male"), BLUE);
        assert_eq!(map.color_for("Female"), HONEY);
        let other = map.color_for("Other");
        assert_eq!(other, generate_palette(1)[0]);
        // values never seen at all get the default
        assert_eq!(map.color_for("Unknown"), Color32::GRAY);
    }

    #[test]
    fn product_lines_follow_first_appearance() {
        let colors = CategoryColors::for_table(&small_table());
        assert_eq!(colors.product_line.color_for("Health and beauty"), PRODUCT_SEQUENCE[0]);
        assert_eq!(colors.product_line.color_for("Sports and travel"), PRODUCT_SEQUENCE[1]);
        assert_eq!(colors.product_line.color_for("Food and beverages"), PRODUCT_SEQUENCE[2]);
        assert_eq!(colors.get(Dimension::City).color_for("Naypyitaw"), HONEY);
    }

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex(BLUE), "#4A90E2");
        assert_eq!(to_hex(HEADER_PURPLE), "#8B008B");
    }
}
