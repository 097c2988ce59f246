use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

// Average advance as a fraction of the font size, used when no matching
// system font can be loaded (headless CI, minimal containers).
const FALLBACK_CHAR_WIDTH: f32 = 0.52;

static MEASURER: Lazy<Mutex<LabelMeasurer>> = Lazy::new(|| Mutex::new(LabelMeasurer::new()));

/// Width of a single line of text at the given size. Never fails: when no
/// font face resolves, an estimate from the char count is returned instead.
pub fn measure_label_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    let measured = MEASURER
        .lock()
        .ok()
        .and_then(|mut guard| guard.measure(text, font_size, font_family));
    measured.unwrap_or_else(|| estimate_width(text, font_size))
}

pub fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_CHAR_WIDTH
}

struct FontBytes {
    data: Vec<u8>,
    index: u32,
}

struct LabelMeasurer {
    db: Database,
    fonts_loaded: bool,
    // Keyed by the raw font-family string; None caches a failed lookup.
    cache: HashMap<String, Option<FontBytes>>,
}

impl LabelMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            fonts_loaded: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        if !self.cache.contains_key(font_family) {
            let loaded = self.load(font_family);
            self.cache.insert(font_family.to_string(), loaded);
        }
        let font = self.cache.get(font_family)?.as_ref()?;
        let face = Face::parse(&font.data, font.index).ok()?;
        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return None;
        }
        let scale = font_size / units_per_em;
        let mut width = 0.0f32;
        for ch in text.chars() {
            let advance = face
                .glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map(|units| units as f32 * scale)
                .unwrap_or_else(|| font_size * FALLBACK_CHAR_WIDTH);
            width += advance;
        }
        Some(width)
    }

    fn load(&mut self, font_family: &str) -> Option<FontBytes> {
        if !self.fonts_loaded {
            self.db.load_system_fonts();
            self.fonts_loaded = true;
        }
        let mut families: Vec<Family> = Vec::new();
        let names: Vec<String> = font_family
            .split(',')
            .map(|name| name.trim().trim_matches(['"', '\'']).to_string())
            .filter(|name| !name.is_empty())
            .collect();
        for name in &names {
            match name.to_ascii_lowercase().as_str() {
                "sans-serif" => families.push(Family::SansSerif),
                "serif" => families.push(Family::Serif),
                "monospace" => families.push(Family::Monospace),
                _ => families.push(Family::Name(name)),
            }
        }
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db.with_face_data(id, |data, index| FontBytes {
            data: data.to_vec(),
            index,
        })
    }
}
