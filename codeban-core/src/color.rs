//! Display color generation.
//!
//! Colors are `"H S L"` strings at full saturation and mid lightness. Types
//! draw from the cool spectrum and users from the warm one, each with a
//! 15-degree padding margin so the two spectra never touch.

use rand::Rng;

fn hsl(hue: u16) -> String {
    format!("{hue} 100 50")
}

/// Cool-spectrum color for a todo type (hue 15–165).
pub fn type_color() -> String {
    hsl(rand::rng().random_range(15..=165))
}

/// Warm-spectrum color for a user (hue 195–345).
pub fn user_color() -> String {
    hsl(rand::rng().random_range(195..=345))
}
