use crate::models::Garment;

/// Color pairs that clash regardless of which garment wears which
const CLASH_PAIRS: [(&str, &str); 5] = [
    ("red", "green"),
    ("blue", "orange"),
    ("purple", "yellow"),
    ("red", "bright blue"),
    ("pink", "dark blue"),
];

const NEUTRAL_COLORS: [&str; 6] = ["black", "white", "grey", "dark blue", "navy", "beige"];

pub const CLASH_PENALTY: f64 = -5.0;
pub const BUSY_PENALTY: f64 = -2.0;
pub const NEUTRAL_BONUS: f64 = 1.0;

fn is_busy(color: &str, pattern: &str) -> bool {
    color.contains("bright") || pattern.contains("graphic")
}

fn is_neutral(color: &str) -> bool {
    NEUTRAL_COLORS.iter().any(|n| color.contains(n))
}

/// Scores how well two garments look together
///
/// Rules are checked in order and the first match wins: a known clash pair
/// (-5.0), both garments busy (-2.0), both neutral (+1.0). Otherwise 0.0.
/// Matching is case-insensitive substring matching on color names.
pub fn color_compatibility(a: &Garment, b: &Garment) -> f64 {
    let color_a = a.color.to_lowercase();
    let color_b = b.color.to_lowercase();

    let clashes = CLASH_PAIRS.iter().any(|(c1, c2)| {
        (color_a.contains(c1) && color_b.contains(c2))
            || (color_b.contains(c1) && color_a.contains(c2))
    });
    if clashes {
        return CLASH_PENALTY;
    }

    let pattern_a = a.pattern.as_deref().unwrap_or_default().to_lowercase();
    let pattern_b = b.pattern.as_deref().unwrap_or_default().to_lowercase();
    if is_busy(&color_a, &pattern_a) && is_busy(&color_b, &pattern_b) {
        return BUSY_PENALTY;
    }

    if is_neutral(&color_a) && is_neutral(&color_b) {
        return NEUTRAL_BONUS;
    }

    0.0
}
