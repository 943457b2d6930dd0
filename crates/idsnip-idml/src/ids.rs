//! Resource identifier conventions
//!
//! Every style, color, swatch, font, and layer in a package is named by an
//! opaque identifier tagged with a kind prefix (`ParagraphStyle/Body`,
//! `Color/Black`, `Swatch/None`). Identifiers compare by exact string
//! equality. Entries carrying the `$ID/` marker are system built-ins shipped
//! with every document.

/// Marker carried by system built-in identifiers (`CharacterStyle/$ID/[No character style]`)
pub const SYSTEM_MARKER: &str = "$ID/";

/// The "no swatch" sentinel, retained in every package
pub const SWATCH_NONE: &str = "Swatch/None";

/// The default color, retained in every package
pub const COLOR_BLACK: &str = "Color/Black";

/// Identifier prefix for color definitions
pub const COLOR_PREFIX: &str = "Color/";

/// Identifier prefix for swatch definitions
pub const SWATCH_PREFIX: &str = "Swatch/";

/// Check whether an identifier names a system built-in entry
///
/// System entries are never reported missing and never removed by cleanup.
pub fn is_system(id: &str) -> bool {
    id.contains(SYSTEM_MARKER)
}

/// Check whether a reference value means "no reference at all"
///
/// Applied-style and color attributes use a handful of magic values to say
/// that nothing is applied: the bare `n`, and identifiers ending in
/// `[None]`, `[No character style]`, `[No paragraph style]`, `No Style`, or
/// `Text Color` (inherit). These never enter a dependency set and are never
/// reported missing.
pub fn is_no_reference(value: &str) -> bool {
    if value.is_empty() || value == "n" {
        return true;
    }
    let tail = value.rsplit('/').next().unwrap_or(value);
    let tail = tail
        .trim_matches(|c| c == '[' || c == ']')
        .to_ascii_lowercase();
    matches!(
        tail.as_str(),
        "none" | "no style" | "no character style" | "no paragraph style" | "text color"
    )
}

/// Check whether an identifier is one of the always-retained color entries
///
/// `Swatch/None` and `Color/Black` must survive every filter pass so that
/// any output package is openable on its own.
pub fn is_always_retained_color(id: &str) -> bool {
    id == SWATCH_NONE || id == COLOR_BLACK
}

/// Strip the kind prefix from an identifier, for display purposes
pub fn display_name(id: &str) -> &str {
    id.split_once('/').map(|(_, rest)| rest).unwrap_or(id)
}
