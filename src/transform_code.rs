//! Transformation short codes as constants which map friendly directive
//! names onto the delivery endpoint's compact wire grammar.
//!
//! The table must match the remote service byte for byte; unmapped names are
//! passed through to the URL unchanged.

/// Code for an overlay image. Values are nested resource paths and get
/// escaped before they are embedded in the flat transform grammar.
pub const OVERLAY_IMAGE: &str = "oi";

/// Code for an image picked up from a delivery path (used both for default
/// images and path-addressed overlays). Values get the same path escaping as
/// [`OVERLAY_IMAGE`].
pub const DEFAULT_IMAGE: &str = "di";

/// Escape sequence replacing `/` inside nested-path transform values.
pub const PATH_ESCAPE: &str = "@@";

/// Code whose value is emitted verbatim, bypassing `key-value` formatting.
pub const RAW: &str = "raw";

/// Alias for the static short-code table.
pub type TransformCodes = &'static [(&'static str, &'static str)];

/// Friendly transformation names mapped to their wire codes.
pub const SUPPORTED_TRANSFORMS: TransformCodes = &[
    ("height", "h"),
    ("width", "w"),
    ("aspect_ratio", "ar"),
    ("quality", "q"),
    ("crop", "c"),
    ("crop_mode", "cm"),
    ("x", "x"),
    ("y", "y"),
    ("focus", "fo"),
    ("format", "f"),
    ("radius", "r"),
    ("background", "bg"),
    ("border", "b"),
    ("rotation", "rt"),
    ("rotate", "rt"),
    ("blur", "bl"),
    ("named", "n"),
    ("overlay_image", OVERLAY_IMAGE),
    ("overlay_image_at_path", DEFAULT_IMAGE),
    ("overlay_x", "ox"),
    ("overlay_y", "oy"),
    ("overlay_focus", "ofo"),
    ("overlay_height", "oh"),
    ("overlay_width", "ow"),
    ("overlay_image_trim", "oit"),
    ("overlay_image_aspect_ratio", "oiar"),
    ("overlay_image_background", "oibg"),
    ("overlay_image_border", "oib"),
    ("overlay_image_dpr", "oidpr"),
    ("overlay_image_quality", "oiq"),
    ("overlay_image_cropping", "oic"),
    ("overlay_image_focus", "oifo"),
    ("overlay_text", "ot"),
    ("overlay_text_font_size", "ots"),
    ("overlay_text_font_family", "otf"),
    ("overlay_text_color", "otc"),
    ("overlay_text_transparency", "oa"),
    ("overlay_alpha", "oa"),
    ("overlay_text_typography", "ott"),
    ("overlay_background", "obg"),
    ("overlay_text_encoded", "ote"),
    ("overlay_text_width", "otw"),
    ("overlay_text_background", "otbg"),
    ("overlay_text_padding", "otp"),
    ("overlay_text_inner_alignment", "otia"),
    ("overlay_radius", "or"),
    ("progressive", "pr"),
    ("lossless", "lo"),
    ("trim", "t"),
    ("metadata", "md"),
    ("color_profile", "cp"),
    ("default_image", DEFAULT_IMAGE),
    ("dpr", "dpr"),
    ("effect_sharpen", "e-sharpen"),
    ("effect_usm", "e-usm"),
    ("effect_contrast", "e-contrast"),
    ("effect_gray", "e-grayscale"),
    ("original", "orig"),
    ("raw", RAW),
];

/// Look up the wire code for a friendly directive name.
pub fn code_for(name: &str) -> Option<&'static str> {
    SUPPORTED_TRANSFORMS
        .iter()
        .find(|(friendly, _)| *friendly == name)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_names() {
        assert_eq!(code_for("height"), Some("h"));
        assert_eq!(code_for("width"), Some("w"));
        assert_eq!(code_for("rotate"), Some("rt"));
        assert_eq!(code_for("overlay_image"), Some(OVERLAY_IMAGE));
        assert_eq!(code_for("default_image"), Some(DEFAULT_IMAGE));
        assert_eq!(code_for("effect_gray"), Some("e-grayscale"));
    }

    #[test]
    fn unknown_names_are_unmapped() {
        assert_eq!(code_for("not-a-transform"), None);
    }
}
