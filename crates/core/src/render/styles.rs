use super::template::fill;
use super::RenderError;
use crate::domain::model::CardColors;

const DEFAULT_STATS_CSS: &str = include_str!("../../res/svg/default_stats.css");

/// Ring geometry fed into the stylesheet; cards without a ring pass zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingStyle {
    pub dasharray: f64,
    pub dashoffset: f64,
}

pub fn default_stylesheet(colors: &CardColors, ring: RingStyle) -> Result<String, RenderError> {
    fill(
        DEFAULT_STATS_CSS,
        &[
            ("title_color", colors.title.clone()),
            ("background_color", colors.background.clone()),
            ("text_color", colors.text.clone()),
            ("circle_color", colors.circle.clone()),
            ("dasharray", format!("{:.4}", ring.dasharray)),
            ("dashoffset", format!("{:.4}", ring.dashoffset)),
        ],
    )
}

/// Puts the stylesheet in a `<style>` element right after the first
/// `<defs>` of the document.
pub fn inline_styles(svg: &str, stylesheet: &str) -> Result<String, RenderError> {
    const DEFS: &str = "<defs>";
    let at = svg.find(DEFS).ok_or(RenderError::MissingDefs)? + DEFS.len();

    let mut out = String::with_capacity(svg.len() + stylesheet.len() + 16);
    out.push_str(&svg[..at]);
    out.push_str("<style>");
    out.push_str(stylesheet);
    out.push_str("</style>");
    out.push_str(&svg[at..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_carries_palette_and_ring() {
        let css = default_stylesheet(
            &CardColors::default(),
            RingStyle {
                dasharray: 251.327,
                dashoffset: 100.0,
            },
        )
        .unwrap();
        assert!(css.contains("fill: #141321;"));
        assert!(css.contains("stroke-dasharray: 251.3270;"));
        assert!(css.contains("stroke-dashoffset: 100.0000;"));
        assert!(!css.contains("{{"));
    }

    #[test]
    fn styles_land_inside_first_defs() {
        let out = inline_styles("<svg><defs></defs><defs></defs></svg>", ".a{}").unwrap();
        assert_eq!(out, "<svg><defs><style>.a{}</style></defs><defs></defs></svg>");
    }

    #[test]
    fn svg_without_defs_is_rejected() {
        assert!(matches!(
            inline_styles("<svg></svg>", ""),
            Err(RenderError::MissingDefs)
        ));
    }
}
