/// Rough glyph width as a fraction of the font size.
const SCALING_FACTOR: f64 = 0.6;

/// Shrinks the font one pixel at a time until the estimated width of `text`
/// fits in `max_width`. Never goes below 1px.
pub fn calculate_font_size(text: &str, initial_font_size: u32, max_width: f64) -> u32 {
    let chars = text.chars().count() as f64;
    let mut size = initial_font_size.max(1);
    while size > 1 && chars * f64::from(size) * SCALING_FACTOR > max_width {
        size -= 1;
    }
    size
}
