//! `{{name}}` placeholder substitution.
//!
//! Values are inserted verbatim; anything that came from a user or from
//! AniList must go through [`escape_xml`] first.

use super::RenderError;

pub fn fill(source: &str, values: &[(&str, String)]) -> Result<String, RenderError> {
    let mut out = String::with_capacity(source.len() + 256);
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| RenderError::UnclosedPlaceholder(source.len() - rest.len() + start))?;
        let name = after[..end].trim();

        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| RenderError::UnresolvedPlaceholder(name.to_string()))?;
        out.push_str(value);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Whole numbers print without a fraction, everything else is rounded to
/// two decimals.
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_known_placeholders() {
        let out = fill(
            "<t>{{ name }} has {{count}}</t>",
            &[("name", "Alpha".into()), ("count", "3".into())],
        )
        .unwrap();
        assert_eq!(out, "<t>Alpha has 3</t>");
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = fill("{{missing}}", &[]).unwrap_err();
        assert!(matches!(err, RenderError::UnresolvedPlaceholder(ref n) if n == "missing"));
    }

    #[test]
    fn unclosed_placeholder_is_an_error() {
        assert!(matches!(
            fill("abc {{oops", &[]),
            Err(RenderError::UnclosedPlaceholder(4))
        ));
    }

    #[test]
    fn single_braces_pass_through() {
        let css = ".a { fill: red; }";
        assert_eq!(fill(css, &[]).unwrap(), css);
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn decimals_are_trimmed() {
        assert_eq!(format_decimal(78.0), "78");
        assert_eq!(format_decimal(78.456), "78.46");
        assert_eq!(format_decimal(12.5), "12.5");
    }
}
