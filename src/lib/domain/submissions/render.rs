//! Notification body rendering

use super::FormField;

/// Separator between the header and the submitted fields
const DETAILS_SEPARATOR: &str = "--- Details ---";

/// A rendered notification body in both formats
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBody {
    /// The plain text body
    pub plain: String,

    /// The HTML body
    pub html: String,
}

/// Renders a submission into plain text and HTML bodies.
///
/// The plain body is a header naming `source`, a blank line, a separator and
/// one `Readable key: value` line per field in the given order. The HTML body
/// has the same lines, escaped, joined with `<br>`.
pub fn render(source: &str, fields: &[FormField]) -> RenderedBody {
    let mut lines = Vec::with_capacity(fields.len() + 3);

    lines.push(format!(
        "A new submission was received from the {source} form."
    ));
    lines.push(String::new());
    lines.push(DETAILS_SEPARATOR.to_string());

    for field in fields {
        lines.push(format!("{}: {}", readable_key(&field.name), field.value));
    }

    let html = lines
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("<br>");

    RenderedBody {
        plain: lines.join("\n"),
        html,
    }
}

/// `phone_number` -> `Phone number`. Everything after the first character is
/// lower-cased.
fn readable_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();

    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
