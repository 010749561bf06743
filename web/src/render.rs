//! Page rendering.
//!
//! Produces the HTML fragment `<body>{N} {view|views} for "{greeting}"</body>`.

use hello_views_session::VisitValues;
use std::borrow::Cow;
use thiserror::Error;

/// Rendering failed for the given session values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The session reached rendering without a greeting.
    #[error("session has no greeting to render")]
    MissingGreeting,
}

/// Singular or plural noun for a view count.
///
/// # Examples
///
/// ```
/// use hello_views_web::render::view_noun;
///
/// assert_eq!(view_noun(1), "view");
/// assert_eq!(view_noun(0), "views");
/// assert_eq!(view_noun(2), "views");
/// ```
#[must_use]
pub const fn view_noun(views: u64) -> &'static str {
    if views == 1 { "view" } else { "views" }
}

/// Render the visit fragment.
///
/// # Errors
///
/// Returns [`RenderError::MissingGreeting`] if `values.greeting` is empty.
pub fn render_visit(values: &VisitValues) -> Result<String, RenderError> {
    if values.greeting.is_empty() {
        return Err(RenderError::MissingGreeting);
    }

    Ok(format!(
        "<body>{} {} for \"{}\"</body>",
        values.views,
        view_noun(values.views),
        escape_html(&values.greeting)
    ))
}

fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
