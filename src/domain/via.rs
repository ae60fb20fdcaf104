// src/domain/via.rs
//! Expansion of via-shorthand codes into canonical attribution URLs.

/// Expand a via shorthand code to its canonical URL.
///
/// Empty input and anything that is already a URL are returned unchanged,
/// which makes the function idempotent. Unknown codes also pass through
/// verbatim so they stay visible in the rendered output and can be fixed
/// upstream instead of silently disappearing.
pub fn expand(code: &str) -> String {
    if code.is_empty() || code.starts_with("http://") || code.starts_with("https://") {
        return code.to_string();
    }

    match code {
        "tbray" => "https://www.tbray.org/ongoing/",
        "migurski" => "http://mike.teczno.com/notes/",
        "skamille" => "https://www.elidedbranches.com/",
        "nelson" => "https://www.somebits.com/weblog/",
        "kottke" => "https://kottke.org/",
        "waxy" => "https://waxy.org/",
        "kottke.org" => "https://kottke.org/",
        "sarah.milstein" => "https://www.sarahmilstein.com/",
        other => other,
    }
    .to_string()
}
