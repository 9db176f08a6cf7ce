/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Derive the URL slug of a listing title.
///
/// Lowercases, drops everything except ASCII letters, digits, `_` and spaces,
/// then turns each run of spaces into a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_spaces = false;
    for ch in title.to_lowercase().chars() {
        if ch == ' ' {
            if !in_spaces {
                slug.push('-');
                in_spaces = true;
            }
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
            in_spaces = false;
        }
    }
    slug
}

/// URL shapes that carry a video id right after the marker
const YOUTUBE_MARKERS: &[&str] = &[
    "youtube.com/watch?v=",
    "youtu.be/",
    "youtube.com/embed/",
    "youtube.com/shorts/",
];

/// Reduce a YouTube link to its bare video id.
///
/// Input that matches no known URL shape is taken to already be an id and is
/// returned trimmed. Returns `None` for blank input.
pub fn youtube_video_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for marker in YOUTUBE_MARKERS {
        if let Some(pos) = raw.find(marker) {
            let id: String = raw[pos + marker.len()..]
                .chars()
                .take_while(|c| !matches!(c, '&' | '?' | '#' | '/') && !c.is_whitespace())
                .collect();
            if !id.is_empty() {
                return Some(id);
            }
        }
    }
    Some(raw.to_string())
}
