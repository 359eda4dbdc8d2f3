//! Maps YouTube URLs onto channel or video references.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ResolveError;
use crate::types::{EntityKind, EntityRef};

/// Tried in order; the first match wins.
static URL_PATTERNS: LazyLock<Vec<(Regex, EntityKind)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"youtube\.com/channel/([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::Channel,
        ),
        (
            Regex::new(r"youtube\.com/c/([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::CustomName,
        ),
        (
            Regex::new(r"youtube\.com/user/([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::Username,
        ),
        (
            Regex::new(r"youtube\.com/@([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::Handle,
        ),
        (
            Regex::new(r"youtube\.com/watch\?v=([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::Video,
        ),
        (
            Regex::new(r"youtu\.be/([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::Video,
        ),
        (
            Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]+)").unwrap(),
            EntityKind::Video,
        ),
    ]
});

/// Returns `None` when the string matches none of the known URL shapes.
pub fn resolve(url: &str) -> Option<EntityRef> {
    let url = url.trim();
    URL_PATTERNS.iter().find_map(|(pattern, kind)| {
        pattern.captures(url).and_then(|captures| {
            captures.get(1).map(|id| EntityRef {
                id: id.as_str().to_string(),
                kind: *kind,
            })
        })
    })
}

/// Like [`resolve`], but reports the failure as an error.
pub fn try_resolve(url: &str) -> Result<EntityRef, ResolveError> {
    resolve(url).ok_or_else(|| ResolveError::UnrecognizedUrl {
        url: url.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(url: &str) -> (String, EntityKind) {
        let resolved = resolve(url).expect("url should resolve");
        (resolved.id, resolved.kind)
    }

    #[test]
    fn test_channel_urls() {
        assert_eq!(
            entity("https://www.youtube.com/channel/UCX6OQ3DkcsbYNE6H8uQQuVA"),
            ("UCX6OQ3DkcsbYNE6H8uQQuVA".to_string(), EntityKind::Channel)
        );
        assert_eq!(
            entity("https://www.youtube.com/channel/UC123abc/videos?view=0"),
            ("UC123abc".to_string(), EntityKind::Channel)
        );
        assert_eq!(
            entity("https://www.youtube.com/c/SomeCreator"),
            ("SomeCreator".to_string(), EntityKind::CustomName)
        );
        assert_eq!(
            entity("https://youtube.com/user/oldschool"),
            ("oldschool".to_string(), EntityKind::Username)
        );
        assert_eq!(
            entity("https://www.youtube.com/@MrBeast6000"),
            ("MrBeast6000".to_string(), EntityKind::Handle)
        );
    }

    #[test]
    fn test_video_urls() {
        assert_eq!(
            entity("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            ("dQw4w9WgXcQ".to_string(), EntityKind::Video)
        );
        assert_eq!(
            entity("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            ("dQw4w9WgXcQ".to_string(), EntityKind::Video)
        );
        assert_eq!(
            entity("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            ("dQw4w9WgXcQ".to_string(), EntityKind::Video)
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            entity("  https://youtu.be/abc123 \n"),
            ("abc123".to_string(), EntityKind::Video)
        );
    }

    #[test]
    fn test_unrecognized_urls() {
        assert!(resolve("").is_none());
        assert!(resolve("https://vimeo.com/123456").is_none());
        assert!(resolve("https://www.youtube.com/").is_none());
        assert!(resolve("https://www.youtube.com/playlist?list=PL123").is_none());

        let err = try_resolve(" not a url ").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnrecognizedUrl {
                url: "not a url".to_string()
            }
        );
    }

    #[test]
    fn test_kind_helpers() {
        assert!(EntityKind::Video.is_video());
        assert!(!EntityKind::Channel.is_video());
        assert!(EntityKind::Handle.needs_name_lookup());
        assert!(EntityKind::Username.needs_name_lookup());
        assert!(EntityKind::CustomName.needs_name_lookup());
        assert!(!EntityKind::Channel.needs_name_lookup());
        assert!(!EntityKind::Video.needs_name_lookup());
    }
}
