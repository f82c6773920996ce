use crate::forge::request::Release;

/// `major.minor.` prefix of a tag: `v1.16.2` becomes `v1.16.`.
pub fn tag_prefix(tag: &str) -> String {
    let parts = tag.split('.').take(2).collect::<Vec<&str>>();
    format!("{}.", parts.join("."))
}

/// Pick the release a new tag should be compared against.
///
/// Releases are expected newest first. The first release sharing the tag's
/// minor line wins; otherwise the newest release is returned.
pub fn select_latest_release(
    releases: Vec<Release>,
    tag: &str,
) -> Option<Release> {
    let prefix = tag_prefix(tag);

    if let Some(index) =
        releases.iter().position(|r| r.tag_name.starts_with(&prefix))
    {
        return releases.into_iter().nth(index);
    }

    releases.into_iter().next()
}
