//! Splitting of composite directive arguments.

/// Split an `href` argument into `(url, label)`.
///
/// The split happens at the first comma not preceded by a backslash. `\,` in
/// the url becomes `,`; the url is trimmed and the label left-trimmed. An empty
/// label counts as absent.
pub(crate) fn split_href(arg: &str) -> (String, Option<&str>) {
    let bytes = arg.as_bytes();
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b',') => i += 2,
            b',' => {
                split = Some(i);
                break;
            }
            _ => i += 1,
        }
    }

    let (url, label) = match split {
        Some(pos) => (&arg[..pos], Some(arg[pos + 1..].trim_start())),
        None => (arg, None),
    };
    let url = url.trim_start().replace("\\,", ",").trim().to_owned();
    (url, label.filter(|label| !label.is_empty()))
}

/// Split `base,auxiliary` at the first comma.
pub(crate) fn split_pair(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once(',') {
        Some((base, aux)) => (base, Some(aux)),
        None => (arg, None),
    }
}

/// Split a `chapter|id` reference. Returns `None` when `arg` has no chapter
/// part.
pub(crate) fn split_chapter_ref(arg: &str) -> Option<(&str, &str)> {
    let (chapter, id) = arg.split_once('|')?;
    let is_word = !chapter.is_empty()
        && chapter
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_');
    (is_word && !id.is_empty()).then_some((chapter, id))
}
