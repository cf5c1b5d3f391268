//! Hierarchical topics derived from a dot-delimited category

/// Expand a category into its topics, most specific first.
///
/// ```
/// use rust_topic_logger::core::topics;
///
/// assert_eq!(topics("foo.bar.baz"), vec!["foo.bar.baz", "foo.bar", "foo"]);
/// assert_eq!(topics("startup"), vec!["startup"]);
/// assert!(topics("").is_empty());
/// ```
pub fn topics(category: &str) -> Vec<String> {
    if category.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(category.matches('.').count() + 1);
    let mut end = category.len();
    loop {
        result.push(category[..end].to_string());
        match category[..end].rfind('.') {
            Some(dot) => end = dot,
            None => break,
        }
    }
    result
}
