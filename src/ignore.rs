use std::collections::BTreeSet;
use std::path::Path;

/// Path fragments excluded from watching and from event delivery.
///
/// A path is ignored when its string form contains any fragment as a
/// substring. Matching is case-sensitive and deliberately coarse: the
/// fragment `"log"` excludes `/home/log/data` and `/home/catalog/x` alike.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    fragments: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.extend(fragments.into_iter().map(Into::into));
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = path.to_string_lossy();
        self.fragments.iter().any(|fragment| path.contains(fragment.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
