//! Virtual file table and its merge policy.

use std::collections::BTreeMap;

/// Path to text content. Iteration order is lexicographic by path.
pub type FileTable = BTreeMap<String, String>;

/// Combine two file tables, newer entries winning.
///
/// - both present: union, `right` wins on a shared key
/// - one absent: the other, unchanged
/// - both absent: absent
///
/// Updates are folded left to right in arrival order, so the last writer for
/// a key wins no matter which agent produced it.
pub fn merge_files(left: Option<FileTable>, right: Option<FileTable>) -> Option<FileTable> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(mut left), Some(right)) => {
            left.extend(right);
            Some(left)
        }
    }
}
