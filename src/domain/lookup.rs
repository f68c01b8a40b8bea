//! Resolution of weak bookmark identities.
//!
//! Every lookup in both stores goes through these helpers so that the
//! effective label is compared the same way everywhere. Group bookmarks
//! share one list, so they are matched on `(file_path, label)`; a global
//! list already belongs to one file and is matched on the label alone.

use crate::domain::models::Bookmark;

pub fn matches(bookmark: &Bookmark, file_path: &str, label: &str) -> bool {
    bookmark.file_path == file_path && bookmark.effective_label() == label
}

/// Index of the first bookmark matching `(file_path, label)`.
pub fn find_position(bookmarks: &[Bookmark], file_path: &str, label: &str) -> Option<usize> {
    bookmarks
        .iter()
        .position(|bookmark| matches(bookmark, file_path, label))
}

pub fn find_mut<'a>(
    bookmarks: &'a mut [Bookmark],
    file_path: &str,
    label: &str,
) -> Option<&'a mut Bookmark> {
    bookmarks
        .iter_mut()
        .find(|bookmark| matches(bookmark, file_path, label))
}

/// Number of bookmarks sharing the key; anything above one is ambiguous.
pub fn match_count(bookmarks: &[Bookmark], file_path: &str, label: &str) -> usize {
    bookmarks
        .iter()
        .filter(|bookmark| matches(bookmark, file_path, label))
        .count()
}

/// Index of the first bookmark in a single file's list carrying `label`.
pub fn position_by_label(bookmarks: &[Bookmark], label: &str) -> Option<usize> {
    bookmarks
        .iter()
        .position(|bookmark| bookmark.effective_label() == label)
}

pub fn find_by_label_mut<'a>(
    bookmarks: &'a mut [Bookmark],
    label: &str,
) -> Option<&'a mut Bookmark> {
    bookmarks
        .iter_mut()
        .find(|bookmark| bookmark.effective_label() == label)
}

pub fn count_by_label(bookmarks: &[Bookmark], label: &str) -> usize {
    bookmarks
        .iter()
        .filter(|bookmark| bookmark.effective_label() == label)
        .count()
}
