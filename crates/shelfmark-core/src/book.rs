//! Book references
//!
//! Books are owned by the external book catalog. The category tree only stores
//! their identifiers and must tolerate ids whose book has since been deleted.

use std::collections::{BTreeSet, HashSet};

/// Identifier assigned to a book by the external catalog.
pub type BookId = u64;

/// Answers whether a book id still refers to a live book.
///
/// Statistics consult this so that stale ids count as absent rather than as
/// corruption.
pub trait BookLookup {
    fn contains(&self, book: BookId) -> bool;
}

/// Lookup that treats every id as live.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllBooks;

impl BookLookup for AllBooks {
    fn contains(&self, _book: BookId) -> bool {
        true
    }
}

impl BookLookup for HashSet<BookId> {
    fn contains(&self, book: BookId) -> bool {
        HashSet::contains(self, &book)
    }
}

impl BookLookup for BTreeSet<BookId> {
    fn contains(&self, book: BookId) -> bool {
        BTreeSet::contains(self, &book)
    }
}

impl<T: BookLookup + ?Sized> BookLookup for &T {
    fn contains(&self, book: BookId) -> bool {
        (**self).contains(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_books_accepts_anything() {
        assert!(AllBooks.contains(0));
        assert!(AllBooks.contains(u64::MAX));
    }

    #[test]
    fn test_set_lookups() {
        let live: HashSet<BookId> = [1, 2].into_iter().collect();
        assert!(BookLookup::contains(&live, 1));
        assert!(!BookLookup::contains(&live, 3));

        let ordered: BTreeSet<BookId> = [5].into_iter().collect();
        let by_ref = &ordered;
        assert!(BookLookup::contains(&by_ref, 5));
    }
}
