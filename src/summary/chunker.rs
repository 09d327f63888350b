//! Fixed-size character paging for long documents

use std::num::NonZeroUsize;

use crate::{PrecisError, Result};

/// Default page size in characters.
pub const DEFAULT_PAGE_SIZE: usize = 16000;

/// [`DEFAULT_PAGE_SIZE`] as a checked non-zero value.
pub const DEFAULT_PAGE_SIZE_NZ: NonZeroUsize = match NonZeroUsize::new(DEFAULT_PAGE_SIZE) {
    Some(size) => size,
    None => panic!("DEFAULT_PAGE_SIZE must be non-zero"),
};

/// Validate a configured page size.
pub fn page_size(size: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(size)
        .ok_or_else(|| PrecisError::Config("page size must be greater than zero".to_string()))
}

/// Split `text` into consecutive pages of at most `page_size` characters.
///
/// Pages borrow from `text`, never overlap, and concatenate back to the
/// original. Lengths are counted in chars so a page never splits a
/// multi-byte character. An empty document yields no pages.
pub fn pages(text: &str, page_size: NonZeroUsize) -> Pages<'_> {
    Pages {
        rest: text,
        page_size: page_size.get(),
    }
}

/// Lazy iterator returned by [`pages`].
#[derive(Debug, Clone)]
pub struct Pages<'a> {
    rest: &'a str,
    page_size: usize,
}

impl<'a> Iterator for Pages<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let split = byte_offset(self.rest, self.page_size);
        let (page, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some(page)
    }
}

impl std::iter::FusedIterator for Pages<'_> {}

/// Split `text` into windows of at most `window_size` characters where each
/// window repeats the last `overlap` characters of the previous one.
///
/// Iteration stops at the first window that reaches the end of the text, so
/// no window is fully contained in its predecessor. With `overlap == 0` this
/// yields the same pages as [`pages`].
pub fn windows(text: &str, window_size: NonZeroUsize, overlap: usize) -> Result<Windows<'_>> {
    if overlap >= window_size.get() {
        return Err(PrecisError::Config(format!(
            "page overlap ({}) must be smaller than the page size ({})",
            overlap, window_size
        )));
    }

    Ok(Windows {
        rest: text,
        window_size: window_size.get(),
        stride: window_size.get() - overlap,
    })
}

/// Lazy iterator returned by [`windows`].
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    rest: &'a str,
    window_size: usize,
    stride: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let end = byte_offset(self.rest, self.window_size);
        let window = &self.rest[..end];

        self.rest = if end == self.rest.len() {
            ""
        } else {
            &self.rest[byte_offset(self.rest, self.stride)..]
        };

        Some(window)
    }
}

impl std::iter::FusedIterator for Windows<'_> {}

/// Byte offset of the `chars`-th character, clamped to the end of `text`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn splits_into_equal_pages() {
        let pages: Vec<_> = pages("AAAA", size(2)).collect();
        assert_eq!(pages, vec!["AA", "AA"]);
    }

    #[test]
    fn last_page_may_be_shorter() {
        let pages: Vec<_> = pages("abcdefg", size(3)).collect();
        assert_eq!(pages, vec!["abc", "def", "g"]);
    }

    #[test]
    fn empty_document_has_no_pages() {
        assert_eq!(pages("", size(16000)).count(), 0);
    }

    #[test]
    fn short_document_is_a_single_page() {
        let pages: Vec<_> = pages("hello", size(DEFAULT_PAGE_SIZE)).collect();
        assert_eq!(pages, vec!["hello"]);
    }

    #[test]
    fn pages_reconstruct_document_and_respect_size() {
        let documents = [
            "",
            "a",
            "The quick brown fox jumps over the lazy dog.",
            "line one\nline two\r\nline three\n",
            "naïve café déjà vu — ünïcödé 日本語のテキスト 🦀🦀🦀",
        ];

        for doc in documents {
            let len = doc.chars().count();
            for n in 1..=12 {
                let collected: Vec<_> = pages(doc, size(n)).collect();

                assert_eq!(collected.concat(), doc, "page size {n}");
                assert_eq!(collected.len(), len.div_ceil(n), "page size {n}");
                assert!(collected.iter().all(|p| !p.is_empty()));

                if let Some((last, full)) = collected.split_last() {
                    assert!(full.iter().all(|p| p.chars().count() == n));
                    assert!(last.chars().count() <= n);
                }
            }
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        let pages: Vec<_> = pages("日本語🦀", size(2)).collect();
        assert_eq!(pages, vec!["日本", "語🦀"]);
    }

    #[test]
    fn windows_share_overlap_with_predecessor() {
        let windows: Vec<_> = windows("abcdefghij", size(4), 1).unwrap().collect();
        assert_eq!(windows, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn windows_stop_once_the_end_is_reached() {
        let windows: Vec<_> = windows("abcdefgh", size(6), 2).unwrap().collect();
        assert_eq!(windows, vec!["abcdef", "efgh"]);
    }

    #[test]
    fn windows_without_overlap_match_pages() {
        let doc = "naïve café déjà vu 🦀🦀";
        for n in 1..=8 {
            let w: Vec<_> = windows(doc, size(n), 0).unwrap().collect();
            let p: Vec<_> = pages(doc, size(n)).collect();
            assert_eq!(w, p, "page size {n}");
        }
    }

    #[test]
    fn windows_cover_the_document() {
        let doc = "The quick brown fox jumps over the lazy dog. 日本語";
        for n in 2..=10 {
            for overlap in 0..n {
                let collected: Vec<_> = windows(doc, size(n), overlap).unwrap().collect();
                let first = collected.first().unwrap();
                let last = collected.last().unwrap();

                assert!(doc.starts_with(first));
                assert!(doc.ends_with(last));
                assert!(collected.iter().all(|w| w.chars().count() <= n));

                let mut rebuilt: String = collected[0].to_string();
                for w in &collected[1..] {
                    let skip: String = w.chars().skip(overlap).collect();
                    rebuilt.push_str(&skip);
                }
                assert_eq!(rebuilt, doc, "size {n} overlap {overlap}");
            }
        }
    }

    #[test]
    fn overlap_must_be_smaller_than_window() {
        let err = windows("abc", size(3), 3).unwrap_err();
        assert!(err.to_string().contains("page overlap"));
        assert_eq!(windows("", size(3), 2).unwrap().count(), 0);
    }

    #[test]
    fn default_page_size_constant_agrees() {
        assert_eq!(DEFAULT_PAGE_SIZE_NZ.get(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = page_size(0).unwrap_err();
        assert!(err.to_string().contains("page size must be greater than zero"));
        assert_eq!(page_size(16000).unwrap().get(), 16000);
    }
}
