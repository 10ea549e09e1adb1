//! Chunked re-serialization of large results.
//!
//! A result is serialized once to compact JSON and then handed out in
//! consecutive slices of at most `char_limit` characters. Concatenating the
//! slices in order gives back the serialized text exactly.
//!
//! [`ChunkStream`] is pull-based: each chunk is cut only when the consumer
//! asks for it, and the stream is consumed by value, so it cannot be
//! restarted. Paginating again means calling [`paginate`] again.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::Serialize;
use thiserror::Error;

/// Default chunk size in characters.
pub const DEFAULT_CHAR_LIMIT: usize = 500;

/// Errors preparing a paginated response.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("chunk size must be at least one character")]
    ZeroLimit,
}

/// Serialize `result` and prepare it for chunked delivery.
pub fn paginate<T>(result: &T, char_limit: usize) -> Result<ChunkStream, PaginationError>
where
    T: Serialize + ?Sized,
{
    if char_limit == 0 {
        return Err(PaginationError::ZeroLimit);
    }
    let text = serde_json::to_string(result)?;
    ChunkStream::new(text, char_limit)
}

/// Forward-only sequence of chunks over one serialized document.
///
/// An empty document yields exactly one empty chunk.
#[derive(Debug)]
pub struct ChunkStream {
    text: String,
    /// Byte offset of the next chunk; always on a char boundary.
    offset: usize,
    char_limit: usize,
    started: bool,
}

impl ChunkStream {
    /// Chunk already-serialized text.
    pub fn new(text: String, char_limit: usize) -> Result<Self, PaginationError> {
        if char_limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        Ok(Self {
            text,
            offset: 0,
            char_limit,
            started: false,
        })
    }
}

impl Iterator for ChunkStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.offset >= self.text.len() {
            if self.started {
                return None;
            }
            self.started = true;
            return Some(String::new());
        }
        self.started = true;

        let rest = &self.text[self.offset..];
        let end = rest
            .char_indices()
            .nth(self.char_limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let chunk = rest[..end].to_string();
        self.offset += end;
        Some(chunk)
    }
}

impl Stream for ChunkStream {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<String>> {
        Poll::Ready(self.get_mut().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"id": 1, "title": "panic on empty input", "labels": [{"name": "bug"}]},
                {"id": 2, "title": "naïve 🦀 chunking", "labels": []}
            ]
        })
    }

    #[test]
    fn test_concatenation_reproduces_serialization() {
        let value = sample();
        let expected = serde_json::to_string(&value).unwrap();
        for limit in [1, 2, 3, 7, 64, 500, expected.len(), expected.len() + 1] {
            let joined: String = paginate(&value, limit).unwrap().collect();
            assert_eq!(joined, expected, "limit {}", limit);
        }
    }

    #[test]
    fn test_all_but_last_chunk_are_full() {
        let value = sample();
        let total = serde_json::to_string(&value).unwrap().chars().count();
        for limit in [1, 5, 16, 500] {
            let chunks: Vec<String> = paginate(&value, limit).unwrap().collect();
            let (last, full) = chunks.split_last().unwrap();
            assert!(full.iter().all(|c| c.chars().count() == limit));
            assert!(last.chars().count() <= limit);
            assert_eq!(chunks.len(), total.div_ceil(limit));
        }
    }

    #[test]
    fn test_multibyte_characters_are_never_split() {
        let chunks: Vec<String> = ChunkStream::new("a🦀bé".to_string(), 1).unwrap().collect();
        assert_eq!(chunks, vec!["a", "🦀", "b", "é"]);
    }

    #[test]
    fn test_empty_text_yields_one_empty_chunk() {
        let chunks: Vec<String> = ChunkStream::new(String::new(), 10).unwrap().collect();
        assert_eq!(chunks, vec![String::new()]);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_chunk() {
        let chunks: Vec<String> = ChunkStream::new("abcdef".to_string(), 3).unwrap().collect();
        assert_eq!(chunks, vec!["abc", "def"]);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(matches!(paginate(&sample(), 0), Err(PaginationError::ZeroLimit)));
    }

    #[test]
    fn test_exhausted_stream_stays_exhausted() {
        let mut stream = ChunkStream::new("ab".to_string(), 5).unwrap();
        assert_eq!(stream.next().as_deref(), Some("ab"));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.next(), None);
    }

    #[tokio::test]
    async fn test_stream_yields_same_chunks_as_iterator() {
        let value = sample();
        let from_iter: Vec<String> = paginate(&value, 9).unwrap().collect();
        let stream = paginate(&value, 9).unwrap();
        let from_stream: Vec<String> = futures_util::StreamExt::collect(stream).await;
        assert_eq!(from_iter, from_stream);
    }
}
