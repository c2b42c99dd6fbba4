//! `Range: bytes=...` header parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// Inclusive.
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered.
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    Invalid,
    Unsatisfiable,
}

/// Parse a single byte range against a file of `size` bytes.
///
/// Supports `bytes=a-b`, `bytes=a-` (to EOF) and `bytes=-n` (last n bytes).
/// An end past EOF is clamped. Multiple ranges are rejected as invalid.
pub fn parse_range_header(value: &str, size: u64) -> Result<ByteRange, RangeError> {
    let Some(range) = value.trim().strip_prefix("bytes=") else {
        return Err(RangeError::Invalid);
    };
    if range.contains(',') {
        return Err(RangeError::Invalid);
    }
    if size == 0 {
        return Err(RangeError::Unsatisfiable);
    }

    let (start_str, end_str) = range.split_once('-').ok_or(RangeError::Invalid)?;
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        let suffix: u64 = end_str.parse().map_err(|_| RangeError::Invalid)?;
        if suffix == 0 {
            return Err(RangeError::Unsatisfiable);
        }
        return Ok(ByteRange {
            start: size.saturating_sub(suffix),
            end: size - 1,
        });
    }

    let start: u64 = start_str.parse().map_err(|_| RangeError::Invalid)?;
    if start >= size {
        return Err(RangeError::Unsatisfiable);
    }

    let end = if end_str.is_empty() {
        size - 1
    } else {
        let end: u64 = end_str.parse().map_err(|_| RangeError::Invalid)?;
        if end < start {
            return Err(RangeError::Invalid);
        }
        end.min(size - 1)
    };

    Ok(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_range() {
        let range = parse_range_header("bytes=0-99", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 0, end: 99 });
        assert_eq!(range.content_length(), 100);
        assert_eq!(range.content_range(1000), "bytes 0-99/1000");
    }

    #[test]
    fn test_open_ended_range() {
        let range = parse_range_header("bytes=500-", 1000).unwrap();
        assert_eq!(range, ByteRange { start: 500, end: 999 });
        assert_eq!(range.content_length(), 500);
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            parse_range_header("bytes=-10", 100).unwrap(),
            ByteRange { start: 90, end: 99 }
        );
        assert_eq!(
            parse_range_header("bytes=-500", 100).unwrap(),
            ByteRange { start: 0, end: 99 }
        );
    }

    #[test]
    fn test_end_is_clamped() {
        assert_eq!(
            parse_range_header("bytes=90-200", 100).unwrap(),
            ByteRange { start: 90, end: 99 }
        );
    }

    #[test]
    fn test_invalid_forms() {
        assert_eq!(parse_range_header("items=0-1", 100), Err(RangeError::Invalid));
        assert_eq!(parse_range_header("bytes=0-1,2-3", 100), Err(RangeError::Invalid));
        assert_eq!(parse_range_header("bytes=10-5", 100), Err(RangeError::Invalid));
        assert_eq!(parse_range_header("bytes=abc-", 100), Err(RangeError::Invalid));
        assert_eq!(parse_range_header("bytes=5", 100), Err(RangeError::Invalid));
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(parse_range_header("bytes=100-", 100), Err(RangeError::Unsatisfiable));
        assert_eq!(parse_range_header("bytes=0-", 0), Err(RangeError::Unsatisfiable));
    }
}
