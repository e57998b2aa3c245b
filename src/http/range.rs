//! `Range` header parsing (RFC 7233, single `bytes` range only).

/// An inclusive byte range within a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position
    pub start: usize,
    /// Last byte position, inclusive
    pub end: usize,
}

/// What to do with a request's `Range` header.
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve the byte range as a 206.
    Partial(ByteRange),
    /// Nothing in the file satisfies the range: 416.
    Unsatisfiable,
    /// No usable range; serve the whole file.
    Full,
}

/// Parse a `Range` header against a file of `size` bytes.
///
/// `bytes=a-b`, `bytes=a-`, and `bytes=-n` are recognized. Multi-range
/// requests, non-byte units, and malformed values fall back to serving the
/// full file.
///
/// ```
/// use testserve::http::range::{parse_range, RangeOutcome};
///
/// assert!(matches!(parse_range(Some("bytes=0-3"), 10), RangeOutcome::Partial(_)));
/// assert!(matches!(parse_range(None, 10), RangeOutcome::Full));
/// ```
pub fn parse_range(header: Option<&str>, size: usize) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if size == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    // Suffix form: the last `n` bytes of the file
    if start_str.is_empty() {
        return match end_str.parse::<usize>() {
            Ok(0) => RangeOutcome::Unsatisfiable,
            Ok(n) => RangeOutcome::Partial(ByteRange {
                start: size.saturating_sub(n),
                end: size - 1,
            }),
            Err(_) => RangeOutcome::Full,
        };
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_str.is_empty() {
        size - 1
    } else {
        match end_str.parse::<usize>() {
            Ok(end) => end.min(size - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_header_serves_the_full_file() {
        assert_eq!(parse_range(None, 100), RangeOutcome::Full);
    }

    #[test]
    fn closed_range() {
        assert_eq!(
            parse_range(Some("bytes=0-9"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 9 })
        );
    }

    #[test]
    fn open_range_runs_to_the_end() {
        assert_eq!(
            parse_range(Some("bytes=50-"), 100),
            RangeOutcome::Partial(ByteRange { start: 50, end: 99 })
        );
    }

    #[test]
    fn suffix_range_takes_the_tail() {
        assert_eq!(
            parse_range(Some("bytes=-20"), 100),
            RangeOutcome::Partial(ByteRange { start: 80, end: 99 })
        );
    }

    #[test]
    fn oversized_suffix_is_the_whole_file() {
        assert_eq!(
            parse_range(Some("bytes=-500"), 100),
            RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn end_is_clamped_to_the_file() {
        assert_eq!(
            parse_range(Some("bytes=90-200"), 100),
            RangeOutcome::Partial(ByteRange { start: 90, end: 99 })
        );
    }

    #[test]
    fn start_past_the_end_is_unsatisfiable() {
        assert_eq!(parse_range(Some("bytes=200-"), 100), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn inverted_range_is_unsatisfiable() {
        assert_eq!(parse_range(Some("bytes=9-3"), 100), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn malformed_and_multi_ranges_are_ignored() {
        assert_eq!(parse_range(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(parse_range(Some("bytes=0-9,20-29"), 100), RangeOutcome::Full);
        assert_eq!(parse_range(Some("items=0-9"), 100), RangeOutcome::Full);
    }
}
