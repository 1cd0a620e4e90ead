//! Signature scanning over an in-memory archive buffer.
//!
//! Record headers are located purely by searching for the [`SIGNATURE`]
//! marker. The scanner does not validate what follows a hit; that is the job
//! of the record model builder.

use super::SIGNATURE;

/// Lazy scanner yielding the offset of every marker in a buffer.
///
/// Offsets come out in ascending order, each occurrence exactly once. After a
/// hit the search resumes past the matched marker. The scanner is finite
/// and can be restarted with [`reset`](Self::reset).
///
/// # Example
///
/// ```rust
/// use crspatch::format::scanner::SignatureScanner;
///
/// let data = b"..MDmd....MDmd";
/// let offsets: Vec<usize> = SignatureScanner::new(data).collect();
/// assert_eq!(offsets, vec![2, 10]);
/// ```
#[derive(Debug, Clone)]
pub struct SignatureScanner<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SignatureScanner<'a> {
    /// Creates a scanner positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Finds the next marker at or after the current position.
    pub fn find_next_signature(&mut self) -> Option<usize> {
        if self.position >= self.data.len() {
            return None;
        }
        let found = self.data[self.position..]
            .windows(SIGNATURE.len())
            .position(|w| w == SIGNATURE);

        match found {
            Some(rel_pos) => {
                let pos = self.position + rel_pos;
                self.position = pos + SIGNATURE.len();
                Some(pos)
            }
            None => {
                self.position = self.data.len();
                None
            }
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn bytes_scanned(&self) -> usize {
        self.position
    }

    /// Restarts the scan from the beginning of the buffer.
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl Iterator for SignatureScanner<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.find_next_signature()
    }
}

/// Collects every marker offset in `data`.
pub fn find_all_signatures(data: &[u8]) -> Vec<usize> {
    SignatureScanner::new(data).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_find_at_start() {
        let mut scanner = SignatureScanner::new(b"MDmd\x0A\x01");
        assert_eq!(scanner.find_next_signature(), Some(0));
        assert_eq!(scanner.find_next_signature(), None);
    }

    #[test]
    fn test_scanner_find_with_prefix() {
        let mut data = vec![0xFFu8; 100];
        data.extend_from_slice(SIGNATURE);
        assert_eq!(find_all_signatures(&data), vec![100]);
    }

    #[test]
    fn test_scanner_no_signature() {
        let data = vec![0u8; 1024];
        let mut scanner = SignatureScanner::new(&data);
        assert_eq!(scanner.next(), None);
        assert_eq!(scanner.bytes_scanned(), 1024);
    }

    #[test]
    fn test_scanner_empty_and_short_buffers() {
        assert!(find_all_signatures(b"").is_empty());
        assert!(find_all_signatures(b"MDm").is_empty());
    }

    #[test]
    fn test_scanner_find_all() {
        let mut data = Vec::new();
        data.extend_from_slice(SIGNATURE);
        data.extend_from_slice(&[0u8; 50]);
        data.extend_from_slice(SIGNATURE);
        data.extend_from_slice(SIGNATURE);

        assert_eq!(find_all_signatures(&data), vec![0, 54, 58]);
    }

    #[test]
    fn test_scanner_near_miss() {
        // Case matters: "MDMD" and "mdmd" are not markers.
        assert!(find_all_signatures(b"MDMD mdmd MDm d").is_empty());
        assert_eq!(find_all_signatures(b"MMDmd"), vec![1]);
    }

    #[test]
    fn test_scanner_reset() {
        let data = b"xxMDmdxx";
        let mut scanner = SignatureScanner::new(data);
        assert_eq!(scanner.by_ref().count(), 1);
        assert_eq!(scanner.next(), None);

        scanner.reset();
        assert_eq!(scanner.next(), Some(2));
    }
}
