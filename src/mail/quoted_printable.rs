//! Permissive quoted-printable decoding (RFC 2045 §6.7).
//!
//! Malformed escapes are passed through untouched instead of failing, the
//! same way most mail clients render them.

/// Decode a quoted-printable byte stream.
///
/// - `=XX` (hex, either case) becomes the byte `0xXX`
/// - `=` followed by optional trailing blanks and a line break is a soft
///   line break and disappears
/// - anything else is copied as-is
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let b = input[i];
        if b != b'=' {
            out.push(b);
            i += 1;
            continue;
        }

        if let Some(next) = soft_break_end(input, i + 1) {
            i = next;
            continue;
        }

        match (
            input.get(i + 1).copied().and_then(hex_value),
            input.get(i + 2).copied().and_then(hex_value),
        ) {
            (Some(hi), Some(lo)) => {
                out.push((hi << 4) | lo);
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}

/// If `start` begins `[ \t]* (\r\n | \n | EOF)`, return the index after it.
fn soft_break_end(input: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    while j < input.len() && matches!(input[j], b' ' | b'\t') {
        j += 1;
    }
    match input.get(j) {
        None => Some(j),
        Some(b'\n') => Some(j + 1),
        Some(b'\r') if input.get(j + 1) == Some(&b'\n') => Some(j + 2),
        _ => None,
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(decode(b"hello world"), b"hello world");
    }

    #[test]
    fn hex_escapes() {
        assert_eq!(decode(b"a=3Db"), b"a=b");
        assert_eq!(decode(b"caf=C3=A9"), "café".as_bytes());
        assert_eq!(decode(b"=3d"), b"=");
    }

    #[test]
    fn soft_line_breaks() {
        assert_eq!(decode(b"http://mandrill=\r\napp.com"), b"http://mandrillapp.com");
        assert_eq!(decode(b"abc=\ndef"), b"abcdef");
        assert_eq!(decode(b"abc=  \r\ndef"), b"abcdef");
        assert_eq!(decode(b"trailing="), b"trailing");
    }

    #[test]
    fn hard_line_breaks_kept() {
        assert_eq!(decode(b"line one\r\nline two"), b"line one\r\nline two");
    }

    #[test]
    fn malformed_escape_kept_literally() {
        assert_eq!(decode(b"100=ZZ"), b"100=ZZ");
        assert_eq!(decode(b"x=4"), b"x=4");
    }
}
