//! Message framing over a byte stream.
//!
//! Every message is a block of `Name: value` header lines terminated by a
//! blank line, followed by exactly `Content-Length` bytes of body:
//!
//! ```text
//! Content-Length: 52\r\n
//! \r\n
//! {"jsonrpc":"2.0","id":1,"method":"shutdown","params":null}
//! ```

use std::io::{self, BufRead, Read, Write};

use crate::error::FramingError;

const CONTENT_LENGTH: &str = "Content-Length";

/// Read one message body.
///
/// Returns `Ok(None)` when the stream ends cleanly before a new message
/// starts. A malformed header line is reported after the header block and
/// its body have been consumed, leaving the reader on the next message
/// boundary. A missing or unparseable length leaves the body unread; see
/// [`FramingError::is_recoverable`].
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, FramingError> {
    let mut content_length: Option<Result<usize, String>> = None;
    let mut header_error = None;
    let mut seen_header = false;
    let mut raw_line = Vec::new();

    loop {
        raw_line.clear();
        if reader.read_until(b'\n', &mut raw_line)? == 0 {
            return if seen_header {
                Err(FramingError::UnexpectedEof)
            } else {
                Ok(None)
            };
        }
        let line = String::from_utf8_lossy(&raw_line);
        let line = line.trim();
        if line.is_empty() {
            if seen_header {
                break;
            }
            // Stray separator between messages.
            continue;
        }
        seen_header = true;

        match line.split_once(':') {
            Some((name, value)) => {
                if name.trim().eq_ignore_ascii_case(CONTENT_LENGTH) {
                    let value = value.trim();
                    content_length = Some(value.parse().map_err(|_| value.to_owned()));
                }
            }
            None => {
                header_error.get_or_insert_with(|| FramingError::MissingDelimiter(line.to_owned()));
            }
        }
    }

    // Without a length the body stays unread, so that error wins.
    let length = match content_length {
        Some(Ok(length)) => length,
        Some(Err(value)) => return Err(FramingError::InvalidContentLength(value)),
        None => return Err(FramingError::MissingContentLength),
    };

    let body = read_body(reader, length)?;
    match header_error {
        Some(err) => Err(err),
        None => Ok(Some(body)),
    }
}

fn read_body<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>, FramingError> {
    let mut body = vec![0; length];
    let mut filled = 0;
    while filled < length {
        match reader.read(&mut body[filled..]) {
            Ok(0) => {
                return Err(FramingError::TruncatedBody {
                    expected: length,
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(body)
}

/// Write one message: the `Content-Length` header, the blank line, then
/// exactly the body bytes.
pub fn write_message<W: Write>(writer: &mut W, body: &[u8]) -> Result<(), FramingError> {
    write!(writer, "{CONTENT_LENGTH}: {}\r\n\r\n", body.len())?;
    writer.write_all(body)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn frame(body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write_message(&mut out, body).unwrap();
        out
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_body(body in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let framed = frame(&body);
            let header = format!("Content-Length: {}\r\n\r\n", body.len());
            prop_assert!(framed.starts_with(header.as_bytes()));
            prop_assert_eq!(framed.len(), header.len() + body.len());

            let mut reader = Cursor::new(framed);
            let decoded = read_message(&mut reader).unwrap().unwrap();
            prop_assert_eq!(decoded, body);
            prop_assert!(read_message(&mut reader).unwrap().is_none());
        }
    }

    #[test]
    fn test_reads_consecutive_messages() {
        let mut stream = frame(b"{\"a\":1}");
        stream.extend(frame(b"{\"b\":2}"));
        let mut reader = Cursor::new(stream);

        assert_eq!(read_message(&mut reader).unwrap().unwrap(), b"{\"a\":1}");
        assert_eq!(read_message(&mut reader).unwrap().unwrap(), b"{\"b\":2}");
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_ignores_other_headers_and_case() {
        let stream = b"content-length: 2\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{}";
        let mut reader = Cursor::new(stream.to_vec());
        assert_eq!(read_message(&mut reader).unwrap().unwrap(), b"{}");
    }

    #[test]
    fn test_missing_delimiter_is_recoverable() {
        let mut stream = b"Bogus header\r\nContent-Length: 2\r\n\r\n{}".to_vec();
        stream.extend(frame(b"[]"));
        let mut reader = Cursor::new(stream);

        let err = read_message(&mut reader).unwrap_err();
        assert!(matches!(err, FramingError::MissingDelimiter(ref line) if line == "Bogus header"));
        assert!(err.is_recoverable());
        assert_eq!(read_message(&mut reader).unwrap().unwrap(), b"[]");
    }

    #[test]
    fn test_missing_content_length() {
        let mut reader = Cursor::new(b"Content-Type: text/plain\r\n\r\n".to_vec());
        let err = read_message(&mut reader).unwrap_err();
        assert!(matches!(err, FramingError::MissingContentLength));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_invalid_content_length() {
        let mut reader = Cursor::new(b"Content-Length: twelve\r\n\r\n".to_vec());
        let err = read_message(&mut reader).unwrap_err();
        assert!(matches!(err, FramingError::InvalidContentLength(ref v) if v == "twelve"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_bad_header_without_length_is_fatal() {
        let mut reader = Cursor::new(b"Bogus header\r\n\r\n{}".to_vec());
        let err = read_message(&mut reader).unwrap_err();
        assert!(matches!(err, FramingError::MissingContentLength));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_truncated_body_is_fatal() {
        let mut reader = Cursor::new(b"Content-Length: 10\r\n\r\n{}".to_vec());
        let err = read_message(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            FramingError::TruncatedBody {
                expected: 10,
                actual: 2
            }
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_eof_inside_headers() {
        let mut reader = Cursor::new(b"Content-Length: 10\r\n".to_vec());
        let err = read_message(&mut reader).unwrap_err();
        assert!(matches!(err, FramingError::UnexpectedEof));
    }

    #[test]
    fn test_empty_stream_is_clean_end() {
        let mut reader = Cursor::new(Vec::new());
        assert!(read_message(&mut reader).unwrap().is_none());
    }
}
