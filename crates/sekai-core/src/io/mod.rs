//! Byte stream and compression helpers.

use std::io::{self, Read, Write};

use bytes::Bytes;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use futures::{Stream, TryStreamExt};

use crate::TRACING_TARGET_IO;

/// Drains a byte stream and decodes the concatenated chunks as UTF-8.
///
/// Chunks are buffered in arrival order and joined once the stream ends.
/// Invalid UTF-8 sequences are replaced with U+FFFD.
///
/// # Errors
///
/// Returns the first error item yielded by the stream.
pub async fn read_to_string<S>(stream: S) -> io::Result<String>
where
    S: Stream<Item = io::Result<Bytes>> + Send,
{
    let chunks: Vec<Bytes> = stream.try_collect().await?;
    let buffer = chunks.concat();

    tracing::trace!(
        target: TRACING_TARGET_IO,
        chunks = chunks.len(),
        bytes = buffer.len(),
        "Materialized byte stream"
    );

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Compresses `text` with gzip at the default level.
///
/// The header carries no timestamp or file name, so identical input yields
/// identical output.
pub fn gzip(text: &str) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder.finish()
}

/// Decompresses gzip data into a UTF-8 string.
pub fn gunzip(data: &[u8]) -> io::Result<String> {
    let mut text = String::new();
    GzDecoder::new(data).read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    fn chunks(parts: &[&'static str]) -> Vec<io::Result<Bytes>> {
        parts
            .iter()
            .map(|part| Ok(Bytes::from_static(part.as_bytes())))
            .collect()
    }

    #[tokio::test]
    async fn concatenates_chunks_in_order() {
        let text = read_to_string(stream::iter(chunks(&["ab", "cd", "ef"])))
            .await
            .unwrap();
        assert_eq!(text, "abcdef");
    }

    #[tokio::test]
    async fn empty_stream_is_empty_string() {
        let text = read_to_string(stream::iter(chunks(&[]))).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn error_before_end_is_returned() {
        let mut items = chunks(&["ab"]);
        items.push(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")));
        items.extend(chunks(&["cd"]));

        let err = read_to_string(stream::iter(items)).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn multibyte_sequence_split_across_chunks() {
        // "é" is 0xC3 0xA9.
        let items = vec![
            Ok(Bytes::from_static(&[b'a', 0xC3])),
            Ok(Bytes::from_static(&[0xA9, b'b'])),
        ];
        let text = read_to_string(stream::iter(items)).await.unwrap();
        assert_eq!(text, "aéb");
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let items = vec![Ok(Bytes::from_static(&[b'a', 0xFF, b'b']))];
        let text = read_to_string(stream::iter(items)).await.unwrap();
        assert_eq!(text, "a\u{FFFD}b");
    }

    #[test]
    fn gzip_is_deterministic() {
        let input = r#"{"bgmOffset":0,"entities":[]}"#;
        assert_eq!(gzip(input).unwrap(), gzip(input).unwrap());
    }

    #[test]
    fn gzip_round_trips() {
        let long = "x".repeat(10_000);
        for input in ["", "level", long.as_str()] {
            let compressed = gzip(input).unwrap();
            assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
            assert_eq!(gunzip(&compressed).unwrap(), input);
        }
    }
}
