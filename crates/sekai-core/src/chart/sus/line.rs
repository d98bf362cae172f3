//! Line-level tokenization of SUS files.

/// A meaningful line of a SUS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SusLine<'a> {
    /// `#KEY value`
    Meta {
        key: &'a str,
        value: &'a str,
        line: usize,
    },
    /// `#HEADER: data`
    Data {
        header: &'a str,
        data: &'a str,
        line: usize,
    },
}

/// Yields every command line in `text`, skipping comments and blank lines.
///
/// Line numbers are one-based.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = SusLine<'_>> {
    text.lines().enumerate().filter_map(|(index, raw)| {
        let body = raw.trim().strip_prefix('#')?;
        let key_len = body
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(body.len());
        if key_len == 0 {
            return None;
        }

        let (key, rest) = body.split_at(key_len);
        let line = index + 1;

        Some(match rest.strip_prefix(':') {
            Some(data) => SusLine::Data {
                header: key,
                data: data.trim(),
                line,
            },
            None => SusLine::Meta {
                key,
                value: rest.trim(),
                line,
            },
        })
    })
}

/// Removes one pair of surrounding double quotes.
pub(crate) fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Splits note data into two-character objects, ignoring spaces and `_`.
///
/// Returns `None` when the data has an odd number of significant characters.
pub(crate) fn objects(data: &str) -> Option<Vec<[char; 2]>> {
    let chars: Vec<char> = data
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();

    if chars.len() % 2 != 0 {
        return None;
    }

    Some(chars.chunks_exact(2).map(|pair| [pair[0], pair[1]]).collect())
}

/// Parses a single base-36 digit.
pub(crate) fn base36(c: char) -> Option<u32> {
    c.to_digit(36)
}
