//! Output transcoding.

use std::borrow::Cow;

use encoding_rs::{EUC_JP, Encoder, EncoderResult, Encoding, ISO_2022_JP, SHIFT_JIS};
use rv_config::OutputEncoding;

/// The `encoding_rs` codec for `encoding`, or `None` for UTF-8.
#[must_use]
pub fn codec(encoding: OutputEncoding) -> Option<&'static Encoding> {
    match encoding {
        OutputEncoding::Utf8 => None,
        OutputEncoding::Euc => Some(EUC_JP),
        OutputEncoding::Sjis => Some(SHIFT_JIS),
        OutputEncoding::Jis => Some(ISO_2022_JP),
    }
}

/// Charset name announced in document headers.
#[must_use]
pub fn charset(encoding: OutputEncoding) -> &'static str {
    codec(encoding).map_or("UTF-8", Encoding::name)
}

/// Encode a finished buffer.
///
/// UTF-8 output borrows the text unchanged. Characters the target cannot
/// represent are written as HTML decimal character references
/// (`&#128512;`); use [`encode_with`] for other markup.
#[must_use]
pub fn encode(text: &str, encoding: OutputEncoding) -> Cow<'_, [u8]> {
    let Some(codec) = codec(encoding) else {
        return Cow::Borrowed(text.as_bytes());
    };
    let (bytes, _, unmappable) = codec.encode(text);
    if unmappable {
        tracing::debug!(encoding = %encoding, "Replaced unmappable characters with references");
    }
    bytes
}

/// Encode a finished buffer, writing unmappable characters with `char_ref`.
///
/// `char_ref` must produce ASCII so the reference itself is representable in
/// every target. Builders pass their backend's character reference, so LaTeX
/// output gets `\UTF{..}` where HTML gets `&#x..;`.
#[must_use]
pub fn encode_with(
    text: &str,
    encoding: OutputEncoding,
    char_ref: fn(char, &mut String),
) -> Cow<'_, [u8]> {
    let Some(codec) = codec(encoding) else {
        return Cow::Borrowed(text.as_bytes());
    };
    let mut encoder = codec.new_encoder();
    let mut out = Vec::with_capacity(text.len() + 16);
    let mut rest = text;
    let mut replaced = 0usize;
    let mut reference = String::new();

    while let Some((ch, tail)) = encode_chunk(&mut encoder, rest, true, &mut out) {
        replaced += 1;
        reference.clear();
        char_ref(ch, &mut reference);
        let _ = encode_chunk(&mut encoder, &reference, false, &mut out);
        rest = tail;
    }
    if replaced > 0 {
        tracing::debug!(encoding = %encoding, replaced, "Replaced unmappable characters with references");
    }
    Cow::Owned(out)
}

/// Encode `src` into `out` until it is consumed or a character cannot be
/// mapped. Returns that character and the input after it.
fn encode_chunk<'s>(
    encoder: &mut Encoder,
    mut src: &'s str,
    last: bool,
    out: &mut Vec<u8>,
) -> Option<(char, &'s str)> {
    loop {
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(src.len())
            .unwrap_or(src.len() * 4 + 16);
        let start = out.len();
        out.resize(start + needed, 0);
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(src, &mut out[start..], last);
        out.truncate(start + written);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => return None,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(ch) => return Some((ch, src)),
        }
    }
}
