use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFragment {
    pub html: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a response body into UTF-8 using: BOM -> Content-Type charset -> chardetng fallback.
///
/// Never fails: malformed sequences become replacement characters so a
/// successful response always reaches the row.
pub fn decode_fragment(bytes: &[u8], content_type: Option<&str>) -> DecodedFragment {
    if bytes.is_empty() {
        return DecodedFragment {
            html: String::new(),
            encoding_label: encoding_rs::UTF_8.name().to_string(),
            had_errors: false,
        };
    }

    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            if !name.trim().eq_ignore_ascii_case("charset") {
                return None;
            }
            Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedFragment {
    // The encoding is already chosen; only strip a matching BOM.
    let (text, had_errors) = enc.decode_with_bom_removal(bytes);
    DecodedFragment {
        html: text.into_owned(),
        encoding_label: enc.name().to_string(),
        had_errors,
    }
}
