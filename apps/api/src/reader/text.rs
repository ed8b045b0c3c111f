//! Plain-text decoding with encoding detection.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::{debug, warn};

/// Never fails: the length gate downstream decides whether the result is usable.
pub fn decode(data: &[u8]) -> String {
    // A byte-order mark (UTF-8, UTF-16LE/BE) is authoritative; chardetng never guesses UTF-16.
    if let Some((encoding, bom_len)) = Encoding::for_bom(data) {
        debug!("Text encoding from byte-order mark: {}", encoding.name());
        let (text, had_errors) = encoding.decode_without_bom_handling(&data[bom_len..]);
        if had_errors {
            warn!("Text is not valid {}, invalid sequences replaced", encoding.name());
        }
        return text.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(data) {
        return text.to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);
    debug!("Detected text encoding: {}", encoding.name());

    match encoding.decode_without_bom_handling_and_without_replacement(data) {
        Some(text) => text.into_owned(),
        None => {
            warn!(
                "Text is not valid {}, decoding as UTF-8 with replacement",
                encoding.name()
            );
            String::from_utf8_lossy(data).into_owned()
        }
    }
}
