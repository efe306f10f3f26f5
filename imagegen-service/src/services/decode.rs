//! Base64 image extraction for structured inference results.

use super::inference::{Base64Payload, InferenceError};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

/// Standard alphabet, padding optional, non-zero trailing bits ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Strip a `data:image/<subtype>;base64,` prefix if present.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    let Some(rest) = encoded.strip_prefix("data:image/") else {
        return encoded;
    };

    match rest.split_once(";base64,") {
        Some((subtype, data))
            if !subtype.is_empty()
                && subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            data
        }
        _ => encoded,
    }
}

/// Locate the base64 image text, checking `image` before `data[0].base64`.
pub fn extract_base64_image(payload: &Base64Payload) -> Option<&str> {
    payload.image.as_deref().or_else(|| {
        payload
            .data
            .as_ref()
            .and_then(|data| data.first())
            .and_then(|datum| datum.base64.as_deref())
    })
}

/// Decode base64 image text into raw bytes. ASCII whitespace is skipped and
/// padding may be omitted.
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, InferenceError> {
    let compact: String = strip_data_url_prefix(encoded)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    LENIENT
        .decode(compact)
        .map_err(|e| InferenceError::Decode(format!("Invalid base64 image data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::inference::Base64Datum;

    #[test]
    fn strips_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,/9j/"), "/9j/");
        assert_eq!(strip_data_url_prefix("AAAA"), "AAAA");
    }

    #[test]
    fn leaves_non_image_data_urls_alone() {
        let text = "data:text/plain;base64,AAAA";
        assert_eq!(strip_data_url_prefix(text), text);

        let odd = "data:image/svg+xml;base64,AAAA";
        assert_eq!(strip_data_url_prefix(odd), odd);
    }

    #[test]
    fn image_field_takes_precedence() {
        let payload = Base64Payload {
            image: Some("AAAA".to_string()),
            data: Some(vec![Base64Datum {
                base64: Some("BBBB".to_string()),
            }]),
        };
        assert_eq!(extract_base64_image(&payload), Some("AAAA"));
    }

    #[test]
    fn falls_back_to_first_data_entry() {
        let payload = Base64Payload {
            image: None,
            data: Some(vec![
                Base64Datum {
                    base64: Some("BBBB".to_string()),
                },
                Base64Datum {
                    base64: Some("CCCC".to_string()),
                },
            ]),
        };
        assert_eq!(extract_base64_image(&payload), Some("BBBB"));
    }

    #[test]
    fn missing_fields_yield_none() {
        assert_eq!(extract_base64_image(&Base64Payload::default()), None);

        let empty_list = Base64Payload {
            image: None,
            data: Some(vec![]),
        };
        assert_eq!(extract_base64_image(&empty_list), None);
    }

    #[test]
    fn decodes_after_stripping_prefix() {
        assert_eq!(
            decode_base64_image("data:image/png;base64,AAAA").unwrap(),
            vec![0u8, 0, 0]
        );
        assert_eq!(decode_base64_image("aGk=").unwrap(), b"hi".to_vec());
    }

    #[test]
    fn padding_is_optional() {
        assert_eq!(decode_base64_image("aGk").unwrap(), b"hi".to_vec());
        assert_eq!(decode_base64_image("aGVsbG8").unwrap(), b"hello".to_vec());
    }

    #[test]
    fn line_wrapped_text_decodes() {
        assert_eq!(decode_base64_image("aGVs\nbG8=").unwrap(), b"hello".to_vec());
        assert_eq!(
            decode_base64_image("data:image/png;base64, aGVs\r\n\tbG8=\n").unwrap(),
            b"hello".to_vec()
        );
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        assert!(matches!(
            decode_base64_image("not base64!"),
            Err(InferenceError::Decode(_))
        ));
        assert!(matches!(
            decode_base64_image("aGVsb"),
            Err(InferenceError::Decode(_))
        ));
    }
}
