//! Query string masking pass.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::pii::detector::PiiDetector;
use crate::pii::mask::mask_value;

/// Decoded query parameters: each key maps to its values in arrival order.
///
/// Keys are sorted so encoding is deterministic.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Decode a raw (still percent-encoded) query string.
pub fn parse_query(raw: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}

/// Encode parameters as `application/x-www-form-urlencoded`, sorted by key.
pub fn encode_query(params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}

/// Return a copy of `params` with every email- or phone-shaped value masked.
///
/// Keys, value order and value count are preserved; the input is not touched.
pub fn mask_query_parameters(params: &QueryParams, detector: &PiiDetector) -> QueryParams {
    params
        .iter()
        .map(|(key, values)| {
            let masked = values
                .iter()
                .map(|value| {
                    if detector.is_pii(value) {
                        mask_value(value)
                    } else {
                        value.clone()
                    }
                })
                .collect();
            (key.clone(), masked)
        })
        .collect()
}

/// Decode, mask and re-encode a raw query string.
pub fn mask_raw_query(raw: &str, detector: &PiiDetector) -> String {
    encode_query(&mask_query_parameters(&parse_query(raw), detector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &[&str])]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_non_pii_is_unchanged() {
        let input = params(&[("q", &["rust", "proxy"]), ("page", &["2"]), ("empty", &[""])]);
        let output = mask_query_parameters(&input, &PiiDetector::default());
        assert_eq!(output, input);
    }

    #[test]
    fn test_masks_only_pii_values() {
        let input = params(&[
            ("contact", &["paul@gmail.com", "nobody", "+33 7 69 24 58 46"]),
            ("name", &["paul"]),
        ]);
        let output = mask_query_parameters(&input, &PiiDetector::default());

        assert_eq!(
            output["contact"],
            vec!["XXXXXXXXXXXXXX", "nobody", "XXXXXXXXXXXXXXXXX"]
        );
        assert_eq!(output["name"], vec!["paul"]);
        // Input untouched.
        assert_eq!(input["contact"][0], "paul@gmail.com");
    }

    #[test]
    fn test_second_pass_is_noop() {
        let input = params(&[("email", &["paul@gmail.com"]), ("phone", &["+33 7 69 24 58 46"])]);
        let detector = PiiDetector::default();
        let once = mask_query_parameters(&input, &detector);
        let twice = mask_query_parameters(&once, &detector);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_keeps_repeats_and_empty_values() {
        let parsed = parse_query("a=1&b=&a=2&c");
        assert_eq!(parsed["a"], vec!["1", "2"]);
        assert_eq!(parsed["b"], vec![""]);
        assert_eq!(parsed["c"], vec![""]);
    }

    #[test]
    fn test_mask_raw_query_encodes_sorted() {
        let raw = "z=keep&email=paul%40gmail.com";
        assert_eq!(
            mask_raw_query(raw, &PiiDetector::default()),
            "email=XXXXXXXXXXXXXX&z=keep"
        );
    }
}
