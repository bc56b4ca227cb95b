use proptest::prelude::*;

/// Strategy for generating single path segments
pub fn path_segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Strategy for generating segment lists
pub fn segments_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(path_segment_strategy(), 0..6)
}

/// Strategy for generating separators that normalize to a single slash
pub fn separator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("/"), Just("//"), Just("/./"), Just("///")]
}

/// Strategy for generating un-normalized route strings with their
/// canonical form
pub fn raw_path_strategy() -> impl Strategy<Value = (String, String)> {
    segments_strategy().prop_flat_map(|segments| {
        let count = segments.len();
        (
            Just(segments),
            prop::collection::vec(separator_strategy(), count),
            any::<bool>(),
        )
            .prop_map(|(segments, separators, trailing)| {
                let mut raw = String::new();
                for (segment, separator) in segments.iter().zip(&separators) {
                    raw.push_str(separator);
                    raw.push_str(segment);
                }
                if trailing {
                    raw.push('/');
                }
                let canonical = if segments.is_empty() {
                    "/".to_string()
                } else {
                    format!("/{}", segments.join("/"))
                };
                (raw, canonical)
            })
    })
}

/// Strategy for which of the candidate keys `a` and `b` are present,
/// with the values to store
pub fn candidate_presence_strategy() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    (prop::option::of(any::<i64>()), prop::option::of(any::<i64>()))
}
