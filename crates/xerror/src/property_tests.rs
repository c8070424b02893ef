//! Property-based tests for xerror
//!
//! These use proptest to check construction, formatting and conversion
//! invariants across generated inputs.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::kind::XERROR;
    use crate::{PlainError, XError, error_data, errorf, message_format, to_dto};

    // ===== Strategy Generators =====

    fn arb_word() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_]{1,16}"
    }

    fn arb_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ]{0,60}"
    }

    fn arb_data() -> impl Strategy<Value = serde_json::Map<String, serde_json::Value>> {
        prop::collection::btree_map(arb_word(), arb_text(), 0..6).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect()
        })
    }

    // ===== Construction Properties =====

    proptest! {
        /// Property: explicit options are never overridden
        /// Invariant: id, message and transient equal what was passed in
        #[test]
        fn prop_explicit_options_survive(
            id in arb_word(),
            message in arb_text(),
            transient in any::<bool>(),
        ) {
            let error = XError::builder(&XERROR)
                .id(id.clone())
                .message(message.clone())
                .transient(transient)
                .build();

            prop_assert_eq!(error.id(), id.as_str());
            prop_assert_eq!(error.message(), message.as_str());
            prop_assert_eq!(error.transient(), transient);
        }
    }

    // ===== Formatting Properties =====

    proptest! {
        /// Property: message_format without data is a plain space join
        #[test]
        fn prop_message_format_joins_with_spaces(
            parts in prop::collection::vec(arb_word(), 0..8),
        ) {
            prop_assert_eq!(message_format(&parts, None), parts.join(" "));
        }

        /// Property: every data key shows up as `key=` in the message
        #[test]
        fn prop_errorf_mentions_every_key(
            name in arb_word(),
            reason in arb_word(),
            data in arb_data(),
        ) {
            let error = errorf(&name, (reason.clone(), data.clone()));
            let prefix = format!("{name}: {reason}");

            prop_assert!(error.message().starts_with(&prefix));
            for key in data.keys() {
                let needle = format!("{key}=");
                prop_assert!(error.message().contains(&needle));
            }
        }
    }

    // ===== Conversion Properties =====

    proptest! {
        /// Property: DTO JSON round-trip preserves the reported fields
        /// Invariant: name, message, data and transient survive text encoding
        #[test]
        fn prop_dto_round_trip(
            message in arb_text(),
            data in arb_data(),
            transient in any::<bool>(),
        ) {
            let error = XError::builder(&XERROR)
                .message(message)
                .data(error_data(serde_json::Value::Object(data)))
                .transient(transient)
                .build();

            let text = serde_json::to_string(&error).expect("Failed to serialize");
            let parsed = crate::ErrorDto::from_json_str(&text).expect("Failed to parse");

            prop_assert_eq!(parsed.name.as_str(), error.name());
            prop_assert_eq!(parsed.message.as_str(), error.message());
            prop_assert_eq!(parsed.data.as_ref(), error.data());
            prop_assert_eq!(parsed.transient, transient);
            prop_assert_eq!(parsed.time, error.time());
        }

        /// Property: cause chains of any length convert level by level
        #[test]
        fn prop_cause_chain_depth(levels in 1usize..12) {
            let mut error = PlainError::new("level 0");
            for level in 1..levels {
                error = PlainError::new(format!("level {level}")).with_cause(error);
            }

            let dto = to_dto(Some(&error));
            prop_assert_eq!(dto.depth(), levels);
            prop_assert_eq!(dto.root_cause().message.as_str(), "level 0");
        }
    }
}
