//! Property tests: parsing is total and rejected documents fall back to defaults.

use proptest::prelude::*;
use qvet_config::{parse_config_file, Config};
use serde_yaml::{Mapping, Value};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const KNOWN_KEYS: [&str; 6] = [
    "action",
    "commit",
    "release",
    "team",
    "routine_checks",
    "check_runs",
];

fn arb_login() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}"
}

fn ignore_document(authors: &[String], merges: bool) -> String {
    let mut ignore = Mapping::new();
    ignore.insert(
        "authors".into(),
        Value::Sequence(authors.iter().cloned().map(Value::String).collect()),
    );
    ignore.insert("merges".into(), Value::Bool(merges));

    let mut commit = Mapping::new();
    commit.insert("ignore".into(), Value::Mapping(ignore));

    let mut root = Mapping::new();
    root.insert("commit".into(), Value::Mapping(commit));
    serde_yaml::to_string(&Value::Mapping(root)).unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Arbitrary text never panics, and a rejected document yields the default policy.
    #[test]
    fn any_text_parses_to_a_usable_config(raw in ".{0,200}") {
        let result = parse_config_file(Some(&raw));
        if result.errors_text.is_some() {
            prop_assert_eq!(result.config, parse_config_file(None).config);
        }
    }

    /// Unknown top-level keys are always reported.
    #[test]
    fn unknown_top_level_key_is_rejected(key in "[a-z_]{1,16}", value in any::<i32>()) {
        prop_assume!(!KNOWN_KEYS.contains(&key.as_str()));
        prop_assume!(!["null", "true", "false"].contains(&key.as_str()));

        let result = parse_config_file(Some(&format!("{}: {}\n", key, value)));
        let text = result.errors_text.unwrap();
        let expected = format!("config has unknown field `{}`", key);
        prop_assert!(text.contains(&expected));
        prop_assert_eq!(result.config, Config::default());
    }

    /// Ignore lists within bounds are carried through unchanged.
    #[test]
    fn bounded_ignore_list_round_trips(
        authors in prop::collection::vec(arb_login(), 0..=32),
        merges in any::<bool>(),
    ) {
        let result = parse_config_file(Some(&ignore_document(&authors, merges)));
        prop_assert!(result.errors_text.is_none(), "{:?}", result.errors_text);
        prop_assert_eq!(&result.config.commit.ignore.authors, &authors);
        prop_assert_eq!(result.config.commit.ignore.merges, merges);
    }

    /// Ignore lists over the bound are rejected as a whole.
    #[test]
    fn oversized_ignore_list_is_rejected(authors in prop::collection::vec(arb_login(), 33..48)) {
        let result = parse_config_file(Some(&ignore_document(&authors, false)));
        prop_assert_eq!(
            result.errors_text.as_deref(),
            Some("config.commit.ignore.authors must have at most 32 items")
        );
    }
}
