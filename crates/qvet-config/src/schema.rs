//! Closed schema for the policy document
//!
//! The schema is declared as static data and walked over the parsed YAML
//! value. Validation does not stop at the first problem: every violated
//! constraint is reported, each with the path of the offending node.

use crate::error::ValidationError;
use regex::Regex;
use serde_yaml::Value;
use std::collections::HashSet;

/// Path prefix of the document root in error messages
pub const ROOT_PATH: &str = "config";

/// Shape constraint for one node of the document
#[derive(Debug)]
pub enum Schema {
    /// Mapping with a closed set of keys
    Object {
        fields: &'static [Field],
        required: &'static [&'static str],
    },

    /// Sequence with a bounded number of items
    Array {
        items: &'static Schema,
        max_items: usize,
    },

    /// String with length bounds, counted in characters
    Str { min_len: usize, max_len: usize },

    /// String that must compile as a regular expression
    Pattern { max_len: usize },

    Bool,

    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },

    /// String restricted to the listed values
    OneOf(&'static [&'static str]),
}

/// Named key of an object schema
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
}

const fn field(name: &'static str, schema: Schema) -> Field {
    Field { name, schema }
}

const AUTHOR_LOGIN: Schema = Schema::Str {
    min_len: 0,
    max_len: 128,
};

const URL: Schema = Schema::Str {
    min_len: 0,
    max_len: 256,
};

const CHECK_RUN_LEVEL: Schema = Schema::OneOf(&["hidden", "info", "embargo"]);

const ACTION_LINK: Schema = Schema::Object {
    fields: &[
        field("type", Schema::OneOf(&["link"])),
        field(
            "name",
            Schema::Str {
                min_len: 0,
                max_len: 128,
            },
        ),
        field("url", URL),
    ],
    required: &["type", "name", "url"],
};

const IDENTIFIER_TAG: Schema = Schema::Object {
    fields: &[
        field("type", Schema::OneOf(&["tag"])),
        field("pattern", Schema::Pattern { max_len: 64 }),
    ],
    required: &["type", "pattern"],
};

const ROUTINE_CHECK: Schema = Schema::Object {
    fields: &[
        field(
            "id",
            Schema::Str {
                min_len: 1,
                max_len: 36,
            },
        ),
        field(
            "text",
            Schema::Str {
                min_len: 0,
                max_len: 256,
            },
        ),
        field("url", URL),
    ],
    required: &["id", "text"],
};

const CHECK_RUN_ITEM: Schema = Schema::Object {
    fields: &[
        field(
            "name",
            Schema::Str {
                min_len: 1,
                max_len: 256,
            },
        ),
        field("level", CHECK_RUN_LEVEL),
        field("url", URL),
    ],
    required: &["name", "level"],
};

/// Schema of the whole policy document
pub const ROOT: Schema = Schema::Object {
    fields: &[
        field(
            "action",
            Schema::Object {
                fields: &[field("ready", ACTION_LINK)],
                required: &[],
            },
        ),
        field(
            "commit",
            Schema::Object {
                fields: &[
                    field(
                        "ignore",
                        Schema::Object {
                            fields: &[
                                field(
                                    "authors",
                                    Schema::Array {
                                        items: &AUTHOR_LOGIN,
                                        max_items: 32,
                                    },
                                ),
                                field("merges", Schema::Bool),
                            ],
                            required: &[],
                        },
                    ),
                    field(
                        "base",
                        Schema::Str {
                            min_len: 1,
                            max_len: 128,
                        },
                    ),
                ],
                required: &[],
            },
        ),
        field(
            "release",
            Schema::Object {
                fields: &[
                    field(
                        "identifiers",
                        Schema::Array {
                            items: &IDENTIFIER_TAG,
                            max_items: 4,
                        },
                    ),
                    field("max_pages_to_load", Schema::Integer { min: 1, max: 100 }),
                ],
                required: &[],
            },
        ),
        field(
            "team",
            Schema::Object {
                fields: &[
                    field(
                        "org",
                        Schema::Str {
                            min_len: 1,
                            max_len: 128,
                        },
                    ),
                    field(
                        "team_slug",
                        Schema::Str {
                            min_len: 1,
                            max_len: 128,
                        },
                    ),
                ],
                required: &["org", "team_slug"],
            },
        ),
        field(
            "routine_checks",
            Schema::Array {
                items: &ROUTINE_CHECK,
                max_items: 64,
            },
        ),
        field(
            "check_runs",
            Schema::Object {
                fields: &[
                    field("enabled", Schema::Bool),
                    field("default_level", CHECK_RUN_LEVEL),
                    field(
                        "items",
                        Schema::Array {
                            items: &CHECK_RUN_ITEM,
                            max_items: 128,
                        },
                    ),
                ],
                required: &["enabled", "default_level", "items"],
            },
        ),
    ],
    required: &[],
};

/// Validate a parsed policy document, returning every violation found
pub fn validate_document(document: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate(document, &ROOT, ROOT_PATH, &mut errors);
    check_unique_routine_check_ids(document, &mut errors);
    errors
}

fn validate(value: &Value, schema: &Schema, path: &str, errors: &mut Vec<ValidationError>) {
    match schema {
        Schema::Object { fields, required } => {
            let Value::Mapping(map) = value else {
                errors.push(ValidationError::new(path, "must be an object"));
                return;
            };

            for (key, child) in map {
                let Some(key) = key.as_str() else {
                    errors.push(ValidationError::new(
                        path,
                        format!("has a non-string key {:?}", key),
                    ));
                    continue;
                };
                match fields.iter().find(|f| f.name == key) {
                    Some(field) => {
                        validate(child, &field.schema, &format!("{}.{}", path, key), errors)
                    }
                    None => errors.push(ValidationError::new(
                        path,
                        format!("has unknown field `{}`", key),
                    )),
                }
            }

            for name in required.iter() {
                if map.get(*name).is_none() {
                    errors.push(ValidationError::new(
                        path,
                        format!("is missing required field `{}`", name),
                    ));
                }
            }
        }
        Schema::Array { items, max_items } => {
            let Value::Sequence(seq) = value else {
                errors.push(ValidationError::new(path, "must be an array"));
                return;
            };
            if seq.len() > *max_items {
                errors.push(ValidationError::new(
                    path,
                    format!("must have at most {} items", max_items),
                ));
            }
            for (index, item) in seq.iter().enumerate() {
                validate(item, items, &format!("{}[{}]", path, index), errors);
            }
        }
        Schema::Str { min_len, max_len } => {
            let Some(text) = value.as_str() else {
                errors.push(ValidationError::new(path, "must be a string"));
                return;
            };
            check_length(text, *min_len, *max_len, path, errors);
        }
        Schema::Pattern { max_len } => {
            let Some(text) = value.as_str() else {
                errors.push(ValidationError::new(path, "must be a string"));
                return;
            };
            check_length(text, 0, *max_len, path, errors);
            if let Err(e) = Regex::new(text) {
                errors.push(ValidationError::new(
                    path,
                    format!("is not a valid regular expression: {}", e),
                ));
            }
        }
        Schema::Bool => {
            if !value.is_bool() {
                errors.push(ValidationError::new(path, "must be a boolean"));
            }
        }
        Schema::Integer { min, max } => match value.as_i64() {
            Some(n) if n < *min || n > *max => errors.push(ValidationError::new(
                path,
                format!("must be between {} and {}", min, max),
            )),
            Some(_) => {}
            None => errors.push(ValidationError::new(path, "must be an integer")),
        },
        Schema::OneOf(allowed) => match value.as_str() {
            Some(text) if allowed.contains(&text) => {}
            _ => errors.push(ValidationError::new(
                path,
                format!("must be one of: {}", allowed.join(", ")),
            )),
        },
    }
}

fn check_length(
    text: &str,
    min_len: usize,
    max_len: usize,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let len = text.chars().count();
    if len == 0 && min_len > 0 {
        errors.push(ValidationError::new(path, "must not be empty"));
    } else if len < min_len {
        errors.push(ValidationError::new(
            path,
            format!("must be at least {} characters", min_len),
        ));
    }
    if len > max_len {
        errors.push(ValidationError::new(
            path,
            format!("must be at most {} characters", max_len),
        ));
    }
}

// Routine check ids become status contexts, so two checks must never share one.
fn check_unique_routine_check_ids(document: &Value, errors: &mut Vec<ValidationError>) {
    let Some(Value::Sequence(checks)) = document.get("routine_checks") else {
        return;
    };

    let mut seen = HashSet::new();
    for (index, check) in checks.iter().enumerate() {
        if let Some(id) = check.get("id").and_then(Value::as_str) {
            if !seen.insert(id) {
                errors.push(ValidationError::new(
                    format!("{}.routine_checks[{}].id", ROOT_PATH, index),
                    format!("duplicates routine check id `{}`", id),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_for(yaml: &str) -> Vec<String> {
        let document: Value = serde_yaml::from_str(yaml).unwrap();
        validate_document(&document)
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn test_valid_full_document() {
        let yaml = r#"
action:
  ready:
    type: link
    name: Deploy
    url: https://deploy.example.com
commit:
  ignore:
    authors: [dependabot]
    merges: true
  base: develop
release:
  identifiers:
    - type: tag
      pattern: "^release-"
  max_pages_to_load: 5
team:
  org: octo
  team_slug: web
routine_checks:
  - id: smoke
    text: Run the smoke tests
check_runs:
  enabled: true
  default_level: info
  items:
    - name: e2e
      level: embargo
"#;
        assert!(errors_for(yaml).is_empty());
    }

    #[test]
    fn test_reports_every_violation() {
        let yaml = r#"
unknown_top: 1
commit:
  ignore:
    merges: "yes"
    extra: true
team:
  org: octo
check_runs:
  enabled: true
  default_level: blocker
"#;
        let errors = errors_for(yaml);
        assert!(errors.contains(&"config has unknown field `unknown_top`".to_string()));
        assert!(errors.contains(&"config.commit.ignore.merges must be a boolean".to_string()));
        assert!(errors.contains(&"config.commit.ignore has unknown field `extra`".to_string()));
        assert!(errors.contains(&"config.team is missing required field `team_slug`".to_string()));
        assert!(errors
            .contains(&"config.check_runs.default_level must be one of: hidden, info, embargo".to_string()));
        assert!(errors.contains(&"config.check_runs is missing required field `items`".to_string()));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_length_and_size_bounds() {
        let long_login = "a".repeat(129);
        let authors: Vec<String> = (0..33).map(|i| format!("user{}", i)).collect();
        let yaml = format!(
            "commit:\n  ignore:\n    authors: [{}, {}]\n",
            long_login,
            authors.join(", ")
        );
        let errors = errors_for(&yaml);
        assert!(errors.contains(&"config.commit.ignore.authors must have at most 32 items".to_string()));
        assert!(errors
            .contains(&"config.commit.ignore.authors[0] must be at most 128 characters".to_string()));
    }

    #[test]
    fn test_invalid_pattern_and_page_bound() {
        let yaml = r#"
release:
  identifiers:
    - type: tag
      pattern: "(unclosed"
  max_pages_to_load: 0
"#;
        let errors = errors_for(yaml);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("config.release.identifiers[0].pattern is not a valid regular expression"));
        assert_eq!(errors[1], "config.release.max_pages_to_load must be between 1 and 100");
    }

    #[test]
    fn test_duplicate_routine_check_ids() {
        let yaml = r#"
routine_checks:
  - id: smoke
    text: one
  - id: smoke
    text: two
"#;
        assert_eq!(
            errors_for(yaml),
            vec!["config.routine_checks[1].id duplicates routine check id `smoke`".to_string()]
        );
    }

    #[test]
    fn test_root_must_be_object() {
        assert_eq!(errors_for("- a\n- b\n"), vec!["config must be an object".to_string()]);
    }
}
