// Copyright 2025 The Questline Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Environment variable interpolation for configuration files.
//!
//! Supports POSIX-style syntax in YAML/JSON config strings:
//! - `${VAR_NAME}` - required variable
//! - `${VAR_NAME:-default}` - variable with a default used when the
//!   variable is unset or empty
//!
//! Only well-formed `${...}` patterns are processed; there is no
//! recursive expansion and the result size is bounded.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::env;

/// Upper bound on the interpolated result size.
const MAX_INTERPOLATED_LENGTH: usize = 10_000_000;

lazy_static! {
    /// Captures: 1 = variable name (POSIX: [A-Za-z_][A-Za-z0-9_]*),
    /// 3 = default value when the `:-` form is used.
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").expect("Invalid regex pattern");
}

#[derive(Debug, thiserror::Error)]
pub enum InterpolationError {
    #[error("Environment variable '{name}' is not set and has no default value")]
    MissingVariable { name: String },

    #[error("Interpolated result exceeds maximum allowed length of {MAX_INTERPOLATED_LENGTH} bytes")]
    ResultTooLarge,
}

/// Replace every `${VAR}` / `${VAR:-default}` reference in `input` with
/// the variable's value. A missing variable without a default is an
/// error; an unset or empty variable with a default uses the default.
pub fn interpolate(input: &str) -> Result<String, InterpolationError> {
    let mut result = String::with_capacity(input.len());
    let mut last_match_end = 0;
    let mut variables_used = Vec::new();

    for caps in ENV_VAR_PATTERN.captures_iter(input) {
        let Some(full_match) = caps.get(0) else {
            continue;
        };
        let Some(name_match) = caps.get(1) else {
            continue;
        };
        let var_name = name_match.as_str();
        let default_value = caps.get(3).map(|m| m.as_str());

        result.push_str(&input[last_match_end..full_match.start()]);

        let value = match env::var(var_name) {
            Ok(val) if !val.is_empty() => val,
            Ok(_) | Err(env::VarError::NotPresent) => match default_value {
                Some(default) => default.to_string(),
                None => {
                    return Err(InterpolationError::MissingVariable {
                        name: var_name.to_string(),
                    });
                }
            },
            Err(env::VarError::NotUnicode(_)) => {
                return Err(InterpolationError::MissingVariable {
                    name: format!("{var_name} (contains invalid Unicode)"),
                });
            }
        };

        variables_used.push(var_name);
        result.push_str(&value);
        last_match_end = full_match.end();

        if result.len() > MAX_INTERPOLATED_LENGTH {
            return Err(InterpolationError::ResultTooLarge);
        }
    }

    result.push_str(&input[last_match_end..]);

    // Names only, never values
    if !variables_used.is_empty() {
        debug!(
            "Interpolated environment variables: {}",
            variables_used.join(", ")
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn simple_interpolation() {
        env::set_var("QL_TEST_VAR1", "value1");
        env::set_var("QL_TEST_VAR2", "value2");

        let result = interpolate("key1: ${QL_TEST_VAR1}\nkey2: ${QL_TEST_VAR2}").unwrap();
        assert_eq!(result, "key1: value1\nkey2: value2");
    }

    #[test]
    #[serial]
    fn default_used_when_var_not_set() {
        env::remove_var("QL_TEST_NONEXISTENT");

        let result = interpolate("value: ${QL_TEST_NONEXISTENT:-fallback}").unwrap();
        assert_eq!(result, "value: fallback");
    }

    #[test]
    #[serial]
    fn default_used_when_var_is_empty() {
        env::set_var("QL_TEST_EMPTY", "");

        let result = interpolate("value: ${QL_TEST_EMPTY:-fallback}").unwrap();
        assert_eq!(result, "value: fallback");
    }

    #[test]
    #[serial]
    fn set_variable_overrides_default() {
        env::set_var("QL_TEST_WITH_DEFAULT", "actual");

        let result = interpolate("value: ${QL_TEST_WITH_DEFAULT:-fallback}").unwrap();
        assert_eq!(result, "value: actual");
    }

    #[test]
    #[serial]
    fn missing_required_variable_is_an_error() {
        env::remove_var("QL_TEST_REQUIRED");

        let err = interpolate("value: ${QL_TEST_REQUIRED}").unwrap_err();
        assert!(matches!(err, InterpolationError::MissingVariable { .. }));
    }

    #[test]
    fn text_without_references_passes_through() {
        let input = "host: 0.0.0.0\nport: 8080";
        assert_eq!(interpolate(input).unwrap(), input);
    }

    #[test]
    fn malformed_patterns_are_left_alone() {
        let input = "a: ${not closed\nb: $PLAIN\nc: ${1BAD}";
        assert_eq!(interpolate(input).unwrap(), input);
    }
}
