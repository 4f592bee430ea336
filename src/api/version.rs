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

//! API version definitions.

use std::fmt;

/// The current/latest API version.
pub const API_CURRENT_VERSION: ApiVersion = ApiVersion::V1;

/// Available API versions. New versions get their own module under
/// `src/api/` and a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API Version 1
    V1,
}

impl ApiVersion {
    /// Get the URL path prefix for this version.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "/api/v1",
        }
    }

    /// Get the version string (e.g., "v1").
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
        }
    }

    /// Get all available API versions.
    pub fn all() -> &'static [ApiVersion] {
        &[ApiVersion::V1]
    }

    /// Get all version strings.
    pub fn all_strings() -> Vec<String> {
        Self::all().iter().map(|v| v.as_str().to_string()).collect()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_path_prefix() {
        assert_eq!(ApiVersion::V1.path_prefix(), "/api/v1");
    }

    #[test]
    fn version_strings() {
        assert_eq!(ApiVersion::all_strings(), vec!["v1".to_string()]);
        assert_eq!(API_CURRENT_VERSION.to_string(), "v1");
    }
}
