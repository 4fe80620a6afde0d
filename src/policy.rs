//! Path classification policy for wicket.
//!
//! A `PermissionPolicy` is an ordered list of path rules mapping request
//! paths to required access levels. Rules are evaluated in order and the
//! first match wins; paths no rule matches fall back to a configured
//! default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Required privilege to reach a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Reachable by anyone, including anonymous requests.
    #[default]
    #[serde(rename = "public")]
    Public,
    /// Requires a logged-in user.
    #[serde(rename = "user")]
    UserOnly,
    /// Requires a logged-in administrator.
    #[serde(rename = "admin")]
    AdminOnly,
    /// Unreachable for everyone (maintenance lockdown).
    #[serde(rename = "deny")]
    DenyAll,
}

impl AccessLevel {
    /// Convert to the string representation used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::UserOnly => "user",
            AccessLevel::AdminOnly => "admin",
            AccessLevel::DenyAll => "deny",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(AccessLevel::Public),
            "user" => Ok(AccessLevel::UserOnly),
            "admin" => Ok(AccessLevel::AdminOnly),
            "deny" => Ok(AccessLevel::DenyAll),
            _ => Err(format!("unknown access level: {s}")),
        }
    }
}

/// How a rule's path is compared against request paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// The request path must equal the rule path.
    Exact(String),
    /// The request path must start with the rule path.
    Prefix(String),
}

impl PathMatcher {
    /// Check whether a request path matches.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(rule) => path == rule,
            PathMatcher::Prefix(rule) => path.starts_with(rule.as_str()),
        }
    }
}

/// A single path rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    /// Path matcher.
    pub matcher: PathMatcher,
    /// Required access level for matching paths.
    pub level: AccessLevel,
}

impl PolicyRule {
    /// Create a rule matching one exact path.
    pub fn exact(path: impl Into<String>, level: AccessLevel) -> Self {
        Self {
            matcher: PathMatcher::Exact(path.into()),
            level,
        }
    }

    /// Create a rule matching a path prefix.
    pub fn prefix(path: impl Into<String>, level: AccessLevel) -> Self {
        Self {
            matcher: PathMatcher::Prefix(path.into()),
            level,
        }
    }
}

/// Ordered rule set classifying request paths.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    rules: Vec<PolicyRule>,
    default_level: AccessLevel,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PermissionPolicy {
    /// Create an empty policy with the given default level.
    pub fn new(default_level: AccessLevel) -> Self {
        Self {
            rules: Vec::new(),
            default_level,
        }
    }

    /// Create the stock policy: `/admin` is admin-only, `/data` and
    /// `/repo` require a logged-in user, everything else is public.
    pub fn with_defaults() -> Self {
        let mut policy = Self::new(AccessLevel::Public);
        policy.add_rule(PolicyRule::prefix("/admin", AccessLevel::AdminOnly));
        policy.add_rule(PolicyRule::prefix("/data", AccessLevel::UserOnly));
        policy.add_rule(PolicyRule::prefix("/repo", AccessLevel::UserOnly));
        policy
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn add_rule(&mut self, rule: PolicyRule) {
        self.rules.push(rule);
    }

    /// Classify a request path.
    pub fn classify(&self, path: &str) -> AccessLevel {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.level)
            .unwrap_or(self.default_level)
    }

    /// Remove every rule; all paths fall back to the default level.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// The level applied when no rule matches.
    pub fn default_level(&self) -> AccessLevel {
        self.default_level
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the policy has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_round_trip() {
        for level in [
            AccessLevel::Public,
            AccessLevel::UserOnly,
            AccessLevel::AdminOnly,
            AccessLevel::DenyAll,
        ] {
            assert_eq!(AccessLevel::from_str(level.as_str()).unwrap(), level);
        }
        assert!(AccessLevel::from_str("root").is_err());
    }

    #[test]
    fn test_access_level_display() {
        assert_eq!(format!("{}", AccessLevel::AdminOnly), "admin");
    }

    #[test]
    fn test_path_matcher_exact() {
        let matcher = PathMatcher::Exact("/data".to_string());
        assert!(matcher.matches("/data"));
        assert!(!matcher.matches("/data/reports"));
        assert!(!matcher.matches("/datastore"));
    }

    #[test]
    fn test_path_matcher_prefix() {
        let matcher = PathMatcher::Prefix("/admin".to_string());
        assert!(matcher.matches("/admin"));
        assert!(matcher.matches("/admin/users"));
        assert!(!matcher.matches("/public"));
    }

    #[test]
    fn test_classify_first_match_wins() {
        // Order-sensitive: the catch-all "/" prefix must not shadow
        // the earlier "/admin" rule.
        let mut policy = PermissionPolicy::new(AccessLevel::DenyAll);
        policy.add_rule(PolicyRule::prefix("/admin", AccessLevel::AdminOnly));
        policy.add_rule(PolicyRule::prefix("/", AccessLevel::Public));

        assert_eq!(policy.classify("/admin"), AccessLevel::AdminOnly);
        assert_eq!(policy.classify("/admin/users"), AccessLevel::AdminOnly);
        assert_eq!(policy.classify("/data"), AccessLevel::Public);
    }

    #[test]
    fn test_classify_order_reversed() {
        let mut policy = PermissionPolicy::new(AccessLevel::DenyAll);
        policy.add_rule(PolicyRule::prefix("/", AccessLevel::Public));
        policy.add_rule(PolicyRule::prefix("/admin", AccessLevel::AdminOnly));

        // The catch-all now wins for every path
        assert_eq!(policy.classify("/admin"), AccessLevel::Public);
    }

    #[test]
    fn test_classify_falls_back_to_default() {
        let mut policy = PermissionPolicy::new(AccessLevel::DenyAll);
        policy.add_rule(PolicyRule::prefix("/admin", AccessLevel::AdminOnly));

        assert_eq!(policy.classify("/other"), AccessLevel::DenyAll);
        assert_eq!(policy.default_level(), AccessLevel::DenyAll);
    }

    #[test]
    fn test_with_defaults() {
        let policy = PermissionPolicy::with_defaults();
        assert_eq!(policy.classify("/admin"), AccessLevel::AdminOnly);
        assert_eq!(policy.classify("/data"), AccessLevel::UserOnly);
        assert_eq!(policy.classify("/repo"), AccessLevel::UserOnly);
        assert_eq!(policy.classify("/"), AccessLevel::Public);
        assert_eq!(policy.classify("/login"), AccessLevel::Public);
    }

    #[test]
    fn test_clear() {
        let mut policy = PermissionPolicy::with_defaults();
        assert!(!policy.is_empty());

        policy.clear();
        assert!(policy.is_empty());
        assert_eq!(policy.len(), 0);
        assert_eq!(policy.classify("/admin"), AccessLevel::Public);
    }

    #[test]
    fn test_exact_rule_in_policy() {
        let mut policy = PermissionPolicy::new(AccessLevel::Public);
        policy.add_rule(PolicyRule::exact("/secret", AccessLevel::AdminOnly));

        assert_eq!(policy.classify("/secret"), AccessLevel::AdminOnly);
        assert_eq!(policy.classify("/secret/sub"), AccessLevel::Public);
    }
}
