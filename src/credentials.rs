use std::env;

#[cfg(test)]
use mockall::automock;

/// Environment variable names holding each provider's credential.
pub const DEEPSEEK_KEY: &str = "DEEPSEEK_API_KEY";
pub const MOONSHOT_KEY: &str = "MOONSHOT_API_KEY";
pub const KIMI_KEY: &str = "KIMI_API_KEY";
pub const OPENAI_KEY: &str = "OPENAI_API_KEY";
pub const VOLCENGINE_ID: &str = "VOLCENGINE_ACCESS_KEY_ID";
pub const VOLCENGINE_SECRET: &str = "VOLCENGINE_SECRET_ACCESS_KEY";

// Seam over env access so availability snapshots are testable without
// mutating process state.
#[cfg_attr(test, automock)]
pub trait Environment: Send + Sync {
    fn get_var(&self, key: &str) -> Result<String, env::VarError>;
}

pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

/// Snapshot of which upstream providers currently have usable credentials.
///
/// Computed by the caller at turn start and passed into the router, which
/// treats it as read-only input. There is no hidden cache behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CredentialAvailability {
    /// Baseline text chat (mandatory).
    pub deepseek: bool,
    /// Vision / image understanding.
    pub moonshot: bool,
    /// Image generation, video and audio synthesis.
    pub openai: bool,
    /// Audio transcription.
    pub volcengine: bool,
}

impl CredentialAvailability {
    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self::snapshot(&RealEnvironment)
    }

    pub fn snapshot(env: &impl Environment) -> Self {
        let has = |key: &str| env.get_var(key).map(|v| !v.is_empty()).unwrap_or(false);
        CredentialAvailability {
            deepseek: has(DEEPSEEK_KEY),
            moonshot: has(MOONSHOT_KEY) || has(KIMI_KEY),
            openai: has(OPENAI_KEY),
            volcengine: has(VOLCENGINE_ID) && has(VOLCENGINE_SECRET),
        }
    }

    /// Human-readable list of absent credentials, used to build the
    /// configuration warning shown on the default text route.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.deepseek {
            missing.push("DEEPSEEK_API_KEY (必需)");
        }
        if !self.moonshot {
            missing.push("MOONSHOT_API_KEY 或 KIMI_API_KEY (图片理解)");
        }
        if !self.openai {
            missing.push("OPENAI_API_KEY (图像生成、视频、语音)");
        }
        if !self.volcengine {
            missing.push("VOLCENGINE_ACCESS_KEY_ID + VOLCENGINE_SECRET_ACCESS_KEY (音频识别)");
        }
        missing
    }

    /// Convenience for tests and local setups where everything is configured.
    pub fn all() -> Self {
        CredentialAvailability {
            deepseek: true,
            moonshot: true,
            openai: true,
            volcengine: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn env_with(present: &[&'static str]) -> MockEnvironment {
        let mut env = MockEnvironment::new();
        let present: Vec<&'static str> = present.to_vec();
        env.expect_get_var().returning(move |key| {
            if present.contains(&key) {
                Ok("value".to_string())
            } else {
                Err(env::VarError::NotPresent)
            }
        });
        env
    }

    #[test]
    fn test_snapshot_all_present() {
        let env = env_with(&[
            DEEPSEEK_KEY,
            MOONSHOT_KEY,
            OPENAI_KEY,
            VOLCENGINE_ID,
            VOLCENGINE_SECRET,
        ]);
        let creds = CredentialAvailability::snapshot(&env);
        assert_eq!(creds, CredentialAvailability::all());
        assert!(creds.missing_keys().is_empty());
    }

    #[test]
    fn test_kimi_key_is_an_alias_for_moonshot() {
        let env = env_with(&[DEEPSEEK_KEY, KIMI_KEY]);
        let creds = CredentialAvailability::snapshot(&env);
        assert!(creds.moonshot);
    }

    #[test]
    fn test_volcengine_needs_both_halves() {
        let env = env_with(&[DEEPSEEK_KEY, VOLCENGINE_ID]);
        let creds = CredentialAvailability::snapshot(&env);
        assert!(!creds.volcengine);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut env = MockEnvironment::new();
        env.expect_get_var()
            .with(eq(DEEPSEEK_KEY))
            .returning(|_| Ok(String::new()));
        env.expect_get_var()
            .returning(|_| Err(env::VarError::NotPresent));
        let creds = CredentialAvailability::snapshot(&env);
        assert!(!creds.deepseek);
    }

    #[test]
    fn test_missing_keys_lists_each_absent_provider() {
        let creds = CredentialAvailability {
            deepseek: true,
            moonshot: false,
            openai: false,
            volcengine: true,
        };
        let missing = creds.missing_keys();
        assert_eq!(missing.len(), 2);
        assert!(missing[0].contains("MOONSHOT_API_KEY"));
        assert!(missing[1].contains("OPENAI_API_KEY"));
    }
}
