use std::env;

use super::ProviderKind;

pub const DEEPSEEK_HOST: &str = "https://api.deepseek.com";
pub const KIMI_HOST: &str = "https://api.moonshot.cn";
pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const VOLCENGINE_HOST: &str = "https://openspeech.bytedance.com";

/// Connection details for one upstream endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub host: String,
    pub api_key: String,
}

impl EndpointConfig {
    pub fn new<H: Into<String>, K: Into<String>>(host: H, api_key: K) -> Self {
        EndpointConfig {
            host: host.into(),
            api_key: api_key.into(),
        }
    }
}

/// Endpoint configuration for every provider the dispatcher can reach.
///
/// Request shaping (temperature, token budget) lives here too so the wire
/// formatter stays a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub deepseek: EndpointConfig,
    pub kimi: EndpointConfig,
    pub openai: EndpointConfig,
    pub volcengine: EndpointConfig,
    pub temperature: f32,
    pub max_tokens: i32,
}

impl DispatchConfig {
    /// Read endpoints from environment variables, with the public hosts as
    /// defaults. Credentials absent from the environment stay empty; the
    /// router never selects a provider whose credential is missing.
    pub fn from_env() -> Self {
        let var = |key: &str| env::var(key).unwrap_or_default();
        let host = |key: &str, default: &str| {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };
        DispatchConfig {
            deepseek: EndpointConfig::new(
                host("DEEPSEEK_BASE_URL", DEEPSEEK_HOST),
                var("DEEPSEEK_API_KEY"),
            ),
            kimi: EndpointConfig::new(
                host("MOONSHOT_BASE_URL", KIMI_HOST),
                if var("MOONSHOT_API_KEY").is_empty() {
                    var("KIMI_API_KEY")
                } else {
                    var("MOONSHOT_API_KEY")
                },
            ),
            openai: EndpointConfig::new(
                host("OPENAI_BASE_URL", OPENAI_HOST),
                var("OPENAI_API_KEY"),
            ),
            volcengine: EndpointConfig::new(
                host("VOLCENGINE_BASE_URL", VOLCENGINE_HOST),
                var("VOLCENGINE_ACCESS_KEY_ID"),
            ),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }

    pub fn endpoint(&self, provider: ProviderKind) -> &EndpointConfig {
        match provider {
            ProviderKind::DeepSeek => &self.deepseek,
            ProviderKind::Kimi => &self.kimi,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Volcengine => &self.volcengine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DispatchConfig {
        DispatchConfig {
            deepseek: EndpointConfig::new("http://localhost:1", "a"),
            kimi: EndpointConfig::new("http://localhost:2", "b"),
            openai: EndpointConfig::new("http://localhost:3", "c"),
            volcengine: EndpointConfig::new("http://localhost:4", "d"),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }

    #[test]
    fn test_endpoint_lookup_is_exhaustive() {
        let config = test_config();
        assert_eq!(config.endpoint(ProviderKind::DeepSeek).api_key, "a");
        assert_eq!(config.endpoint(ProviderKind::Kimi).api_key, "b");
        assert_eq!(config.endpoint(ProviderKind::OpenAi).api_key, "c");
        assert_eq!(config.endpoint(ProviderKind::Volcengine).api_key, "d");
    }
}
