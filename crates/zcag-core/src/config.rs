//! 引擎配置

use serde::{Deserialize, Serialize};

/// 覆盖默认规则名称的环境变量
pub const RULES_ENV_VAR: &str = "ZCAG_AREA_RULES";

/// 内置规则的注册名
pub const MINIMAL_RULES: &str = "minimal";

/// 进程级引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 默认布尔运算规则的注册名
    pub default_rules: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rules: MINIMAL_RULES.to_string(),
        }
    }
}

impl EngineConfig {
    /// 读取环境变量，未设置或为空时使用默认值
    pub fn from_env() -> Self {
        match std::env::var(RULES_ENV_VAR) {
            Ok(name) if !name.trim().is_empty() => Self::default().with_rules(name.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_rules(mut self, name: impl Into<String>) -> Self {
        self.default_rules = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_minimal() {
        assert_eq!(EngineConfig::default().default_rules, MINIMAL_RULES);
    }

    #[test]
    fn test_with_rules() {
        let config = EngineConfig::default().with_rules("batched");
        assert_eq!(config.default_rules, "batched");
    }

    #[test]
    fn test_json_round_trip_field_name() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert!(json.contains("default_rules"));
    }
}
