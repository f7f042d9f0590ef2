//! 布尔运算规则
//!
//! `AreaRules` 把当前主体和一批排队的运算折叠成新主体。宿主程序可以
//! 按名称注册自己的实现，进程级默认规则在第一次使用时解析一次并缓存；
//! 名称未注册或构造失败时记录警告并回退到 `MinimalRules`。

use crate::body::Body;
use crate::config::{EngineConfig, MINIMAL_RULES};
use crate::error::{AreaError, Result};
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, Mutex, OnceLock, PoisonError};

/// 布尔运算类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Add,
    Subtract,
    Intersect,
    Xor,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Intersect => "intersect",
            OperationKind::Xor => "xor",
        }
    }

    /// 对两个主体执行一次运算
    pub fn apply(&self, lhs: &Body, rhs: &Body) -> Body {
        match self {
            OperationKind::Add => lhs.add(rhs),
            OperationKind::Subtract => lhs.subtract(rhs),
            OperationKind::Intersect => lhs.intersect(rhs),
            OperationKind::Xor => lhs.xor(rhs),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = AreaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "add" | "union" => Ok(OperationKind::Add),
            "subtract" | "sub" => Ok(OperationKind::Subtract),
            "intersect" => Ok(OperationKind::Intersect),
            "xor" => Ok(OperationKind::Xor),
            other => Err(AreaError::InvalidArgument(format!("unknown operation: {other}"))),
        }
    }
}

/// 运算的右操作数
#[derive(Debug, Clone)]
pub enum Operand {
    /// 已消解的主体
    Body(Body),
    /// 尚未消解的路径，执行时才构造主体
    Path(Path),
}

impl Operand {
    pub fn to_body(&self) -> Body {
        match self {
            Operand::Body(body) => body.resolve(),
            Operand::Path(path) => Body::from_source(path, None),
        }
    }
}

/// 排队的运算
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OperationKind,
    pub operand: Operand,
}

impl Operation {
    pub fn new(kind: OperationKind, operand: Operand) -> Self {
        Self { kind, operand }
    }
}

/// 布尔运算规则
///
/// 实现不得持有除传入主体之外的共享可变状态。
pub trait AreaRules: Send + Sync + fmt::Debug {
    /// 注册名
    fn name(&self) -> &str;

    /// 按顺序把 `ops` 折叠进 `body`
    fn execute(&self, body: &Body, ops: &[Operation]) -> Body;
}

/// 逐条执行
pub fn fold(body: &Body, ops: &[Operation]) -> Body {
    ops.iter().fold(body.resolve(), |acc, op| {
        let rhs = op.operand.to_body();
        op.kind.apply(&acc, &rhs)
    })
}

/// 内置规则：不做批处理，逐条执行
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimalRules;

impl AreaRules for MinimalRules {
    fn name(&self) -> &str {
        MINIMAL_RULES
    }

    fn execute(&self, body: &Body, ops: &[Operation]) -> Body {
        tracing::debug!(count = ops.len(), "folding queued operations");
        fold(body, ops)
    }
}

/// 规则工厂，失败时返回原因
pub type RulesFactory = fn() -> std::result::Result<Arc<dyn AreaRules>, String>;

#[derive(Debug)]
struct RulesRegistry {
    factories: HashMap<String, RulesFactory>,
    config: EngineConfig,
    resolved: bool,
}

impl RulesRegistry {
    fn new(config: EngineConfig) -> Self {
        Self {
            factories: HashMap::new(),
            config,
            resolved: false,
        }
    }

    /// 按配置构造默认规则，失败时回退
    fn build_default(&self) -> Arc<dyn AreaRules> {
        let name = self.config.default_rules.as_str();
        if name == MINIMAL_RULES {
            return minimal_rules();
        }
        let built = match self.factories.get(name) {
            Some(factory) => factory().map_err(|reason| AreaError::RulesConstruction {
                name: name.to_string(),
                reason,
            }),
            None => Err(AreaError::UnknownRules(name.to_string())),
        };
        match built {
            Ok(rules) => {
                tracing::debug!(rules = rules.name(), "default area rules resolved");
                rules
            }
            Err(e) => {
                tracing::warn!("{e}, falling back to {MINIMAL_RULES}");
                minimal_rules()
            }
        }
    }
}

static REGISTRY: LazyLock<Mutex<RulesRegistry>> =
    LazyLock::new(|| Mutex::new(RulesRegistry::new(EngineConfig::from_env())));

static DEFAULT_RULES: OnceLock<Arc<dyn AreaRules>> = OnceLock::new();

fn registry() -> std::sync::MutexGuard<'static, RulesRegistry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 注册命名规则；默认规则解析之后再注册会失败
pub fn register_rules(name: &str, factory: RulesFactory) -> Result<()> {
    let mut reg = registry();
    if reg.resolved {
        return Err(AreaError::RulesAlreadyResolved);
    }
    reg.factories.insert(name.to_string(), factory);
    Ok(())
}

/// 设置引擎配置；默认规则解析之后再设置会失败
pub fn configure(config: EngineConfig) -> Result<()> {
    let mut reg = registry();
    if reg.resolved {
        return Err(AreaError::RulesAlreadyResolved);
    }
    reg.config = config;
    Ok(())
}

/// 进程级默认规则
pub fn default_rules() -> Arc<dyn AreaRules> {
    DEFAULT_RULES
        .get_or_init(|| {
            let mut reg = registry();
            reg.resolved = true;
            reg.build_default()
        })
        .clone()
}

/// 内置规则实例
pub fn minimal_rules() -> Arc<dyn AreaRules> {
    static MINIMAL: OnceLock<Arc<dyn AreaRules>> = OnceLock::new();
    MINIMAL.get_or_init(|| Arc::new(MinimalRules)).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use approx::assert_relative_eq;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Operand {
        Operand::Path(Path::rectangle(x, y, w, h))
    }

    #[derive(Debug)]
    struct EmptyRules;

    impl AreaRules for EmptyRules {
        fn name(&self) -> &str {
            "empty"
        }

        fn execute(&self, _body: &Body, _ops: &[Operation]) -> Body {
            Body::empty()
        }
    }

    fn empty_factory() -> std::result::Result<Arc<dyn AreaRules>, String> {
        Ok(Arc::new(EmptyRules))
    }

    fn failing_factory() -> std::result::Result<Arc<dyn AreaRules>, String> {
        Err("no backend".to_string())
    }

    #[test]
    fn test_fold_respects_order() {
        let ops_a = [
            Operation::new(OperationKind::Subtract, rect(0.0, 0.0, 5.0, 5.0)),
            Operation::new(OperationKind::Add, rect(0.0, 0.0, 5.0, 5.0)),
        ];
        let ops_b = [ops_a[1].clone(), ops_a[0].clone()];
        let base = Body::from_source(&Path::rectangle(0.0, 0.0, 10.0, 10.0), None);
        assert_relative_eq!(fold(&base, &ops_a).area(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(fold(&base, &ops_b).area(), 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fold_empty_queue_is_identity() {
        let base = Body::from_source(&Path::rectangle(0.0, 0.0, 2.0, 2.0), None);
        assert!(fold(&base, &[]).equals(&base));
    }

    #[test]
    fn test_registry_builds_registered_rules() {
        let mut reg = RulesRegistry::new(EngineConfig::default().with_rules("empty"));
        reg.factories.insert("empty".to_string(), empty_factory);
        assert_eq!(reg.build_default().name(), "empty");
    }

    #[test]
    fn test_registry_falls_back_on_failure() {
        let reg = RulesRegistry::new(EngineConfig::default().with_rules("missing"));
        assert_eq!(reg.build_default().name(), MINIMAL_RULES);
        let mut reg = RulesRegistry::new(EngineConfig::default().with_rules("broken"));
        reg.factories.insert("broken".to_string(), failing_factory);
        assert_eq!(reg.build_default().name(), MINIMAL_RULES);
    }

    #[test]
    fn test_registration_closes_after_resolution() {
        let first = default_rules();
        assert!(Arc::ptr_eq(&first, &default_rules()));
        assert_eq!(register_rules("late", empty_factory), Err(AreaError::RulesAlreadyResolved));
        assert_eq!(configure(EngineConfig::default()), Err(AreaError::RulesAlreadyResolved));
    }

    #[test]
    fn test_operation_kind_parse() {
        assert_eq!("XOR".parse::<OperationKind>(), Ok(OperationKind::Xor));
        assert_eq!("union".parse::<OperationKind>(), Ok(OperationKind::Add));
        assert!("merge".parse::<OperationKind>().is_err());
    }
}
