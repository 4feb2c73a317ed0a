//! 积木编辑器内核错误类型定义
//!
//! 本模块定义了内核中使用的所有错误类型，以及启动流程中的
//! 错误分级（致命 / 可容忍）。

use thiserror::Error;

/// 内核核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    // ==================== 配置错误 ====================

    /// 配置无效
    #[error("配置无效: {0}")]
    InvalidConfiguration(String),

    /// 挂载目标冲突（holder 和 holder_id 同时设置）
    #[error("挂载目标冲突: holder 与 holder_id 不能同时设置")]
    ConflictingMountTarget,

    /// 挂载目标未找到
    #[error("挂载目标未找到: '{0}'")]
    MountTargetNotFound(String),

    /// 挂载目标类型错误
    #[error("挂载目标类型错误: '{id}' 是 {found}，需要容器表面")]
    InvalidMountSurface {
        /// 挂载目标标识
        id: String,
        /// 实际发现的表面类型
        found: String,
    },

    // ==================== 模块错误 ====================

    /// 模块构造失败（可容忍：该模块被省略）
    #[error("模块构造失败: '{module}' - {reason}")]
    ModuleConstructionFailed {
        /// 模块标识
        module: String,
        /// 失败原因
        reason: String,
    },

    /// 模块准备阶段的致命错误（中止整个启动序列）
    #[error("模块致命错误: '{module}' - {reason}")]
    FatalModule {
        /// 模块标识
        module: String,
        /// 失败原因
        reason: String,
    },

    /// 模块准备阶段的瞬时错误（可容忍：该模块降级运行）
    #[error("模块准备失败: '{module}' - {reason}")]
    ModulePrepareFailed {
        /// 模块标识
        module: String,
        /// 失败原因
        reason: String,
    },

    /// 模块未找到
    #[error("模块未找到: '{0}'")]
    ModuleNotFound(String),

    /// 模块方法未找到
    #[error("模块方法未找到: '{module}.{method}'")]
    MethodNotFound {
        /// 模块标识
        module: String,
        /// 方法名
        method: String,
    },

    // ==================== 生命周期错误 ====================

    /// 当前阶段不允许该操作
    #[error("生命周期阶段 {phase} 不允许执行 {operation}")]
    InvalidPhase {
        /// 当前阶段
        phase: String,
        /// 被拒绝的操作
        operation: String,
    },

    /// 渲染失败
    #[error("渲染失败: {0}")]
    RenderFailed(String),

    /// 外观已销毁，拒绝后续调用
    #[error("编辑器已销毁")]
    AlreadyDestroyed,

    // ==================== 事件系统错误 ====================

    /// 订阅未找到
    #[error("订阅未找到: '{0}'")]
    SubscriptionNotFound(String),

    // ==================== IO 和序列化错误 ====================

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML 序列化/反序列化错误
    #[error("YAML 错误: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ==================== 通用错误 ====================

    /// 初始化失败
    #[error("初始化失败: {0}")]
    InitFailed(String),

    /// 其他错误
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// 内核操作结果类型别名
pub type Result<T> = std::result::Result<T, CoreError>;

/// 启动流程中的错误分级
///
/// 只有配置错误和模块致命错误会穿透顶层边界、导致就绪信号被拒绝；
/// 其余错误在各阶段内部被吸收并记录日志。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 配置错误：校验阶段产生，此时尚无任何模块实例
    Configuration,
    /// 构造错误：模块工厂失败，该模块被省略
    Construction,
    /// 致命模块错误：中止剩余启动序列
    FatalModule,
    /// 瞬时模块错误：记录后继续
    TransientModule,
    /// 其他错误
    Other,
}

impl CoreError {
    /// 获取错误分级
    pub fn class(&self) -> ErrorClass {
        match self {
            CoreError::InvalidConfiguration(_)
            | CoreError::ConflictingMountTarget
            | CoreError::MountTargetNotFound(_)
            | CoreError::InvalidMountSurface { .. } => ErrorClass::Configuration,
            CoreError::ModuleConstructionFailed { .. } => ErrorClass::Construction,
            CoreError::FatalModule { .. } => ErrorClass::FatalModule,
            CoreError::ModulePrepareFailed { .. } => ErrorClass::TransientModule,
            _ => ErrorClass::Other,
        }
    }

    /// 是否为致命错误（需要中止启动并拒绝就绪信号）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Configuration | ErrorClass::FatalModule
        ) || matches!(
            self,
            CoreError::RenderFailed(_) | CoreError::InvalidPhase { .. }
        )
    }

    /// 构造模块致命错误的便捷方法
    pub fn fatal(module: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::FatalModule {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// 构造模块瞬时错误的便捷方法
    pub fn transient(module: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::ModulePrepareFailed {
            module: module.into(),
            reason: reason.into(),
        }
    }
}
