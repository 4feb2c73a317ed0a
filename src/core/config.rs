//! 编辑器配置
//!
//! 定义编辑器的配置结构和加载逻辑。配置在校验阶段之后只读，
//! 通过 `Arc` 共享给所有模块实例，任何模块都不得修改它。

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::environment::SurfaceHandle;
use crate::utils::{CoreError, Result};

/// 默认挂载目标标识
///
/// 未显式指定挂载目标时使用的容器标识。
pub const DEFAULT_HOLDER_ID: &str = "jimu-editor";

/// 就绪回调类型
///
/// 就绪信号首次成功落定时调用一次。
pub type ReadyCallback = Arc<dyn Fn() + Send + Sync>;

// ============================================================================
// 初始内容
// ============================================================================

/// 单个内容块的数据
///
/// 内核不解释块的内部语义，只负责把它交给呈现协作者。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockData {
    /// 块标识（可选，呈现协作者可自行分配）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// 块类型名称
    #[serde(rename = "type")]
    pub block_type: String,

    /// 块的内容负载
    #[serde(default)]
    pub data: serde_json::Value,
}

impl BlockData {
    /// 创建新的内容块
    pub fn new(block_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: None,
            block_type: block_type.into(),
            data,
        }
    }
}

/// 初始内容负载
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContentData {
    /// 内容块列表
    #[serde(default)]
    pub blocks: Vec<BlockData>,

    /// 内容格式版本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ContentData {
    /// 是否没有任何内容块
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

// ============================================================================
// 挂载目标
// ============================================================================

/// 解析后的挂载目标
///
/// 配置中两种互斥形式之一：直接表面引用，或待环境解析的标识。
#[derive(Debug, Clone, PartialEq)]
pub enum MountTarget {
    /// 直接的表面引用
    Direct(SurfaceHandle),
    /// 按标识查找
    ById(String),
}

// ============================================================================
// 编辑器配置
// ============================================================================

/// 编辑器配置
///
/// 由生命周期控制器持有整个进程生命周期；通过引用共享给每个模块。
/// 校验之后配置不再变更。
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    /// 挂载目标标识（与 `holder` 互斥）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_id: Option<String>,

    /// 直接的挂载目标引用（与 `holder_id` 互斥，不参与序列化）
    #[serde(skip)]
    pub holder: Option<SurfaceHandle>,

    /// 初始内容负载
    #[serde(default)]
    pub data: ContentData,

    /// 渲染完成后是否将光标移动到第一个内容块
    #[serde(default)]
    pub autofocus: bool,

    /// 就绪回调（不参与序列化）
    #[serde(skip)]
    pub on_ready: Option<ReadyCallback>,
}

impl fmt::Debug for EditorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorConfig")
            .field("holder_id", &self.holder_id)
            .field("holder", &self.holder)
            .field("data", &self.data)
            .field("autofocus", &self.autofocus)
            .field("on_ready", &self.on_ready.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl EditorConfig {
    /// 创建配置构建器
    pub fn builder() -> EditorConfigBuilder {
        EditorConfigBuilder::new()
    }

    /// 从文件加载配置（支持 JSON 和 YAML）
    pub async fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = tokio::fs::read_to_string(&path).await?;

        let config: EditorConfig = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(config)
    }

    /// 合并默认值，得到生效配置
    ///
    /// 两种挂载形式都未设置时，填充默认挂载标识。
    pub fn normalized(mut self) -> Self {
        if self.holder.is_none() && self.holder_id.is_none() {
            self.holder_id = Some(DEFAULT_HOLDER_ID.to_string());
        }
        self
    }

    /// 解析挂载目标
    ///
    /// # Errors
    ///
    /// 两种互斥形式同时设置时返回 [`CoreError::ConflictingMountTarget`]；
    /// 两者都缺失时返回配置错误（生效配置经过 [`Self::normalized`] 后不会出现）。
    pub fn mount_target(&self) -> Result<MountTarget> {
        match (&self.holder, &self.holder_id) {
            (Some(_), Some(_)) => Err(CoreError::ConflictingMountTarget),
            (Some(surface), None) => Ok(MountTarget::Direct(surface.clone())),
            (None, Some(id)) => Ok(MountTarget::ById(id.clone())),
            (None, None) => Err(CoreError::InvalidConfiguration(
                "未指定挂载目标".to_string(),
            )),
        }
    }
}

/// 裸字符串是"仅指定挂载标识的配置"的语法糖
impl From<&str> for EditorConfig {
    fn from(holder_id: &str) -> Self {
        Self {
            holder_id: Some(holder_id.to_string()),
            ..Default::default()
        }
    }
}

impl From<String> for EditorConfig {
    fn from(holder_id: String) -> Self {
        Self {
            holder_id: Some(holder_id),
            ..Default::default()
        }
    }
}

// ============================================================================
// 配置构建器
// ============================================================================

/// 编辑器配置构建器
#[derive(Debug, Default)]
pub struct EditorConfigBuilder {
    config: EditorConfig,
}

impl EditorConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
        }
    }

    /// 设置挂载目标标识
    pub fn holder_id(mut self, id: impl Into<String>) -> Self {
        self.config.holder_id = Some(id.into());
        self
    }

    /// 设置直接挂载目标
    pub fn holder(mut self, surface: SurfaceHandle) -> Self {
        self.config.holder = Some(surface);
        self
    }

    /// 设置初始内容
    pub fn data(mut self, data: ContentData) -> Self {
        self.config.data = data;
        self
    }

    /// 追加一个初始内容块
    pub fn block(mut self, block: BlockData) -> Self {
        self.config.data.blocks.push(block);
        self
    }

    /// 设置自动聚焦
    pub fn autofocus(mut self, enable: bool) -> Self {
        self.config.autofocus = enable;
        self
    }

    /// 设置就绪回调
    pub fn on_ready(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.config.on_ready = Some(Arc::new(callback));
        self
    }

    /// 构建配置
    pub fn build(self) -> EditorConfig {
        self.config
    }
}
