//! 编辑器外观
//!
//! [`EditorBuilder`] 装配配置、注册表和协作者接口，驱动完整的
//! 启动序列；[`Editor`] 是启动成功后交给宿主的稳定外观：
//! 配置快照、动态方法转发和显式销毁。
//!
//! 外观的动态方法不在外观上动态生长：所有未命名调用统一经由
//! [`Editor::call`] 转发给指定的提供者模块。

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::config::EditorConfig;
use crate::core::environment::{Environment, StaticEnvironment};
use crate::core::renderer::{NullRenderer, Renderer};
use crate::event::EventBus;
use crate::module::instance::SharedModule;
use crate::module::kind::ModuleKind;
use crate::module::lifecycle::{LifecycleController, LifecyclePhase};
use crate::module::registry::ModuleRegistry;
use crate::utils::{CoreError, Result};

// ============================================================================
// 外观构建器
// ============================================================================

/// 编辑器外观构建器
///
/// 未显式设置的协作者使用空实现：空环境、空呈现、空注册表。
pub struct EditorBuilder {
    config: EditorConfig,
    registry: ModuleRegistry,
    environment: Arc<dyn Environment>,
    renderer: Arc<dyn Renderer>,
    provider: ModuleKind,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorBuilder {
    /// 创建外观构建器
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            registry: ModuleRegistry::default(),
            environment: Arc::new(StaticEnvironment::new()),
            renderer: Arc::new(NullRenderer),
            provider: ModuleKind::Api,
        }
    }

    /// 设置编辑器配置
    ///
    /// 裸字符串可直接传入，作为仅指定挂载标识的配置。
    pub fn config(mut self, config: impl Into<EditorConfig>) -> Self {
        self.config = config.into();
        self
    }

    /// 设置模块注册表
    pub fn registry(mut self, registry: ModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 设置环境协作者
    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    /// 设置呈现协作者
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// 设置动态方法的提供者模块
    pub fn provider(mut self, kind: ModuleKind) -> Self {
        self.provider = kind;
        self
    }

    /// 驱动完整启动序列，返回就绪的编辑器外观
    ///
    /// 致命错误（配置错误、模块致命错误、渲染失败）由控制器转入
    /// 失败态并拒绝就绪信号，随后向调用方返回该错误。
    pub async fn boot(self) -> Result<Editor> {
        let mut controller = LifecycleController::new(
            self.config,
            self.environment,
            self.renderer,
            self.registry,
            EventBus::new(),
        );

        controller.validate()?;
        controller.init().await?;
        controller.start().await?;
        controller.render().await?;

        let provider = controller.module(self.provider);
        if provider.is_none() {
            warn!(provider = %self.provider, "提供者模块缺席，动态方法不可用");
        }

        info!("编辑器外观就绪");
        Ok(Editor {
            configuration: Some(controller.config().clone()),
            provider,
            provider_kind: self.provider,
            controller: Some(controller),
            destroyed: false,
        })
    }
}

impl fmt::Debug for EditorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorBuilder")
            .field("config", &self.config)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// 编辑器外观
// ============================================================================

/// 编辑器外观
///
/// 宿主持有的稳定表面。销毁后所有入口统一返回
/// [`CoreError::AlreadyDestroyed`]。
pub struct Editor {
    configuration: Option<Arc<EditorConfig>>,
    controller: Option<LifecycleController>,
    provider: Option<SharedModule>,
    provider_kind: ModuleKind,
    destroyed: bool,
}

impl Editor {
    /// 创建外观构建器
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    /// 生效配置（含合并的默认值）
    pub fn configuration(&self) -> Result<Arc<EditorConfig>> {
        self.configuration
            .clone()
            .ok_or(CoreError::AlreadyDestroyed)
    }

    /// 当前生命周期阶段
    pub fn phase(&self) -> Result<LifecyclePhase> {
        self.controller
            .as_ref()
            .map(|c| c.phase())
            .ok_or(CoreError::AlreadyDestroyed)
    }

    /// 事件总线
    pub fn bus(&self) -> Result<&EventBus> {
        self.controller
            .as_ref()
            .map(|c| c.bus())
            .ok_or(CoreError::AlreadyDestroyed)
    }

    /// 按身份查找存活模块
    pub fn module(&self, kind: ModuleKind) -> Result<Option<SharedModule>> {
        self.controller
            .as_ref()
            .map(|c| c.module(kind))
            .ok_or(CoreError::AlreadyDestroyed)
    }

    /// 是否已销毁
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// 调用动态方法
    ///
    /// 转发给提供者模块的动态方法表面；外观自身不承载任何
    /// 动态生长的方法。
    pub async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        if self.destroyed {
            return Err(CoreError::AlreadyDestroyed);
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| CoreError::ModuleNotFound(self.provider_kind.to_string()))?;

        provider.read().await.call(method, params).await
    }

    /// 销毁编辑器
    ///
    /// 依次：调用每个存活模块的销毁钩子、清理它们的事件订阅、
    /// 发布销毁事件，然后剥离外观的全部内部状态。重复销毁返回
    /// [`CoreError::AlreadyDestroyed`]。
    pub async fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(CoreError::AlreadyDestroyed);
        }

        if let Some(mut controller) = self.controller.take() {
            controller.shutdown().await;
        }
        self.configuration = None;
        self.provider = None;
        self.destroyed = true;

        info!("编辑器已销毁");
        Ok(())
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("destroyed", &self.destroyed)
            .field("provider_kind", &self.provider_kind)
            .field("phase", &self.controller.as_ref().map(|c| c.phase()))
            .finish_non_exhaustive()
    }
}
