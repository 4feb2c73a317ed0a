//! 生命周期控制器
//!
//! 驱动编辑器从配置校验到就绪的多阶段启动序列：
//!
//! 1. `validate` - 校验配置并解析挂载目标（此时尚无任何模块实例）
//! 2. `init` - 实例化全部模块并注入对等视图
//! 3. `start` - 按固定顺序严格串行地等待各模块准备完成
//! 4. `render` - 等待副作用任务结束，委托呈现协作者渲染初始内容
//!
//! 渲染成功后阶段推进到就绪，就绪信号落定并触发回调。
//! 致命错误（配置错误、模块致命错误、渲染失败）使阶段进入失败态
//! 并拒绝就绪信号；其余错误在各阶段内部被吸收并记录日志。

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::core::config::{EditorConfig, MountTarget, ReadyCallback};
use crate::core::environment::{Environment, SurfaceHandle};
use crate::core::renderer::Renderer;
use crate::event::EventBus;
use crate::module::injector::DependencyInjector;
use crate::module::instance::{ModuleContext, SharedModule};
use crate::module::kind::{ModuleKind, START_ORDER};
use crate::module::registry::ModuleRegistry;
use crate::utils::{CoreError, Result};

/// 初始化完成事件
pub const EVENT_INITIALIZED: &str = "lifecycle.initialized";
/// 编辑器就绪事件
pub const EVENT_READY: &str = "lifecycle.ready";
/// 启动失败事件
pub const EVENT_FAILED: &str = "lifecycle.failed";
/// 编辑器销毁事件
pub const EVENT_DESTROYED: &str = "lifecycle.destroyed";

// ============================================================================
// 生命周期阶段
// ============================================================================

/// 生命周期阶段
///
/// 阶段只能沿启动序列单向推进；任何越阶操作都会被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// 已创建，尚未校验
    Created,
    /// 校验配置中
    Validating,
    /// 实例化模块中
    Initializing,
    /// 准备模块中
    Starting,
    /// 渲染初始内容中
    Rendering,
    /// 就绪，可接受外部调用
    Ready,
    /// 启动失败
    Failed,
}

impl LifecyclePhase {
    /// 阶段名称
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Created => "created",
            LifecyclePhase::Validating => "validating",
            LifecyclePhase::Initializing => "initializing",
            LifecyclePhase::Starting => "starting",
            LifecyclePhase::Rendering => "rendering",
            LifecyclePhase::Ready => "ready",
            LifecyclePhase::Failed => "failed",
        }
    }

    /// 是否已就绪
    pub fn is_ready(&self) -> bool {
        matches!(self, LifecyclePhase::Ready)
    }

    /// 是否处于失败态
    pub fn is_failed(&self) -> bool {
        matches!(self, LifecyclePhase::Failed)
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// 就绪信号
// ============================================================================

/// 就绪信号
///
/// 单次落定：首次 `resolve` 或 `reject` 之后状态不再变化，
/// 后续落定尝试只记录警告。回调仅在成功落定时触发一次。
pub struct ReadinessSignal {
    settled: bool,
    resolved: bool,
    callback: Option<ReadyCallback>,
}

impl ReadinessSignal {
    /// 创建未落定的就绪信号
    pub fn new(callback: Option<ReadyCallback>) -> Self {
        Self {
            settled: false,
            resolved: false,
            callback,
        }
    }

    /// 成功落定，触发就绪回调
    pub fn resolve(&mut self) {
        if self.settled {
            warn!("就绪信号已落定，忽略重复的 resolve");
            return;
        }
        self.settled = true;
        self.resolved = true;
        if let Some(callback) = &self.callback {
            callback();
        }
    }

    /// 失败落定，不触发回调
    pub fn reject(&mut self) {
        if self.settled {
            warn!("就绪信号已落定，忽略重复的 reject");
            return;
        }
        self.settled = true;
        self.resolved = false;
    }

    /// 是否已落定
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// 是否成功落定
    pub fn is_resolved(&self) -> bool {
        self.settled && self.resolved
    }
}

impl fmt::Debug for ReadinessSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessSignal")
            .field("settled", &self.settled)
            .field("resolved", &self.resolved)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

// ============================================================================
// 生命周期控制器
// ============================================================================

/// 生命周期控制器
///
/// 持有生效配置、事件总线、协作者接口和全部存活模块实例，
/// 是启动序列各阶段的唯一驱动者。
pub struct LifecycleController {
    config: Arc<EditorConfig>,
    bus: EventBus,
    environment: Arc<dyn Environment>,
    renderer: Arc<dyn Renderer>,
    registry: ModuleRegistry,
    ctx: ModuleContext,
    modules: Vec<(ModuleKind, SharedModule)>,
    phase: LifecyclePhase,
    readiness: ReadinessSignal,
}

impl LifecycleController {
    /// 创建生命周期控制器
    ///
    /// 配置在此合并默认值，之后只读。
    pub fn new(
        config: EditorConfig,
        environment: Arc<dyn Environment>,
        renderer: Arc<dyn Renderer>,
        registry: ModuleRegistry,
        bus: EventBus,
    ) -> Self {
        let callback = config.on_ready.clone();
        let config = Arc::new(config.normalized());
        let ctx = ModuleContext::new(config.clone(), bus.clone());

        Self {
            config,
            bus,
            environment,
            renderer,
            registry,
            ctx,
            modules: Vec::new(),
            phase: LifecyclePhase::Created,
            readiness: ReadinessSignal::new(callback),
        }
    }

    /// 校验配置
    ///
    /// 解析挂载目标：两种互斥形式冲突、标识查不到表面、表面
    /// 不是容器，都是配置错误。配置错误发生时尚无任何模块实例；
    /// 控制器进入失败态并拒绝就绪信号。
    pub fn validate(&mut self) -> Result<()> {
        self.require_phase(LifecyclePhase::Created, "validate")?;
        self.phase = LifecyclePhase::Validating;

        match self.resolve_mount_surface() {
            Ok(surface) => {
                debug!(surface = %surface.id, "配置校验通过");
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn resolve_mount_surface(&self) -> Result<SurfaceHandle> {
        let surface = match self.config.mount_target()? {
            MountTarget::Direct(surface) => surface,
            MountTarget::ById(id) => self
                .environment
                .query(&id)
                .ok_or_else(|| CoreError::MountTargetNotFound(id.clone()))?,
        };

        if !self.environment.is_container(&surface) {
            return Err(CoreError::InvalidMountSurface {
                id: surface.id.clone(),
                found: surface.kind.to_string(),
            });
        }
        Ok(surface)
    }

    /// 实例化模块并注入对等视图
    ///
    /// 模块构造失败是可容忍的：坏模块被省略，对等视图中自然缺席。
    pub async fn init(&mut self) -> Result<()> {
        self.require_phase(LifecyclePhase::Validating, "init")?;
        self.phase = LifecyclePhase::Initializing;

        self.modules = self.registry.instantiate(&self.ctx);
        DependencyInjector::new()
            .assign_peer_views(&self.modules)
            .await;

        info!(modules = self.modules.len(), "模块初始化完成");
        self.bus.emit(
            EVENT_INITIALIZED,
            &serde_json::json!({ "modules": self.modules.len() }),
        );
        Ok(())
    }

    /// 按固定顺序准备各模块
    ///
    /// 严格串行：前一个模块准备完成后才轮到下一个。致命错误中止
    /// 剩余序列并使控制器进入失败态；瞬时错误被记录后跳过，
    /// 该模块以降级状态继续存在。
    pub async fn start(&mut self) -> Result<()> {
        self.require_phase(LifecyclePhase::Initializing, "start")?;
        self.phase = LifecyclePhase::Starting;

        for kind in START_ORDER {
            let Some(instance) = self.module(*kind) else {
                debug!(module = %kind, "模块缺席，跳过准备");
                continue;
            };

            let mut module = instance.write().await;
            match module.prepare().await {
                Ok(()) => {
                    debug!(module = %kind, "模块准备完成");
                }
                Err(e) if e.is_fatal() => {
                    drop(module);
                    self.fail(&e);
                    return Err(e);
                }
                Err(e) => {
                    warn!(module = %kind, error = %e, "模块准备失败，降级继续");
                }
            }
        }

        info!("启动序列完成");
        Ok(())
    }

    /// 渲染初始内容并推进到就绪
    ///
    /// 先等待准备阶段登记的全部副作用任务结束（显式完成信号），
    /// 再委托呈现协作者渲染。自动聚焦是尽力而为的：失败只记录。
    pub async fn render(&mut self) -> Result<()> {
        self.require_phase(LifecyclePhase::Starting, "render")?;
        self.phase = LifecyclePhase::Rendering;

        let handles = self.ctx.drain_side_effects();
        if !handles.is_empty() {
            debug!(count = handles.len(), "等待副作用任务结束");
            for result in join_all(handles).await {
                if let Err(e) = result {
                    warn!(error = %e, "副作用任务异常结束");
                }
            }
        }

        if let Err(e) = self.renderer.render(&self.config.data).await {
            self.fail(&e);
            return Err(e);
        }

        if self.config.autofocus {
            if let Err(e) = self.renderer.focus_first_block().await {
                warn!(error = %e, "自动聚焦失败");
            }
        }

        self.phase = LifecyclePhase::Ready;
        self.readiness.resolve();
        info!(blocks = self.config.data.blocks.len(), "编辑器就绪");
        self.bus.emit(EVENT_READY, &serde_json::json!({}));
        Ok(())
    }

    /// 进入失败态并拒绝就绪信号
    pub fn fail(&mut self, error: &CoreError) {
        error!(error = %error, phase = %self.phase, "启动失败");
        self.phase = LifecyclePhase::Failed;
        self.readiness.reject();
        self.bus.emit(
            EVENT_FAILED,
            &serde_json::json!({ "error": error.to_string() }),
        );
    }

    /// 关停：销毁全部模块，再清理它们的订阅
    ///
    /// 两轮遍历：销毁钩子先于任何订阅清理执行，钩子发布的事件
    /// 仍能送达兄弟模块的监听器。
    pub async fn shutdown(&mut self) {
        for (kind, instance) in &self.modules {
            debug!(module = %kind, "销毁模块");
            instance.write().await.dispose().await;
        }
        for (kind, _) in &self.modules {
            self.bus.unsubscribe_all(kind.as_str());
        }
        self.modules.clear();
        self.bus.emit(EVENT_DESTROYED, &serde_json::json!({}));
        info!("生命周期控制器已关停");
    }

    /// 按身份查找存活模块
    pub fn module(&self, kind: ModuleKind) -> Option<SharedModule> {
        self.modules
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
    }

    /// 存活模块的身份列表（按注册顺序）
    pub fn module_kinds(&self) -> Vec<ModuleKind> {
        self.modules.iter().map(|(k, _)| *k).collect()
    }

    /// 当前阶段
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// 生效配置
    pub fn config(&self) -> &Arc<EditorConfig> {
        &self.config
    }

    /// 事件总线
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// 就绪信号
    pub fn readiness(&self) -> &ReadinessSignal {
        &self.readiness
    }

    fn require_phase(&self, expected: LifecyclePhase, operation: &str) -> Result<()> {
        if self.phase != expected {
            return Err(CoreError::InvalidPhase {
                phase: self.phase.to_string(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("phase", &self.phase)
            .field("modules", &self.module_kinds())
            .field("readiness", &self.readiness)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ContentData;
    use crate::core::environment::{StaticEnvironment, SurfaceHandle, SurfaceKind};
    use crate::core::renderer::NullRenderer;
    use crate::module::instance::EditorModule;
    use crate::module::registry::ModuleDescriptor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingModule {
        kind: ModuleKind,
        log: Arc<Mutex<Vec<ModuleKind>>>,
        prepare_result: Option<CoreError>,
    }

    #[async_trait]
    impl EditorModule for RecordingModule {
        fn kind(&self) -> ModuleKind {
            self.kind
        }

        async fn prepare(&mut self) -> Result<()> {
            self.log.lock().unwrap().push(self.kind);
            match self.prepare_result.take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn recording_descriptor(
        kind: ModuleKind,
        log: Arc<Mutex<Vec<ModuleKind>>>,
    ) -> ModuleDescriptor {
        ModuleDescriptor::new(kind, move |_ctx| {
            Ok(Box::new(RecordingModule {
                kind,
                log: log.clone(),
                prepare_result: None,
            }) as Box<dyn EditorModule>)
        })
    }

    fn failing_prepare_descriptor(
        kind: ModuleKind,
        log: Arc<Mutex<Vec<ModuleKind>>>,
        fatal: bool,
    ) -> ModuleDescriptor {
        ModuleDescriptor::new(kind, move |_ctx| {
            let error = if fatal {
                CoreError::fatal(kind.to_string(), "准备失败")
            } else {
                CoreError::transient(kind.to_string(), "准备失败")
            };
            Ok(Box::new(RecordingModule {
                kind,
                log: log.clone(),
                prepare_result: Some(error),
            }) as Box<dyn EditorModule>)
        })
    }

    fn test_env() -> Arc<dyn Environment> {
        Arc::new(StaticEnvironment::new().with_surface(SurfaceHandle::container("editor-holder")))
    }

    fn controller_with(registry: ModuleRegistry) -> LifecycleController {
        LifecycleController::new(
            EditorConfig::from("editor-holder"),
            test_env(),
            Arc::new(NullRenderer),
            registry,
            EventBus::new(),
        )
    }

    #[test]
    fn test_validate_resolves_mount_target() {
        let mut controller = controller_with(ModuleRegistry::builder().build());
        assert!(controller.validate().is_ok());
        assert_eq!(controller.phase(), LifecyclePhase::Validating);
    }

    #[test]
    fn test_validate_missing_target() {
        let mut controller = LifecycleController::new(
            EditorConfig::from("nowhere"),
            Arc::new(StaticEnvironment::new()),
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        assert!(matches!(
            controller.validate(),
            Err(CoreError::MountTargetNotFound(id)) if id == "nowhere"
        ));
        assert_eq!(controller.phase(), LifecyclePhase::Failed);
        assert!(controller.readiness().is_settled());
    }

    #[test]
    fn test_validate_rejects_non_container() {
        let env = Arc::new(
            StaticEnvironment::new()
                .with_surface(SurfaceHandle::new("text-surface", SurfaceKind::Text)),
        );
        let mut controller = LifecycleController::new(
            EditorConfig::from("text-surface"),
            env,
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        assert!(matches!(
            controller.validate(),
            Err(CoreError::InvalidMountSurface { .. })
        ));
    }

    #[test]
    fn test_validate_conflicting_forms() {
        let config = EditorConfig {
            holder_id: Some("a".to_string()),
            holder: Some(SurfaceHandle::container("b")),
            ..Default::default()
        };
        let mut controller = LifecycleController::new(
            config,
            test_env(),
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        assert!(matches!(
            controller.validate(),
            Err(CoreError::ConflictingMountTarget)
        ));
        // 配置错误发生时尚无任何模块实例
        assert!(controller.module_kinds().is_empty());
    }

    #[test]
    fn test_default_holder_fills_in() {
        let env = Arc::new(
            StaticEnvironment::new().with_surface(SurfaceHandle::container("jimu-editor")),
        );
        let mut controller = LifecycleController::new(
            EditorConfig::default(),
            env,
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        assert!(controller.validate().is_ok());
    }

    #[test]
    fn test_phase_gating() {
        let mut controller = controller_with(ModuleRegistry::builder().build());
        controller.validate().unwrap();

        // 重复校验被拒绝
        assert!(matches!(
            controller.validate(),
            Err(CoreError::InvalidPhase { .. })
        ));
    }

    #[tokio::test]
    async fn test_start_follows_fixed_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        // 故意乱序注册
        let registry = ModuleRegistry::builder()
            .register(recording_descriptor(ModuleKind::Paste, log.clone()))
            .register(recording_descriptor(ModuleKind::BlockManager, log.clone()))
            .register(recording_descriptor(ModuleKind::Tools, log.clone()))
            .register(recording_descriptor(ModuleKind::Ui, log.clone()))
            .build();

        let mut controller = controller_with(registry);
        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.start().await.unwrap();

        // 准备顺序由启动序列决定，与注册顺序无关
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ModuleKind::Tools,
                ModuleKind::Ui,
                ModuleKind::BlockManager,
                ModuleKind::Paste,
            ]
        );
    }

    #[tokio::test]
    async fn test_fatal_prepare_aborts_sequence() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ModuleRegistry::builder()
            .register(failing_prepare_descriptor(ModuleKind::Tools, log.clone(), true))
            .register(recording_descriptor(ModuleKind::BlockManager, log.clone()))
            .build();

        let mut controller = controller_with(registry);
        controller.validate().unwrap();
        controller.init().await.unwrap();

        let result = controller.start().await;
        assert!(matches!(result, Err(CoreError::FatalModule { .. })));

        // 后续模块的准备钩子从未被调用
        assert_eq!(*log.lock().unwrap(), vec![ModuleKind::Tools]);

        // 控制器自行进入失败态并拒绝就绪信号，不依赖外层驱动者
        assert_eq!(controller.phase(), LifecyclePhase::Failed);
        assert!(controller.readiness().is_settled());
        assert!(!controller.readiness().is_resolved());
    }

    #[tokio::test]
    async fn test_transient_prepare_continues() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ModuleRegistry::builder()
            .register(recording_descriptor(ModuleKind::Tools, log.clone()))
            .register(failing_prepare_descriptor(ModuleKind::Paste, log.clone(), false))
            .register(recording_descriptor(ModuleKind::ReadOnly, log.clone()))
            .build();

        let mut controller = controller_with(registry);
        controller.validate().unwrap();
        controller.init().await.unwrap();
        assert!(controller.start().await.is_ok());

        // 瞬时错误之后序列继续
        assert_eq!(
            *log.lock().unwrap(),
            vec![ModuleKind::Tools, ModuleKind::Paste, ModuleKind::ReadOnly]
        );
    }

    #[tokio::test]
    async fn test_render_resolves_readiness() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();
        let config = EditorConfig::builder()
            .holder_id("editor-holder")
            .on_ready(move || fired_clone.store(true, Ordering::SeqCst))
            .build();

        let mut controller = LifecycleController::new(
            config,
            test_env(),
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.start().await.unwrap();
        controller.render().await.unwrap();

        assert_eq!(controller.phase(), LifecyclePhase::Ready);
        assert!(controller.readiness().is_resolved());
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_render_waits_for_side_effects() {
        struct TrackingModule {
            ctx: ModuleContext,
            counter: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl EditorModule for TrackingModule {
            fn kind(&self) -> ModuleKind {
                ModuleKind::Tools
            }

            async fn prepare(&mut self) -> Result<()> {
                let counter = self.counter.clone();
                self.ctx.track(tokio::spawn(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
                Ok(())
            }
        }

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let registry = ModuleRegistry::builder()
            .register(ModuleDescriptor::new(ModuleKind::Tools, move |ctx| {
                Ok(Box::new(TrackingModule {
                    ctx,
                    counter: counter_clone.clone(),
                }) as Box<dyn EditorModule>)
            }))
            .build();

        let mut controller = controller_with(registry);
        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.start().await.unwrap();
        controller.render().await.unwrap();

        // 渲染完成意味着副作用任务已经结束
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_render_failure_is_fatal() {
        struct FailingRenderer;

        #[async_trait]
        impl Renderer for FailingRenderer {
            async fn render(&self, _data: &ContentData) -> Result<()> {
                Err(CoreError::RenderFailed("画布丢失".to_string()))
            }
        }

        let mut controller = LifecycleController::new(
            EditorConfig::from("editor-holder"),
            test_env(),
            Arc::new(FailingRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.start().await.unwrap();

        let result = controller.render().await;
        assert!(matches!(result, Err(CoreError::RenderFailed(_))));
        assert_eq!(controller.phase(), LifecyclePhase::Failed);
        assert!(controller.readiness().is_settled());
        assert!(!controller.readiness().is_resolved());
    }

    #[tokio::test]
    async fn test_autofocus_failure_degrades() {
        struct NoFocusRenderer;

        #[async_trait]
        impl Renderer for NoFocusRenderer {
            async fn render(&self, _data: &ContentData) -> Result<()> {
                Ok(())
            }

            async fn focus_first_block(&self) -> Result<()> {
                Err(CoreError::RenderFailed("没有可聚焦的块".to_string()))
            }
        }

        let config = EditorConfig::builder()
            .holder_id("editor-holder")
            .autofocus(true)
            .build();
        let mut controller = LifecycleController::new(
            config,
            test_env(),
            Arc::new(NoFocusRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.start().await.unwrap();

        // 聚焦失败只降级，就绪照常
        assert!(controller.render().await.is_ok());
        assert!(controller.readiness().is_resolved());
    }

    #[tokio::test]
    async fn test_fail_rejects_readiness() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();
        let config = EditorConfig::builder()
            .holder_id("editor-holder")
            .on_ready(move || fired_clone.store(true, Ordering::SeqCst))
            .build();

        let mut controller = LifecycleController::new(
            config,
            test_env(),
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            EventBus::new(),
        );

        controller.fail(&CoreError::ConflictingMountTarget);

        assert_eq!(controller.phase(), LifecyclePhase::Failed);
        assert!(controller.readiness().is_settled());
        assert!(!controller.readiness().is_resolved());
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_readiness_single_settlement() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let mut signal = ReadinessSignal::new(Some(Arc::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })));

        signal.resolve();
        signal.resolve();
        signal.reject();

        assert!(signal.is_resolved());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shutdown_disposes_and_unsubscribes() {
        struct DisposableModule {
            disposed: Arc<AtomicBool>,
        }

        #[async_trait]
        impl EditorModule for DisposableModule {
            fn kind(&self) -> ModuleKind {
                ModuleKind::Tools
            }

            async fn dispose(&mut self) {
                self.disposed.store(true, Ordering::SeqCst);
            }
        }

        let disposed = Arc::new(AtomicBool::new(false));
        let disposed_clone = disposed.clone();
        let registry = ModuleRegistry::builder()
            .register(ModuleDescriptor::new(ModuleKind::Tools, move |_ctx| {
                Ok(Box::new(DisposableModule {
                    disposed: disposed_clone.clone(),
                }) as Box<dyn EditorModule>)
            }))
            .build();

        let bus = EventBus::new();
        bus.subscribe(ModuleKind::Tools.as_str(), "block.changed", Arc::new(|_| {}));

        let mut controller = LifecycleController::new(
            EditorConfig::from("editor-holder"),
            test_env(),
            Arc::new(NullRenderer),
            registry,
            bus.clone(),
        );

        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.shutdown().await;

        assert!(disposed.load(Ordering::SeqCst));
        assert!(controller.module_kinds().is_empty());
        assert_eq!(bus.subscription_count_for("block.changed"), 0);
    }

    #[tokio::test]
    async fn test_dispose_hooks_can_notify_peers() {
        struct FarewellModule {
            ctx: ModuleContext,
        }

        #[async_trait]
        impl EditorModule for FarewellModule {
            fn kind(&self) -> ModuleKind {
                ModuleKind::Tools
            }

            async fn dispose(&mut self) {
                self.ctx.bus.emit("farewell", &serde_json::json!({}));
            }
        }

        struct SilentModule;

        #[async_trait]
        impl EditorModule for SilentModule {
            fn kind(&self) -> ModuleKind {
                ModuleKind::Ui
            }
        }

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        // 订阅方先注册（也就先被关停处理），发布方的销毁钩子后执行
        let registry = ModuleRegistry::builder()
            .register(ModuleDescriptor::new(ModuleKind::Ui, move |ctx| {
                let seen = seen_clone.clone();
                ctx.bus.subscribe(
                    ModuleKind::Ui.as_str(),
                    "farewell",
                    Arc::new(move |_| {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }),
                );
                Ok(Box::new(SilentModule) as Box<dyn EditorModule>)
            }))
            .register(ModuleDescriptor::new(ModuleKind::Tools, |ctx| {
                Ok(Box::new(FarewellModule { ctx }) as Box<dyn EditorModule>)
            }))
            .build();

        let mut controller = controller_with(registry);
        controller.validate().unwrap();
        controller.init().await.unwrap();
        controller.shutdown().await;

        // 全部销毁钩子先于订阅清理执行，告别事件仍能送达兄弟模块
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(controller.bus().subscription_count(), 0);
    }

    #[tokio::test]
    async fn test_init_emits_event() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        bus.subscribe(
            "test",
            EVENT_INITIALIZED,
            Arc::new(move |_| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let mut controller = LifecycleController::new(
            EditorConfig::from("editor-holder"),
            test_env(),
            Arc::new(NullRenderer),
            ModuleRegistry::builder().build(),
            bus,
        );

        controller.validate().unwrap();
        controller.init().await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
