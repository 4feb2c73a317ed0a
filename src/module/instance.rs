//! 模块实例接口
//!
//! 定义可插拔模块必须实现的 [`EditorModule`] trait、构造时注入的
//! [`ModuleContext`]，以及模块间互相访问使用的对等视图类型。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::core::config::EditorConfig;
use crate::event::EventBus;
use crate::module::kind::ModuleKind;
use crate::utils::{CoreError, Result};

/// 共享的模块实例句柄
///
/// 对等视图中保存的是同一份句柄的克隆，对实例的后续修改
/// 对所有持有者可见（活引用，而非快照）。
pub type SharedModule = Arc<RwLock<Box<dyn EditorModule>>>;

/// 对等视图
///
/// 模块身份 -> 兄弟模块实例的映射，不包含持有者自身。
/// 在全部实例化完成后计算一次，之后不再变更。
pub type PeerView = HashMap<ModuleKind, SharedModule>;

// ============================================================================
// 模块上下文
// ============================================================================

/// 模块构造上下文
///
/// 每个模块工厂收到同一份上下文的克隆：只读配置、共享事件总线，
/// 以及准备阶段副作用任务的登记入口。
#[derive(Clone)]
pub struct ModuleContext {
    /// 只读的生效配置
    pub config: Arc<EditorConfig>,

    /// 共享事件总线
    pub bus: EventBus,

    /// 准备阶段登记的副作用任务，渲染前统一等待
    side_effects: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ModuleContext {
    /// 创建新的模块上下文
    pub fn new(config: Arc<EditorConfig>, bus: EventBus) -> Self {
        Self {
            config,
            bus,
            side_effects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 登记一个准备阶段的副作用任务
    ///
    /// 渲染阶段开始前，控制器会等待所有已登记任务结束。
    /// 这是"渲染前固定延时"的替代：显式的完成信号。
    pub fn track(&self, handle: JoinHandle<()>) {
        self.side_effects
            .lock()
            .expect("副作用任务列表锁中毒")
            .push(handle);
    }

    /// 取出全部已登记的副作用任务
    pub(crate) fn drain_side_effects(&self) -> Vec<JoinHandle<()>> {
        let mut guard = self.side_effects.lock().expect("副作用任务列表锁中毒");
        std::mem::take(&mut *guard)
    }

    /// 当前登记中的副作用任务数量
    pub fn pending_side_effects(&self) -> usize {
        self.side_effects.lock().expect("副作用任务列表锁中毒").len()
    }
}

// ============================================================================
// 模块 trait
// ============================================================================

/// 可插拔模块接口
///
/// 除 [`kind`](EditorModule::kind) 外所有钩子都有默认实现：
///
/// - `set_peers`：对等视图注入点，默认忽略
/// - `prepare`：启动序列中的准备钩子，默认空操作
/// - `dispose`：销毁钩子，默认空操作
/// - `call`：动态方法表面，默认拒绝所有方法
#[async_trait]
pub trait EditorModule: Send + Sync {
    /// 模块身份
    fn kind(&self) -> ModuleKind;

    /// 注入对等视图
    ///
    /// 全部实例化完成后由依赖注入器调用一次。需要访问兄弟模块的
    /// 模块应保存这份视图；视图中不包含自身。
    fn set_peers(&mut self, peers: PeerView) {
        let _ = peers;
    }

    /// 准备钩子
    ///
    /// 启动序列按固定顺序依次等待各模块的准备完成。返回
    /// [`CoreError::FatalModule`] 会中止整个启动；其他错误被记录后
    /// 跳过，该模块以降级状态继续存在。
    async fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// 销毁钩子
    ///
    /// 外观销毁时对每个存活模块调用一次。
    async fn dispose(&mut self) {}

    /// 动态方法表面
    ///
    /// 外观把未命名的外部调用转发给指定提供者模块的这个入口。
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let _ = params;
        Err(CoreError::MethodNotFound {
            module: self.kind().to_string(),
            method: method.to_string(),
        })
    }
}
