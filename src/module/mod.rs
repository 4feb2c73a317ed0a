//! 模块系统
//!
//! 包含模块身份、模块实例接口、注册表、依赖注入器和
//! 生命周期控制器。

pub mod injector;
pub mod instance;
pub mod kind;
pub mod lifecycle;
pub mod registry;

// 重导出常用类型
pub use injector::DependencyInjector;
pub use instance::{EditorModule, ModuleContext, PeerView, SharedModule};
pub use kind::{ModuleKind, START_ORDER};
pub use lifecycle::{
    LifecycleController, LifecyclePhase, ReadinessSignal, EVENT_DESTROYED, EVENT_FAILED,
    EVENT_INITIALIZED, EVENT_READY,
};
pub use registry::{ModuleDescriptor, ModuleFactory, ModuleRegistry, ModuleRegistryBuilder};
