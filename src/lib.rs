//! # Jimu Core - 积木编辑器内核
//!
//! 积木编辑器内核是块式编辑器的编排核心，提供以下核心功能：
//!
//! - **模块注册表**: 显式静态装配的模块描述符集合
//! - **依赖注入**: 实例化后为每个模块注入对等视图
//! - **生命周期控制**: 校验、初始化、启动、渲染的多阶段启动序列
//! - **事件总线**: 模块间的松耦合通信机制
//! - **外观 API**: 配置快照、动态方法转发和显式销毁
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jimu_core::{Editor, StaticEnvironment, SurfaceHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env = StaticEnvironment::new()
//!         .with_surface(SurfaceHandle::container("editor-holder"));
//!
//!     let mut editor = Editor::builder()
//!         .config("editor-holder")
//!         .environment(Arc::new(env))
//!         .boot()
//!         .await?;
//!
//!     editor.destroy().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## 模块结构
//!
//! - `core` - 配置、环境协作者和呈现协作者
//! - `event` - 事件总线
//! - `module` - 模块身份、注册表、依赖注入和生命周期控制
//! - `utils` - 工具函数和错误类型
//! - `api` - 公共 API 外观

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod core;
pub mod event;
pub mod module;
pub mod utils;

// 重导出常用类型，方便使用
pub use api::{Editor, EditorBuilder};

pub use crate::core::{
    BlockData, ContentData, EditorConfig, EditorConfigBuilder, Environment, MountTarget,
    NullRenderer, ReadyCallback, Renderer, StaticEnvironment, SurfaceHandle, SurfaceKind,
    DEFAULT_HOLDER_ID,
};

pub use event::{EventBus, EventCallback};

pub use module::{
    DependencyInjector, EditorModule, LifecycleController, LifecyclePhase, ModuleContext,
    ModuleDescriptor, ModuleKind, ModuleRegistry, ModuleRegistryBuilder, PeerView,
    ReadinessSignal, SharedModule, START_ORDER,
};

pub use utils::{generate_id, CoreError, ErrorClass, Result};
pub use utils::logger::{LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
