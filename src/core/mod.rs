//! 核心配置与协作者接口
//!
//! 包含编辑器配置结构、校验阶段依赖的环境接口，以及渲染阶段
//! 委托的呈现接口。

pub mod config;
pub mod environment;
pub mod renderer;

// 重导出常用类型
pub use config::{
    BlockData, ContentData, EditorConfig, EditorConfigBuilder, MountTarget, ReadyCallback,
    DEFAULT_HOLDER_ID,
};
pub use environment::{Environment, StaticEnvironment, SurfaceHandle, SurfaceKind};
pub use renderer::{NullRenderer, Renderer};
