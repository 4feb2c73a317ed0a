//! 环境协作者
//!
//! 内核本身不绑定任何具体的呈现环境（DOM、终端、画布……）。
//! 校验阶段需要的两个能力——按标识查找挂载目标、判断目标是否为
//! 容器表面——通过 [`Environment`] trait 注入。

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// 表面类型
///
/// 描述挂载目标的种类，校验阶段只接受容器表面。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// 容器表面，可以承载编辑器
    Container,
    /// 文本表面
    Text,
    /// 图像表面
    Image,
    /// 未知表面
    Unknown,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceKind::Container => write!(f, "container"),
            SurfaceKind::Text => write!(f, "text"),
            SurfaceKind::Image => write!(f, "image"),
            SurfaceKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// 表面句柄
///
/// 环境中一个可挂载目标的不透明引用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceHandle {
    /// 表面标识
    pub id: String,
    /// 表面类型
    pub kind: SurfaceKind,
}

impl SurfaceHandle {
    /// 创建容器表面句柄
    pub fn container(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SurfaceKind::Container,
        }
    }

    /// 创建指定类型的表面句柄
    pub fn new(id: impl Into<String>, kind: SurfaceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// 环境协作者接口
///
/// 仅在校验阶段使用：按标识查找表面、判断表面是否为容器。
pub trait Environment: Send + Sync {
    /// 按标识查找表面
    fn query(&self, id: &str) -> Option<SurfaceHandle>;

    /// 判断表面是否为容器（可承载编辑器）
    fn is_container(&self, surface: &SurfaceHandle) -> bool {
        surface.kind == SurfaceKind::Container
    }
}

/// 内存环境实现
///
/// 将表面注册在内存映射中，用于嵌入式宿主和测试。
#[derive(Default)]
pub struct StaticEnvironment {
    surfaces: RwLock<HashMap<String, SurfaceHandle>>,
}

impl StaticEnvironment {
    /// 创建空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个表面，返回 self 以便链式调用
    pub fn with_surface(self, surface: SurfaceHandle) -> Self {
        self.register(surface);
        self
    }

    /// 注册一个表面
    pub fn register(&self, surface: SurfaceHandle) {
        let mut surfaces = self.surfaces.write().expect("表面映射锁中毒");
        surfaces.insert(surface.id.clone(), surface);
    }

    /// 已注册表面数量
    pub fn len(&self) -> usize {
        self.surfaces.read().expect("表面映射锁中毒").len()
    }

    /// 是否没有任何表面
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Environment for StaticEnvironment {
    fn query(&self, id: &str) -> Option<SurfaceHandle> {
        let surfaces = self.surfaces.read().expect("表面映射锁中毒");
        surfaces.get(id).cloned()
    }
}
