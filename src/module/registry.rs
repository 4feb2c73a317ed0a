//! 模块注册表
//!
//! 显式静态装配的有序模块注册表：一组"身份 + 工厂"描述符，
//! 在任何实例存在之前一次性构建完成并封存。实例化是容错的，
//! 单个模块的构造失败不会阻止其他模块存在。

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::module::instance::{EditorModule, ModuleContext, SharedModule};
use crate::module::kind::ModuleKind;
use crate::utils::Result;

/// 模块工厂类型
///
/// 以构造上下文换取模块实例；失败时该模块被省略。
pub type ModuleFactory =
    Box<dyn Fn(ModuleContext) -> Result<Box<dyn EditorModule>> + Send + Sync>;

/// 模块描述符
///
/// 身份 + 工厂。`private` 标记的描述符仅供内核内部装配使用，
/// 注册表构建时被过滤，不会产生实例。
pub struct ModuleDescriptor {
    kind: ModuleKind,
    private: bool,
    factory: ModuleFactory,
}

impl ModuleDescriptor {
    /// 创建模块描述符
    pub fn new<F>(kind: ModuleKind, factory: F) -> Self
    where
        F: Fn(ModuleContext) -> Result<Box<dyn EditorModule>> + Send + Sync + 'static,
    {
        Self {
            kind,
            private: false,
            factory: Box::new(factory),
        }
    }

    /// 创建私有模块描述符（构建注册表时被过滤）
    pub fn private<F>(kind: ModuleKind, factory: F) -> Self
    where
        F: Fn(ModuleContext) -> Result<Box<dyn EditorModule>> + Send + Sync + 'static,
    {
        Self {
            kind,
            private: true,
            factory: Box::new(factory),
        }
    }

    /// 模块身份
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("kind", &self.kind)
            .field("private", &self.private)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// 注册表
// ============================================================================

/// 模块注册表
///
/// 有序、封存的描述符集合。构建完成后不支持增删。
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    descriptors: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    /// 创建注册表构建器
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::new()
    }

    /// 已注册描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 是否包含指定身份的描述符
    pub fn contains(&self, kind: ModuleKind) -> bool {
        self.descriptors.iter().any(|d| d.kind == kind)
    }

    /// 实例化全部模块
    ///
    /// 按注册顺序对每个描述符调用工厂，传入同一份上下文的克隆
    /// （即 `{config, bus}`）。工厂失败时记录警告并省略该模块——
    /// 注册表是容错的，单个坏模块不会阻止其他模块存在。
    ///
    /// # Returns
    ///
    /// 返回按注册顺序排列的 (身份, 实例句柄) 列表
    pub fn instantiate(&self, ctx: &ModuleContext) -> Vec<(ModuleKind, SharedModule)> {
        let mut instances: Vec<(ModuleKind, SharedModule)> = Vec::new();

        for descriptor in &self.descriptors {
            match (descriptor.factory)(ctx.clone()) {
                Ok(module) => {
                    debug!(module = %descriptor.kind, "模块实例化成功");
                    instances.push((
                        descriptor.kind,
                        Arc::new(RwLock::new(module)),
                    ));
                }
                Err(e) => {
                    warn!(
                        module = %descriptor.kind,
                        error = %e,
                        "模块构造失败，该模块被省略"
                    );
                }
            }
        }

        info!(
            total = self.descriptors.len(),
            survived = instances.len(),
            "模块实例化完成"
        );

        instances
    }
}

// ============================================================================
// 注册表构建器
// ============================================================================

/// 模块注册表构建器
///
/// 重复注册同一身份时记录警告，后注册者生效（绝不静默合并）。
#[derive(Debug, Default)]
pub struct ModuleRegistryBuilder {
    descriptors: Vec<ModuleDescriptor>,
}

impl ModuleRegistryBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// 注册一个模块描述符
    ///
    /// 同一身份重复注册时，先前的描述符被移除并记录警告。
    pub fn register(mut self, descriptor: ModuleDescriptor) -> Self {
        if let Some(pos) = self
            .descriptors
            .iter()
            .position(|d| d.kind == descriptor.kind)
        {
            warn!(
                module = %descriptor.kind,
                "重复注册模块，覆盖先前的描述符（后注册者生效）"
            );
            self.descriptors.remove(pos);
        }
        self.descriptors.push(descriptor);
        self
    }

    /// 构建并封存注册表
    ///
    /// 私有描述符在此被过滤。
    pub fn build(self) -> ModuleRegistry {
        let mut descriptors = Vec::new();
        for descriptor in self.descriptors {
            if descriptor.private {
                debug!(module = %descriptor.kind, "跳过私有模块描述符");
                continue;
            }
            descriptors.push(descriptor);
        }

        debug!(count = descriptors.len(), "模块注册表构建完成");
        ModuleRegistry { descriptors }
    }
}
