//! 模块身份
//!
//! 每个模块描述符都携带一个显式的 [`ModuleKind`]，它是模块在
//! 注册表、对等视图和启动序列中的唯一身份，与任何语言层面的
//! 命名机制无关。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 模块身份
///
/// 对等视图以它为键，启动序列以它声明优先级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// 工具表管理
    Tools,
    /// 界面骨架
    Ui,
    /// 内容块管理
    BlockManager,
    /// 粘贴处理
    Paste,
    /// 块选区
    BlockSelection,
    /// 光标管理
    Caret,
    /// 只读模式
    ReadOnly,
    /// 内容保存
    Saver,
    /// 对外方法提供者（外观的委托目标）
    Api,
}

impl ModuleKind {
    /// 模块名称
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Tools => "Tools",
            ModuleKind::Ui => "UI",
            ModuleKind::BlockManager => "BlockManager",
            ModuleKind::Paste => "Paste",
            ModuleKind::BlockSelection => "BlockSelection",
            ModuleKind::Caret => "Caret",
            ModuleKind::ReadOnly => "ReadOnly",
            ModuleKind::Saver => "Saver",
            ModuleKind::Api => "API",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 启动序列
///
/// `start` 阶段按这个固定顺序严格串行地准备各模块：
/// 工具先于界面，界面先于块管理，选区相关模块在粘贴之前，
/// 只读模式最后。不在此列表中的模块不参与准备阶段。
pub const START_ORDER: &[ModuleKind] = &[
    ModuleKind::Tools,
    ModuleKind::Ui,
    ModuleKind::BlockManager,
    ModuleKind::Caret,
    ModuleKind::BlockSelection,
    ModuleKind::Paste,
    ModuleKind::ReadOnly,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ModuleKind::Tools.as_str(), "Tools");
        assert_eq!(ModuleKind::Ui.as_str(), "UI");
        assert_eq!(ModuleKind::BlockManager.to_string(), "BlockManager");
    }

    #[test]
    fn test_start_order_precedence() {
        let pos = |k: ModuleKind| START_ORDER.iter().position(|x| *x == k).unwrap();

        // 工具先于界面，界面先于块管理
        assert!(pos(ModuleKind::Tools) < pos(ModuleKind::Ui));
        assert!(pos(ModuleKind::Ui) < pos(ModuleKind::BlockManager));
        // 选区在粘贴之前，只读最后
        assert!(pos(ModuleKind::BlockSelection) < pos(ModuleKind::Paste));
        assert_eq!(*START_ORDER.last().unwrap(), ModuleKind::ReadOnly);
    }

    #[test]
    fn test_start_order_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for kind in START_ORDER {
            assert!(seen.insert(kind), "启动序列中出现重复模块: {}", kind);
        }
    }

    #[test]
    fn test_api_not_in_start_order() {
        assert!(!START_ORDER.contains(&ModuleKind::Api));
        assert!(!START_ORDER.contains(&ModuleKind::Saver));
    }
}
