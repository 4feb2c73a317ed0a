//! 对外 API
//!
//! 包含编辑器外观及其构建器。

pub mod sdk;

// 重导出常用类型
pub use sdk::{Editor, EditorBuilder};
