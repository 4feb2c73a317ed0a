//! 事件系统
//!
//! 包含模块间松耦合通信使用的同步事件总线。

pub mod bus;

// 重导出常用类型
pub use bus::{EventBus, EventCallback};
