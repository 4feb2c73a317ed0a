//! 事件总线系统
//!
//! 提供模块间的松耦合通信机制。与路由式通信不同，事件总线不关心
//! 接收方是谁：发布方 `emit`，所有订阅了该事件名的监听器在同一个
//! 逻辑回合内按注册顺序被同步调用。
//!
//! # 语义
//!
//! - 同一事件名下的监听器按注册顺序调用
//! - 不同事件名之间没有顺序保证
//! - 没有缓冲和背压：发布时没有监听器即为空操作
//! - 每个订阅者（通常是模块）可以一次性批量退订
//!
//! # 使用示例
//!
//! ```
//! use jimu_core::event::EventBus;
//! use std::sync::Arc;
//!
//! let bus = EventBus::new();
//!
//! let sub_id = bus.subscribe("BlockManager", "block.changed", Arc::new(|payload| {
//!     println!("块已变更: {}", payload);
//! }));
//!
//! bus.emit("block.changed", &serde_json::json!({"index": 0}));
//!
//! bus.unsubscribe(&sub_id).unwrap();
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::utils::{generate_id, CoreError, Result};

/// 事件回调函数类型
///
/// 回调在发布方的调用栈上同步执行，必须是线程安全的。
pub type EventCallback = Arc<dyn Fn(&serde_json::Value) + Send + Sync>;

/// 内部订阅条目
#[derive(Clone)]
struct ListenerEntry {
    /// 订阅唯一标识
    subscription_id: String,

    /// 订阅者标识（用于批量退订）
    subscriber: String,

    /// 事件回调函数
    callback: EventCallback,

    /// 订阅时间（用于调试和审计）
    #[allow(dead_code)]
    subscribed_at: DateTime<Utc>,
}

/// 事件总线
///
/// 事件名 -> 有序监听器列表的映射。`Clone` 共享同一份底层状态，
/// 每个模块实例都持有同一条总线。
#[derive(Clone, Default)]
pub struct EventBus {
    /// 订阅列表：事件名 -> 按注册顺序排列的监听器
    listeners: Arc<RwLock<HashMap<String, Vec<ListenerEntry>>>>,

    /// 快速查找表：订阅 ID -> 事件名
    index: Arc<RwLock<HashMap<String, String>>>,

    /// 已分发事件计数
    emitted: Arc<AtomicU64>,
}

impl EventBus {
    /// 创建新的事件总线
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅事件
    ///
    /// # Arguments
    ///
    /// * `subscriber` - 订阅者标识（通常是模块标识），用于批量退订
    /// * `event` - 事件名，精确匹配
    /// * `callback` - 事件回调函数
    ///
    /// # Returns
    ///
    /// 返回订阅 ID，用于单独退订
    pub fn subscribe(
        &self,
        subscriber: impl Into<String>,
        event: impl Into<String>,
        callback: EventCallback,
    ) -> String {
        let subscriber = subscriber.into();
        let event = event.into();

        let entry = ListenerEntry {
            subscription_id: generate_id(),
            subscriber: subscriber.clone(),
            callback,
            subscribed_at: Utc::now(),
        };
        let subscription_id = entry.subscription_id.clone();

        {
            let mut listeners = self.listeners.write().expect("监听器映射锁中毒");
            listeners.entry(event.clone()).or_default().push(entry);
        }
        {
            let mut index = self.index.write().expect("订阅索引锁中毒");
            index.insert(subscription_id.clone(), event.clone());
        }

        debug!(
            subscription_id = %subscription_id,
            subscriber = %subscriber,
            event = %event,
            "事件订阅成功"
        );

        subscription_id
    }

    /// 取消单个订阅
    ///
    /// # Errors
    ///
    /// 订阅不存在时返回 [`CoreError::SubscriptionNotFound`]
    pub fn unsubscribe(&self, subscription_id: &str) -> Result<()> {
        let event = {
            let mut index = self.index.write().expect("订阅索引锁中毒");
            index
                .remove(subscription_id)
                .ok_or_else(|| CoreError::SubscriptionNotFound(subscription_id.to_string()))?
        };

        let mut listeners = self.listeners.write().expect("监听器映射锁中毒");
        if let Some(entries) = listeners.get_mut(&event) {
            entries.retain(|e| e.subscription_id != subscription_id);
            if entries.is_empty() {
                listeners.remove(&event);
            }
        }

        debug!(subscription_id = %subscription_id, event = %event, "取消订阅成功");
        Ok(())
    }

    /// 取消订阅者的所有订阅
    ///
    /// 模块销毁时调用，一次性移除该模块的全部监听器。
    ///
    /// # Returns
    ///
    /// 返回移除的订阅数量
    pub fn unsubscribe_all(&self, subscriber: &str) -> usize {
        let mut removed = 0;

        {
            let mut listeners = self.listeners.write().expect("监听器映射锁中毒");
            let mut index = self.index.write().expect("订阅索引锁中毒");

            listeners.retain(|_, entries| {
                entries.retain(|e| {
                    if e.subscriber == subscriber {
                        index.remove(&e.subscription_id);
                        removed += 1;
                        false
                    } else {
                        true
                    }
                });
                !entries.is_empty()
            });
        }

        if removed > 0 {
            debug!(subscriber = %subscriber, removed = removed, "批量取消订阅");
        }
        removed
    }

    /// 发布事件
    ///
    /// 同一逻辑回合内按注册顺序同步调用所有监听器。
    /// 没有监听器时为空操作。
    ///
    /// # Returns
    ///
    /// 返回被调用的监听器数量
    pub fn emit(&self, event: &str, payload: &serde_json::Value) -> usize {
        // 在锁外调用回调，监听器可以安全地再次订阅或发布
        let matched: Vec<EventCallback> = {
            let listeners = self.listeners.read().expect("监听器映射锁中毒");
            match listeners.get(event) {
                Some(entries) => entries.iter().map(|e| e.callback.clone()).collect(),
                None => return 0,
            }
        };

        trace!(event = %event, listeners = matched.len(), "发布事件");

        for callback in &matched {
            callback(payload);
        }

        self.emitted.fetch_add(1, Ordering::Relaxed);
        matched.len()
    }

    /// 获取总订阅数量
    pub fn subscription_count(&self) -> usize {
        self.index.read().expect("订阅索引锁中毒").len()
    }

    /// 获取指定事件名的订阅数量
    pub fn subscription_count_for(&self, event: &str) -> usize {
        let listeners = self.listeners.read().expect("监听器映射锁中毒");
        listeners.get(event).map_or(0, |v| v.len())
    }

    /// 获取订阅者的所有订阅 ID
    pub fn subscriptions_for(&self, subscriber: &str) -> Vec<String> {
        let listeners = self.listeners.read().expect("监听器映射锁中毒");
        listeners
            .values()
            .flatten()
            .filter(|e| e.subscriber == subscriber)
            .map(|e| e.subscription_id.clone())
            .collect()
    }

    /// 已分发事件总数
    pub fn emitted_count(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}
