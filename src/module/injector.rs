//! 依赖注入器
//!
//! 全部模块实例化完成后，为每个实例计算并注入一份对等视图：
//! 身份 -> 兄弟实例的映射，排除持有者自身。视图中保存的是
//! 共享句柄的克隆，因此对兄弟实例的后续修改对持有者可见。

use tracing::debug;

use crate::module::instance::{PeerView, SharedModule};
use crate::module::kind::ModuleKind;

/// 依赖注入器
///
/// 无状态：每次装配都从当前的存活实例集合出发计算视图。
#[derive(Debug, Default)]
pub struct DependencyInjector;

impl DependencyInjector {
    /// 创建注入器
    pub fn new() -> Self {
        Self
    }

    /// 为每个实例注入对等视图
    ///
    /// 视图只包含实例化成功的模块；构造失败被省略的模块自然缺席。
    /// 每个实例收到的视图不含自身。
    pub async fn assign_peer_views(&self, instances: &[(ModuleKind, SharedModule)]) {
        for (kind, instance) in instances {
            let mut view = PeerView::new();
            for (peer_kind, peer) in instances {
                if peer_kind == kind {
                    continue;
                }
                view.insert(*peer_kind, peer.clone());
            }

            debug!(module = %kind, peers = view.len(), "注入对等视图");
            instance.write().await.set_peers(view);
        }
    }
}
