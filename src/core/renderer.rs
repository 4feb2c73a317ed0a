//! 呈现协作者
//!
//! 内核把"把初始内容变成可见块"这件事完全委托给宿主注入的
//! [`Renderer`]。渲染阶段等待全部副作用任务结束后调用它一次；
//! 自动聚焦同样经由它执行，且失败只降级不致命。

use async_trait::async_trait;

use crate::core::config::ContentData;
use crate::utils::Result;

/// 呈现协作者接口
#[async_trait]
pub trait Renderer: Send + Sync {
    /// 渲染初始内容
    ///
    /// 失败会中止启动并拒绝就绪信号。
    async fn render(&self, data: &ContentData) -> Result<()>;

    /// 将光标移动到第一个内容块
    ///
    /// 仅在配置开启自动聚焦时调用；失败只记录日志。
    async fn focus_first_block(&self) -> Result<()> {
        Ok(())
    }
}

/// 空呈现实现
///
/// 不做任何呈现工作，用于无头运行和测试。
#[derive(Debug, Default)]
pub struct NullRenderer;

#[async_trait]
impl Renderer for NullRenderer {
    async fn render(&self, _data: &ContentData) -> Result<()> {
        Ok(())
    }
}
