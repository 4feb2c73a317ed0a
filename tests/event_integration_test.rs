//! # 事件系统集成测试
//!
//! 测试模块间通过共享事件总线的松耦合通信：
//! - 构造时订阅、准备时发布
//! - 生命周期事件的可观测性
//! - 订阅在销毁时被清理

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jimu_core::{
    Editor, EditorModule, ModuleContext, ModuleDescriptor, ModuleKind, ModuleRegistry, Result,
    StaticEnvironment, SurfaceHandle,
};
use serde_json::json;

/// 构造时订阅主题的模块
struct ListenerModule {
    kind: ModuleKind,
}

#[async_trait]
impl EditorModule for ListenerModule {
    fn kind(&self) -> ModuleKind {
        self.kind
    }
}

/// 准备阶段发布事件的模块
struct EmitterModule {
    ctx: ModuleContext,
}

#[async_trait]
impl EditorModule for EmitterModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BlockManager
    }

    async fn prepare(&mut self) -> Result<()> {
        self.ctx.bus.emit("block.changed", &json!({ "index": 0 }));
        Ok(())
    }
}

fn test_env() -> Arc<StaticEnvironment> {
    Arc::new(StaticEnvironment::new().with_surface(SurfaceHandle::container("editor-holder")))
}

/// 测试模块在构造时订阅、兄弟模块在准备时发布
#[tokio::test]
async fn test_cross_module_events() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let received_clone = received.clone();

    let listener = ModuleDescriptor::new(ModuleKind::Ui, move |ctx| {
        let received = received_clone.clone();
        ctx.bus.subscribe(
            ModuleKind::Ui.as_str(),
            "block.changed",
            Arc::new(move |payload| {
                received.lock().unwrap().push(payload.clone());
            }),
        );
        Ok(Box::new(ListenerModule {
            kind: ModuleKind::Ui,
        }) as Box<dyn EditorModule>)
    });

    let emitter = ModuleDescriptor::new(ModuleKind::BlockManager, |ctx| {
        Ok(Box::new(EmitterModule { ctx }) as Box<dyn EditorModule>)
    });

    Editor::builder()
        .config("editor-holder")
        .environment(test_env())
        .registry(
            ModuleRegistry::builder()
                .register(listener)
                .register(emitter)
                .build(),
        )
        .boot()
        .await
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], json!({ "index": 0 }));
}

/// 测试生命周期事件按序发布
#[tokio::test]
async fn test_lifecycle_events_observable() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    let observer = ModuleDescriptor::new(ModuleKind::Saver, move |ctx| {
        for event in ["lifecycle.initialized", "lifecycle.ready", "lifecycle.destroyed"] {
            let seen = seen_clone.clone();
            ctx.bus.subscribe(
                ModuleKind::Saver.as_str(),
                event,
                Arc::new(move |_| {
                    seen.lock().unwrap().push(event);
                }),
            );
        }
        Ok(Box::new(ListenerModule {
            kind: ModuleKind::Saver,
        }) as Box<dyn EditorModule>)
    });

    let mut editor = Editor::builder()
        .config("editor-holder")
        .environment(test_env())
        .registry(ModuleRegistry::builder().register(observer).build())
        .boot()
        .await
        .unwrap();

    editor.destroy().await.unwrap();

    // 销毁事件在订阅清理之后发布，因此观察者看不到它
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["lifecycle.initialized", "lifecycle.ready"]
    );
}

/// 测试销毁后总线上不再有模块订阅
#[tokio::test]
async fn test_destroy_clears_subscriptions() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let listener = ModuleDescriptor::new(ModuleKind::Ui, move |ctx| {
        let counter = counter_clone.clone();
        ctx.bus.subscribe(
            ModuleKind::Ui.as_str(),
            "block.changed",
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        Ok(Box::new(ListenerModule {
            kind: ModuleKind::Ui,
        }) as Box<dyn EditorModule>)
    });

    let mut editor = Editor::builder()
        .config("editor-holder")
        .environment(test_env())
        .registry(ModuleRegistry::builder().register(listener).build())
        .boot()
        .await
        .unwrap();

    let bus = editor.bus().unwrap().clone();
    assert_eq!(bus.emit("block.changed", &json!({})), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    editor.destroy().await.unwrap();

    // 订阅已随销毁被清理
    assert_eq!(bus.emit("block.changed", &json!({})), 0);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
