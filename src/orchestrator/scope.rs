//! 生命周期作用域
//!
//! 界面（或一次测验）被销毁后，仍在进行中的请求和写入结果必须被丢弃。
//! `Scope` 持有取消信号，`ScopeHandle` 可以克隆给异步任务使用；
//! 调用 `cancel()` 或丢弃 `Scope` 都会触发取消。

use std::future::Future;
use tokio::sync::watch;

/// 作用域所有者
pub struct Scope {
    tx: watch::Sender<bool>,
}

/// 作用域句柄
#[derive(Clone)]
pub struct ScopeHandle {
    rx: watch::Receiver<bool>,
}

impl Scope {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// 取消作用域内所有未完成的操作
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeHandle {
    pub fn is_cancelled(&self) -> bool {
        // Scope 被丢弃同样视为取消
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// 等待取消
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// 在作用域内执行异步操作
    ///
    /// # 返回
    /// 作用域被取消时返回 None，结果被丢弃
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => {
                if self.is_cancelled() {
                    None
                } else {
                    Some(output)
                }
            }
        }
    }
}
