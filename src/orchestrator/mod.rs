//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责组装依赖、驱动测验和管理生命周期，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 根据配置创建题目来源、成绩存储和排行榜
//! - 分发命令行命令（play / categories / leaderboard / clear）
//! - 记录成绩，存储失败时只给出提示
//!
//! ### `quiz_runner` - 测验驱动器
//! - 每秒驱动一次倒计时
//! - 把玩家输入转换为作答
//! - 作答后延迟进入下一题
//!
//! ### `scope` - 生命周期作用域
//! - 关闭后丢弃仍在进行的请求和写入
//!
//! ### `console` - 终端界面
//! - 渲染会话事件、测验结果和排行榜
//! - 在独立线程中读取键盘输入
//!
//! ## 层次关系
//!
//! ```text
//! app (命令分发)
//!     ↓
//! quiz_runner (计时 + 输入)
//!     ↓
//! workflow::QuizSession (单次测验状态机)
//!     ↓
//! services (能力层：question_source / score_store / leaderboard)
//!     ↓
//! clients (基础设施：TriviaClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → workflow → services → clients
//! 2. **无业务逻辑**：计分和排名规则都在下层，本层只做调度

pub mod app;
pub mod console;
pub mod quiz_runner;
pub mod scope;

// 重新导出主要类型
pub use app::{App, PlayOptions};
pub use quiz_runner::{PlayerInput, QuizRunner};
pub use scope::{Scope, ScopeHandle};
