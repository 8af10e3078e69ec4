//! Schedule ICS Core Library
//!
//! This library converts a weekly class schedule into an ICS calendar
//! document: weekly recurring sessions plus optional final exams.

/// 错误类型
pub mod error;
/// 课程到日历事件的转换
pub mod events;
/// 导出流程与外部协作者
pub mod export;
/// ICS 文本生成
pub mod ics;
pub mod jalali;
/// 星期与时刻计算
pub mod recurrence;
/// 课表集合
pub mod store;
/// 数据类型
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{events::*, export::*, ics::*, recurrence::*, store::*, types::*};
}
