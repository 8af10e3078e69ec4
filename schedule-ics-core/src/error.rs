use thiserror::Error;

/// 导出流程中的错误
#[derive(Error, Debug)]
pub enum Error {
    /// 时间、星期或考试日期格式错误
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 课表ID不存在
    #[error("Schedule not found: {0}")]
    MissingSchedule(String),

    /// 文件交付失败
    #[error("File delivery failed: {0}")]
    Delivery(String),

    /// 课表JSON无法解析
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// 配置错误
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// 本库的结果类型
pub type Result<T> = std::result::Result<T, Error>;
