use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use schedule_ics_core::{
    Error, Result,
    export::{ExportFile, FileSink, Notifier, Severity},
};
use tempfile::NamedTempFile;

/// 输出目录环境变量
pub const OUTPUT_DIR_ENV: &str = "SCHEDULE_ICS_OUTPUT_DIR";

/// 将导出文件写入目录
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// 使用指定目录，不存在时创建
    pub fn new(dir: PathBuf) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::Config(format!("Failed to create output directory: {}", e))
            })?;
        }

        Ok(Self { dir })
    }

    /// 使用 [`default_output_dir`]
    pub fn with_default_dir() -> Result<Self> {
        Self::new(default_output_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn deliver(&mut self, file: &ExportFile) -> Result<()> {
        let target = self.dir.join(&file.filename);

        tracing::debug!(
            "写入 {} ({}, {} 字节)",
            target.display(),
            file.mime_type,
            file.content.len()
        );

        // 临时文件在任何失败路径上 drop 时都会被删除
        let mut partial = NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::Delivery(format!("Failed to create temp file: {}", e)))?;
        partial
            .write_all(file.content.as_bytes())
            .and_then(|()| partial.as_file().sync_all())
            .map_err(|e| Error::Delivery(format!("Failed to write temp file: {}", e)))?;
        partial.persist(&target).map_err(|e| {
            Error::Delivery(format!(
                "Failed to move file to {}: {}",
                target.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}

/// 输出目录：环境变量 > 系统下载目录 > 当前目录
pub fn default_output_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(OUTPUT_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// 在终端输出提示
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => println!("✓ {}", message),
            Severity::Error => eprintln!("✗ {}", message),
        }
    }
}
