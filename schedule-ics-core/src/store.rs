use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Schedule, ScheduleId};

/// 课表集合及当前选中的课表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStore {
    /// 全部课表
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    /// 当前选中的课表
    #[serde(default)]
    pub current_schedule_id: Option<ScheduleId>,
}

/// 兼容两种JSON形式：完整对象，或仅包含课表数组
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStore {
    Full(ScheduleStore),
    List(Vec<Schedule>),
}

impl ScheduleStore {
    /// 由课表列表创建，未选中任何课表
    pub fn new(schedules: Vec<Schedule>) -> Self {
        Self {
            schedules,
            current_schedule_id: None,
        }
    }

    /// 从JSON字符串加载
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(match serde_json::from_str(json)? {
            RawStore::Full(store) => store,
            RawStore::List(schedules) => Self::new(schedules),
        })
    }

    /// 从文件路径加载
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref).map_err(|err| {
            Error::Config(format!(
                "无法读取课表文件 {}: {}",
                path_ref.display(),
                err
            ))
        })?;
        Self::from_json(&content)
    }

    /// 按ID查找
    pub fn get(&self, id: &ScheduleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| &s.id == id)
    }

    /// 显式指定的ID优先，否则使用当前选中的课表
    pub fn resolve_id(&self, explicit: Option<ScheduleId>) -> Option<ScheduleId> {
        explicit.or_else(|| self.current_schedule_id.clone())
    }
}
