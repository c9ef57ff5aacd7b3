use crate::package_manager::{PackageDetail, PackageRecord};

// ========== 枚举 ==========

/// 当前接收键盘输入的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    QueryInput,
    ResultView,
}

/// 搜索阶段；结果和错误信息只存在于对应阶段中
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Searching,
    ShowingResults(Vec<PackageRecord>),
    ShowingError(String),
}

/// 正在执行的外部命令（同一时间最多一个）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Search,
    Inspect(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(PackageDetail),
    Failed(String),
}

// ========== 事件 / 命令 ==========

/// 后台任务完成后投递回主循环的事件
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished(Result<Vec<String>, String>),
    InspectFinished {
        name: String,
        result: Result<Vec<String>, String>,
    },
}

/// Controller 处理按键后要求主循环执行的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Search(String),
    Inspect(String),
    Quit,
}

// ========== 状态结构体 ==========

#[derive(Debug, Clone)]
pub struct SearchSession {
    /// 最近一次提交的查询（已去除首尾空白）
    pub query: String,
    pub phase: Phase,
    pub focus: Focus,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            phase: Phase::Idle,
            focus: Focus::QueryInput,
        }
    }

    pub fn records(&self) -> &[PackageRecord] {
        match &self.phase {
            Phase::ShowingResults(records) => records,
            _ => &[],
        }
    }

    pub fn is_searching(&self) -> bool {
        self.phase == Phase::Searching
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

/// 包详情浮层
#[derive(Debug, Clone)]
pub struct DetailPane {
    pub name: String,
    pub state: DetailState,
    pub scroll: usize,
}
