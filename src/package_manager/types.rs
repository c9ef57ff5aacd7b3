//! PackageManager 相关数据类型定义

/// 包来源：官方仓库还是 AUR 等外部仓库
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Official,
    Foreign,
}

/// 搜索结果条目
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub repository: String,
    pub name: String,
    pub version: String,
    /// 版本号之后的剩余状态文本，如 `(Installed)`、`(+12 0.50)`
    pub status: String,
    pub description: Option<String>,
    pub installed: bool,
    pub origin: Origin,
}

impl PackageRecord {
    pub fn is_foreign(&self) -> bool {
        self.origin == Origin::Foreign
    }
}

/// 包详情（-Si 输出的键值对，保持原顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDetail {
    pub fields: Vec<(String, String)>,
}

impl PackageDetail {
    /// 按字段名查找（大小写不敏感）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
