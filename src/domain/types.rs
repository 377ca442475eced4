// ==========================================
// 门店排班系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 每周天数 (索引 0-6, 周日=0)
pub const DAYS_PER_WEEK: usize = 7;

// ==========================================
// 合同类型 (Contract Type)
// ==========================================
// 全职按 10 小时双班日排基础班表, 兼职按 4 小时单班日
// 兼职子类型决定可排班次: 日班兼职只排开店班, 夜班兼职只排闭店班
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    FullTime,      // 全职
    PartTimeDay,   // 日班兼职
    PartTimeNight, // 夜班兼职
}

impl ContractType {
    /// 是否为兼职（日班/夜班均算）
    pub fn is_part_time(&self) -> bool {
        matches!(self, ContractType::PartTimeDay | ContractType::PartTimeNight)
    }

    /// 从字符串解析合同类型
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "FULL_TIME" => ContractType::FullTime,
            "PART_TIME_DAY" => ContractType::PartTimeDay,
            "PART_TIME_NIGHT" => ContractType::PartTimeNight,
            _ => ContractType::FullTime, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ContractType::FullTime => "FULL_TIME",
            ContractType::PartTimeDay => "PART_TIME_DAY",
            ContractType::PartTimeNight => "PART_TIME_NIGHT",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 班次类型 (Shift Kind)
// ==========================================
// 班次时长固定: 开店班 6 小时, 闭店班 4 小时
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    Opening, // 开店班
    Closing, // 闭店班
}

impl ShiftKind {
    /// 两个班次的固定遍历顺序: 先开店后闭店
    pub const ALL: [ShiftKind; 2] = [ShiftKind::Opening, ShiftKind::Closing];

    /// 班次工时
    pub fn hours(&self) -> i32 {
        match self {
            ShiftKind::Opening => 6,
            ShiftKind::Closing => 4,
        }
    }

    /// 班次在网格中的槽位下标
    pub fn slot_index(&self) -> usize {
        match self {
            ShiftKind::Opening => 0,
            ShiftKind::Closing => 1,
        }
    }

    /// 从字符串解析班次
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OPENING" => Some(ShiftKind::Opening),
            "CLOSING" => Some(ShiftKind::Closing),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShiftKind::Opening => "OPENING",
            ShiftKind::Closing => "CLOSING",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 客流等级 (Demand Level)
// ==========================================
// 仅用于展示/说明, 不参与排班判定 (人数目标才是判定依据)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandLevel {
    Low,  // 低客流
    High, // 高客流
}

impl DemandLevel {
    /// 从字符串解析客流等级
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "HIGH" => DemandLevel::High,
            _ => DemandLevel::Low, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DemandLevel::Low => "LOW",
            DemandLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
