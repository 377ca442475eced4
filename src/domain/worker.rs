// ==========================================
// 门店排班系统 - 员工领域模型
// ==========================================
// 员工的角色引用 (主/副/第三岗位) 必须指向角色表中存在的角色,
// 由外键约束保证; 排班引擎只做解析, 不做校验。
// ==========================================

use crate::domain::types::ContractType;
use serde::{Deserialize, Serialize};

// ==========================================
// Worker - 员工档案
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: String,              // 员工ID
    pub name: String,                   // 姓名
    pub phone: Option<String>,          // 电话
    pub contract_type: ContractType,    // 合同类型
    pub weekly_hours: i32,              // 合同周时数上限 (>= 0)
    pub days_off: Vec<u8>,              // 休息日 (星期索引 0-6, 周日=0)
    pub primary_role: Option<String>,   // 主岗位 (角色引用)
    pub secondary_role: Option<String>, // 副岗位
    pub tertiary_role: Option<String>,  // 第三岗位
}

impl Worker {
    /// 指定日是否休息
    pub fn has_day_off(&self, day: u8) -> bool {
        self.days_off.contains(&day)
    }

    /// 是否持有指定角色 (主/副/第三岗位任一, 不分先后)
    pub fn holds_role(&self, role_id: &str) -> bool {
        self.primary_role.as_deref() == Some(role_id)
            || self.secondary_role.as_deref() == Some(role_id)
            || self.tertiary_role.as_deref() == Some(role_id)
    }

    /// 主岗位是否为指定角色
    pub fn primary_is(&self, role_id: &str) -> bool {
        self.primary_role.as_deref() == Some(role_id)
    }

    /// 是否为指定角色的替补 (主岗位不是该角色, 但副/第三岗位持有)
    pub fn backup_for(&self, role_id: &str) -> bool {
        !self.primary_is(role_id)
            && (self.secondary_role.as_deref() == Some(role_id)
                || self.tertiary_role.as_deref() == Some(role_id))
    }

    /// 是否为全职
    pub fn is_full_time(&self) -> bool {
        self.contract_type == ContractType::FullTime
    }

    /// 是否为兼职
    pub fn is_part_time(&self) -> bool {
        self.contract_type.is_part_time()
    }
}

/// 休息日的数据库存储格式: 逗号分隔的星期索引 ("0,3")
pub fn days_off_to_db_str(days_off: &[u8]) -> String {
    days_off
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// 从数据库字符串解析休息日, 越界索引直接丢弃
pub fn days_off_from_db_str(s: &str) -> Vec<u8> {
    s.split(',')
        .filter_map(|p| p.trim().parse::<u8>().ok())
        .filter(|&d| d <= 6)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker_with_roles(primary: Option<&str>, secondary: Option<&str>) -> Worker {
        Worker {
            worker_id: "w1".to_string(),
            name: "测试员工".to_string(),
            phone: None,
            contract_type: ContractType::FullTime,
            weekly_hours: 40,
            days_off: vec![0, 3],
            primary_role: primary.map(str::to_string),
            secondary_role: secondary.map(str::to_string),
            tertiary_role: None,
        }
    }

    #[test]
    fn test_day_off_check() {
        let w = worker_with_roles(Some("r1"), None);
        assert!(w.has_day_off(0));
        assert!(w.has_day_off(3));
        assert!(!w.has_day_off(1));
    }

    #[test]
    fn test_role_qualification() {
        let w = worker_with_roles(Some("r1"), Some("r2"));
        assert!(w.holds_role("r1"));
        assert!(w.holds_role("r2"));
        assert!(!w.holds_role("r3"));
        assert!(w.primary_is("r1"));
        assert!(!w.backup_for("r1"));
        assert!(w.backup_for("r2"));
    }

    #[test]
    fn test_days_off_db_roundtrip() {
        assert_eq!(days_off_to_db_str(&[0, 3, 6]), "0,3,6");
        assert_eq!(days_off_from_db_str("0,3,6"), vec![0, 3, 6]);
        assert_eq!(days_off_from_db_str(""), Vec::<u8>::new());
        // 越界与脏数据丢弃
        assert_eq!(days_off_from_db_str("1,9,x,2"), vec![1, 2]);
    }
}
