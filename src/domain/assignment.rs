// ==========================================
// 门店排班系统 - 班次分配领域模型
// ==========================================
// 生成期间的内存草稿与落库记录是两个类型:
// 草稿携带展示用冗余字段 (姓名/角色名/颜色), 仅为生成过程与
// 前端预览服务; 落库记录只保留规范化引用加上日期与周标识。
// ==========================================

use crate::domain::role::Role;
use crate::domain::types::ShiftKind;
use crate::domain::worker::Worker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DraftAssignment - 生成中的班次草稿
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAssignment {
    pub worker_id: String, // 员工引用
    pub role_id: String,   // 角色引用
    pub day: u8,           // 星期索引 (0=周日)
    pub shift: ShiftKind,  // 班次

    // ===== 展示冗余字段 (生成过程携带, 不落库) =====
    pub worker_name: String,
    pub role_name: String,
    pub role_code: String,
    pub color: String,
}

impl DraftAssignment {
    /// 由员工与角色构造草稿, 顺带填充展示字段
    pub fn new(worker: &Worker, role: &Role, day: u8, shift: ShiftKind) -> Self {
        Self {
            worker_id: worker.worker_id.clone(),
            role_id: role.role_id.clone(),
            day,
            shift,
            worker_name: worker.name.clone(),
            role_name: role.name.clone(),
            role_code: role.code.clone(),
            color: role.color.clone(),
        }
    }
}

// ==========================================
// AssignmentRecord - 落库班次记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub assignment_id: String, // 记录ID
    pub worker_id: String,     // 员工引用
    pub role_id: String,       // 角色引用
    pub day: u8,               // 星期索引 (0=周日)
    pub date: NaiveDate,       // 绝对日期 (本周周日 + day)
    pub shift: ShiftKind,      // 班次
    pub week_id: String,       // 周标识 (YYYY-Www)
}
