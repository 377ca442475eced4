// ==========================================
// 门店排班系统 - 岗位角色领域模型
// ==========================================
// 红线: code 唯一性由角色仓储 (UNIQUE 约束) 保证, 不由排班引擎保证
// ==========================================

use serde::{Deserialize, Serialize};

/// 强制收银角色代码
///
/// 每个 (日, 班次) 槽位在第一阶段优先尝试覆盖此角色;
/// 角色表中缺失该 code 时整次生成直接失败。
pub const CASHIER_ROLE_CODE: &str = "CJ";

// ==========================================
// Role - 岗位角色
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: String, // 角色ID
    pub code: String,    // 角色代码 (唯一短码, 如 "CJ")
    pub name: String,    // 角色名称
    pub color: String,   // 展示颜色 (仅前端用, 不参与排班)
}

impl Role {
    /// 是否为强制收银角色
    pub fn is_cashier(&self) -> bool {
        self.code == CASHIER_ROLE_CODE
    }
}

/// 按 ID 或 code 查找角色
///
/// 员工档案中的角色引用既可能是角色ID也可能是角色代码,
/// 与原始数据保持一致的宽松解析。
pub fn find_role<'a>(roles: &'a [Role], identifier: &str) -> Option<&'a Role> {
    roles
        .iter()
        .find(|r| r.role_id == identifier || r.code == identifier)
}
