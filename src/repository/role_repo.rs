// ==========================================
// 门店排班系统 - 岗位角色数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑, 只做数据映射
// code 唯一性由 UNIQUE 约束保证, 冲突以 UniqueConstraintViolation 上抛。
// ==========================================

use crate::domain::role::Role;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// RoleRepository - 角色仓储
// ==========================================
pub struct RoleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoleRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Role> {
        Ok(Role {
            role_id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            color: row.get(3)?,
        })
    }

    /// 查询全部角色 (登记顺序, 即排班时的角色遍历顺序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Role>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT role_id, code, name, color FROM role ORDER BY rowid")?;
        let roles = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Role>>>()?;

        Ok(roles)
    }

    /// 按ID查询角色
    pub fn find_by_id(&self, role_id: &str) -> RepositoryResult<Option<Role>> {
        let conn = self.get_conn()?;

        let role = conn
            .query_row(
                "SELECT role_id, code, name, color FROM role WHERE role_id = ?1",
                params![role_id],
                Self::map_row,
            )
            .optional()?;

        Ok(role)
    }

    /// 按 code 查询角色
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Role>> {
        let conn = self.get_conn()?;

        let role = conn
            .query_row(
                "SELECT role_id, code, name, color FROM role WHERE code = ?1",
                params![code],
                Self::map_row,
            )
            .optional()?;

        Ok(role)
    }

    /// 插入角色
    pub fn insert(&self, role: &Role) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO role (role_id, code, name, color) VALUES (?1, ?2, ?3, ?4)",
            params![role.role_id, role.code, role.name, role.color],
        )?;

        Ok(())
    }

    /// 更新角色
    pub fn update(&self, role: &Role) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE role SET code = ?2, name = ?3, color = ?4 WHERE role_id = ?1",
            params![role.role_id, role.code, role.name, role.color],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Role".to_string(),
                id: role.role_id.clone(),
            });
        }

        Ok(())
    }

    /// 删除角色
    pub fn delete(&self, role_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected =
            conn.execute("DELETE FROM role WHERE role_id = ?1", params![role_id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Role".to_string(),
                id: role_id.to_string(),
            });
        }

        Ok(())
    }
}
