// ==========================================
// 门店排班系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑, 只做数据映射
// 排序约定: list_all 按 rowid (登记顺序) 返回,
// 该顺序即排班算法中的“自然列表顺序”, 保证生成结果可重现。
// ==========================================

use crate::domain::types::ContractType;
use crate::domain::worker::{days_off_from_db_str, days_off_to_db_str, Worker};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// WorkerRepository - 员工仓储
// ==========================================
pub struct WorkerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkerRepository {
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

    fn map_row(row: &Row<'_>) -> SqliteResult<Worker> {
        Ok(Worker {
            worker_id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            contract_type: ContractType::from_str(&row.get::<_, String>(3)?),
            weekly_hours: row.get(4)?,
            days_off: days_off_from_db_str(&row.get::<_, String>(5)?),
            primary_role: row.get(6)?,
            secondary_role: row.get(7)?,
            tertiary_role: row.get(8)?,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        SELECT
            worker_id, name, phone, contract_type, weekly_hours,
            days_off, primary_role, secondary_role, tertiary_role
        FROM worker
    "#;

    /// 查询全部员工 (登记顺序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Worker>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY rowid", Self::SELECT_COLUMNS))?;
        let workers = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Worker>>>()?;

        Ok(workers)
    }

    /// 按ID查询员工
    pub fn find_by_id(&self, worker_id: &str) -> RepositoryResult<Option<Worker>> {
        let conn = self.get_conn()?;

        let worker = conn
            .query_row(
                &format!("{} WHERE worker_id = ?1", Self::SELECT_COLUMNS),
                params![worker_id],
                Self::map_row,
            )
            .optional()?;

        Ok(worker)
    }

    /// 插入员工
    pub fn insert(&self, worker: &Worker) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO worker (
                worker_id, name, phone, contract_type, weekly_hours,
                days_off, primary_role, secondary_role, tertiary_role
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                worker.worker_id,
                worker.name,
                worker.phone,
                worker.contract_type.to_db_str(),
                worker.weekly_hours,
                days_off_to_db_str(&worker.days_off),
                worker.primary_role,
                worker.secondary_role,
                worker.tertiary_role,
            ],
        )?;

        Ok(())
    }

    /// 更新员工档案
    pub fn update(&self, worker: &Worker) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"
            UPDATE worker SET
                name = ?2, phone = ?3, contract_type = ?4, weekly_hours = ?5,
                days_off = ?6, primary_role = ?7, secondary_role = ?8, tertiary_role = ?9
            WHERE worker_id = ?1
            "#,
            params![
                worker.worker_id,
                worker.name,
                worker.phone,
                worker.contract_type.to_db_str(),
                worker.weekly_hours,
                days_off_to_db_str(&worker.days_off),
                worker.primary_role,
                worker.secondary_role,
                worker.tertiary_role,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Worker".to_string(),
                id: worker.worker_id.clone(),
            });
        }

        Ok(())
    }

    /// 删除员工
    pub fn delete(&self, worker_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "DELETE FROM worker WHERE worker_id = ?1",
            params![worker_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Worker".to_string(),
                id: worker_id.to_string(),
            });
        }

        Ok(())
    }
}
