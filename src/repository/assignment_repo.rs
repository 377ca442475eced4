// ==========================================
// 门店排班系统 - 班次分配数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑, 只做数据映射
// 整周写入走单事务; 互换走单事务 (两条 UPDATE 同生共死)。
// ==========================================

use crate::domain::assignment::AssignmentRecord;
use crate::domain::types::ShiftKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// AssignmentRepository - 班次分配仓储
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
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

    fn map_row(row: &Row<'_>) -> SqliteResult<AssignmentRecord> {
        Ok(AssignmentRecord {
            assignment_id: row.get(0)?,
            worker_id: row.get(1)?,
            role_id: row.get(2)?,
            day: row.get::<_, i64>(3)? as u8,
            date: NaiveDate::parse_from_str(&row.get::<_, String>(4)?, "%Y-%m-%d")
                .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            shift: ShiftKind::from_str(&row.get::<_, String>(5)?).unwrap_or(ShiftKind::Opening),
            week_id: row.get(6)?,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        SELECT
            assignment_id, worker_id, role_id, day, date, shift, week_id
        FROM assignment
    "#;

    /// 批量插入一周的班次记录 (单事务)
    ///
    /// # 返回
    /// - Ok(usize): 插入的记录数
    pub fn insert_week(&self, records: &[AssignmentRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for record in records {
            tx.execute(
                r#"
                INSERT INTO assignment (
                    assignment_id, worker_id, role_id, day, date, shift, week_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.assignment_id,
                    record.worker_id,
                    record.role_id,
                    record.day as i64,
                    record.date.format("%Y-%m-%d").to_string(),
                    record.shift.to_db_str(),
                    record.week_id,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询指定周的全部班次记录 (按日/班次/插入顺序)
    pub fn find_by_week(&self, week_id: &str) -> RepositoryResult<Vec<AssignmentRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE week_id = ?1 ORDER BY day, shift DESC, rowid",
            Self::SELECT_COLUMNS
        ))?;
        // shift DESC: 'OPENING' 字典序大于 'CLOSING', 先开店后闭店
        let records = stmt
            .query_map(params![week_id], Self::map_row)?
            .collect::<SqliteResult<Vec<AssignmentRecord>>>()?;

        Ok(records)
    }

    /// 按ID查询班次记录
    pub fn find_by_id(&self, assignment_id: &str) -> RepositoryResult<Option<AssignmentRecord>> {
        let conn = self.get_conn()?;

        let record = conn
            .query_row(
                &format!("{} WHERE assignment_id = ?1", Self::SELECT_COLUMNS),
                params![assignment_id],
                Self::map_row,
            )
            .optional()?;

        Ok(record)
    }

    /// 更新单条记录的员工/角色 (改派)
    pub fn update_worker_and_role(
        &self,
        assignment_id: &str,
        worker_id: &str,
        role_id: &str,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE assignment SET worker_id = ?2, role_id = ?3 WHERE assignment_id = ?1",
            params![assignment_id, worker_id, role_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            });
        }

        Ok(())
    }

    /// 互换两条记录的员工 (单事务)
    pub fn swap_workers(
        &self,
        assignment_a: &str,
        worker_a: &str,
        assignment_b: &str,
        worker_b: &str,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        // A 记录换上 B 的员工, B 记录换上 A 的员工
        tx.execute(
            "UPDATE assignment SET worker_id = ?2 WHERE assignment_id = ?1",
            params![assignment_a, worker_b],
        )?;
        tx.execute(
            "UPDATE assignment SET worker_id = ?2 WHERE assignment_id = ?1",
            params![assignment_b, worker_a],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// 删除单条班次记录
    pub fn delete(&self, assignment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "DELETE FROM assignment WHERE assignment_id = ?1",
            params![assignment_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            });
        }

        Ok(())
    }
}
