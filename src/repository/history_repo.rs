// ==========================================
// 门店排班系统 - 排班历史数据仓储
// ==========================================
// 红线: 历史只追加, 本仓储不提供 UPDATE/DELETE
// 快照列以 JSON 存储, 读出时反序列化
// ==========================================

use crate::domain::history::RosterHistory;
use crate::domain::staffing::DayStaffing;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// HistoryRepository - 排班历史仓储
// ==========================================
pub struct HistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryRepository {
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

    fn map_row(row: &Row<'_>) -> SqliteResult<RosterHistory> {
        let assignment_ids: Vec<String> =
            serde_json::from_str(&row.get::<_, String>(4)?).unwrap_or_default();
        let staffing_snapshot: Vec<DayStaffing> =
            serde_json::from_str(&row.get::<_, String>(5)?).unwrap_or_default();
        let hours_snapshot: BTreeMap<String, i32> =
            serde_json::from_str(&row.get::<_, String>(6)?).unwrap_or_default();

        Ok(RosterHistory {
            history_id: row.get(0)?,
            week_id: row.get(1)?,
            generated_at: NaiveDateTime::parse_from_str(
                &row.get::<_, String>(2)?,
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap_or_else(|_| chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc()),
            generated_by: row.get(3)?,
            assignment_ids,
            staffing_snapshot,
            hours_snapshot,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        SELECT
            history_id, week_id, generated_at, generated_by,
            assignment_ids_json, staffing_snapshot_json, hours_snapshot_json
        FROM roster_history
    "#;

    /// 追加一条生成历史
    ///
    /// # 返回
    /// - Ok(history_id): 成功插入, 返回历史ID
    pub fn insert(&self, history: &RosterHistory) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let assignment_ids_json = serde_json::to_string(&history.assignment_ids)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        let staffing_snapshot_json = serde_json::to_string(&history.staffing_snapshot)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        let hours_snapshot_json = serde_json::to_string(&history.hours_snapshot)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO roster_history (
                history_id, week_id, generated_at, generated_by,
                assignment_ids_json, staffing_snapshot_json, hours_snapshot_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                history.history_id,
                history.week_id,
                history.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                history.generated_by,
                assignment_ids_json,
                staffing_snapshot_json,
                hours_snapshot_json,
            ],
        )?;

        Ok(history.history_id.clone())
    }

    /// 查询指定周的生成历史 (最新在前)
    pub fn find_by_week(&self, week_id: &str) -> RepositoryResult<Vec<RosterHistory>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE week_id = ?1 ORDER BY generated_at DESC, rowid DESC",
            Self::SELECT_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![week_id], Self::map_row)?
            .collect::<SqliteResult<Vec<RosterHistory>>>()?;

        Ok(records)
    }

    /// 查询最近 N 条生成历史
    pub fn list_recent(&self, limit: u32) -> RepositoryResult<Vec<RosterHistory>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY generated_at DESC, rowid DESC LIMIT ?1",
            Self::SELECT_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![limit], Self::map_row)?
            .collect::<SqliteResult<Vec<RosterHistory>>>()?;

        Ok(records)
    }
}
