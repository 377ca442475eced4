// ==========================================
// 门店排班系统 - 工时台账
// ==========================================
// 红线: 单次生成内只增不减; 生成结束后的快照即历史事实,
// 删除/改派班次不回写台账 (实时工时由 API 层重新汇总)。
// ==========================================

use crate::domain::worker::Worker;
use std::collections::{BTreeMap, HashMap};

// ==========================================
// HourLedger - 周工时台账
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct HourLedger {
    hours: HashMap<String, i32>, // 员工ID → 本周累计工时
}

impl HourLedger {
    /// 为一组员工初始化台账 (全部归零)
    pub fn for_workers(workers: &[Worker]) -> Self {
        let hours = workers
            .iter()
            .map(|w| (w.worker_id.clone(), 0))
            .collect();
        Self { hours }
    }

    /// 员工当前累计工时 (未登记的员工视为 0)
    pub fn hours_of(&self, worker_id: &str) -> i32 {
        self.hours.get(worker_id).copied().unwrap_or(0)
    }

    /// 登记工时 (只增)
    pub fn add(&mut self, worker_id: &str, hours: i32) {
        debug_assert!(hours > 0, "台账只登记正工时");
        *self.hours.entry(worker_id.to_string()).or_insert(0) += hours;
    }

    /// 负载率 = 累计工时 / 合同周时数, 补位阶段的公平性排序键
    ///
    /// 调用方保证 worker.weekly_hours > 0 (周时数不足一个班次的
    /// 员工在进入候选池前已被过滤)。
    pub fn load_ratio(&self, worker: &Worker) -> f64 {
        self.hours_of(&worker.worker_id) as f64 / worker.weekly_hours as f64
    }

    /// 有序快照 (员工ID 升序), 供历史记录序列化
    pub fn snapshot(&self) -> BTreeMap<String, i32> {
        self.hours
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}
