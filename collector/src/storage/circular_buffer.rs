use common::protocol::{NodeId, Quantity};

use crate::storage::{SensorRecord, Storage, MAX_QUERY_RECORDS};

/// 环形缓冲区容量
const CAPACITY: usize = 256;

/// 环形缓冲区，用于存储传感器数据
///
/// 写满后从最旧的位置开始覆盖。
pub struct CircularBuffer {
    /// 存储区
    records: [Option<SensorRecord>; CAPACITY],
    /// 当前写入位置
    write_position: usize,
    /// 当前存储的记录数
    record_count: usize,
}

impl CircularBuffer {
    /// 创建新的环形缓冲区
    pub fn new() -> Self {
        Self {
            records: [None; CAPACITY],
            write_position: 0,
            record_count: 0,
        }
    }
}

impl Default for CircularBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for CircularBuffer {
    fn add_reading(&mut self, node_id: NodeId, quantity: Quantity, value: f32, timestamp_ms: u64) {
        if self.records[self.write_position].is_none() {
            self.record_count += 1;
        }

        self.records[self.write_position] = Some(SensorRecord {
            node_id,
            timestamp_ms,
            quantity,
            value,
        });

        self.write_position = (self.write_position + 1) % self.records.len();
    }

    fn records_for_node(&self, node_id: NodeId) -> heapless::Vec<SensorRecord, MAX_QUERY_RECORDS> {
        let mut result = heapless::Vec::new();

        for record in self.records.iter().flatten() {
            if record.node_id == node_id {
                if result.push(*record).is_err() {
                    break;
                }
            }
        }

        result
    }

    fn record_count(&self) -> usize {
        self.record_count
    }

    fn clear_all(&mut self) {
        for record in self.records.iter_mut() {
            *record = None;
        }
        self.record_count = 0;
        self.write_position = 0;
    }
}
