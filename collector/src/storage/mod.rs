pub mod circular_buffer;

use common::protocol::{NodeId, Quantity};

/// 单次查询返回的最大记录数
pub const MAX_QUERY_RECORDS: usize = 32;

/// 一条入库的传感器记录
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct SensorRecord {
    /// 来源节点ID
    pub node_id: NodeId,
    /// 入库时间戳（毫秒）
    pub timestamp_ms: u64,
    /// 量纲
    pub quantity: Quantity,
    /// 读数值
    pub value: f32,
}

/// 传感器数据存储接口
pub trait Storage {
    /// 记录一条读数
    fn add_reading(&mut self, node_id: NodeId, quantity: Quantity, value: f32, timestamp_ms: u64);

    /// 查找指定节点的记录，最多取`MAX_QUERY_RECORDS`条
    fn records_for_node(&self, node_id: NodeId) -> heapless::Vec<SensorRecord, MAX_QUERY_RECORDS>;

    /// 存储的记录总数
    fn record_count(&self) -> usize;

    /// 清空全部数据
    fn clear_all(&mut self);
}
