//! 根门面包，重新导出各节点角色共享的核心类型，
//! 集成测试通过它访问整个工作区。

pub use collector::storage::{SensorRecord, Storage};
pub use common::hal::{Hardware, RadioInterface};
pub use common::protocol::{MessageType, NodeId, ThresholdPair};
pub use node::modules::SensorModule;
