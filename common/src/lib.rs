#![cfg_attr(not(feature = "simulator"), no_std)]

pub mod protocol;
pub mod hal;
pub mod utils;

// 重新导出核心类型
pub use protocol::{MeshMessage, MessageHeader, MessageType, NodeId, ThresholdPair};
pub use hal::{Hardware, LinkError, RadioInterface};
pub use utils::{calculate_checksum, AlignedBuffer};
