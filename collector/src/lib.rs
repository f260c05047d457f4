#![cfg_attr(not(feature = "simulator"), no_std)]

pub mod storage;

pub use storage::circular_buffer::CircularBuffer;
pub use storage::{SensorRecord, Storage};
