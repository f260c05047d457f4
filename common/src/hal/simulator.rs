use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::hal::{Hardware, LinkError, RadioInterface};
use crate::protocol::{MeshMessage, MessageType, NodeId, MAX_MESSAGE_SIZE};

/// 共享通信通道，用于在多个模拟节点之间传递消息
#[derive(Clone)]
pub struct SimChannel {
    messages: Arc<Mutex<VecDeque<(NodeId, NodeId, Vec<u8>)>>>,
}

impl SimChannel {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn push_message(&self, source: NodeId, destination: NodeId, frame: &[u8]) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push_back((source, destination, frame.to_vec()));
        }
    }

    /// 取出第一条发给指定节点（或广播）的消息帧
    pub fn pop_message_for(&self, receiver: NodeId, buffer: &mut [u8]) -> Option<usize> {
        if let Ok(mut messages) = self.messages.lock() {
            for index in 0..messages.len() {
                let (source, destination, frame) = &messages[index];

                // 忽略自己发出的消息
                if *source == receiver {
                    continue;
                }
                if *destination != receiver && !destination.is_broadcast() {
                    continue;
                }
                if frame.len() > buffer.len() {
                    continue;
                }

                buffer[..frame.len()].copy_from_slice(frame);
                let length = frame.len();
                messages.remove(index);
                return Some(length);
            }
        }
        None
    }
}

impl Default for SimChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// 模拟无线电接口
pub struct SimRadio {
    channel: u8,
    power: u8,
    sim_channel: SimChannel,
    node_id: NodeId,
}

impl SimRadio {
    pub fn new(sim_channel: SimChannel, node_id: NodeId) -> Self {
        Self {
            channel: 11,
            power: 20,
            sim_channel,
            node_id,
        }
    }
}

impl RadioInterface for SimRadio {
    fn configure(&mut self, channel: u8, power: u8) -> Result<(), LinkError> {
        if !(11..=26).contains(&channel) || power > 30 {
            return Err(LinkError::ConfigInvalid);
        }

        self.channel = channel;
        self.power = power;
        Ok(())
    }

    fn send(
        &mut self,
        destination: NodeId,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<(), LinkError> {
        let message = MeshMessage::new(self.node_id, destination, message_type, payload);

        let mut frame = [0u8; MAX_MESSAGE_SIZE];
        let length = message.write_to(&mut frame).ok_or(LinkError::SendFailed)?;

        self.sim_channel
            .push_message(self.node_id, destination, &frame[..length]);
        Ok(())
    }

    fn receive<'a>(&mut self, buffer: &'a mut [u8]) -> Result<Option<MeshMessage<'a>>, LinkError> {
        let length = match self.sim_channel.pop_message_for(self.node_id, buffer) {
            Some(length) => length,
            None => return Ok(None),
        };

        match MeshMessage::parse(&buffer[..length]) {
            Some(message) if message.is_valid() => Ok(Some(message)),
            // 校验和不符或无法解析的帧直接丢弃
            _ => Ok(None),
        }
    }
}

/// 模拟器硬件实现
pub struct SimHardware {
    node_id: NodeId,
    radio: SimRadio,
    start_time: Instant,
}

impl SimHardware {
    pub fn new(node_id: NodeId, sim_channel: SimChannel) -> Self {
        Self {
            node_id,
            radio: SimRadio::new(sim_channel, node_id),
            start_time: Instant::now(),
        }
    }
}

impl Hardware for SimHardware {
    type Radio = SimRadio;

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn radio(&mut self) -> &mut Self::Radio {
        &mut self.radio
    }

    fn timestamp_ms(&self) -> Result<u64, LinkError> {
        let elapsed = self.start_time.elapsed();
        Ok(elapsed.as_secs() * 1000 + elapsed.subsec_millis() as u64)
    }

    fn delay_ms(&mut self, ms: u32) -> Result<(), LinkError> {
        thread::sleep(Duration::from_millis(ms as u64));
        Ok(())
    }
}
