use crate::hal::{Hardware, LinkError, RadioInterface};
use crate::protocol::{MeshMessage, MessageType, NodeId, MAX_MESSAGE_SIZE};

#[repr(C)]
pub struct NearlinkConfig {
    channel: u8,
    tx_power: u8,
    pan_id: u16,
}

extern "C" {
    fn nl_init(config: *const NearlinkConfig) -> i32;
    fn nl_send(dest: *const u8, data: *const u8, len: usize) -> i32;
    fn nl_recv(buf: *mut u8, max_len: usize, actual_len: *mut usize) -> i32;
    fn nl_configure(channel: u8, tx_power: u8) -> i32;
    fn nl_get_timestamp() -> u64;
    fn nl_delay_ms(ms: u32);
}

/// BearPi HI2821上的NearLink无线电
pub struct BearPiRadio {
    config: NearlinkConfig,
    node_id: NodeId,
}

impl BearPiRadio {
    fn new(node_id: NodeId) -> Self {
        let config = NearlinkConfig {
            channel: 15,
            tx_power: 20,
            pan_id: 0x1234,
        };

        unsafe {
            nl_init(&config as *const NearlinkConfig);
        }

        Self { config, node_id }
    }
}

impl RadioInterface for BearPiRadio {
    fn configure(&mut self, channel: u8, power: u8) -> Result<(), LinkError> {
        let ret = unsafe { nl_configure(channel, power) };
        if ret == 0 {
            self.config.channel = channel;
            self.config.tx_power = power;
            Ok(())
        } else {
            Err(LinkError::ConfigInvalid)
        }
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

        let ret = unsafe { nl_send(destination.0.as_ptr(), frame.as_ptr(), length) };
        if ret == 0 {
            Ok(())
        } else {
            defmt::warn!("nl_send失败: {}", ret);
            Err(LinkError::SendFailed)
        }
    }

    fn receive<'a>(&mut self, buffer: &'a mut [u8]) -> Result<Option<MeshMessage<'a>>, LinkError> {
        let mut actual_len: usize = 0;

        let ret = unsafe { nl_recv(buffer.as_mut_ptr(), buffer.len(), &mut actual_len) };
        match ret {
            0 => match MeshMessage::parse(&buffer[..actual_len]) {
                Some(message) if message.is_valid() => Ok(Some(message)),
                // 校验和不符或无法解析的帧直接丢弃
                _ => Ok(None),
            },
            // 没有数据可接收
            -1 => Ok(None),
            _ => Err(LinkError::ReceiveFailed),
        }
    }
}

/// BearPi硬件实现
pub struct BearPiHardware {
    node_id: NodeId,
    radio: BearPiRadio,
}

impl BearPiHardware {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            radio: BearPiRadio::new(node_id),
        }
    }
}

impl Hardware for BearPiHardware {
    type Radio = BearPiRadio;

    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn radio(&mut self) -> &mut Self::Radio {
        &mut self.radio
    }

    fn timestamp_ms(&self) -> Result<u64, LinkError> {
        Ok(unsafe { nl_get_timestamp() })
    }

    fn delay_ms(&mut self, ms: u32) -> Result<(), LinkError> {
        unsafe { nl_delay_ms(ms) };
        Ok(())
    }
}
