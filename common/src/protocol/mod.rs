use zerocopy::{AsBytes, FromBytes, LayoutVerified, Unaligned};

use crate::utils::calculate_checksum;

pub mod reading;
pub mod threshold;

pub use reading::{decode_scalar, encode_scalar, Quantity, Reading, SCALAR_PAYLOAD_LEN};
pub use threshold::{ThresholdCodec, ThresholdPair};

// 协议常量定义
pub const PROTOCOL_VERSION: u8 = 1;
pub const MAX_PAYLOAD_SIZE: usize = 64;
pub const MAX_MESSAGE_SIZE: usize = core::mem::size_of::<MessageHeader>() + MAX_PAYLOAD_SIZE;

/// 消息类型判别值
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum MessageType {
    /// 温度读数（4字节二进制标量）
    Temperature = 0x01,
    /// 湿度读数（4字节二进制标量）
    Humidity = 0x02,
    /// 阈值更新/阈值广播
    ChangeThreshold = 0x03,
}

impl MessageType {
    /// 从原始判别值解析，未知类型返回None
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(MessageType::Temperature),
            0x02 => Some(MessageType::Humidity),
            0x03 => Some(MessageType::ChangeThreshold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct NodeId(pub [u8; 6]);

impl NodeId {
    pub const BROADCAST: Self = Self([0xFF; 6]);

    pub fn new(id: [u8; 6]) -> Self {
        Self(id)
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

/// 协议头部定义，零拷贝布局
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, Unaligned)]
pub struct MessageHeader {
    /// 协议版本
    pub version: u8,
    /// 消息类型判别值
    pub message_type: u8,
    /// 源节点ID
    pub source: [u8; 6],
    /// 目标节点ID
    pub destination: [u8; 6],
    /// 负载长度
    pub payload_length: u16,
    /// 校验和
    pub checksum: u16,
}

impl MessageHeader {
    /// 消息类型判别值，未知类型返回None
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_raw(self.message_type)
    }

    pub fn source_id(&self) -> NodeId {
        NodeId(self.source)
    }

    pub fn destination_id(&self) -> NodeId {
        NodeId(self.destination)
    }
}

/// 网状网络消息，头部加借用负载的零拷贝设计
#[derive(Debug)]
pub struct MeshMessage<'a> {
    pub header: MessageHeader,
    pub payload: &'a [u8],
}

impl<'a> MeshMessage<'a> {
    pub fn new(
        source: NodeId,
        destination: NodeId,
        message_type: MessageType,
        payload: &'a [u8],
    ) -> Self {
        debug_assert!(payload.len() <= MAX_PAYLOAD_SIZE);

        let header = MessageHeader {
            version: PROTOCOL_VERSION,
            message_type: message_type as u8,
            source: source.0,
            destination: destination.0,
            payload_length: payload.len() as u16,
            checksum: 0, // 临时值
        };

        let mut message = Self { header, payload };
        message.update_checksum();
        message
    }

    pub fn update_checksum(&mut self) {
        // 校验和字段置零后计算头部校验和，再与负载校验和合并
        self.header.checksum = 0;
        let header_checksum = calculate_checksum(self.header.as_bytes());
        let payload_checksum = calculate_checksum(self.payload);
        self.header.checksum = header_checksum ^ payload_checksum;
    }

    pub fn is_valid(&self) -> bool {
        let mut header_copy = self.header;
        header_copy.checksum = 0;

        let header_checksum = calculate_checksum(header_copy.as_bytes());
        let payload_checksum = calculate_checksum(self.payload);

        (header_checksum ^ payload_checksum) == self.header.checksum
    }

    /// 序列化到发送缓冲区，返回写入的字节数
    pub fn write_to(&self, buffer: &mut [u8]) -> Option<usize> {
        let header_bytes = self.header.as_bytes();
        let total = header_bytes.len() + self.payload.len();
        if buffer.len() < total {
            return None;
        }

        buffer[..header_bytes.len()].copy_from_slice(header_bytes);
        buffer[header_bytes.len()..total].copy_from_slice(self.payload);
        Some(total)
    }

    /// 从接收缓冲区零拷贝解析，长度或版本不符返回None
    pub fn parse(buffer: &'a [u8]) -> Option<Self> {
        let (header, rest) =
            LayoutVerified::<&[u8], MessageHeader>::new_unaligned_from_prefix(buffer)?;
        let header = *header;

        if header.version != PROTOCOL_VERSION {
            return None;
        }

        let payload_length = header.payload_length as usize;
        if payload_length > rest.len() || payload_length > MAX_PAYLOAD_SIZE {
            return None;
        }

        Some(Self {
            header,
            payload: &rest[..payload_length],
        })
    }
}
