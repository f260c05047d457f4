use crate::protocol::MessageType;

/// 标量负载长度，等于f32的存储宽度
pub const SCALAR_PAYLOAD_LEN: usize = core::mem::size_of::<f32>();

/// 读数的量纲标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Quantity {
    /// 温度 (°C)
    Temperature,
    /// 湿度 (%)
    Humidity,
}

impl Quantity {
    /// 对应的消息类型判别值
    pub fn message_type(self) -> MessageType {
        match self {
            Quantity::Temperature => MessageType::Temperature,
            Quantity::Humidity => MessageType::Humidity,
        }
    }

    /// 从消息类型反查量纲，阈值消息不携带量纲
    pub fn from_message_type(message_type: MessageType) -> Option<Self> {
        match message_type {
            MessageType::Temperature => Some(Quantity::Temperature),
            MessageType::Humidity => Some(Quantity::Humidity),
            MessageType::ChangeThreshold => None,
        }
    }
}

/// 带量纲标签的标量读数
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct Reading {
    pub quantity: Quantity,
    pub value: f32,
}

impl Reading {
    pub fn new(quantity: Quantity, value: f32) -> Self {
        Self { quantity, value }
    }
}

/// 标量编码为定宽二进制负载，平台本机字节序
pub fn encode_scalar(value: f32) -> [u8; SCALAR_PAYLOAD_LEN] {
    value.to_ne_bytes()
}

/// 从定宽二进制负载解码标量，长度不符返回None
pub fn decode_scalar(payload: &[u8]) -> Option<f32> {
    if payload.len() != SCALAR_PAYLOAD_LEN {
        return None;
    }

    let mut bytes = [0u8; SCALAR_PAYLOAD_LEN];
    bytes.copy_from_slice(payload);
    Some(f32::from_ne_bytes(bytes))
}
