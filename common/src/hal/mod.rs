#[cfg(feature = "bearpi")]
pub mod bearpi_hi2821;
#[cfg(feature = "simulator")]
pub mod simulator;

use crate::protocol::{MeshMessage, MessageType, NodeId};

/// 传输层错误类型
///
/// 发送按即发即弃处理，这一层不做重传，错误只用于上报。
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LinkError {
    /// 发送失败
    SendFailed,
    /// 接收失败
    ReceiveFailed,
    /// 无线电参数非法
    ConfigInvalid,
}

/// 无线电接口抽象
///
/// 保持对象安全，传感器模块通过`&mut dyn RadioInterface`收发消息，
/// 不持有任何全局传输句柄。
pub trait RadioInterface {
    /// 配置无线电信道和发射功率
    fn configure(&mut self, channel: u8, power: u8) -> Result<(), LinkError>;

    /// 发送一条消息到目标节点
    fn send(
        &mut self,
        destination: NodeId,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<(), LinkError>;

    /// 从接收缓冲区零拷贝读出一条发给本节点的消息
    ///
    /// 校验和不符的消息在这一层丢弃，返回Ok(None)。
    fn receive<'a>(&mut self, buffer: &'a mut [u8]) -> Result<Option<MeshMessage<'a>>, LinkError>;
}

/// 硬件抽象层接口
pub trait Hardware {
    type Radio: RadioInterface;

    /// 获取本节点ID
    fn node_id(&self) -> NodeId;

    /// 获取无线电接口
    fn radio(&mut self) -> &mut Self::Radio;

    /// 获取单调时间戳（毫秒），按约定可跨越计时器回绕
    fn timestamp_ms(&self) -> Result<u64, LinkError>;

    /// 延时指定毫秒数
    fn delay_ms(&mut self, ms: u32) -> Result<(), LinkError>;
}
