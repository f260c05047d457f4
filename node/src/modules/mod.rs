pub mod humidity_temperature;

use common::hal::RadioInterface;
use common::protocol::MessageHeader;

use crate::sensor::SensorError;

/// 传感器模块统一生命周期接口
///
/// 宿主循环通过`&mut dyn SensorModule`持有一组异构模块实例，
/// 每个调度节拍轮询一次。所有方法都在一个节拍内同步完成，
/// 传输句柄按调用传入，模块不持有任何全局状态。
pub trait SensorModule {
    /// 启动时调用一次，配置传感器输入
    fn init(&mut self) -> Result<(), SensorError>;

    /// 本周期是否有值得发送的变化
    ///
    /// 采样间隔未到时直接返回false，不触发物理读取。
    fn should_send(&mut self, now_ms: u64) -> bool;

    /// 发送被标记的量
    ///
    /// `force`为true时先同步采样一次，然后无条件发送全部量。
    fn send_data(&mut self, radio: &mut dyn RadioInterface, now_ms: u64, force: bool);

    /// 处理一条发给本节点的入站消息
    ///
    /// 不匹配的消息类型直接忽略，不影响采样状态机。
    fn on_message(&mut self, radio: &mut dyn RadioInterface, header: &MessageHeader, payload: &[u8]);

    /// 广播当前配置，既用于本地触发也作为配置更新的应答
    fn announce_config(&mut self, radio: &mut dyn RadioInterface);
}
