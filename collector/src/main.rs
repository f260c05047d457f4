#![cfg_attr(not(feature = "simulator"), no_std)]
#![cfg_attr(not(feature = "simulator"), no_main)]

use common::hal::{Hardware, RadioInterface};
use common::protocol::threshold::THRESHOLD_TEXT_LEN;
use common::protocol::{
    decode_scalar, MessageType, NodeId, Quantity, ThresholdCodec, ThresholdPair,
};
use common::utils::AlignedBuffer;

use collector::storage::Storage;
use collector::CircularBuffer;

/// 已下发过阈值配置的节点数上限
const MAX_TRACKED_NODES: usize = 8;

#[cfg(feature = "simulator")]
fn main() {
    // 模拟器入口
    use common::hal::simulator::{SimChannel, SimHardware};

    println!("启动数据收集节点（模拟器模式）");

    let channel = SimChannel::new();
    let node_id = NodeId::new([0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6]);
    let mut hardware = SimHardware::new(node_id, channel);

    // 希望在网内收敛到的上报阈值
    let desired = Some(ThresholdPair::new(0.5, 2.0));
    collector_main(&mut hardware, desired);
}

#[cfg(feature = "bearpi")]
#[no_mangle]
pub extern "C" fn collector_entry() -> ! {
    // BearPi硬件入口
    use common::hal::bearpi_hi2821::BearPiHardware;

    let node_id = NodeId::new([0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6]);
    let mut hardware = BearPiHardware::new(node_id);

    collector_main(&mut hardware, None);

    // 嵌入式设备不应该退出主循环
    loop {}
}

/// 收集循环：入库上报数据，并向新上线的节点下发期望阈值
fn collector_main<H: Hardware>(hardware: &mut H, desired: Option<ThresholdPair>) {
    // 配置无线电
    let radio = hardware.radio();
    let _ = radio.configure(15, 20); // 使用15号信道，20dBm发射功率

    let mut storage = CircularBuffer::new();
    let mut notified: heapless::Vec<NodeId, MAX_TRACKED_NODES> = heapless::Vec::new();

    let mut rx_buffer = AlignedBuffer::<256>::new();

    loop {
        let now = hardware.timestamp_ms().unwrap_or(0);

        let message = match hardware.radio().receive(rx_buffer.as_mut_slice()) {
            Ok(Some(message)) => message,
            _ => {
                let _ = hardware.delay_ms(100);
                continue;
            }
        };

        let source = message.header.source_id();
        match message.header.message_type() {
            Some(message_type @ (MessageType::Temperature | MessageType::Humidity)) => {
                let value = match decode_scalar(message.payload) {
                    Some(value) => value,
                    // 负载长度不符，丢弃
                    None => continue,
                };
                // Temperature/Humidity两种消息类型都有对应量纲
                let quantity = match Quantity::from_message_type(message_type) {
                    Some(quantity) => quantity,
                    None => continue,
                };

                storage.add_reading(source, quantity, value, now);
                #[cfg(feature = "simulator")]
                println!(
                    "收到{:?}读数 {} 来自{:?}，库内共{}条",
                    quantity,
                    value,
                    source,
                    storage.record_count()
                );

                // 新上线的节点下发一次期望阈值
                if let Some(thresholds) = desired {
                    if !notified.contains(&source) && notified.push(source).is_ok() {
                        send_threshold_update(hardware, source, &thresholds);
                    }
                }
            }
            Some(MessageType::ChangeThreshold) => {
                // 节点的阈值回播，记录即可
                let (temperature, humidity) = ThresholdPair::decode(message.payload);
                #[cfg(feature = "simulator")]
                println!(
                    "节点{:?}阈值确认: 温度{:?} 湿度{:?}",
                    source, temperature, humidity
                );
                #[cfg(not(feature = "simulator"))]
                let _ = (temperature, humidity);
            }
            // 未知消息类型忽略
            None => {}
        }
    }
}

/// 向指定节点下发阈值更新
fn send_threshold_update<H: Hardware>(
    hardware: &mut H,
    destination: NodeId,
    thresholds: &ThresholdPair,
) {
    let mut buffer = [0u8; THRESHOLD_TEXT_LEN];
    let length = match thresholds.encode(ThresholdCodec::Binary, &mut buffer) {
        Some(length) => length,
        None => return,
    };

    if hardware
        .radio()
        .send(destination, MessageType::ChangeThreshold, &buffer[..length])
        .is_err()
    {
        #[cfg(feature = "simulator")]
        println!("阈值下发失败: {:?}", destination);
    }
}
