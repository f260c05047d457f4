#![cfg_attr(not(feature = "simulator"), no_std)]
#![cfg_attr(not(feature = "simulator"), no_main)]

use common::hal::{Hardware, RadioInterface};
use common::protocol::NodeId;
use common::utils::AlignedBuffer;

use node::modules::SensorModule;

#[cfg(feature = "simulator")]
fn main() {
    // 模拟器入口
    use common::hal::simulator::{SimChannel, SimHardware};
    use node::sensor::SimDht;
    use node::HumidityTemperatureModule;

    println!("启动温湿度上报节点（模拟器模式）");

    let channel = SimChannel::new();
    let node_id = NodeId::new([0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6]);
    let mut hardware = SimHardware::new(node_id, channel);

    let sensor = SimDht::new(22.0, 55.0);
    let mut module = HumidityTemperatureModule::new(sensor, NodeId::BROADCAST);

    node_main(&mut hardware, &mut module);
}

#[cfg(feature = "bearpi")]
#[no_mangle]
pub extern "C" fn node_entry() -> ! {
    // BearPi硬件入口
    use common::hal::bearpi_hi2821::BearPiHardware;
    use node::sensor::Dht22;
    use node::HumidityTemperatureModule;

    let node_id = NodeId::new([0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6]);
    let mut hardware = BearPiHardware::new(node_id);

    let sensor = Dht22::new(board::DhtPin::new(7), board::BoardDelay);
    let mut module = HumidityTemperatureModule::new(sensor, NodeId::BROADCAST);

    node_main(&mut hardware, &mut module);

    // 嵌入式设备不应该退出主循环
    loop {}
}

/// BearPi板级绑定：DHT22数据引脚和微秒延时
#[cfg(feature = "bearpi")]
mod board {
    use core::convert::Infallible;

    use embedded_hal::blocking::delay::DelayUs;
    use embedded_hal::digital::v2::{InputPin, OutputPin};

    extern "C" {
        fn gpio_set_dir(pin: u8, output: bool);
        fn gpio_write(pin: u8, level: bool);
        fn gpio_read(pin: u8) -> bool;
        fn nl_delay_us(us: u32);
    }

    pub struct DhtPin {
        pin: u8,
    }

    impl DhtPin {
        pub fn new(pin: u8) -> Self {
            Self { pin }
        }
    }

    impl OutputPin for DhtPin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            unsafe {
                gpio_set_dir(self.pin, true);
                gpio_write(self.pin, false);
            }
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            // 释放总线，由上拉电阻保持高电平
            unsafe { gpio_set_dir(self.pin, false) };
            Ok(())
        }
    }

    impl InputPin for DhtPin {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(unsafe { gpio_read(self.pin) })
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!unsafe { gpio_read(self.pin) })
        }
    }

    pub struct BoardDelay;

    impl DelayUs<u16> for BoardDelay {
        fn delay_us(&mut self, us: u16) {
            unsafe { nl_delay_us(us as u32) }
        }
    }
}

/// 宿主循环：单线程协作式调度，每个节拍轮询一次模块集合
fn node_main<H, M>(hardware: &mut H, module: &mut M)
where
    H: Hardware,
    M: SensorModule,
{
    let node_id = hardware.node_id();

    // 配置无线电
    let radio = hardware.radio();
    let _ = radio.configure(15, 20); // 使用15号信道，20dBm发射功率

    if module.init().is_err() {
        #[cfg(feature = "simulator")]
        println!("传感器初始化失败，退出");
        return;
    }

    // 入网时先广播一次当前阈值配置
    module.announce_config(hardware.radio());

    let mut rx_buffer = AlignedBuffer::<256>::new();

    loop {
        let now = hardware.timestamp_ms().unwrap_or(0);

        // 处理发给本节点的入站消息
        if let Ok(Some(message)) = hardware.radio().receive(rx_buffer.as_mut_slice()) {
            let destination = message.header.destination_id();
            if destination == node_id || destination.is_broadcast() {
                module.on_message(hardware.radio(), &message.header, message.payload);
            }
        }

        // 采样决策与发送在同一个节拍内完成
        if module.should_send(now) {
            module.send_data(hardware.radio(), now, false);
        }

        let _ = hardware.delay_ms(100);
    }
}
