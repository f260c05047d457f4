use common::hal::RadioInterface;
use common::protocol::threshold::THRESHOLD_TEXT_LEN;
use common::protocol::{
    encode_scalar, MessageHeader, MessageType, NodeId, ThresholdCodec, ThresholdPair,
};

use crate::gate_timer::{GateTimer, DEFAULT_SAMPLE_INTERVAL_MS};
use crate::modules::SensorModule;
use crate::sensor::{DhtSensor, SensorError};

/// 周期性温湿度上报模块
///
/// 按固定节奏采样，用迟滞阈值判断变化是否值得上报，
/// 并参与网内的阈值远程配置协议。
pub struct HumidityTemperatureModule<S: DhtSensor> {
    sensor: S,
    read_timer: GateTimer,

    /// 上报目标节点
    destination: NodeId,
    /// 阈值消息的线上编码方式
    codec: ThresholdCodec,

    thresholds: ThresholdPair,

    /// 当前温度读数
    read_temp: f32,
    /// 最近一次已发送的温度
    temp_last_sent: f32,
    /// 当前湿度读数
    read_hum: f32,
    /// 最近一次已发送的湿度
    hum_last_sent: f32,

    should_send_temp: bool,
    should_send_hum: bool,
}

impl<S: DhtSensor> HumidityTemperatureModule<S> {
    pub fn new(sensor: S, destination: NodeId) -> Self {
        Self::with_config(
            sensor,
            destination,
            ThresholdPair::default(),
            DEFAULT_SAMPLE_INTERVAL_MS,
            ThresholdCodec::Binary,
        )
    }

    pub fn with_config(
        sensor: S,
        destination: NodeId,
        thresholds: ThresholdPair,
        sample_interval_ms: u64,
        codec: ThresholdCodec,
    ) -> Self {
        Self {
            sensor,
            read_timer: GateTimer::new(sample_interval_ms),
            destination,
            codec,
            thresholds,
            read_temp: 0.0,
            temp_last_sent: 0.0,
            read_hum: 0.0,
            hum_last_sent: 0.0,
            should_send_temp: false,
            should_send_hum: false,
        }
    }

    /// 采样间隔到了就触发一次物理读取，并重置门限计时器
    ///
    /// 读取失败时保留上次读数，本周期按无新样本处理。
    fn read_data(&mut self, now_ms: u64) -> bool {
        if !self.read_timer.elapsed(now_ms) {
            return false;
        }
        self.read_timer.reset(now_ms);

        match self.sensor.read() {
            Ok(reading) => {
                self.read_temp = reading.temperature;
                self.read_hum = reading.humidity;
                true
            }
            Err(error) => {
                #[cfg(feature = "simulator")]
                println!("传感器读取失败: {:?}", error);
                #[cfg(feature = "bearpi")]
                defmt::warn!("传感器读取失败: {}", error);
                #[cfg(not(any(feature = "simulator", feature = "bearpi")))]
                let _ = error;
                false
            }
        }
    }

    pub fn thresholds(&self) -> ThresholdPair {
        self.thresholds
    }

    /// 最近一次已发送的(温度, 湿度)，即迟滞比较基准
    pub fn last_sent(&self) -> (f32, f32) {
        (self.temp_last_sent, self.hum_last_sent)
    }

    /// 当前被标记待发送的(温度, 湿度)标志
    pub fn pending(&self) -> (bool, bool) {
        (self.should_send_temp, self.should_send_hum)
    }
}

impl<S: DhtSensor> SensorModule for HumidityTemperatureModule<S> {
    fn init(&mut self) -> Result<(), SensorError> {
        self.sensor.init()
    }

    fn should_send(&mut self, now_ms: u64) -> bool {
        if !self.read_data(now_ms) {
            return false;
        }

        self.should_send_temp = false;
        self.should_send_hum = false;

        // 与最近一次已发送的值比较（迟滞），每次接受的变化
        // 都重新锚定基准，抑制阈值边界附近的小幅振荡
        if (self.read_temp - self.temp_last_sent).abs() > self.thresholds.temperature {
            self.temp_last_sent = self.read_temp;
            self.should_send_temp = true;
        }
        if (self.read_hum - self.hum_last_sent).abs() > self.thresholds.humidity {
            self.hum_last_sent = self.read_hum;
            self.should_send_hum = true;
        }

        self.should_send_temp || self.should_send_hum
    }

    fn send_data(&mut self, radio: &mut dyn RadioInterface, now_ms: u64, force: bool) {
        if force {
            self.should_send_temp = true;
            self.should_send_hum = true;
            self.read_data(now_ms);
        }

        // 即发即弃：发送失败不重试，重传属于传输层
        if self.should_send_temp {
            let payload = encode_scalar(self.read_temp);
            if radio
                .send(self.destination, MessageType::Temperature, &payload)
                .is_err()
            {
                #[cfg(feature = "simulator")]
                println!("温度上报发送失败");
            }
        }
        if self.should_send_hum {
            let payload = encode_scalar(self.read_hum);
            if radio
                .send(self.destination, MessageType::Humidity, &payload)
                .is_err()
            {
                #[cfg(feature = "simulator")]
                println!("湿度上报发送失败");
            }
        }
    }

    fn on_message(
        &mut self,
        radio: &mut dyn RadioInterface,
        header: &MessageHeader,
        payload: &[u8],
    ) {
        match header.message_type() {
            Some(MessageType::ChangeThreshold) => {
                let (temperature, humidity) = ThresholdPair::decode(payload);
                self.thresholds.apply(temperature, humidity);

                #[cfg(feature = "simulator")]
                println!(
                    "新阈值: 温度{} 湿度{}",
                    self.thresholds.temperature, self.thresholds.humidity
                );

                // 把（可能未变的）当前阈值回播出去，
                // 既是应答也是各节点配置收敛的手段
                self.announce_config(radio);
            }
            // 其他消息类型不属于本模块，忽略
            _ => {}
        }
    }

    fn announce_config(&mut self, radio: &mut dyn RadioInterface) {
        let mut buffer = [0u8; THRESHOLD_TEXT_LEN];
        let length = match self.thresholds.encode(self.codec, &mut buffer) {
            Some(length) => length,
            None => return,
        };

        if radio
            .send(
                NodeId::BROADCAST,
                MessageType::ChangeThreshold,
                &buffer[..length],
            )
            .is_err()
        {
            #[cfg(feature = "simulator")]
            println!("阈值广播发送失败");
        }
    }
}
