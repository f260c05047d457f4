//! DHT22温湿度传感器适配层
//!
//! 物理读取失败不会被掩盖，驱动显式返回`SensorError`，
//! 由上层决定降级策略（保留上次读数，本周期视为无新样本）。

/// 传感器错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SensorError {
    /// 传感器未初始化
    NotInitialized,
    /// 总线读取失败
    ReadFailed,
    /// 等待传感器响应超时
    Timeout,
    /// 校验和不符
    ChecksumMismatch,
}

/// 一次合并读取的温湿度数据
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct DhtReading {
    /// 温度 (°C)
    pub temperature: f32,
    /// 湿度 (%)
    pub humidity: f32,
}

/// 温湿度传感器驱动接口
///
/// 一次`read`触发一轮完整的单总线读取，调用在一个调度节拍内
/// 同步完成，总线时序由具体驱动保证。
pub trait DhtSensor {
    /// 初始化传感器输入引脚
    fn init(&mut self) -> Result<(), SensorError>;

    /// 触发一次物理读取
    fn read(&mut self) -> Result<DhtReading, SensorError>;
}

/// 模拟传感器，产生围绕基准值缓慢波动的读数
#[cfg(feature = "simulator")]
pub struct SimDht {
    base_temperature: f32,
    base_humidity: f32,
    tick: u32,
    initialized: bool,
}

#[cfg(feature = "simulator")]
impl SimDht {
    pub fn new(base_temperature: f32, base_humidity: f32) -> Self {
        Self {
            base_temperature,
            base_humidity,
            tick: 0,
            initialized: false,
        }
    }
}

#[cfg(feature = "simulator")]
impl DhtSensor for SimDht {
    fn init(&mut self) -> Result<(), SensorError> {
        self.initialized = true;
        Ok(())
    }

    fn read(&mut self) -> Result<DhtReading, SensorError> {
        if !self.initialized {
            return Err(SensorError::NotInitialized);
        }

        self.tick = self.tick.wrapping_add(1);

        // 温度在基准值之上0-10°C波动，湿度在基准值之上0-30%波动
        let temperature = self.base_temperature + ((self.tick % 100) as f32) / 10.0;
        let humidity = self.base_humidity + ((self.tick % 60) as f32) / 2.0;

        Ok(DhtReading {
            temperature,
            humidity,
        })
    }
}

/// 脚本化传感器，按预置序列返回读数或错误，用于测试
#[cfg(feature = "simulator")]
pub struct ScriptedDht {
    script: std::collections::VecDeque<Result<DhtReading, SensorError>>,
    initialized: bool,
}

#[cfg(feature = "simulator")]
impl ScriptedDht {
    pub fn new() -> Self {
        Self {
            script: std::collections::VecDeque::new(),
            initialized: false,
        }
    }

    pub fn push_reading(&mut self, temperature: f32, humidity: f32) {
        self.script.push_back(Ok(DhtReading {
            temperature,
            humidity,
        }));
    }

    pub fn push_error(&mut self, error: SensorError) {
        self.script.push_back(Err(error));
    }
}

#[cfg(feature = "simulator")]
impl Default for ScriptedDht {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "simulator")]
impl DhtSensor for ScriptedDht {
    fn init(&mut self) -> Result<(), SensorError> {
        self.initialized = true;
        Ok(())
    }

    fn read(&mut self) -> Result<DhtReading, SensorError> {
        if !self.initialized {
            return Err(SensorError::NotInitialized);
        }
        self.script.pop_front().unwrap_or(Err(SensorError::ReadFailed))
    }
}

#[cfg(feature = "bearpi")]
pub use dht22::Dht22;

/// DHT22单总线驱动，基于embedded-hal引脚和微秒延时
#[cfg(feature = "bearpi")]
mod dht22 {
    use embedded_hal::blocking::delay::DelayUs;
    use embedded_hal::digital::v2::{InputPin, OutputPin};

    use super::{DhtReading, DhtSensor, SensorError};

    /// 等待电平变化的超时上限（微秒）
    const PULSE_TIMEOUT_US: u32 = 100;

    pub struct Dht22<P, D> {
        pin: P,
        delay: D,
        initialized: bool,
    }

    impl<P, D> Dht22<P, D>
    where
        P: InputPin + OutputPin,
        D: DelayUs<u16>,
    {
        pub fn new(pin: P, delay: D) -> Self {
            Self {
                pin,
                delay,
                initialized: false,
            }
        }

        /// 等待引脚到达指定电平，返回等待的微秒数
        fn wait_for_level(&mut self, high: bool) -> Result<u32, SensorError> {
            for elapsed in 0..PULSE_TIMEOUT_US {
                let level = if high {
                    self.pin.is_high()
                } else {
                    self.pin.is_low()
                };
                if level.map_err(|_| SensorError::ReadFailed)? {
                    return Ok(elapsed);
                }
                self.delay.delay_us(1);
            }
            Err(SensorError::Timeout)
        }

        /// 读取40位原始数据：湿度16位、温度16位、校验和8位
        fn read_raw(&mut self) -> Result<[u8; 5], SensorError> {
            // 主机拉低至少1ms发起读取
            self.pin.set_low().map_err(|_| SensorError::ReadFailed)?;
            self.delay.delay_us(1100);
            self.pin.set_high().map_err(|_| SensorError::ReadFailed)?;
            self.delay.delay_us(40);

            // 传感器应答：80us低+80us高
            self.wait_for_level(false)?;
            self.wait_for_level(true)?;
            self.wait_for_level(false)?;

            let mut data = [0u8; 5];
            for bit in 0..40 {
                // 每位以50us低电平开始，高电平约26us为0，约70us为1
                self.wait_for_level(true)?;
                let high_duration = self.wait_for_level(false)?;
                if high_duration > 40 {
                    data[bit / 8] |= 1 << (7 - bit % 8);
                }
            }
            Ok(data)
        }
    }

    impl<P, D> DhtSensor for Dht22<P, D>
    where
        P: InputPin + OutputPin,
        D: DelayUs<u16>,
    {
        fn init(&mut self) -> Result<(), SensorError> {
            // 空闲态保持高电平
            self.pin.set_high().map_err(|_| SensorError::ReadFailed)?;
            self.initialized = true;
            Ok(())
        }

        fn read(&mut self) -> Result<DhtReading, SensorError> {
            if !self.initialized {
                return Err(SensorError::NotInitialized);
            }

            let data = self.read_raw()?;

            let sum = data[0]
                .wrapping_add(data[1])
                .wrapping_add(data[2])
                .wrapping_add(data[3]);
            if sum != data[4] {
                return Err(SensorError::ChecksumMismatch);
            }

            let humidity_raw = u16::from_be_bytes([data[0], data[1]]);
            let temperature_raw = u16::from_be_bytes([data[2], data[3]]);

            // 温度最高位为符号位
            let temperature_magnitude = (temperature_raw & 0x7FFF) as f32 / 10.0;
            let temperature = if temperature_raw & 0x8000 != 0 {
                -temperature_magnitude
            } else {
                temperature_magnitude
            };

            Ok(DhtReading {
                temperature,
                humidity: humidity_raw as f32 / 10.0,
            })
        }
    }
}
