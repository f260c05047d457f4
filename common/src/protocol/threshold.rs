use core::fmt::Write;

use zerocopy::{AsBytes, FromBytes, LayoutVerified, Unaligned};

/// 二进制阈值负载长度，两个f32字段
pub const THRESHOLD_BINARY_LEN: usize = core::mem::size_of::<ThresholdPayload>();

/// 兼容旧节点的文本阈值负载长度，定长21字节
pub const THRESHOLD_TEXT_LEN: usize = 21;

/// 阈值消息的线上编码方式
///
/// 旧固件用定长ASCII文本交换阈值，每个值截断到一位小数，
/// 属于有损编码。二进制编码为默认方式，保留文本编码仅用于
/// 与已部署的旧节点混合组网。
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ThresholdCodec {
    /// 定宽二进制，两个f32字段，无精度损失
    Binary,
    /// 定长21字节ASCII文本 "<整数>.<一位小数>\n<整数>.<一位小数>"
    LegacyText,
}

/// 二进制阈值负载布局
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, Unaligned)]
pub struct ThresholdPayload {
    pub temperature: f32,
    pub humidity: f32,
}

/// 温度与湿度的变化阈值对
#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub struct ThresholdPair {
    /// 温度变化阈值 (°C)
    pub temperature: f32,
    /// 湿度变化阈值 (%)
    pub humidity: f32,
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            humidity: 1.0,
        }
    }
}

impl ThresholdPair {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// 应用一次远程更新
    ///
    /// 仅当候选值严格大于零时覆盖对应字段，非法值静默保留原阈值。
    /// 返回是否有字段被修改。
    pub fn apply(&mut self, temperature: Option<f32>, humidity: Option<f32>) -> bool {
        let mut changed = false;

        if let Some(value) = temperature {
            if value > 0.0 {
                self.temperature = value;
                changed = true;
            }
        }

        if let Some(value) = humidity {
            if value > 0.0 {
                self.humidity = value;
                changed = true;
            }
        }

        changed
    }

    /// 按指定编码方式序列化到发送缓冲区，返回写入的字节数
    pub fn encode(&self, codec: ThresholdCodec, buffer: &mut [u8]) -> Option<usize> {
        match codec {
            ThresholdCodec::Binary => {
                let payload = ThresholdPayload {
                    temperature: self.temperature,
                    humidity: self.humidity,
                };
                let bytes = payload.as_bytes();
                if buffer.len() < bytes.len() {
                    return None;
                }
                buffer[..bytes.len()].copy_from_slice(bytes);
                Some(bytes.len())
            }
            ThresholdCodec::LegacyText => encode_legacy_text(self, buffer),
        }
    }

    /// 按负载长度自动识别编码方式并解码
    ///
    /// 二进制负载恰好8字节，旧文本负载始终是定长21字节，
    /// 两种长度不会混淆。返回两个候选值，解析失败的一侧为None。
    /// 这里不做正负校验，校验在`apply`中完成。
    pub fn decode(payload: &[u8]) -> (Option<f32>, Option<f32>) {
        if payload.len() == THRESHOLD_BINARY_LEN {
            decode_binary(payload)
        } else {
            decode_legacy_text(payload)
        }
    }
}

fn decode_binary(payload: &[u8]) -> (Option<f32>, Option<f32>) {
    match LayoutVerified::<&[u8], ThresholdPayload>::new_unaligned(payload) {
        Some(decoded) => {
            let decoded = *decoded;
            (Some(decoded.temperature), Some(decoded.humidity))
        }
        None => (None, None),
    }
}

/// 旧文本格式编码："%d.%d\n%d.%d"，每个值截断到一位小数
///
/// 定长缓冲区中格式化文本之后的尾部字节显式清零，
/// 接收端由此可以按NUL安全截断。
fn encode_legacy_text(pair: &ThresholdPair, buffer: &mut [u8]) -> Option<usize> {
    if buffer.len() < THRESHOLD_TEXT_LEN {
        return None;
    }

    let mut text: heapless::String<THRESHOLD_TEXT_LEN> = heapless::String::new();
    write!(
        text,
        "{}.{}\n{}.{}",
        pair.temperature as i32,
        (pair.temperature * 10.0) as i32 % 10,
        pair.humidity as i32,
        (pair.humidity * 10.0) as i32 % 10,
    )
    .ok()?;

    buffer[..THRESHOLD_TEXT_LEN].fill(0);
    buffer[..text.len()].copy_from_slice(text.as_bytes());
    Some(THRESHOLD_TEXT_LEN)
}

/// 旧文本格式解码：按换行符分成两个词元，逐个解析
///
/// 旧固件不清零尾部字节，这里先按NUL截断，再丢弃无效UTF-8尾部，
/// 词元解析只取数字前缀，与旧端atof的容错行为一致。
fn decode_legacy_text(payload: &[u8]) -> (Option<f32>, Option<f32>) {
    let len = payload.len().min(THRESHOLD_TEXT_LEN);
    let body = &payload[..len];
    let body = match body.iter().position(|&b| b == 0) {
        Some(nul) => &body[..nul],
        None => body,
    };

    let text = match core::str::from_utf8(body) {
        Ok(text) => text,
        Err(error) => core::str::from_utf8(&body[..error.valid_up_to()]).unwrap_or(""),
    };

    let mut tokens = text.splitn(2, '\n');
    let temperature = tokens.next().and_then(parse_token);
    let humidity = tokens.next().and_then(parse_token);
    (temperature, humidity)
}

/// 解析词元的数字前缀，无可解析前缀返回None
fn parse_token(token: &str) -> Option<f32> {
    let token = token.trim_start();
    let end = token
        .char_indices()
        .take_while(|&(index, c)| {
            c.is_ascii_digit() || c == '.' || (index == 0 && (c == '-' || c == '+'))
        })
        .map(|(index, c)| index + c.len_utf8())
        .last()
        .unwrap_or(0);
    token[..end].parse::<f32>().ok()
}
