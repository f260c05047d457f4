/// 默认采样间隔（毫秒）
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 2500;

/// 采样间隔门限计时器
///
/// 纯粹的单调时钟谓词，不阻塞也没有其他副作用。
/// 时钟回绕由底层时钟抽象保证，这里不重复处理。
#[derive(Debug, Clone, Copy)]
pub struct GateTimer {
    interval_ms: u64,
    last_reset_ms: u64,
}

impl GateTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_reset_ms: 0,
        }
    }

    /// 自上次重置起是否已过了配置的间隔
    pub fn elapsed(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_reset_ms) >= self.interval_ms
    }

    /// 以当前时刻为新的基准
    pub fn reset(&mut self, now_ms: u64) {
        self.last_reset_ms = now_ms;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

impl Default for GateTimer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL_MS)
    }
}
