use std::time::Duration;

/// 无抖动的指数退避：每次取出当前等待时长后翻倍，封顶 `max`；连接成功后 `reset`。
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub const DEFAULT_BASE: Duration = Duration::from_millis(1000);
    pub const DEFAULT_MAX: Duration = Duration::from_millis(15000);

    pub fn new(base: Duration, max: Duration) -> Self {
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
        }
    }

    /// 下一次重连前的等待时长。
    pub fn next_wait(&mut self) -> Duration {
        let wait = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        wait
    }

    pub fn peek(&self) -> Duration {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.base;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE, Self::DEFAULT_MAX)
    }
}
