use embedded_timers::clock::Clock;

/// 基于操作系统单调时钟的时钟
///
/// 配合 `embedded_timers::delay::Delay` 给传感器驱动提供延时
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl StdClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for StdClock {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn elapsed(&self, instant: Self::Instant) -> std::time::Duration {
        instant.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let clock = StdClock::new();
        let start = clock.now();

        let first = clock.elapsed(start);
        let second = clock.elapsed(start);
        assert!(second >= first);
    }

    #[test]
    fn drives_delay_for_the_sensor_driver() {
        use embedded_hal::delay::DelayNs;
        use embedded_timers::delay::Delay;

        let clock = StdClock::new();
        let mut delay = Delay::new(&clock);

        let start = clock.now();
        delay.delay_ms(3);
        assert!(clock.elapsed(start) >= std::time::Duration::from_millis(3));
    }
}
