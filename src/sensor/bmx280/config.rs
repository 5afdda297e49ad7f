/// 过采样率
///
/// 设置为 `Skipped` 时传感器不做对应测量，数据寄存器输出固定值（温度、压力0x80000，湿度0x8000）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Oversampling {
    Skipped = 0b000,
    X1 = 0b001,
    X2 = 0b010,
    X4 = 0b011,
    X8 = 0b100,
    #[default]
    X16 = 0b101,
}

impl Oversampling {
    /// 采样次数
    pub fn factor(self) -> u32 {
        match self {
            Self::Skipped => 0,
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
            Self::X16 => 16,
        }
    }
}

/// 工作模式
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// 不测量，功耗最低
    Sleep = 0b00,
    /// 测量一次后自动回到睡眠模式
    Forced = 0b01,
    /// 测量和待机交替循环
    #[default]
    Normal = 0b11,
}

/// 正常模式下两次测量之间的待机时间
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Standby {
    Ms0_5 = 0b000,
    Ms62_5 = 0b001,
    Ms125 = 0b010,
    #[default]
    Ms250 = 0b011,
    Ms500 = 0b100,
    Ms1000 = 0b101,
    Ms10 = 0b110,
    Ms20 = 0b111,
}

/// IIR滤波器系数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Filter {
    Off = 0b000,
    X2 = 0b001,
    X4 = 0b010,
    #[default]
    X8 = 0b011,
    X16 = 0b100,
}

/// 传感器配置
///
/// 默认值：待机250ms、IIR滤波8倍、关闭三线SPI、所有通道16倍过采样、正常模式
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub temperature_oversampling: Oversampling,
    pub pressure_oversampling: Oversampling,
    /// 只对BME280有效
    pub humidity_oversampling: Oversampling,
    pub mode: Mode,
    pub standby: Standby,
    pub filter: Filter,
    pub spi3w: bool,
}

impl Config {
    pub fn with_temperature_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.temperature_oversampling = oversampling;
        self
    }

    pub fn with_pressure_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.pressure_oversampling = oversampling;
        self
    }

    pub fn with_humidity_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.humidity_oversampling = oversampling;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_standby(mut self, standby: Standby) -> Self {
        self.standby = standby;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_spi3w(mut self, spi3w: bool) -> Self {
        self.spi3w = spi3w;
        self
    }

    /// ctrl_hum寄存器（0xF2）
    ///
    /// - bit2 ~ bit0: osrs_h
    pub fn ctrl_hum(&self) -> u8 {
        self.humidity_oversampling as u8
    }

    /// ctrl_meas寄存器（0xF4）
    ///
    /// - bit7 ~ bit5: osrs_t
    /// - bit4 ~ bit2: osrs_p
    /// - bit1 ~ bit0: mode
    pub fn ctrl_meas(&self) -> u8 {
        self.ctrl_meas_with_mode(self.mode)
    }

    /// 替换工作模式后的ctrl_meas寄存器值（触发强制测量时用）
    pub fn ctrl_meas_with_mode(&self, mode: Mode) -> u8 {
        ((self.temperature_oversampling as u8) << 5)
            | ((self.pressure_oversampling as u8) << 2)
            | mode as u8
    }

    /// config寄存器（0xF5）
    ///
    /// - bit7 ~ bit5: t_sb
    /// - bit4 ~ bit2: filter
    /// - bit0: spi3w_en
    pub fn config(&self) -> u8 {
        ((self.standby as u8) << 5) | ((self.filter as u8) << 2) | self.spi3w as u8
    }

    /// 一次测量的最长耗时【μs】（数据手册附录B）
    ///
    /// `with_humidity` 为false时不计算湿度测量时间
    pub fn max_measurement_time_us(&self, with_humidity: bool) -> u32 {
        let mut time = 1250 + 2300 * self.temperature_oversampling.factor();

        let pressure = self.pressure_oversampling.factor();
        if pressure > 0 {
            time += 2300 * pressure + 575;
        }

        let humidity = self.humidity_oversampling.factor();
        if with_humidity && humidity > 0 {
            time += 2300 * humidity + 575;
        }

        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_register_values() {
        let config = Config::default();

        assert_eq!(config.ctrl_hum(), 0x05);
        assert_eq!(config.ctrl_meas(), 0xB7);
        assert_eq!(config.config(), 0x6C);
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .with_temperature_oversampling(Oversampling::X2)
            .with_pressure_oversampling(Oversampling::Skipped)
            .with_humidity_oversampling(Oversampling::X1)
            .with_mode(Mode::Forced)
            .with_standby(Standby::Ms1000)
            .with_filter(Filter::Off)
            .with_spi3w(true);

        assert_eq!(config.ctrl_hum(), 0x01);
        // 010 000 01
        assert_eq!(config.ctrl_meas(), 0x41);
        // 101 000 0 1
        assert_eq!(config.config(), 0xA1);
        assert_eq!(config.ctrl_meas_with_mode(Mode::Sleep), 0x40);
    }

    #[test]
    fn measurement_time() {
        let config = Config::default();
        assert_eq!(config.max_measurement_time_us(true), 112_800);
        assert_eq!(config.max_measurement_time_us(false), 75_425);

        let minimal = Config::default()
            .with_temperature_oversampling(Oversampling::X1)
            .with_pressure_oversampling(Oversampling::Skipped)
            .with_humidity_oversampling(Oversampling::Skipped);
        assert_eq!(minimal.max_measurement_time_us(true), 3550);
    }
}
