//! BME280 / BMP280 大气压力、温度、（湿度）传感器驱动
//!
//! 同一份驱动代码同时支持两种芯片，初始化时读取芯片ID决定型号。
//! 所有操作都以 `&mut I2C` 借用总线，一次操作内的多个总线事务不会被其他传感器打断。

pub mod altitude;
pub mod calibration;
pub mod compensation;
pub mod config;
pub mod error;
pub mod identity;
pub mod register;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub use calibration::{Calibration, HumidityCalibration};
pub use compensation::Reading;
pub use config::{Config, Filter, Mode, Oversampling, Standby};
pub use error::{Bmx280Error, Result};
pub use identity::{Chip, SensorIndex};

use compensation::{compensate_humidity, compensate_pressure, compensate_temperature};
use register::{Registers, SOFT_RESET_COMMAND, addr};

/// 软复位后等待NVM拷贝开始的时间【ms】
const RESET_DELAY_MS: u32 = 2;
/// 状态轮询次数
const STATUS_POLL_ATTEMPTS: u32 = 5;
/// 状态轮询间隔【ms】
const STATUS_POLL_INTERVAL_MS: u32 = 1;

/// 状态寄存器：正在拷贝NVM校准数据
const STATUS_IM_UPDATE: u8 = 0x01;
/// 状态寄存器：正在测量
const STATUS_MEASURING: u8 = 0x08;

/// 精细温度（t_fine）
///
/// 压力和湿度补偿需要同一颗传感器的温度补偿中间值。
/// 只能由 [`Bmx280::read_temperature`] 产生，并绑定产生它的传感器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineTemperature {
    value: i32,
    address: u8,
}

impl FineTemperature {
    pub fn value(&self) -> i32 {
        self.value
    }

    /// 产生该值的传感器地址
    pub fn address(&self) -> u8 {
        self.address
    }
}

/// 温度读数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    /// 温度【℃】
    pub celsius: f32,
    pub fine: FineTemperature,
}

/// 芯片型号及其专有的校准参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Bme280(HumidityCalibration),
    Bmp280,
}

impl Variant {
    pub fn chip(&self) -> Chip {
        match self {
            Self::Bme280(_) => Chip::Bme280,
            Self::Bmp280 => Chip::Bmp280,
        }
    }

    pub fn has_humidity(&self) -> bool {
        self.chip().has_humidity()
    }
}

/// 一次连续读取得到的全部测量值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// 温度【℃】
    pub temperature: Reading<f32>,
    /// 空气压力【Pa】
    pub pressure: Reading<f32>,
    /// 相对湿度【%RH】，BMP280为None
    pub humidity: Option<Reading<f32>>,
}

/// BME280 / BMP280 传感器句柄
///
/// 只能通过 [`Bmx280::init`] 创建，创建成功时校准参数已经读取完毕
#[derive(Debug, Clone)]
pub struct Bmx280 {
    /// 传感器序号
    index: SensorIndex,
    /// I2C从设备地址
    address: u8,
    /// 温度、压力校准参数
    calibration: Calibration,
    /// 芯片型号
    variant: Variant,
    /// 当前配置
    config: Config,
}

impl Bmx280 {
    /// 初始化传感器
    ///
    /// 1. 检查序号（不产生总线通信）
    /// 2. 读取芯片ID，未知芯片直接返回错误，不写任何寄存器
    /// 3. 软复位并等待校准数据拷贝完成
    /// 4. 读取校准参数
    /// 5. 写入配置
    pub fn init<I2C: I2c, D: DelayNs>(
        i2c: &mut I2C,
        index: u8,
        config: Config,
        delay: &mut D,
    ) -> Result<Self, I2C::Error> {
        // 检查序号
        let Some(index) = SensorIndex::from_index(index) else {
            return Err(Bmx280Error::OutOfRangeSensorIndex(index));
        };
        let address = index.address();
        let mut registers = Registers::new(i2c, address);

        // 识别芯片
        let chip = identify(&mut registers, None)?;
        log::info!("BMx280[0x{:02X}] 检测到芯片: {:?}", address, chip);

        // 软复位
        soft_reset(&mut registers, delay)?;

        // 读取校准参数
        let (calibration, variant) = load_coefficients(&mut registers, chip)?;

        // 写入配置
        configure(&mut registers, &variant, &config)?;
        log::info!("BMx280[0x{:02X}] 初始化完成", address);

        // OK
        Ok(Self {
            index,
            address,
            calibration,
            variant,
            config,
        })
    }

    pub fn index(&self) -> SensorIndex {
        self.index
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn chip(&self) -> Chip {
        self.variant.chip()
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 读取芯片ID
    pub fn chip_id<I2C: I2c>(&self, i2c: &mut I2C) -> Result<u8, I2C::Error> {
        Registers::new(i2c, self.address).read_u8(addr::CHIP_ID)
    }

    /// 读取温度
    ///
    /// 返回值里的精细温度用于随后的压力、湿度读取
    pub fn read_temperature<I2C: I2c>(
        &self,
        i2c: &mut I2C,
    ) -> Result<Reading<Temperature>, I2C::Error> {
        let raw_t = Registers::new(i2c, self.address).read_u24_be(addr::TEMP_DATA)?;

        Ok(self.temperature_from_raw(raw_t))
    }

    /// 读取空气压力【Pa】
    ///
    /// - `fine`: 本传感器刚刚读取的精细温度
    pub fn read_pressure<I2C: I2c>(
        &self,
        i2c: &mut I2C,
        fine: FineTemperature,
    ) -> Result<Reading<f32>, I2C::Error> {
        self.check_fine::<I2C::Error>(fine)?;

        let raw_p = Registers::new(i2c, self.address).read_u24_be(addr::PRESS_DATA)?;

        Ok(compensate_pressure(&self.calibration, fine.value, raw_p))
    }

    /// 读取相对湿度【%RH】（只有BME280支持）
    ///
    /// 读数据前会重新确认芯片ID
    pub fn read_humidity<I2C: I2c>(
        &self,
        i2c: &mut I2C,
        fine: FineTemperature,
    ) -> Result<Reading<f32>, I2C::Error> {
        self.check_fine::<I2C::Error>(fine)?;

        let Variant::Bme280(humidity_calibration) = &self.variant else {
            return Err(Bmx280Error::HumidityUnsupported);
        };

        let mut registers = Registers::new(i2c, self.address);

        // 确认芯片仍然是BME280
        let chip_id = registers.read_u8(addr::CHIP_ID)?;
        if Chip::identify(chip_id) != Some(Chip::Bme280) {
            log::warn!("BMx280[0x{:02X}] 芯片ID变为: 0x{:02X}", self.address, chip_id);
            return Err(Bmx280Error::UnknownDevice(chip_id));
        }

        let adc_h = registers.read_u16_be(addr::HUM_DATA)?;

        Ok(compensate_humidity(humidity_calibration, fine.value, adc_h))
    }

    /// 读取海拔高度【m】
    ///
    /// 内部先读取温度再读取压力
    ///
    /// - `sea_level_hpa`: 海平面参考气压【hPa】
    pub fn read_altitude<I2C: I2c>(
        &self,
        i2c: &mut I2C,
        sea_level_hpa: f32,
    ) -> Result<Reading<f32>, I2C::Error> {
        let fine = match self.read_temperature(i2c)? {
            Reading::Value(temperature) => temperature.fine,
            Reading::Disabled => return Ok(Reading::Disabled),
            Reading::DivisionGuard => return Ok(Reading::DivisionGuard),
        };

        Ok(self
            .read_pressure(i2c, fine)?
            .map(|pressure| altitude::altitude(pressure, sea_level_hpa)))
    }

    /// 一次连续读取全部测量数据
    ///
    /// 温度、压力、湿度来自同一次测量。温度测量关闭时没有精细温度，压力、湿度也视为关闭。
    pub fn read_measurement<I2C: I2c>(&self, i2c: &mut I2C) -> Result<Measurement, I2C::Error> {
        // 0xF7 ~ 0xFE
        let mut data = [0u8; 8];
        let length = if self.variant.has_humidity() { 8 } else { 6 };
        Registers::new(i2c, self.address).read_into(addr::PRESS_DATA, &mut data[..length])?;

        let raw_p = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        let raw_t = u32::from_be_bytes([0, data[3], data[4], data[5]]);
        let adc_h = u16::from_be_bytes([data[6], data[7]]);

        let temperature = self.temperature_from_raw(raw_t);
        let fine = temperature.value().map(|temperature| temperature.fine.value);

        let pressure = match fine {
            Some(fine) => compensate_pressure(&self.calibration, fine, raw_p),
            None => Reading::Disabled,
        };

        let humidity = match &self.variant {
            Variant::Bme280(humidity_calibration) => Some(match fine {
                Some(fine) => compensate_humidity(humidity_calibration, fine, adc_h),
                None => Reading::Disabled,
            }),
            Variant::Bmp280 => None,
        };

        // OK
        Ok(Measurement {
            temperature: temperature.map(|temperature| temperature.celsius),
            pressure,
            humidity,
        })
    }

    /// 软复位传感器，重新读取校准参数并写入当前配置
    ///
    /// 和初始化一样先确认芯片ID，型号变了直接返回错误，不写任何寄存器
    pub fn reset<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
    ) -> Result<(), I2C::Error> {
        let mut registers = Registers::new(i2c, self.address);

        let chip = identify(&mut registers, Some(self.variant.chip()))?;

        soft_reset(&mut registers, delay)?;

        let (calibration, variant) = load_coefficients(&mut registers, chip)?;
        configure(&mut registers, &variant, &self.config)?;

        self.calibration = calibration;
        self.variant = variant;

        // OK
        Ok(())
    }

    /// 修改配置
    pub fn set_config<I2C: I2c>(&mut self, i2c: &mut I2C, config: Config) -> Result<(), I2C::Error> {
        configure(&mut Registers::new(i2c, self.address), &self.variant, &config)?;
        self.config = config;

        // OK
        Ok(())
    }

    /// 触发一次强制模式测量并等待测量完成
    ///
    /// 测量完成后传感器自动回到睡眠模式，此时可以读取数据
    pub fn trigger_forced_measurement<I2C: I2c, D: DelayNs>(
        &self,
        i2c: &mut I2C,
        delay: &mut D,
    ) -> Result<(), I2C::Error> {
        let mut registers = Registers::new(i2c, self.address);

        registers.write(addr::CTRL_MEAS, self.config.ctrl_meas_with_mode(Mode::Forced))?;

        // 等待最长测量时间
        delay.delay_us(
            self.config
                .max_measurement_time_us(self.variant.has_humidity()),
        );

        // 等待测量结束
        for _ in 0..STATUS_POLL_ATTEMPTS {
            if registers.read_u8(addr::STATUS)? & STATUS_MEASURING == 0 {
                return Ok(());
            }
            delay.delay_ms(STATUS_POLL_INTERVAL_MS);
        }

        log::warn!("BMx280[0x{:02X}] 强制模式测量超时", self.address);
        Err(Bmx280Error::MeasurementTimeout)
    }

    fn temperature_from_raw(&self, raw_t: u32) -> Reading<Temperature> {
        compensate_temperature(&self.calibration, raw_t).map(|(celsius, value)| Temperature {
            celsius,
            fine: FineTemperature {
                value,
                address: self.address,
            },
        })
    }

    /// 检查精细温度是否来自本传感器
    fn check_fine<E>(&self, fine: FineTemperature) -> Result<(), E> {
        if fine.address != self.address {
            return Err(Bmx280Error::ForeignFineTemperature);
        }
        Ok(())
    }
}

/// 读取芯片ID识别型号
///
/// - `expected`: 已知型号，读到的型号不一致时同样视为未知芯片
fn identify<I2C: I2c>(
    registers: &mut Registers<'_, I2C>,
    expected: Option<Chip>,
) -> Result<Chip, I2C::Error> {
    let chip_id = registers.read_u8(addr::CHIP_ID)?;

    match Chip::identify(chip_id) {
        Some(chip) if expected.is_none_or(|expected| expected == chip) => Ok(chip),
        _ => {
            log::warn!("BMx280[0x{:02X}] 未知的芯片ID: 0x{:02X}", registers.address(), chip_id);
            Err(Bmx280Error::UnknownDevice(chip_id))
        }
    }
}

/// 软复位并等待NVM拷贝完成
fn soft_reset<I2C: I2c, D: DelayNs>(
    registers: &mut Registers<'_, I2C>,
    delay: &mut D,
) -> Result<(), I2C::Error> {
    registers.write(addr::SOFT_RESET, SOFT_RESET_COMMAND)?;
    delay.delay_ms(RESET_DELAY_MS);

    for _ in 0..STATUS_POLL_ATTEMPTS {
        if registers.read_u8(addr::STATUS)? & STATUS_IM_UPDATE == 0 {
            return Ok(());
        }
        delay.delay_ms(STATUS_POLL_INTERVAL_MS);
    }

    log::warn!("BMx280[0x{:02X}] 软复位后校准数据一直未就绪", registers.address());
    Err(Bmx280Error::NotReady)
}

/// 读取校准参数，BME280额外读取湿度校准参数
fn load_coefficients<I2C: I2c>(
    registers: &mut Registers<'_, I2C>,
    chip: Chip,
) -> Result<(Calibration, Variant), I2C::Error> {
    let calibration = Calibration::load(registers)?;
    log::debug!("BMx280[0x{:02X}] 校准参数: {:?}", registers.address(), calibration);

    let variant = match chip {
        Chip::Bme280 => {
            let humidity_calibration = HumidityCalibration::load(registers)?;
            log::debug!(
                "BMx280[0x{:02X}] 湿度校准参数: {:?}",
                registers.address(),
                humidity_calibration
            );
            Variant::Bme280(humidity_calibration)
        }
        Chip::Bmp280 => Variant::Bmp280,
    };

    Ok((calibration, variant))
}

/// 写入控制寄存器
///
/// ctrl_hum的修改只有在写入ctrl_meas之后才生效，所以ctrl_meas最后写
fn configure<I2C: I2c>(
    registers: &mut Registers<'_, I2C>,
    variant: &Variant,
    config: &Config,
) -> Result<(), I2C::Error> {
    if variant.has_humidity() {
        registers.write(addr::CTRL_HUM, config.ctrl_hum())?;
    }
    registers.write(addr::CONFIG, config.config())?;
    registers.write(addr::CTRL_MEAS, config.ctrl_meas())?;

    Ok(())
}
