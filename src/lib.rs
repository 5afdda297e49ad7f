//! BME280 / BMP280 温度、压力、湿度传感器驱动
//!
//! - 最多两颗相同型号的传感器挂在同一条I2C总线上（SDO引脚分别接高、低电平）
//! - 运行时读取芯片ID区分BME280（带湿度）和BMP280（不带湿度）
//! - 补偿计算完全按照数据手册的定点算法实现
//!
//! 关闭默认的 `std` 特性即可在无操作系统的固件中使用。
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod sensor;
pub mod two_wire_wapper;

#[cfg(feature = "std")]
pub mod std_clock;

pub use sensor::bmx280::{
    Bmx280, Bmx280Error, Chip, Config, FineTemperature, Measurement, Reading, SensorIndex,
    Temperature, Variant,
};
