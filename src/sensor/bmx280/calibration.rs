use embedded_hal::i2c::I2c;

use super::error::Result;
use super::register::{Registers, addr};

/// 温度、压力校准参数
///
/// 出厂时写入传感器NVM，每颗传感器都不一样，用于消除制造差异。
/// 初始化时读取一次，之后不再变化，软复位后整体重新读取。
///
/// # 存储分布
/// - 0x88 ~ 0x9F，共12个参数，每个2字节（小端序）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// 温度补偿基准值
    pub dig_t1: u16,
    /// 温度一阶系数
    pub dig_t2: i16,
    /// 温度二阶系数
    pub dig_t3: i16,
    /// 压力补偿缩放系数
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Calibration {
    /// 读取温度、压力校准参数
    ///
    /// 按寄存器地址升序读取，共12次寄存器读取
    pub fn load<I2C: I2c>(registers: &mut Registers<'_, I2C>) -> Result<Self, I2C::Error> {
        Ok(Self {
            dig_t1: registers.read_u16_le(addr::DIG_T1)?,
            dig_t2: registers.read_i16_le(addr::DIG_T2)?,
            dig_t3: registers.read_i16_le(addr::DIG_T3)?,
            dig_p1: registers.read_u16_le(addr::DIG_P1)?,
            dig_p2: registers.read_i16_le(addr::DIG_P2)?,
            dig_p3: registers.read_i16_le(addr::DIG_P3)?,
            dig_p4: registers.read_i16_le(addr::DIG_P4)?,
            dig_p5: registers.read_i16_le(addr::DIG_P5)?,
            dig_p6: registers.read_i16_le(addr::DIG_P6)?,
            dig_p7: registers.read_i16_le(addr::DIG_P7)?,
            dig_p8: registers.read_i16_le(addr::DIG_P8)?,
            dig_p9: registers.read_i16_le(addr::DIG_P9)?,
        })
    }
}

/// 湿度校准参数（只有BME280有）
///
/// # 存储分布
/// - dig_H1: 0xA1
/// - dig_H2: 0xE1 ~ 0xE2（小端序）
/// - dig_H3: 0xE3
/// - dig_H4: 0xE4[7:0] + 0xE5[3:0]
/// - dig_H5: 0xE5[7:4] + 0xE6[7:0]
/// - dig_H6: 0xE7
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HumidityCalibration {
    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: u8,
    /// 12位，与dig_H5共用0xE5
    pub dig_h4: i16,
    /// 12位，与dig_H4共用0xE5
    pub dig_h5: i16,
    pub dig_h6: i8,
}

impl HumidityCalibration {
    /// 读取湿度校准参数
    ///
    /// 每个参数一次寄存器读取，共6次。dig_H4和dig_H5各用一次2字节读取取回跨寄存器的12位数据。
    pub fn load<I2C: I2c>(registers: &mut Registers<'_, I2C>) -> Result<Self, I2C::Error> {
        let dig_h1 = registers.read_u8(addr::DIG_H1)?;
        let dig_h2 = registers.read_i16_le(addr::DIG_H2)?;
        let dig_h3 = registers.read_u8(addr::DIG_H3)?;
        // [0xE4, 0xE5]
        let [e4, e5] = registers.read_u16_be(addr::DIG_H4)?.to_be_bytes();
        // [0xE5, 0xE6]
        let [_, e6] = registers.read_u16_be(addr::DIG_H5)?.to_be_bytes();
        let dig_h6 = registers.read_u8(addr::DIG_H6)? as i8;

        Ok(Self {
            dig_h1,
            dig_h2,
            dig_h3,
            dig_h4: Self::pack_h4(e4, e5),
            dig_h5: Self::pack_h5(e5, e6),
            dig_h6,
        })
    }

    /// dig_H4 = 0xE4 << 4 | 0xE5[3:0]
    fn pack_h4(e4: u8, e5: u8) -> i16 {
        (i16::from(e4) << 4) | (i16::from(e5) & 0x0F)
    }

    /// dig_H5 = 0xE6 << 4 | 0xE5[7:4]
    fn pack_h5(e5: u8, e6: u8) -> i16 {
        (i16::from(e6) << 4) | (i16::from(e5) >> 4)
    }
}
