use embedded_hal::i2c::I2c;

use super::error::Result;

/// 寄存器地址
pub mod addr {
    /// 温度/压力校准参数起始地址（dig_T1 ~ dig_P9，每个2字节，小端序）
    pub const DIG_T1: u8 = 0x88;
    pub const DIG_T2: u8 = 0x8A;
    pub const DIG_T3: u8 = 0x8C;
    pub const DIG_P1: u8 = 0x8E;
    pub const DIG_P2: u8 = 0x90;
    pub const DIG_P3: u8 = 0x92;
    pub const DIG_P4: u8 = 0x94;
    pub const DIG_P5: u8 = 0x96;
    pub const DIG_P6: u8 = 0x98;
    pub const DIG_P7: u8 = 0x9A;
    pub const DIG_P8: u8 = 0x9C;
    pub const DIG_P9: u8 = 0x9E;
    /// 湿度校准参数
    pub const DIG_H1: u8 = 0xA1;
    pub const DIG_H2: u8 = 0xE1;
    pub const DIG_H3: u8 = 0xE3;
    pub const DIG_H4: u8 = 0xE4;
    pub const DIG_H5: u8 = 0xE5;
    pub const DIG_H6: u8 = 0xE7;

    /// 芯片ID
    pub const CHIP_ID: u8 = 0xD0;
    /// 软复位（写入0xB6）
    pub const SOFT_RESET: u8 = 0xE0;
    /// 湿度采样率
    pub const CTRL_HUM: u8 = 0xF2;
    /// 状态
    /// - bit3: measuring
    /// - bit0: im_update
    pub const STATUS: u8 = 0xF3;
    /// 温度、压力采样率和工作模式
    pub const CTRL_MEAS: u8 = 0xF4;
    /// 待机时间、滤波器、三线SPI
    pub const CONFIG: u8 = 0xF5;
    /// 测量数据（大端序）
    pub const PRESS_DATA: u8 = 0xF7;
    pub const TEMP_DATA: u8 = 0xFA;
    pub const HUM_DATA: u8 = 0xFD;
}

/// 软复位命令
pub const SOFT_RESET_COMMAND: u8 = 0xB6;

/// 寄存器访问层
///
/// 每次读取都拆成两次独立的总线事务：
/// 1. 写事务：起始 + 从设备地址 + 寄存器地址 + 停止
/// 2. 读事务：起始 + 从设备地址(读) + N个字节（最后一个字节NACK）+ 停止
///
/// 借用 `&mut I2C` 期间总线被独占，另一颗传感器无法插入两次事务之间。
pub struct Registers<'a, I2C> {
    i2c: &'a mut I2C,
    address: u8,
}

impl<'a, I2C: I2c> Registers<'a, I2C> {
    pub fn new(i2c: &'a mut I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 从设备地址
    pub fn address(&self) -> u8 {
        self.address
    }

    /// 从指定寄存器开始连续读取到缓冲区
    pub fn read_into(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg])?;
        self.i2c.read(self.address, buffer)?;
        Ok(())
    }

    /// 读取1个寄存器
    pub fn read_u8(&mut self, reg: u8) -> Result<u8, I2C::Error> {
        let mut data = [0u8; 1];
        self.read_into(reg, &mut data)?;
        Ok(data[0])
    }

    /// 读取连续2个寄存器（大端序）
    pub fn read_u16_be(&mut self, reg: u8) -> Result<u16, I2C::Error> {
        let mut data = [0u8; 2];
        self.read_into(reg, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    /// 读取连续3个寄存器（大端序）
    pub fn read_u24_be(&mut self, reg: u8) -> Result<u32, I2C::Error> {
        let mut data = [0u8; 3];
        self.read_into(reg, &mut data)?;
        Ok(u32::from_be_bytes([0, data[0], data[1], data[2]]))
    }

    /// 读取小端序的无符号16位校准参数
    ///
    /// 校准参数在芯片里按小端序存放，测量数据却是大端序
    pub fn read_u16_le(&mut self, reg: u8) -> Result<u16, I2C::Error> {
        Ok(self.read_u16_be(reg)?.swap_bytes())
    }

    /// 读取小端序的有符号16位校准参数
    pub fn read_i16_le(&mut self, reg: u8) -> Result<i16, I2C::Error> {
        Ok(self.read_u16_le(reg)? as i16)
    }

    /// 写1个寄存器
    pub fn write(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }
}
