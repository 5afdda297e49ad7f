/// BME280芯片ID（带湿度传感器）
pub const BME280_CHIP_ID: u8 = 0x60;
/// BMP280芯片ID（不带湿度传感器）
pub const BMP280_CHIP_ID: u8 = 0x58;

/// SDO引脚接高电平时的I2C从设备地址
pub const ADDRESS_SDO_HIGH: u8 = 0x77;
/// SDO引脚接低电平时的I2C从设备地址
pub const ADDRESS_SDO_LOW: u8 = 0x76;

/// 同一条总线上的传感器序号
///
/// 两颗相同的传感器只能靠SDO引脚电平区分，所以最多两颗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorIndex {
    /// 序号0，SDO接高电平
    Primary = 0,
    /// 序号1，SDO接低电平
    Secondary = 1,
}

impl SensorIndex {
    /// 从序号构建，超出范围返回None
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Secondary),
            _ => None,
        }
    }

    /// 解析I2C从设备地址（只由序号决定，没有隐藏状态）
    pub fn address(self) -> u8 {
        match self {
            Self::Primary => ADDRESS_SDO_HIGH,
            Self::Secondary => ADDRESS_SDO_LOW,
        }
    }
}

/// 芯片型号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    /// 温度 + 压力 + 湿度
    Bme280,
    /// 温度 + 压力
    Bmp280,
}

impl Chip {
    /// 根据芯片ID寄存器的值识别型号
    pub fn identify(chip_id: u8) -> Option<Self> {
        match chip_id {
            BME280_CHIP_ID => Some(Self::Bme280),
            BMP280_CHIP_ID => Some(Self::Bmp280),
            _ => None,
        }
    }

    /// 是否带湿度传感器
    pub fn has_humidity(self) -> bool {
        matches!(self, Self::Bme280)
    }
}
