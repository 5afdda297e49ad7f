use core::fmt::{self, Debug};

/// BMx280驱动错误
///
/// 泛型参数 `E` 为底层I2C总线的错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bmx280Error<E> {
    /// I2C总线通信失败（原样透传，不做重试）
    Bus(E),
    /// 传感器序号超出范围（只支持0和1），不会产生任何总线通信
    OutOfRangeSensorIndex(u8),
    /// 芯片ID既不是BME280也不是BMP280
    UnknownDevice(u8),
    /// 软复位后传感器一直在拷贝NVM校准数据
    NotReady,
    /// 强制模式测量超时
    MeasurementTimeout,
    /// BMP280没有湿度传感器
    HumidityUnsupported,
    /// 精细温度来自另一颗传感器
    ForeignFineTemperature,
}

impl<E> From<E> for Bmx280Error<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}

impl<E: Debug> fmt::Display for Bmx280Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "I2C通信失败: {:?}", err),
            Self::OutOfRangeSensorIndex(index) => write!(f, "传感器序号超出范围: {}", index),
            Self::UnknownDevice(id) => write!(f, "未知的芯片ID: 0x{:02X}", id),
            Self::NotReady => f.write_str("传感器正在更新校准数据"),
            Self::MeasurementTimeout => f.write_str("等待测量完成超时"),
            Self::HumidityUnsupported => f.write_str("BMP280不支持湿度测量"),
            Self::ForeignFineTemperature => f.write_str("精细温度不属于当前传感器"),
        }
    }
}

impl<E: Debug> core::error::Error for Bmx280Error<E> {}

/// 驱动操作结果
pub type Result<T, E> = core::result::Result<T, Bmx280Error<E>>;
