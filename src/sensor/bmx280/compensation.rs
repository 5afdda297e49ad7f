//! 数据手册定点补偿算法
//!
//! 所有中间计算严格使用手册规定的位宽（温度、湿度32位，压力64位有符号整数）和移位量，
//! 精度损失由移位截断决定，不能换成浮点近似。溢出按补码回绕。

use super::calibration::{Calibration, HumidityCalibration};

/// 温度、压力测量被关闭时数据寄存器的值（3个寄存器拼成的24位原始值）
pub const SKIPPED_24BIT: u32 = 0x800000;
/// 湿度测量被关闭时ADC输出的值
pub const SKIPPED_16BIT: u16 = 0x8000;

/// 湿度中间值上限（Q22.10格式的100%RH）
const HUMIDITY_MAX: i32 = 419_430_400;

/// 一次补偿计算的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    /// 正常的测量值
    Value(T),
    /// 对应的测量被关闭（采样率设置为Skipped）
    Disabled,
    /// 压力补偿分母为0，跳过了除法
    DivisionGuard,
}

impl<T> Reading<T> {
    /// 取出测量值
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Self::Value(value) => Reading::Value(f(value)),
            Self::Disabled => Reading::Disabled,
            Self::DivisionGuard => Reading::DivisionGuard,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl Reading<f32> {
    /// 兼容浮点哨兵值的写法：测量关闭返回NaN，除零保护返回0
    pub fn or_nan(self) -> f32 {
        match self {
            Self::Value(value) => value,
            Self::Disabled => f32::NAN,
            Self::DivisionGuard => 0.0,
        }
    }
}

/// 温度补偿
///
/// - `raw_t`: 寄存器0xFA ~ 0xFC的24位原始值，低4位不参与计算
///
/// 返回（温度【℃】，t_fine）
pub fn compensate_temperature(calib: &Calibration, raw_t: u32) -> Reading<(f32, i32)> {
    if raw_t == SKIPPED_24BIT {
        return Reading::Disabled;
    }

    let adc_t = (raw_t >> 4) as i32;
    let dig_t1 = calib.dig_t1 as i32;
    let dig_t2 = calib.dig_t2 as i32;
    let dig_t3 = calib.dig_t3 as i32;

    let var1 = ((adc_t >> 3) - (dig_t1 << 1)).wrapping_mul(dig_t2) >> 11;
    let delta = (adc_t >> 4) - dig_t1;
    let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(dig_t3)) >> 14;

    let t_fine = var1.wrapping_add(var2);
    // 单位0.01℃
    let temperature = (t_fine.wrapping_mul(5).wrapping_add(128)) >> 8;

    Reading::Value((temperature as f32 / 100.0, t_fine))
}

/// 压力补偿
///
/// - `t_fine`: 同一颗传感器刚刚做温度补偿得到的中间值
/// - `raw_p`: 寄存器0xF7 ~ 0xF9的24位原始值，低4位不参与计算
///
/// 返回压力【Pa】
pub fn compensate_pressure(calib: &Calibration, t_fine: i32, raw_p: u32) -> Reading<f32> {
    if raw_p == SKIPPED_24BIT {
        return Reading::Disabled;
    }

    let adc_p = (raw_p >> 4) as i64;

    let dig_p1 = calib.dig_p1 as i64;
    let dig_p2 = calib.dig_p2 as i64;
    let dig_p3 = calib.dig_p3 as i64;
    let dig_p4 = calib.dig_p4 as i64;
    let dig_p5 = calib.dig_p5 as i64;
    let dig_p6 = calib.dig_p6 as i64;
    let dig_p7 = calib.dig_p7 as i64;
    let dig_p8 = calib.dig_p8 as i64;
    let dig_p9 = calib.dig_p9 as i64;

    let mut var1 = t_fine as i64 - 128_000;
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(dig_p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(dig_p5) << 17);
    var2 = var2.wrapping_add(dig_p4 << 35);
    var1 = (var1.wrapping_mul(var1).wrapping_mul(dig_p3) >> 8)
        .wrapping_add(var1.wrapping_mul(dig_p2) << 12);
    var1 = ((1_i64 << 47).wrapping_add(var1)).wrapping_mul(dig_p1) >> 33;

    if var1 == 0 {
        log::warn!("压力补偿分母为0，跳过除法");
        return Reading::DivisionGuard;
    }

    let mut p = 1_048_576 - adc_p;
    p = ((p << 31).wrapping_sub(var2)).wrapping_mul(3125).wrapping_div(var1);
    var1 = dig_p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    var2 = dig_p8.wrapping_mul(p) >> 19;
    p = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(dig_p7 << 4);

    // Q24.8格式
    Reading::Value((p as f64 / 256.0) as f32)
}

/// 湿度补偿
///
/// - `t_fine`: 同一颗传感器刚刚做温度补偿得到的中间值
/// - `adc_h`: 16位湿度ADC值（寄存器0xFD ~ 0xFE）
///
/// 返回相对湿度【%RH】，范围0.0 ~ 100.0
pub fn compensate_humidity(calib: &HumidityCalibration, t_fine: i32, adc_h: u16) -> Reading<f32> {
    if adc_h == SKIPPED_16BIT {
        return Reading::Disabled;
    }

    let adc_h = adc_h as i32;
    let dig_h1 = calib.dig_h1 as i32;
    let dig_h2 = calib.dig_h2 as i32;
    let dig_h3 = calib.dig_h3 as i32;
    let dig_h4 = calib.dig_h4 as i32;
    let dig_h5 = calib.dig_h5 as i32;
    let dig_h6 = calib.dig_h6 as i32;

    let v = t_fine.wrapping_sub(76_800);

    let x1 = ((adc_h << 14)
        .wrapping_sub(dig_h4 << 20)
        .wrapping_sub(dig_h5.wrapping_mul(v))
        .wrapping_add(16_384))
        >> 15;
    let x2 = ((v.wrapping_mul(dig_h6) >> 10)
        .wrapping_mul((v.wrapping_mul(dig_h3) >> 11).wrapping_add(32_768)))
        >> 10;
    let x3 = (x2.wrapping_add(2_097_152).wrapping_mul(dig_h2).wrapping_add(8_192)) >> 14;
    let mut v = x1.wrapping_mul(x3);

    v = v.wrapping_sub((((v >> 15).wrapping_mul(v >> 15) >> 7).wrapping_mul(dig_h1)) >> 4);
    let v = v.clamp(0, HUMIDITY_MAX);

    // Q22.10格式
    Reading::Value((v >> 12) as f32 / 1024.0)
}
