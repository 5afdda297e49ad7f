/// 标准大气压【hPa】
pub const STANDARD_SEA_LEVEL_HPA: f32 = 1013.25;

/// 气压高度公式
///
/// - `pressure_pa`: 当前压力【Pa】
/// - `sea_level_hpa`: 海平面参考气压【hPa】
///
/// 返回海拔高度【m】
pub fn altitude(pressure_pa: f32, sea_level_hpa: f32) -> f32 {
    let pressure_hpa = pressure_pa / 100.0;
    44330.0 * (1.0 - libm::powf(pressure_hpa / sea_level_hpa, 0.1903))
}
