/// 数字格式化工具
///
/// 整数值不带小数点（`2` 而不是 `2.0`），其余使用最短表示
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        // -0.0 也输出为 0
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
