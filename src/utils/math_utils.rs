// 扫描线填充用到的小工具：排序一对值并限制到范围内

/// 保证 `lower <= higher`
pub fn sort_pair<T: PartialOrd>(lower: &mut T, higher: &mut T) {
    if *lower > *higher {
        std::mem::swap(lower, higher);
    }
}

/// 把值限制在 [min, max]
pub fn clamp_to_range<T: PartialOrd + Copy>(value: &mut T, min: T, max: T) {
    if *value < min {
        *value = min;
    } else if *value > max {
        *value = max;
    }
}

/// 排序后把下界抬到 `min`、上界压到 `max`
///
/// 两个值都在范围外同一侧时结果满足 `lower > higher`，
/// 调用方的 `lower..=higher` 循环因此为空。
pub fn sort_and_clamp<T: PartialOrd + Copy>(lower: &mut T, higher: &mut T, min: T, max: T) {
    sort_pair(lower, higher);
    if *lower < min {
        *lower = min;
    }
    if *higher > max {
        *higher = max;
    }
}

/// f32 -> i32 四舍五入（远离零），超范围时饱和，NaN 为 0
pub fn round_to_i32(value: f32) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_and_clamp_orders_and_limits() {
        let (mut a, mut b) = (12, -3);
        sort_and_clamp(&mut a, &mut b, 0, 9);
        assert_eq!((a, b), (0, 9));

        // 全部在上方：区间为空
        let (mut a, mut b) = (15, 11);
        sort_and_clamp(&mut a, &mut b, 0, 9);
        assert!(a > b);
    }

    #[test]
    fn clamp_floats() {
        let mut v = 7.5f32;
        clamp_to_range(&mut v, 0.0, 4.0);
        assert_eq!(v, 4.0);
        let mut w = -1.0f32;
        clamp_to_range(&mut w, 0.0, 4.0);
        assert_eq!(w, 0.0);
    }

    #[test]
    fn rounding_saturates() {
        assert_eq!(round_to_i32(2.5), 3);
        assert_eq!(round_to_i32(-2.5), -3);
        assert_eq!(round_to_i32(1e20), i32::MAX);
        assert_eq!(round_to_i32(f32::NAN), 0);
    }
}
