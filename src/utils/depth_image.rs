use crate::utils::math_utils::sort_pair;
use log::{debug, warn};
use rayon::prelude::*;

/// 没有足够有限深度时使用的后备范围
const FALLBACK_RANGE: (f32, f32) = (0.1, 10.0);

/// 将深度缓冲归一化到 [0, 1]，范围由百分位数决定
///
/// 未绘制的像素（非有限深度）映射为 1.0，即最远。
pub fn normalize_depth(depth_buffer: &[f32], min_percentile: f32, max_percentile: f32) -> Vec<f32> {
    let (mut min_percentile, mut max_percentile) = (min_percentile, max_percentile);
    sort_pair(&mut min_percentile, &mut max_percentile);

    let mut finite: Vec<f32> = depth_buffer
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .collect();

    let (min_clip, max_clip) = if finite.len() >= 2 {
        finite.sort_unstable_by(f32::total_cmp);
        let last = finite.len() - 1;
        let pick = |percentile: f32| {
            let idx = (percentile / 100.0 * last as f32).round() as usize;
            finite[idx.min(last)]
        };

        let (mut lo, mut hi) = (pick(min_percentile), pick(max_percentile));
        if (hi - lo).abs() < 1e-6 {
            // 百分位区间退化时退回到完整范围
            lo = finite[0];
            hi = finite[last];
            if (hi - lo).abs() < 1e-6 {
                hi = lo + 1.0;
            }
        }
        debug!(
            "百分位数归一化深度: [{:.1}%, {:.1}%] -> [{:.3}, {:.3}]",
            min_percentile, max_percentile, lo, hi
        );
        (lo, hi)
    } else {
        warn!(
            "有限深度值不足，使用默认范围 [{}, {}]",
            FALLBACK_RANGE.0, FALLBACK_RANGE.1
        );
        FALLBACK_RANGE
    };

    let inv_range = 1.0 / (max_clip - min_clip);
    depth_buffer
        .par_iter()
        .map(|&depth| {
            if depth.is_finite() {
                ((depth.clamp(min_clip, max_clip) - min_clip) * inv_range).clamp(0.0, 1.0)
            } else {
                1.0
            }
        })
        .collect()
}

/// JET 色图：0 -> 蓝，0.5 -> 绿，1 -> 红
pub fn jet(value: f32) -> [u8; 3] {
    let v = value.clamp(0.0, 1.0);
    let (r, g, b) = if v <= 0.25 {
        (0.0, v * 4.0, 1.0)
    } else if v <= 0.5 {
        (0.0, 1.0, 1.0 - (v - 0.25) * 4.0)
    } else if v <= 0.75 {
        ((v - 0.5) * 4.0, 1.0, 0.0)
    } else {
        (1.0, 1.0 - (v - 0.75) * 4.0, 0.0)
    };
    [
        (r * 255.0f32).round() as u8,
        (g * 255.0f32).round() as u8,
        (b * 255.0f32).round() as u8,
    ]
}

/// 深度缓冲 -> 可视化RGB字节，越近越"热"
pub fn depth_to_rgb(depth_buffer: &[f32]) -> Vec<u8> {
    normalize_depth(depth_buffer, 1.0, 99.0)
        .par_iter()
        .flat_map_iter(|&d| jet(1.0 - d))
        .collect()
}
