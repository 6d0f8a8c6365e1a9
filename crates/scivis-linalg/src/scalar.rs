/// Default tolerance of [`are_equals`].
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Convert degrees to radians.
#[inline]
pub fn radians_from_degrees(deg: f64) -> f64 {
    deg.to_radians()
}

/// Convert radians to degrees.
#[inline]
pub fn degrees_from_radians(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Round to the nearest integer, halfway cases towards positive infinity.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Split the scientific notation of `num` into mantissa and decimal exponent.
fn decompose(num: f64) -> Option<(f64, i32)> {
    let repr = format!("{num:e}");
    let (mantissa, exponent) = repr.split_once('e')?;
    Some((mantissa.parse().ok()?, exponent.parse().ok()?))
}

/// Round `num` to `digits` decimal places.
///
/// The decimal point is moved through the number's shortest decimal representation
/// rather than by multiplying with a power of ten, so `1.005` rounds to `1.01` and
/// values far below the requested precision collapse to exactly `0`. Halfway cases
/// round towards positive infinity. Non-finite values are returned unchanged.
///
/// Example:
///
/// ```
/// use scivis_linalg::scalar::round_number;
///
/// assert_eq!(round_number(1.005, 2), 1.01);
/// assert_eq!(round_number(6e-14, 6), 0.0);
/// assert_eq!(round_number(2.5, 0), 3.0);
/// ```
pub fn round_number(num: f64, digits: i32) -> f64 {
    if !num.is_finite() {
        return num;
    }

    let shift = |value: f64, by: i32| -> Option<f64> {
        let (mantissa, exponent) = decompose(value)?;
        format!("{mantissa}e{}", exponent + by).parse().ok()
    };

    shift(num, digits)
        .map(round_half_up)
        .and_then(|rounded| shift(rounded, -digits))
        .unwrap_or(num)
}

/// Round each component of a 3-vector with [`round_number`].
pub fn round_vector(vector: &[f64; 3], out: &mut [f64; 3], digits: i32) {
    for (o, v) in out.iter_mut().zip(vector) {
        *o = round_number(*v, digits);
    }
}

/// Element-wise comparison within `eps`.
///
/// Slices of different length are never equal; `eps = 0.0` demands exact equality.
pub fn are_equals(a: &[f64], b: &[f64], eps: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= eps)
}

/// Number of ways to choose `n` elements among `m`, or `None` on overflow.
pub fn binomial(m: u64, n: u64) -> Option<u64> {
    if n > m {
        return Some(0);
    }
    let n = n.min(m - n);
    let mut r: u64 = 1;
    for i in 1..=n {
        // r holds C(m, i - 1), so the division is exact
        r = r.checked_mul(m - i + 1)? / i;
    }
    Some(r)
}

/// First combination of `n` elements among `m`, in lexicographic order.
///
/// Returns `None` when `m < n`.
pub fn begin_combination(m: usize, n: usize) -> Option<Vec<usize>> {
    if m < n {
        return None;
    }
    Some((0..n).collect())
}

/// Advance `r` to the next combination of `r.len()` elements among `m`.
///
/// Returns `false`, leaving `r` untouched, once the last combination is reached.
pub fn next_combination(m: usize, r: &mut [usize]) -> bool {
    let n = r.len();
    for i in (0..n).rev() {
        if r[i] + n < m + i {
            let mut j = r[i] + 1;
            for slot in r.iter_mut().skip(i) {
                *slot = j;
                j += 1;
            }
            return true;
        }
    }
    false
}

/// Smallest power of two greater than or equal to `x`.
pub fn nearest_power_of_two(x: u64) -> u64 {
    x.next_power_of_two()
}

/// Whether `x` is a power of two.
pub fn is_power_of_two(x: u64) -> bool {
    x.is_power_of_two()
}

/// Clamp `value` into `[min_value, max_value]`.
pub fn clamp_value(value: f64, min_value: f64, max_value: f64) -> f64 {
    if value < min_value {
        min_value
    } else if value > max_value {
        max_value
    } else {
        value
    }
}

/// Clamp each component of `vector` into the matching interval.
pub fn clamp_vector(
    vector: &[f64; 3],
    min_vector: &[f64; 3],
    max_vector: &[f64; 3],
    out: &mut [f64; 3],
) {
    for i in 0..3 {
        out[i] = clamp_value(vector[i], min_vector[i], max_vector[i]);
    }
}

/// Clamp `value` into `range` and map it to `[0, 1]`.
///
/// An empty range maps everything to `0`.
pub fn clamp_and_normalize_value(value: f64, range: &[f64; 2]) -> f64 {
    if range[0] == range[1] {
        return 0.0;
    }
    if value < range[0] {
        0.0
    } else if value > range[1] {
        1.0
    } else {
        (value - range[0]) / (range[1] - range[0])
    }
}

fn strided(arr: &[f64], offset: usize, stride: usize) -> impl Iterator<Item = &f64> {
    arr.iter().skip(offset).step_by(stride.max(1))
}

/// Minimum of `arr[offset], arr[offset + stride], ...`, `+inf` when empty.
pub fn array_min(arr: &[f64], offset: usize, stride: usize) -> f64 {
    strided(arr, offset, stride).fold(f64::INFINITY, |acc, v| acc.min(*v))
}

/// Maximum of `arr[offset], arr[offset + stride], ...`, `-inf` when empty.
pub fn array_max(arr: &[f64], offset: usize, stride: usize) -> f64 {
    strided(arr, offset, stride).fold(f64::NEG_INFINITY, |acc, v| acc.max(*v))
}

/// `[min, max]` of a strided view of `arr`.
pub fn array_range(arr: &[f64], offset: usize, stride: usize) -> [f64; 2] {
    [array_min(arr, offset, stride), array_max(arr, offset, stride)]
}

/// Index of the component with the largest magnitude, first one on ties.
pub fn get_major_axis_index(vector: &[f64]) -> Option<usize> {
    let mut max_value = -1.0;
    let mut axis_index = None;
    for (i, v) in vector.iter().enumerate() {
        let value = v.abs();
        if value > max_value {
            axis_index = Some(i);
            max_value = value;
        }
    }
    axis_index
}
