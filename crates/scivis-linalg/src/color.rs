//! Color space conversions on normalized `[0, 1]` components.
//!
//! XYZ values are relative to the D65 white point with a 2 degree observer and
//! RGB is gamma-encoded sRGB.

use crate::error::LinalgError;

const REF_X: f64 = 0.9505;
const REF_Y: f64 = 1.0;
const REF_Z: f64 = 1.089;

/// RGB to HSV, all components in `[0, 1]`.
pub fn rgb2hsv(rgb: &[f64; 3], hsv: &mut [f64; 3]) {
    let [r, g, b] = *rgb;
    let onethird = 1.0 / 3.0;
    let onesixth = 1.0 / 6.0;
    let twothird = 2.0 / 3.0;

    let mut cmax = r;
    let mut cmin = r;
    if g > cmax {
        cmax = g;
    } else if g < cmin {
        cmin = g;
    }
    if b > cmax {
        cmax = b;
    } else if b < cmin {
        cmin = b;
    }

    let v = cmax;
    let s = if v > 0.0 { (cmax - cmin) / cmax } else { 0.0 };

    let h = if s > 0.0 {
        let h = if r == cmax {
            (onesixth * (g - b)) / (cmax - cmin)
        } else if g == cmax {
            onethird + (onesixth * (b - r)) / (cmax - cmin)
        } else {
            twothird + (onesixth * (r - g)) / (cmax - cmin)
        };
        if h < 0.0 {
            h + 1.0
        } else {
            h
        }
    } else {
        0.0
    };

    *hsv = [h, s, v];
}

/// HSV to RGB, all components in `[0, 1]`.
pub fn hsv2rgb(hsv: &[f64; 3], rgb: &mut [f64; 3]) {
    let [h, s, v] = *hsv;
    let onethird = 1.0 / 3.0;
    let onesixth = 1.0 / 6.0;
    let twothird = 2.0 / 3.0;
    let fivesixth = 5.0 / 6.0;

    // pure hue first, one sextant at a time
    let (r, g, b) = if h > onesixth && h <= onethird {
        ((onethird - h) / onesixth, 1.0, 0.0)
    } else if h > onethird && h <= 0.5 {
        (0.0, 1.0, (h - onethird) / onesixth)
    } else if h > 0.5 && h <= twothird {
        (0.0, (twothird - h) / onesixth, 1.0)
    } else if h > twothird && h <= fivesixth {
        ((h - twothird) / onesixth, 0.0, 1.0)
    } else if h > fivesixth && h <= 1.0 {
        (1.0, 0.0, (1.0 - h) / onesixth)
    } else {
        (1.0, h / onesixth, 0.0)
    };

    let desaturate = |c: f64| (s * c + (1.0 - s)) * v;
    *rgb = [desaturate(r), desaturate(g), desaturate(b)];
}

/// CIE-L*ab to XYZ.
pub fn lab2xyz(lab: &[f64; 3], xyz: &mut [f64; 3]) {
    let [l, a, b] = *lab;
    let var_y = (l + 16.0) / 116.0;
    let var_x = a / 500.0 + var_y;
    let var_z = var_y - b / 200.0;

    let expand = |t: f64| {
        if t.powi(3) > 0.008856 {
            t.powi(3)
        } else {
            (t - 16.0 / 116.0) / 7.787
        }
    };

    *xyz = [REF_X * expand(var_x), REF_Y * expand(var_y), REF_Z * expand(var_z)];
}

/// XYZ to CIE-L*ab.
pub fn xyz2lab(xyz: &[f64; 3], lab: &mut [f64; 3]) {
    let compress = |t: f64| {
        if t > 0.008856 {
            t.powf(1.0 / 3.0)
        } else {
            7.787 * t + 16.0 / 116.0
        }
    };

    let var_x = compress(xyz[0] / REF_X);
    let var_y = compress(xyz[1] / REF_Y);
    let var_z = compress(xyz[2] / REF_Z);

    *lab = [
        116.0 * var_y - 16.0,
        500.0 * (var_x - var_y),
        200.0 * (var_y - var_z),
    ];
}

/// XYZ to sRGB. Out of gamut colors are scaled down and clipped at zero.
pub fn xyz2rgb(xyz: &[f64; 3], rgb: &mut [f64; 3]) {
    let [x, y, z] = *xyz;
    let gamma = |c: f64| {
        if c > 0.0031308 {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        } else {
            c * 12.92
        }
    };

    let mut r = gamma(x * 3.2406 + y * -1.5372 + z * -0.4986);
    let mut g = gamma(x * -0.9689 + y * 1.8758 + z * 0.0415);
    let mut b = gamma(x * 0.0557 + y * -0.204 + z * 1.057);

    let max_val = r.max(g).max(b);
    if max_val > 1.0 {
        r /= max_val;
        g /= max_val;
        b /= max_val;
    }

    *rgb = [r.max(0.0), g.max(0.0), b.max(0.0)];
}

/// sRGB to XYZ.
pub fn rgb2xyz(rgb: &[f64; 3], xyz: &mut [f64; 3]) {
    let linear = |c: f64| {
        if c > 0.04045 {
            ((c + 0.055) / 1.055).powf(2.4)
        } else {
            c / 12.92
        }
    };
    let r = linear(rgb[0]);
    let g = linear(rgb[1]);
    let b = linear(rgb[2]);

    *xyz = [
        r * 0.4124 + g * 0.3576 + b * 0.1805,
        r * 0.2126 + g * 0.7152 + b * 0.0722,
        r * 0.0193 + g * 0.1192 + b * 0.9505,
    ];
}

/// sRGB to CIE-L*ab.
pub fn rgb2lab(rgb: &[f64; 3], lab: &mut [f64; 3]) {
    let mut xyz = [0.0; 3];
    rgb2xyz(rgb, &mut xyz);
    xyz2lab(&xyz, lab);
}

/// CIE-L*ab to sRGB.
pub fn lab2rgb(lab: &[f64; 3], rgb: &mut [f64; 3]) {
    let mut xyz = [0.0; 3];
    lab2xyz(lab, &mut xyz);
    xyz2rgb(&xyz, rgb);
}

/// Parse `abc`, `#abc`, `aabbcc`, `#aabbcc` or `#aabbccdd` into RGBA floats.
///
/// Alpha defaults to `1.0` when the string carries none.
pub fn hex2float(hex: &str) -> Result<[f64; 4], LinalgError> {
    let invalid = || LinalgError::InvalidHexColor(hex.to_string());
    let digits = match hex.len() {
        3 | 6 => hex,
        4 | 7 | 9 => hex.strip_prefix('#').ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    let mut out = [0.0, 0.0, 0.0, 1.0];
    if digits.len() == 3 {
        for (o, i) in out.iter_mut().zip(0..3) {
            *o = f64::from(channel(digits.get(i..i + 1).ok_or_else(invalid)?)?) * 17.0 / 255.0;
        }
    } else {
        for (o, i) in out.iter_mut().zip(0..digits.len() / 2) {
            *o = f64::from(channel(digits.get(2 * i..2 * i + 2).ok_or_else(invalid)?)?) / 255.0;
        }
    }
    Ok(out)
}

/// Two hex digits for a `[0, 1]` channel value.
pub fn float_to_hex2(value: f64) -> String {
    let integer = (value * 255.0).floor().clamp(0.0, 255.0) as u8;
    format!("{integer:02x}")
}

/// Hex code such as `#ff8000` for an RGB triple, using the given prefix.
pub fn float_rgb2hex_code(rgb: &[f64], prefix: &str) -> String {
    rgb.iter()
        .fold(prefix.to_string(), |acc, c| acc + &float_to_hex2(*c))
}

/// CSS `rgb(...)` or `rgba(...)` string for 3 or 4 channel colors.
pub fn float2css_rgba(rgba: &[f64]) -> String {
    let to_char = |f: f64| (f * 255.0).round();
    let channel = |i: usize| to_char(rgba.get(i).copied().unwrap_or(0.0));
    if rgba.len() == 3 {
        return format!("rgb({}, {}, {})", channel(0), channel(1), channel(2));
    }
    format!(
        "rgba({}, {}, {}, {})",
        channel(0),
        channel(1),
        channel(2),
        rgba.get(3).copied().unwrap_or(0.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hsv_round_trip() {
        for rgb in [
            [1.0, 0.0, 0.0],
            [0.2, 0.7, 0.4],
            [0.9, 0.85, 0.1],
            [0.3, 0.3, 0.8],
            [0.5, 0.5, 0.5],
        ] {
            let mut hsv = [0.0; 3];
            let mut back = [0.0; 3];
            rgb2hsv(&rgb, &mut hsv);
            hsv2rgb(&hsv, &mut back);
            for i in 0..3 {
                assert_relative_eq!(back[i], rgb[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_lab_round_trip() {
        for rgb in [[0.2, 0.7, 0.4], [0.9, 0.85, 0.1], [0.05, 0.01, 0.02]] {
            let mut lab = [0.0; 3];
            let mut back = [0.0; 3];
            rgb2lab(&rgb, &mut lab);
            lab2rgb(&lab, &mut back);
            for i in 0..3 {
                assert_relative_eq!(back[i], rgb[i], epsilon = 1e-3);
            }
        }

        let mut lab = [0.0; 3];
        xyz2lab(&[REF_X, REF_Y, REF_Z], &mut lab);
        assert_relative_eq!(lab[0], 100.0, epsilon = 1e-12);
        assert_relative_eq!(lab[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(lab[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hex2float() -> Result<(), LinalgError> {
        assert_eq!(hex2float("#ff0000")?, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex2float("f00")?, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex2float("#0f0")?, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(hex2float("0000ff")?, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(hex2float("#00000000")?, [0.0, 0.0, 0.0, 0.0]);
        assert!(hex2float("#12345").is_err());
        assert!(hex2float("zzzzzz").is_err());
        Ok(())
    }

    #[test]
    fn test_hex_and_css_strings() {
        assert_eq!(float_to_hex2(0.0), "00");
        assert_eq!(float_to_hex2(1.0), "ff");
        assert_eq!(float_rgb2hex_code(&[1.0, 0.5, 0.0], "#"), "#ff7f00");
        assert_eq!(float2css_rgba(&[1.0, 0.0, 0.5]), "rgb(255, 0, 128)");
        assert_eq!(float2css_rgba(&[1.0, 0.0, 0.0, 0.5]), "rgba(255, 0, 0, 0.5)");
    }
}
