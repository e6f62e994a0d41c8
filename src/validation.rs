//! 公共验证函数模块
//! 投票与查询接口共用的输入校验，全部在任何 I/O 之前同步执行。

use serde_json::Value;

use crate::constants::{MAX_FINGERPRINT_LEN, MAX_WORD_LEN};
use crate::store::operations::votes::Rgb;

/// Fingerprint must be a non-blank string of bounded length.
pub fn validate_fingerprint(fingerprint: Option<&str>) -> Result<&str, &'static str> {
    let fingerprint = fingerprint
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("Fingerprint is required")?;
    if fingerprint.chars().count() > MAX_FINGERPRINT_LEN {
        return Err("Fingerprint is too long");
    }
    Ok(fingerprint)
}

pub fn validate_word(word: Option<&str>) -> Result<&str, &'static str> {
    let word = word
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("Word is required")?;
    if word.chars().count() > MAX_WORD_LEN {
        return Err("Word is too long");
    }
    Ok(word)
}

/// Channels must be JSON integers in `0..=255`.
pub fn parse_rgb(r: Option<&Value>, g: Option<&Value>, b: Option<&Value>) -> Result<Rgb, &'static str> {
    let channels = [r, g, b];
    if channels
        .iter()
        .any(|c| !matches!(c, Some(Value::Number(_))))
    {
        return Err("RGB values must be numbers");
    }

    let mut parsed = [0u8; 3];
    for (slot, channel) in parsed.iter_mut().zip(channels) {
        *slot = parse_channel(channel)?;
    }
    Ok(Rgb::new(parsed[0], parsed[1], parsed[2]))
}

fn parse_channel(value: Option<&Value>) -> Result<u8, &'static str> {
    let Some(Value::Number(number)) = value else {
        return Err("RGB values must be numbers");
    };
    let as_int = match number.as_i64() {
        Some(v) => v,
        None => match number.as_f64() {
            // 1.0 这类整数值浮点可以接受
            Some(f) if f.fract() == 0.0 && f.is_finite() => {
                if !(0.0..=255.0).contains(&f) {
                    return Err("RGB values must be between 0 and 255");
                }
                f as i64
            }
            Some(f) if f.is_finite() && !(0.0..=255.0).contains(&f) => {
                return Err("RGB values must be between 0 and 255");
            }
            _ => return Err("RGB values must be integers"),
        },
    };
    u8::try_from(as_int).map_err(|_| "RGB values must be between 0 and 255")
}
