//! Textual view state for copy/paste sharing.
//!
//! Format: `re=<x>&im=<y>&zoom=<z>&palette=<n>`. Center components are
//! written as `hi` or `hi±lo` so the full `f64` pair survives a round trip.
//! Decoding also accepts plain decimals of any length; digits beyond `f64`
//! precision are kept in the low part.

use std::fmt::Write as _;

use tracing::debug;

use crate::complex::HostComplex;
use crate::eft::Splitter;
use crate::extended::HostReal;
use crate::palette_id::PaletteId;
use crate::view::ViewState;

const KEY_RE: &str = "re";
const KEY_IM: &str = "im";
const KEY_ZOOM: &str = "zoom";
const KEY_PALETTE: &str = "palette";

/// Significant digits that `f64` parsing resolves without loss.
const F64_DIGITS: usize = 17;

/// Digits folded into the accumulator per step; `10^15` is exact in `f64`.
const CHUNK_DIGITS: usize = 15;

/// Significant digits an `f64` pair can resolve; the rest are dropped.
const MAX_DIGITS: usize = 34;

/// Decimal magnitudes kept in extended precision. Beyond this the Veltkamp
/// split overflows or the low part falls into the subnormal range.
const EXTENDED_DECADES: i64 = 290;

/// Largest power of ten applied in one step of [`scale_by_power_of_ten`].
const MAX_FACTOR_DECADES: u64 = 280;

/// Encode a view as a share string.
pub fn encode(view: &ViewState) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{KEY_RE}={}&{KEY_IM}={}&{KEY_ZOOM}={}&{KEY_PALETTE}={}",
        format_extended(view.center.re),
        format_extended(view.center.im),
        format_f64(view.zoom),
        view.palette.index(),
    );
    out
}

/// Decode a share string on top of `base`.
///
/// Keys that are absent keep the value from `base`. A field that is present
/// but unparsable, non-finite, or (for zoom) non-positive also keeps the
/// `base` value; the other fields still apply.
pub fn decode(text: &str, base: ViewState) -> ViewState {
    let text = text.trim().trim_start_matches(['?', '#']);
    let mut re = base.center.re;
    let mut im = base.center.im;
    let mut zoom = base.zoom;
    let mut palette = base.palette;

    for pair in text.split('&').filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            debug!(pair, "share field without value ignored");
            continue;
        };
        let value = value.trim();
        match key.trim() {
            KEY_RE => match parse_extended(value) {
                Some(v) => re = v,
                None => debug!(value, "invalid re in share string"),
            },
            KEY_IM => match parse_extended(value) {
                Some(v) => im = v,
                None => debug!(value, "invalid im in share string"),
            },
            KEY_ZOOM => match value.parse::<f64>() {
                Ok(z) if z > 0.0 && z.is_finite() => zoom = z,
                _ => debug!(value, "invalid zoom in share string"),
            },
            KEY_PALETTE => match value.parse::<u32>() {
                Ok(n) => palette = PaletteId::from_index(n),
                Err(_) => debug!(value, "invalid palette in share string"),
            },
            other => debug!(key = other, "unknown share key ignored"),
        }
    }

    ViewState {
        center: HostComplex::new(re, im),
        zoom,
        palette,
    }
}

/// `hi`, or `hi+lo` / `hi-lo` when the low part is non-zero.
pub fn format_extended(v: HostReal) -> String {
    if v.lo == 0.0 {
        return format_f64(v.hi);
    }
    let sign = if v.lo.is_sign_negative() { '-' } else { '+' };
    format!("{}{sign}{}", format_f64(v.hi), format_f64(v.lo.abs()))
}

/// Shortest round-trip text, switching to exponent form for very large or
/// very small magnitudes.
fn format_f64(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 || (1e-4..1e16).contains(&a) {
        format!("{v}")
    } else {
        format!("{v:e}")
    }
}

/// Parse `hi`, `hi±lo`, or an arbitrary-length decimal into a finite pair.
pub fn parse_extended(text: &str) -> Option<HostReal> {
    let text = text.trim();
    let v = match split_terms(text) {
        Some((hi, lo)) => {
            let hi: f64 = hi.parse().ok()?;
            let lo: f64 = lo.parse().ok()?;
            HostReal::from_parts(hi, lo)
        }
        None => parse_decimal(text)?,
    };
    v.is_finite().then_some(v)
}

/// Find a binary `+`/`-` separating two terms (not a leading sign and not
/// an exponent sign).
fn split_terms(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    (1..bytes.len())
        .find(|&i| {
            matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E' | b'+' | b'-')
        })
        .map(|i| (&text[..i], &text[i..]))
}

/// A single decimal literal. Short literals go through `f64` parsing so
/// that shortest round-trip text maps back to the same float with a zero
/// low part; longer ones are accumulated in extended precision.
fn parse_decimal(text: &str) -> Option<HostReal> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], body[i + 1..].parse::<i64>().ok()?),
        None => (body, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits: String = int_part.chars().chain(frac_part.chars()).collect();
    let significant = digits.trim_start_matches('0');
    if significant.len() <= F64_DIGITS {
        return parse_native(text);
    }

    // Digits past the pair's precision cannot change the result.
    let kept = &significant[..significant.len().min(MAX_DIGITS)];
    let dropped = i64::try_from(significant.len() - kept.len()).ok()?;
    let frac_len = i64::try_from(frac_part.len()).ok()?;
    let scale = exponent.checked_sub(frac_len)?.checked_add(dropped)?;

    // The value lies in [10^(magnitude-1), 10^magnitude). Outside the
    // extended range the low part is meaningless, so plain parsing decides
    // between zero, a subnormal, and overflow.
    let magnitude = scale.checked_add(i64::try_from(kept.len()).ok()?)?;
    if magnitude.abs() > EXTENDED_DECADES {
        return parse_native(text);
    }

    let splitter = Splitter::opaque();
    let mut acc = HostReal::ZERO;
    for chunk in kept.as_bytes().chunks(CHUNK_DIGITS) {
        let chunk = std::str::from_utf8(chunk).ok()?;
        let value: f64 = chunk.parse().ok()?;
        acc = acc.mul_native(10f64.powi(chunk.len() as i32), splitter) + HostReal::from_native(value);
    }

    let value = scale_by_power_of_ten(acc, scale, splitter);
    Some(if negative { -value } else { value })
}

fn parse_native(text: &str) -> Option<HostReal> {
    text.parse::<f64>().ok().map(HostReal::from_native)
}

/// `v · 10^n` in extended precision, applied in steps whose factor stays
/// finite.
fn scale_by_power_of_ten(v: HostReal, n: i64, splitter: Splitter<f64>) -> HostReal {
    let mut out = v;
    let mut remaining = n.unsigned_abs();
    while remaining > 0 {
        let step = remaining.min(MAX_FACTOR_DECADES);
        let factor = power_of_ten(step as u32, splitter);
        out = if n >= 0 {
            out.mul_with(factor, splitter)
        } else {
            out.div_with(factor, splitter)
        };
        remaining -= step;
    }
    out
}

/// `10^k` by repeated squaring.
fn power_of_ten(k: u32, splitter: Splitter<f64>) -> HostReal {
    let mut result = HostReal::from_native(1.0);
    let mut base = HostReal::from_native(10.0);
    let mut k = k;
    while k > 0 {
        if k & 1 == 1 {
            result = result.mul_with(base, splitter);
        }
        k >>= 1;
        if k > 0 {
            base = base.sqr_with(splitter);
        }
    }
    result
}
