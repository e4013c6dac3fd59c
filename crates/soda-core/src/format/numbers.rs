//! Number and address formatting for listings and forms

use alloy_primitives::Address;

/// Options for [`format_big_number`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BigNumberFormat {
    /// Digits kept after the decimal point
    pub decimals: usize,
    /// Group the integer part with commas
    pub thousand_separator: bool,
    /// Use K/M/B/T/P/E suffixes
    pub compact: bool,
    /// Always use exponential notation
    pub scientific: bool,
    /// Magnitude from which exponential notation kicks in
    pub scientific_threshold: f64,
}

impl Default for BigNumberFormat {
    fn default() -> Self {
        Self {
            decimals: 4,
            thousand_separator: false,
            compact: true,
            scientific: false,
            scientific_threshold: 1e15,
        }
    }
}

impl BigNumberFormat {
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_thousand_separator(mut self, enabled: bool) -> Self {
        self.thousand_separator = enabled;
        self
    }

    pub fn with_compact(mut self, enabled: bool) -> Self {
        self.compact = enabled;
        self
    }

    pub fn with_scientific_threshold(mut self, threshold: f64) -> Self {
        self.scientific_threshold = threshold;
        self
    }
}

const COMPACT_UNITS: [(f64, &str); 6] = [
    (1e18, "E"),
    (1e15, "P"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Compact rendering of large or tiny magnitudes.
///
/// Exponential notation wins when forced or once `|value|` reaches the
/// threshold (`1.2346e+15`), then suffix compaction, then plain fixed point.
/// Non-finite input renders as `"0"`.
pub fn format_big_number(value: f64, options: BigNumberFormat) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let abs = value.abs();

    if options.scientific || abs >= options.scientific_threshold {
        return to_exponential(value, options.decimals);
    }

    if options.compact {
        for (scale, suffix) in COMPACT_UNITS {
            if abs >= scale {
                return format!("{:.*}{suffix}", options.decimals, value / scale);
            }
        }
    }

    let fixed = format!("{:.*}", options.decimals, value);
    if options.thousand_separator {
        group_thousands(&fixed)
    } else {
        fixed
    }
}

/// Parse a decimal string and compact it; unparsable input renders as `"0"`
pub fn format_big_number_str(value: &str, options: BigNumberFormat) -> String {
    value
        .trim()
        .parse::<f64>()
        .map(|v| format_big_number(v, options))
        .unwrap_or_else(|_| "0".to_string())
}

/// `1.2346e+15` / `5.0000e-7`
fn to_exponential(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*e}", decimals, value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => rendered,
    }
}

fn group_thousands(fixed: &str) -> String {
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn trim_fixed(fixed: String) -> String {
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_scaled(value: f64, floor: f64, floor_label: &str, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value < floor {
        return floor_label.to_string();
    }
    if value >= 1e6 {
        return format!("{:.2}M", value / 1e6);
    }
    if value >= 1e3 {
        return format!("{:.2}K", value / 1e3);
    }
    trim_fixed(format!("{:.*}", digits, value))
}

/// Price display: `<0.0001` floor, M/K suffixes, up to 6 decimals
pub fn format_price(price: f64) -> String {
    format_scaled(price, 0.0001, "<0.0001", 6)
}

/// Token amount display: `<0.001` floor, M/K suffixes, up to 6 decimals
pub fn format_token_amount(amount: f64) -> String {
    format_scaled(amount, 0.001, "<0.001", 6)
}

/// Generic number display: `<0.001` floor, M/K suffixes, up to 3 decimals
pub fn format_number(num: f64) -> String {
    format_scaled(num, 0.001, "<0.001", 3)
}

/// `0x1234...abcd`
pub fn shorten_address(address: &Address) -> String {
    shorten_hex(&address.to_string(), 4)
}

/// Keep `chars` hex digits on each side of a `0x` string
pub fn shorten_hex(value: &str, chars: usize) -> String {
    if value.len() <= chars * 2 + 2 {
        return value.to_string();
    }
    format!("{}...{}", &value[..chars + 2], &value[value.len() - chars..])
}

/// `amount * (1 - slippage / 100)` for display
pub fn calculate_min_received(amount: f64, slippage_percent: f64) -> f64 {
    amount * (1.0 - slippage_percent / 100.0)
}

/// Strip everything but digits and dots, folding extra dots into the fraction
pub fn parse_input_amount(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match cleaned.split_once('.') {
        Some((int_part, rest)) if rest.contains('.') => {
            format!("{int_part}.{}", rest.replace('.', ""))
        }
        _ => cleaned,
    }
}
