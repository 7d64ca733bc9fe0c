//! Numeric literal grammar
//!
//! Accepted forms: optional sign, binary (`0b`), hexadecimal (`0x`), octal
//! (leading `0`) or decimal integers, decimal floats with optional fraction
//! and exponent, `'` digit separators between digits, a suffix and an
//! optional user-defined literal suffix `_identifier`.

/// Floating point suffixes
const FLOATING_SUFFIXES: [&str; 4] = ["f", "F", "l", "L"];

const LONG_SUFFIXES: [&str; 5] = ["", "l", "L", "ll", "LL"];

const UNSIGNED_SUFFIXES: [&str; 3] = ["", "u", "U"];

/// Whether the word at `index` starts a numeric literal
pub fn starts_number(chars: &[char], index: usize) -> bool {
    let at = |k: usize| chars.get(k).copied();
    let is_digit = |k: usize| at(k).map(|c| c.is_ascii_digit()).unwrap_or(false);
    match at(index) {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => index == 0 && is_digit(index + 1),
        Some('+') | Some('-') => {
            index == 0 && (is_digit(1) || (at(1) == Some('.') && is_digit(2)))
        }
        _ => false,
    }
}

/// Read the literal starting at `start`, returning the index one past its end
pub fn read_number(chars: &[char], start: usize) -> Result<usize, String> {
    let n = chars.len();
    let mut i = start;
    let negative = chars.get(i) == Some(&'-');
    if matches!(chars.get(i), Some('+') | Some('-')) {
        i += 1;
    }

    let mut is_float = false;
    let prefix = (chars.get(i).copied(), chars.get(i + 1).copied());

    match prefix {
        (Some('0'), Some('b')) | (Some('0'), Some('B')) => {
            i += 2;
            let digits_start = i;
            i = read_digits(chars, i, |c| c == '0' || c == '1');
            if i == digits_start {
                return Err("binary literal without digits".to_string());
            }
            if let Some(c) = chars.get(i).filter(|c| c.is_ascii_digit()) {
                return Err(format!("invalid digit '{}' in binary literal", c));
            }
        }
        (Some('0'), Some('x')) | (Some('0'), Some('X')) => {
            i += 2;
            let digits_start = i;
            i = read_digits(chars, i, |c| c.is_ascii_hexdigit());
            if i == digits_start {
                return Err("hexadecimal literal without digits".to_string());
            }
        }
        _ => {
            let mantissa_start = i;
            i = read_digits(chars, i, |c| c.is_ascii_digit());
            let integral_end = i;
            if chars.get(i) == Some(&'.') {
                is_float = true;
                i += 1;
                let fraction_start = i;
                i = read_digits(chars, i, |c| c.is_ascii_digit());
                if integral_end == mantissa_start && i == fraction_start {
                    return Err("literal without digits".to_string());
                }
            } else if integral_end == mantissa_start {
                return Err("literal without digits".to_string());
            }

            if matches!(chars.get(i), Some('e') | Some('E')) {
                let mut k = i + 1;
                if matches!(chars.get(k), Some('+') | Some('-')) {
                    k += 1;
                }
                if chars.get(k).map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    i = read_digits(chars, k, |c| c.is_ascii_digit());
                    is_float = true;
                }
            }

            let integral: Vec<char> = chars[mantissa_start..integral_end]
                .iter()
                .copied()
                .filter(|c| *c != '\'')
                .collect();
            if !is_float && integral.len() > 1 && integral[0] == '0' {
                if let Some(c) = integral.iter().find(|c| **c > '7') {
                    return Err(format!("invalid digit '{}' in octal literal", c));
                }
            }
        }
    }

    let suffix_start = i;
    while i < n && matches!(chars[i], 'u' | 'U' | 'l' | 'L' | 'f' | 'F') {
        i += 1;
    }
    let suffix: String = chars[suffix_start..i].iter().collect();
    validate_suffix(&suffix, is_float, negative)?;

    if chars.get(i) == Some(&'_') {
        i += 1;
        while i < n && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
            i += 1;
        }
    }

    if chars.get(i) == Some(&'.') {
        return Err("unexpected '.' after numeric literal".to_string());
    }

    Ok(i)
}

/// Digits accepted by `is_digit`, with `'` allowed between two of them
fn read_digits(chars: &[char], mut i: usize, is_digit: impl Fn(char) -> bool) -> usize {
    let start = i;
    while i < chars.len() {
        let c = chars[i];
        if is_digit(c) {
            i += 1;
        } else if c == '\''
            && i > start
            && chars.get(i + 1).map(|c| is_digit(*c)).unwrap_or(false)
        {
            i += 1;
        } else {
            break;
        }
    }
    i
}

fn is_integral_suffix(suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    LONG_SUFFIXES.iter().any(|l| {
        UNSIGNED_SUFFIXES
            .iter()
            .any(|u| suffix == format!("{}{}", l, u) || suffix == format!("{}{}", u, l))
    })
}

/// Floating literals with an integral suffix are rejected before the
/// unsigned-on-negative check
fn validate_suffix(suffix: &str, is_float: bool, negative: bool) -> Result<(), String> {
    if suffix.is_empty() {
        return Ok(());
    }
    if is_float {
        if FLOATING_SUFFIXES.contains(&suffix) {
            return Ok(());
        }
        if is_integral_suffix(suffix) {
            return Err(format!(
                "integral suffix '{}' on a floating point literal",
                suffix
            ));
        }
        return Err(format!("invalid suffix '{}'", suffix));
    }
    if is_integral_suffix(suffix) {
        if negative && suffix.contains(['u', 'U']) {
            return Err(format!("unsigned suffix '{}' on a negative literal", suffix));
        }
        return Ok(());
    }
    if suffix == "f" || suffix == "F" {
        return Err(format!(
            "floating point suffix '{}' on an integral literal",
            suffix
        ));
    }
    Err(format!("invalid suffix '{}'", suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(s: &str) -> Result<String, String> {
        let chars: Vec<char> = s.chars().collect();
        read_number(&chars, 0).map(|end| chars[..end].iter().collect())
    }

    #[test]
    fn test_whole_literals() {
        for literal in [
            "0", "0.5", "1e10", "0x1F", "0b101", "1'000", "1.5f", "10u", "3_mycustom", ".3e-11L",
            "2.e-5", "-2LL", "2ul", "2LLU", "017", "0x1'F",
        ] {
            assert_eq!(read(literal).as_deref(), Ok(literal), "{}", literal);
        }
    }

    #[test]
    fn test_literal_prefixes() {
        assert_eq!(read("12.3a").unwrap(), "12.3");
        assert_eq!(read("1e").unwrap(), "1");
        assert_eq!(read("2.e-5F_banana+3").unwrap(), "2.e-5F_banana");
    }

    #[test]
    fn test_suffix_validation() {
        assert!(read("0.3LL").unwrap_err().contains("floating point literal"));
        assert!(read("1.0ul").unwrap_err().contains("floating point literal"));
        assert!(read("-2U").unwrap_err().contains("negative"));
        assert!(read("-2LLU").is_err());
        assert!(read("3f").unwrap_err().contains("integral literal"));
        assert!(read("2lL").is_err());
    }

    #[test]
    fn test_malformed_literals() {
        assert!(read("1..").is_err());
        assert!(read("0.3.3").is_err());
        assert!(read(".3f.3").is_err());
        assert!(read("0b").is_err());
        assert!(read("0b2").is_err());
        assert!(read("0b020").is_err());
        assert!(read("0x").is_err());
        assert!(read("09").is_err());
    }

    #[test]
    fn test_starts_number() {
        let word: Vec<char> = "-.5".chars().collect();
        assert!(starts_number(&word, 0));
        let word: Vec<char> = "a-2".chars().collect();
        assert!(!starts_number(&word, 1));
        assert!(starts_number(&word, 2));
        let word: Vec<char> = "x.5".chars().collect();
        assert!(!starts_number(&word, 1));
    }
}
