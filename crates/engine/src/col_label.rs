//! Column labels and A1-style cell addresses.
//!
//! Labels are bijective base-26: A..Z, then AA..ZZ, then AAA. There is no
//! zero digit, so each step divides by 26 and subtracts one.

/// Convert 0-based column index to letter(s): 0=A, 25=Z, 26=AA, 701=ZZ.
pub fn index_to_label(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Inverse of [`index_to_label`]. Case-insensitive.
///
/// Returns `None` for empty input, non-letters, or labels too long to fit.
pub fn label_to_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }

    let mut acc: usize = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc - 1)
}

/// Parse `B12` into `(row, col)` = `(11, 1)`.
///
/// Row numbers are 1-based in text; row 0 is rejected.
pub fn parse_cell_address(s: &str) -> Option<(usize, usize)> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = s.split_at(split);

    let col = label_to_index(letters)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}

/// Format `(row, col)` as an A1-style address.
pub fn cell_address(row: usize, col: usize) -> String {
    format!("{}{}", index_to_label(col), row + 1)
}
