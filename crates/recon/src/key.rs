/// Keep only ASCII digits, preserving order.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Join key shared by both tables: location/pallet digits then invoice digits,
/// concatenated. Concatenation order is load-bearing: ("00012", "7") gives
/// "000127" while ("12", "007") gives "12007", and the two must not collide.
pub fn composite_key(pallet: &str, invoice: &str) -> String {
    let mut key = digits_only(pallet);
    key.push_str(&digits_only(invoice));
    key
}
