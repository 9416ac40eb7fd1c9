//! Human-readable money amounts.

/// Formats an amount in cents as US dollars with thousands separators.
///
/// ```
/// use howdy::greeting::format_usd;
///
/// assert_eq!(format_usd(1_234_567), "$12,345.67");
/// assert_eq!(format_usd(5), "$0.05");
/// ```
#[must_use]
pub fn format_usd(cents: u64) -> String {
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
