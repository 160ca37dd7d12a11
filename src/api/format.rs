fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1_000;
        value /= 1_000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{group:03}"));
    }
    groups.reverse();
    groups.join(" ")
}

fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{},{:02}", group_thousands(cents / 100), cents % 100)
}

/// `4383.229` becomes `"4 383,23 zł"`.
pub fn format_pln(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    format!("{} zł", format_decimal(value))
}

pub fn format_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "n/a".to_string();
    }
    format!("{}%", format_decimal(fraction * 100.0))
}
