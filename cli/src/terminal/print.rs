use colored::*;

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    println!("{line}");
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let pad: usize = TOTAL_WIDTH.saturating_sub(width) / 2;
    println!("{}{}", " ".repeat(pad), msg);
}

pub fn tree_head(idx: usize, name: &str) {
    println!(
        "{}{}{} {}",
        "[".bright_black(),
        idx.to_string().bright_green().bold(),
        "]".bright_black(),
        name.bright_green().bold()
    );
}

/// Prints `(key, value)` pairs as one level of a tree.
pub fn as_tree_one_level(details: Vec<(String, ColoredString)>) {
    let key_width: usize = details.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let last = details.len().saturating_sub(1);

    for (i, (key, value)) in details.into_iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!(
            " {} {:<width$} {} {}",
            branch.bright_black(),
            key,
            ":".bright_black(),
            value,
            width = key_width
        );
    }
}

pub fn no_results() {
    println!("{}", "No devices answered on this subnet.".yellow());
}
