//! Output formatting for CLI

use std::collections::HashSet;

use crate::{gridworld::Environment, types::Cell};

/// Render the grid as text, one character per cell.
///
/// `@` agent, `S` start, `T` target, `+`/`-` rewarding or penalising
/// landmark, `#` wall, `.` learned path, blank otherwise.
pub fn render_grid(env: &Environment, agent: Option<Cell>, path: &[Cell]) -> String {
    let on_path: HashSet<Cell> = path.iter().copied().collect();
    let border = format!("+{}+", "-".repeat(env.width() * 2));

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for row in 0..env.height() {
        out.push('|');
        for col in 0..env.width() {
            let cell = Cell::new(row, col);
            let symbol = if Some(cell) == agent {
                '@'
            } else if env.is_wall(cell) {
                '#'
            } else if let Some((_, lm)) = env.landmark_at(cell) {
                if lm.is_target {
                    'T'
                } else if lm.is_start {
                    'S'
                } else if lm.reward >= 0.0 {
                    '+'
                } else {
                    '-'
                }
            } else if on_path.contains(&cell) {
                '.'
            } else {
                ' '
            };
            out.push(symbol);
            out.push(' ');
        }
        out.push_str("|\n");
    }
    out.push_str(&border);
    out
}

/// Format a path as `r,c -> r,c -> ...`
pub fn format_path(path: &[Cell]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}
