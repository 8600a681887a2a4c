//! Colored status lines for one-shot commands.

use chrono::Local;
use colored::Colorize;

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

pub fn success(msg: impl AsRef<str>) {
    println!(
        "{} {}",
        format!("[{}] ok", timestamp()).green().bold(),
        msg.as_ref()
    );
}

pub fn info(msg: impl AsRef<str>) {
    println!(
        "{} {}",
        format!("[{}] ..", timestamp()).cyan().bold(),
        msg.as_ref()
    );
}

pub fn error(msg: impl AsRef<str>) {
    eprintln!(
        "{} {}",
        format!("[{}] !!", timestamp()).red().bold(),
        msg.as_ref()
    );
}
