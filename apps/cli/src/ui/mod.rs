pub mod theme;

pub use theme::Theme;

pub fn info(message: impl AsRef<str>) {
    println!("{} {}", Theme::primary("ℹ"), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    println!("{} {}", Theme::warning("⚠"), message.as_ref());
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", Theme::success("✔"), message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{} {}", Theme::error("✖"), message.as_ref());
}

pub fn hint(message: impl AsRef<str>) {
    eprintln!("{} {}", Theme::muted("  help:"), message.as_ref());
}
