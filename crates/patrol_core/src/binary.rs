//! Binary file detection utilities.

use std::path::Path;

/// Number of characters sampled from the start of a file when sniffing content.
pub const BINARY_SAMPLE_CHARS: usize = 1000;

/// Percentage of suspicious characters above which a sample is treated as binary.
const SUSPICIOUS_PERCENT: usize = 10;

/// File extensions that are always treated as binary, regardless of content.
const BINARY_EXTENSIONS: &[&str] = &[
    "o", "obj", "a", "lib", "so", "dylib", "dll", "exe", "pyc", "pyo", "class", "jar", "rlib", "rmeta", // Compiled code
    "png", "jpg", "jpeg", "gif", "ico", "webp", "bmp", "tiff", "tif", "heic", "heif", "avif", "psd", // Images
    "mp3", "mp4", "wav", "avi", "mov", "flac", "ogg", "webm", "mkv", "m4a", // Audio/Video
    "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "zst", // Archives
    "ttf", "otf", "woff", "woff2", "eot", // Fonts
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", // Documents
    "wasm", "bin", "dat", "pak", "bundle", "db", "sqlite", // Other binary
];

/// Returns `true` if the file extension is in the known binary list.
///
/// The check is case-insensitive and never touches the file system.
#[must_use]
pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Classifies the first [`BINARY_SAMPLE_CHARS`] characters of `content`.
///
/// A sample is binary if it contains a null character, or if more than 10% of
/// its characters are control characters (other than tab, newline and carriage
/// return) or the Unicode replacement character.
#[must_use]
pub fn is_binary_sample(content: &str) -> bool {
    let mut sampled = 0usize;
    let mut suspicious = 0usize;

    for c in content.chars().take(BINARY_SAMPLE_CHARS) {
        if c == '\0' {
            return true;
        }
        if is_suspicious(c) {
            suspicious += 1;
        }
        sampled += 1;
    }

    sampled > 0 && suspicious * 100 > sampled * SUSPICIOUS_PERCENT
}

/// Returns `true` if `path` or its content sample should be treated as binary.
///
/// The extension check runs first, so callers that only have a path can pass
/// an empty sample for denylisted extensions.
#[must_use]
pub fn is_binary(path: &Path, sample: &str) -> bool {
    has_binary_extension(path) || is_binary_sample(sample)
}

const fn is_suspicious(c: char) -> bool {
    (c < ' ' && !matches!(c, '\t' | '\n' | '\r')) || c == char::REPLACEMENT_CHARACTER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_binary_extension_detects_images() {
        assert!(has_binary_extension(Path::new("photo.png")));
        assert!(has_binary_extension(Path::new("image.jpg")));
        assert!(has_binary_extension(Path::new("icon.gif")));
        assert!(has_binary_extension(Path::new("banner.webp")));
    }

    #[test]
    fn has_binary_extension_detects_compiled_code() {
        assert!(has_binary_extension(Path::new("main.o")));
        assert!(has_binary_extension(Path::new("lib.so")));
        assert!(has_binary_extension(Path::new("app.exe")));
        assert!(has_binary_extension(Path::new("Main.class")));
    }

    #[test]
    fn has_binary_extension_detects_fonts_and_archives() {
        assert!(has_binary_extension(Path::new("font.woff2")));
        assert!(has_binary_extension(Path::new("archive.zip")));
        assert!(has_binary_extension(Path::new("data.gz")));
    }

    #[test]
    fn has_binary_extension_is_case_insensitive() {
        assert!(has_binary_extension(Path::new("IMAGE.PNG")));
        assert!(has_binary_extension(Path::new("Photo.JPG")));
    }

    #[test]
    fn has_binary_extension_allows_text_files() {
        assert!(!has_binary_extension(Path::new("main.rs")));
        assert!(!has_binary_extension(Path::new("app.ts")));
        assert!(!has_binary_extension(Path::new("README.md")));
        assert!(!has_binary_extension(Path::new("Makefile")));
        assert!(!has_binary_extension(Path::new(".env")));
    }

    #[test]
    fn is_binary_sample_detects_null_characters() {
        assert!(is_binary_sample("hello\0world"));
        assert!(is_binary_sample("\0binary"));
    }

    #[test]
    fn is_binary_sample_allows_plain_text() {
        assert!(!is_binary_sample("hello world"));
        assert!(!is_binary_sample("line1\r\nline2\n\tindented"));
        assert!(!is_binary_sample(""));
    }

    #[test]
    fn thirty_nulls_in_two_hundred_chars_is_binary() {
        let sample = format!("{}{}", "\0".repeat(30), "a".repeat(170));
        assert!(is_binary_sample(&sample));
    }

    #[test]
    fn five_percent_control_characters_is_text() {
        let sample = format!("{}{}", "\x01".repeat(10), "a".repeat(190));
        assert!(!is_binary_sample(&sample));
    }

    #[test]
    fn over_ten_percent_control_characters_is_binary() {
        let sample = format!("{}{}", "\x07".repeat(21), "a".repeat(179));
        assert!(is_binary_sample(&sample));
    }

    #[test]
    fn exactly_ten_percent_is_not_binary() {
        let sample = format!("{}{}", "\x07".repeat(20), "a".repeat(180));
        assert!(!is_binary_sample(&sample));
    }

    #[test]
    fn replacement_characters_count_as_suspicious() {
        let sample = format!("{}{}", "\u{FFFD}".repeat(15), "a".repeat(85));
        assert!(is_binary_sample(&sample));
    }

    #[test]
    fn is_binary_sample_only_inspects_leading_characters() {
        let mut content = "a".repeat(BINARY_SAMPLE_CHARS + 100);
        content.push('\0');
        assert!(!is_binary_sample(&content));
    }

    #[test]
    fn is_binary_short_circuits_on_extension() {
        assert!(is_binary(Path::new("logo.png"), ""));
        assert!(!is_binary(Path::new("main.rs"), "fn main() {}"));
        assert!(is_binary(Path::new("artifact"), "\0\0ELF"));
    }
}
