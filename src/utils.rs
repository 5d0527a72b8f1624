/// Form field helpers

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

/// Loose email shape check: something@domain.tld, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Digits of a phone number with separators (space, dash, dot, parens, +) removed.
/// Returns None if anything else is present.
pub fn phone_digits(phone: &str) -> Option<String> {
    let mut digits = String::new();
    for c in phone.trim().chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' | '+' => continue,
            _ => return None,
        }
    }
    Some(digits)
}

/// Get file extension (lowercase)
pub fn get_ext(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Make an uploaded file name safe for an object path.
/// Keeps ASCII alphanumerics, dot, dash and underscore; everything else becomes '_'.
pub fn sanitize_file_name(name: &str) -> String {
    // browsers may send a full client path
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name).trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Non-blank trimmed value of an optional field
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("veli@refakademi.com"));
        assert!(is_valid_email("  a.b+c@x.co  "));
        assert!(!is_valid_email("veli@refakademi"));
        assert!(!is_valid_email("veli refakademi.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(phone_digits("+90 (532) 123-45-67").as_deref(), Some("905321234567"));
        assert_eq!(phone_digits("0532.123.45.67").as_deref(), Some("05321234567"));
        assert_eq!(phone_digits("0532 abc"), None);
    }

    #[test]
    fn test_get_ext() {
        assert_eq!(get_ext("cv.PDF"), "pdf");
        assert_eq!(get_ext("archive.tar.gz"), "gz");
        assert_eq!(get_ext("noext"), "");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Özgeçmiş 2026.pdf"), "_zge_mi__2026.pdf");
        assert_eq!(sanitize_file_name("C:\\Users\\can\\cv.docx"), "cv.docx");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("..."), "file");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  hi ")).as_deref(), Some("hi"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
