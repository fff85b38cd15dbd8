//! Diacritic-insensitive text folding for Vietnamese place names.
//!
//! `normalize("Phú Nhuận")` == `"phu nhuan"`. Used on both sides of every
//! address comparison.

/// Fold a single Vietnamese letter to its unaccented lowercase base.
fn fold_vietnamese(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ' | 'ẩ'
        | 'ẫ' | 'ậ' => 'a',
        'À' | 'Á' | 'Ả' | 'Ã' | 'Ạ' | 'Ă' | 'Ằ' | 'Ắ' | 'Ẳ' | 'Ẵ' | 'Ặ' | 'Â' | 'Ầ' | 'Ấ' | 'Ẩ'
        | 'Ẫ' | 'Ậ' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' => 'e',
        'È' | 'É' | 'Ẻ' | 'Ẽ' | 'Ẹ' | 'Ê' | 'Ề' | 'Ế' | 'Ể' | 'Ễ' | 'Ệ' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' => 'i',
        'Ì' | 'Í' | 'Ỉ' | 'Ĩ' | 'Ị' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở'
        | 'ỡ' | 'ợ' => 'o',
        'Ò' | 'Ó' | 'Ỏ' | 'Õ' | 'Ọ' | 'Ô' | 'Ồ' | 'Ố' | 'Ổ' | 'Ỗ' | 'Ộ' | 'Ơ' | 'Ờ' | 'Ớ' | 'Ở'
        | 'Ỡ' | 'Ợ' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' => 'u',
        'Ù' | 'Ú' | 'Ủ' | 'Ũ' | 'Ụ' | 'Ư' | 'Ừ' | 'Ứ' | 'Ử' | 'Ữ' | 'Ự' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        'Ỳ' | 'Ý' | 'Ỷ' | 'Ỹ' | 'Ỵ' => 'y',
        'đ' | 'Đ' => 'd',
        _ => return None,
    };
    Some(base)
}

/// Combining diacritical marks (decomposed input such as "u\u{0301}").
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Strip Vietnamese diacritics and lowercase.
///
/// Total and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if is_combining_mark(c) {
            continue;
        }
        match fold_vietnamese(c) {
            Some(base) => out.push(base),
            None => out.extend(c.to_lowercase().filter(|lc| !is_combining_mark(*lc))),
        }
    }
    out
}

/// Whole-word, diacritic-insensitive phrase match.
///
/// `contains_phrase("Quận 1, TP.HCM", "hcm")` is true; `contains_phrase("Đường Thuế", "hue")` is not.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let words = |s: &str| -> String {
        let joined = normalize(s)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        format!(" {} ", joined)
    };
    let phrase = words(phrase);
    !phrase.trim().is_empty() && words(text).contains(&phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_district_names() {
        assert_eq!(normalize("Phú Nhuận"), "phu nhuan");
        assert_eq!(normalize("Hồ Chí Minh"), "ho chi minh");
        assert_eq!(normalize("Đà Lạt"), "da lat");
        assert_eq!(normalize("Thừa Thiên Huế"), "thua thien hue");
        assert_eq!(normalize("Bà Rịa - Vũng Tàu"), "ba ria - vung tau");
    }

    #[test]
    fn test_every_vowel_family() {
        assert_eq!(normalize("àáảãạăằắẳẵặâầấẩẫậ"), "a".repeat(17));
        assert_eq!(normalize("ÈÉẺẼẸÊỀẾỂỄỆ"), "e".repeat(11));
        assert_eq!(normalize("ìíỉĩịÌÍỈĨỊ"), "i".repeat(10));
        assert_eq!(normalize("òóỏõọôồốổỗộơờớởỡợ"), "o".repeat(17));
        assert_eq!(normalize("ùúủũụưừứửữựỰ"), "u".repeat(12));
        assert_eq!(normalize("ỳýỷỹỵỲ"), "y".repeat(6));
        assert_eq!(normalize("đĐ"), "dd");
    }

    #[test]
    fn test_decomposed_marks_are_dropped() {
        assert_eq!(normalize("Phu\u{0301} Nhua\u{0302}\u{0323}n"), "phu nhuan");
    }

    #[test]
    fn test_ascii_untouched_except_case() {
        assert_eq!(normalize("Q.PN, TP.HCM 700000"), "q.pn, tp.hcm 700000");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_contains_phrase() {
        assert!(contains_phrase("Quận 1, TP.HCM", "hcm"));
        assert!(contains_phrase("Phú Nhuận, Hồ Chí Minh, Việt Nam", "viet nam"));
        assert!(contains_phrase("Huế", "hue"));
        assert!(!contains_phrase("Đường Thuế", "hue"));
        assert!(!contains_phrase("anything", ""));
    }

    #[test]
    fn test_idempotent() {
        for s in ["Phú Nhuận Q.PN, TP.HCM", "Đường Nguyễn Văn Trỗi", "İstanbul", "already plain"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
