//! Slug derivation and read-time estimation properties.

use services::slug::{read_time, slugify};

#[test]
fn slugs_are_lowercase_hyphenated_and_trimmed() {
    assert_eq!(slugify("My First Post"), "my-first-post");
    assert_eq!(slugify("  Spaces   Collapse  "), "spaces-collapse");
    assert_eq!(slugify("Symbols?! Get * Stripped"), "symbols-get-stripped");
    assert_eq!(slugify("UPPER case MiXeD"), "upper-case-mixed");
    assert_eq!(slugify("hyphen - heavy -- title"), "hyphen-heavy-title");
}

#[test]
fn slugs_only_contain_url_safe_characters() {
    for title in ["Ünïcödé titles!", "tabs\tand\nnewlines", "100% legit (really)"] {
        let slug = slugify(title);
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "slug {slug:?} from {title:?} has unexpected characters"
        );
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }
}

#[test]
fn unusable_titles_fall_back() {
    assert_eq!(slugify("???"), "untitled");
}

#[test]
fn read_time_is_ceiling_of_words_over_200() {
    assert_eq!(read_time("quick note"), 1);
    assert_eq!(read_time(&vec!["word"; 200].join(" ")), 1);
    assert_eq!(read_time(&vec!["word"; 201].join(" ")), 2);
    assert_eq!(read_time(&vec!["word"; 1000].join(" ")), 5);
}
