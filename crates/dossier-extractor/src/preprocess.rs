//! Text normalization ahead of structure analysis
//!
//! Steps run in a fixed order because later steps rely on earlier ones:
//! encoding repair, markup stripping, OCR correction, list-marker
//! canonicalization, whitespace normalization. The pass repeats until the
//! text stops changing, so `normalize(normalize(x)) == normalize(x)`.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical bullet marker written at the start of list lines
pub const BULLET: &str = "- ";

/// Mis-decoded UTF-8 punctuation, longest sequences first
const MOJIBAKE: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "'"),
    ("\u{e2}\u{20ac}\u{2dc}", "'"),
    ("\u{e2}\u{20ac}\u{153}", "\""),
    ("\u{e2}\u{20ac}\u{9d}", "\""),
    ("\u{e2}\u{20ac}\u{201d}", "-"),
    ("\u{e2}\u{20ac}\u{201c}", "-"),
    ("\u{e2}\u{20ac}\u{a6}", "..."),
    ("\u{e2}\u{20ac}\u{a2}", "\u{2022}"),
    ("\u{c2}\u{a0}", " "),
];

/// Known OCR misreads, matched as whole words
static OCR_FIXES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("Cllent", "Client"),
        ("C1ient", "Client"),
        ("Clieut", "Client"),
        ("lndustry", "Industry"),
        ("Industiy", "Industry"),
        ("Competltors", "Competitors"),
        ("Cornpetitors", "Competitors"),
        ("Tler", "Tier"),
        ("Sourees", "Sources"),
        ("Sourccs", "Sources"),
        ("Exc1ude", "Exclude"),
        ("Exciude", "Exclude"),
        ("Schedu1e", "Schedule"),
        ("tbe", "the"),
        ("witb", "with"),
        ("0f", "of"),
        ("arid", "and"),
    ]
    .into_iter()
    .collect()
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:amp|lt|gt|quot|apos|nbsp|#39|#8217|#8220|#8221);")
        .expect("entity pattern should compile")
});

static LINE_BREAK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|tr|h[1-6])\s*>")
        .expect("line break tag pattern should compile")
});

static LIST_ITEM_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<li(?:\s[^<>]*)?>").expect("list item tag pattern should compile")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").expect("tag pattern should compile")
});

static MD_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]\n]+)\]\([^()\n]*\)").expect("link pattern should compile")
});

static MD_BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^*\n]+)\*\*|__([^_\n]+)__").expect("bold pattern should compile")
});

static MD_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*\s][^*\n]*)\*").expect("emphasis pattern should compile")
});

static MD_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").expect("heading pattern should compile")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9]+\b").expect("word pattern should compile"));

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*\u{2022}\u{25aa}\u{25cf}]|o)[ \t]+")
        .expect("list marker pattern should compile")
});

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run pattern should compile"));

/// Normalize raw client notes
///
/// Total: never fails, including on empty or binary-looking input.
///
/// # Examples
///
/// ```
/// use dossier_extractor::normalize;
///
/// let text = normalize("<b>Client</b>:\tAcme\r\n\r\n\r\n* Foo");
/// assert_eq!(text, "Client: Acme\n\n- Foo");
/// ```
pub fn normalize(raw: &str) -> String {
    // A changing pass either shortens the text or swaps in characters no
    // step rewrites again, so this reaches a fixpoint.
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(text: &str) -> String {
    let text = repair_encoding(text);
    let text = strip_markup(&text);
    let text = correct_ocr(&text);
    let text = canonicalize_list_markers(&text);
    normalize_whitespace(&text)
}

/// Replace mis-decoded and typographic punctuation with ASCII
pub(crate) fn repair_encoding(text: &str) -> String {
    let mut repaired = text.to_string();
    for (broken, fixed) in MOJIBAKE {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }

    repaired
        .chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => Some('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' => Some('"'),
            '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{2212}' => Some('-'),
            '\u{a0}' | '\u{2007}' | '\u{202f}' => Some(' '),
            '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}' => None,
            '\n' | '\r' | '\t' => Some(c),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect::<String>()
        .replace('\u{2026}', "...")
}

/// Collapse HTML and markdown to their visible text
pub(crate) fn strip_markup(text: &str) -> String {
    let text = ENTITY.replace_all(text, |caps: &Captures| match &caps[0] {
        "&amp;" => "&",
        "&lt;" => "<",
        "&gt;" => ">",
        "&quot;" | "&#8220;" | "&#8221;" => "\"",
        "&nbsp;" => " ",
        _ => "'",
    });
    let text = LIST_ITEM_TAG.replace_all(&text, "\n- ");
    let text = LINE_BREAK_TAG.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "$1");
    let text = MD_BOLD.replace_all(&text, "$1$2");
    let text = MD_EMPHASIS.replace_all(&text, "$1");
    let text = MD_HEADING.replace_all(&text, "");
    text.replace('`', "")
}

/// Substitute known OCR misreads, whole words only
pub(crate) fn correct_ocr(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures| {
        let word = &caps[0];
        OCR_FIXES.get(word).copied().unwrap_or(word).to_string()
    })
    .into_owned()
}

/// Rewrite `-`, `*`, `•` and `o` list markers as the canonical bullet
///
/// Numbered markers are left alone.
pub(crate) fn canonicalize_list_markers(text: &str) -> String {
    LIST_MARKER.replace_all(text, BULLET).into_owned()
}

/// Canonical line endings, tabs as spaces, single blank lines, no
/// trailing spaces
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ");
    let trimmed: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    BLANK_RUN.replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encoding_repair() {
        assert_eq!(
            repair_encoding("Acme\u{2019}s \u{201c}big\u{201d} launch \u{2014} soon\u{2026}"),
            "Acme's \"big\" launch - soon..."
        );
        assert_eq!(repair_encoding("Acme\u{e2}\u{20ac}\u{2122}s"), "Acme's");
        assert_eq!(repair_encoding("a\u{0}b\u{feff}c"), "abc");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_markup("<p>Client: <b>Acme</b></p><ul><li>Foo</li></ul>"),
            "Client: Acme\n\n- Foo\n"
        );
        assert_eq!(strip_markup("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(strip_markup("x < y and y > z"), "x < y and y > z");
    }

    #[test]
    fn test_strip_markdown() {
        assert_eq!(strip_markup("## Competitors"), "Competitors");
        assert_eq!(strip_markup("**Client:** [Acme](https://acme.com)"), "Client: Acme");
        assert_eq!(strip_markup("an *important* note"), "an important note");
        assert_eq!(strip_markup("* bullet stays"), "* bullet stays");
        assert_eq!(strip_markup("[Tier 1 | IGN]"), "[Tier 1 | IGN]");
    }

    #[test]
    fn test_ocr_correction_is_whole_word() {
        assert_eq!(correct_ocr("Cllent: Acme"), "Client: Acme");
        assert_eq!(correct_ocr("lndustry"), "Industry");
        assert_eq!(correct_ocr("Tlers"), "Tlers");
    }

    #[test]
    fn test_list_markers() {
        let text = "Rivals:\n* Foo\n  - Bar\n\u{2022} Baz\no Qux\n1. First\nopen item";
        assert_eq!(
            canonicalize_list_markers(text),
            "Rivals:\n- Foo\n- Bar\n- Baz\n- Qux\n1. First\nopen item"
        );
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(
            normalize_whitespace("\r\n a\t b  \r\n\r\n\r\n\r\nc \n\n"),
            "a  b\n\nc"
        );
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\u{0}\u{1}\u{2}"), "");
        let lossy = String::from_utf8_lossy(&[0xff, 0xfe, b'A', 0x80]);
        assert_eq!(normalize(&lossy), "\u{fffd}\u{fffd}A\u{fffd}");
    }

    #[test]
    fn test_nested_entities_reach_fixpoint() {
        assert_eq!(normalize("&amp;lt;b&amp;gt;Acme"), "Acme");
    }

    #[test]
    fn test_deeply_nested_entities_are_idempotent() {
        let raw = format!("Client: Acme &{}lt;b&gt;", "amp;".repeat(12));
        let once = normalize(&raw);
        assert_eq!(once, "Client: Acme");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_deterministic() {
        let raw = "## Notes\r\n**Client**: Acme\t Corp\n\n\n* Foo";
        assert_eq!(normalize(raw), normalize(raw));
        assert_eq!(normalize(raw), "Notes\nClient: Acme  Corp\n\n- Foo");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "\\PC{0,200}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_markup_heavy_input_is_idempotent(
            parts in prop::collection::vec(
                prop::sample::select(vec![
                    "<b>", "</b>", "<br>", "**", "*", "_", "__", "&amp;", "&lt;", "[", "](x)",
                    "- ", "o ", "\u{2022} ", "\t", "\r\n", "\n\n\n", "# ", "Client", ": ", "Acme",
                    "\u{2019}", "Cllent", " ",
                ]),
                0..40,
            )
        ) {
            let raw: String = parts.concat();
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
