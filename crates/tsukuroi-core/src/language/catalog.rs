//! Shipped catalog of known language identities and their display names.

use tracing::warn;

use crate::language::{DisplayLanguage, Language};

struct LanguageEntry {
    code: &'static str,
    iso3: &'static str,
    english: &'static str,
    german: &'static str,
}

struct NameEntry {
    code: &'static str,
    english: &'static str,
    german: &'static str,
}

const fn lang(
    code: &'static str,
    iso3: &'static str,
    english: &'static str,
    german: &'static str,
) -> LanguageEntry {
    LanguageEntry {
        code,
        iso3,
        english,
        german,
    }
}

const fn name(code: &'static str, english: &'static str, german: &'static str) -> NameEntry {
    NameEntry {
        code,
        english,
        german,
    }
}

const LANGUAGES: &[LanguageEntry] = &[
    lang("en", "eng", "English", "Englisch"),
    lang("de", "deu", "German", "Deutsch"),
    lang("fr", "fra", "French", "Französisch"),
    lang("es", "spa", "Spanish", "Spanisch"),
    lang("it", "ita", "Italian", "Italienisch"),
    lang("nl", "nld", "Dutch", "Niederländisch"),
    lang("pt", "por", "Portuguese", "Portugiesisch"),
    lang("ru", "rus", "Russian", "Russisch"),
    lang("ja", "jpn", "Japanese", "Japanisch"),
    lang("ko", "kor", "Korean", "Koreanisch"),
    lang("zh", "zho", "Chinese", "Chinesisch"),
    lang("sv", "swe", "Swedish", "Schwedisch"),
    lang("no", "nor", "Norwegian", "Norwegisch"),
    lang("da", "dan", "Danish", "Dänisch"),
    lang("fi", "fin", "Finnish", "Finnisch"),
    lang("is", "isl", "Icelandic", "Isländisch"),
    lang("pl", "pol", "Polish", "Polnisch"),
    lang("cs", "ces", "Czech", "Tschechisch"),
    lang("sk", "slk", "Slovak", "Slowakisch"),
    lang("hu", "hun", "Hungarian", "Ungarisch"),
    lang("ro", "ron", "Romanian", "Rumänisch"),
    lang("bg", "bul", "Bulgarian", "Bulgarisch"),
    lang("el", "ell", "Greek", "Griechisch"),
    lang("tr", "tur", "Turkish", "Türkisch"),
    lang("he", "heb", "Hebrew", "Hebräisch"),
    lang("ar", "ara", "Arabic", "Arabisch"),
    lang("fa", "fas", "Persian", "Persisch"),
    lang("hi", "hin", "Hindi", "Hindi"),
    lang("th", "tha", "Thai", "Thailändisch"),
    lang("vi", "vie", "Vietnamese", "Vietnamesisch"),
    lang("id", "ind", "Indonesian", "Indonesisch"),
    lang("hr", "hrv", "Croatian", "Kroatisch"),
    lang("sr", "srp", "Serbian", "Serbisch"),
    lang("sl", "slv", "Slovenian", "Slowenisch"),
    lang("uk", "ukr", "Ukrainian", "Ukrainisch"),
    lang("et", "est", "Estonian", "Estnisch"),
    lang("lv", "lav", "Latvian", "Lettisch"),
    lang("lt", "lit", "Lithuanian", "Litauisch"),
];

const REGIONS: &[NameEntry] = &[
    name("US", "United States", "Vereinigte Staaten"),
    name("GB", "United Kingdom", "Vereinigtes Königreich"),
    name("AU", "Australia", "Australien"),
    name("CA", "Canada", "Kanada"),
    name("AT", "Austria", "Österreich"),
    name("CH", "Switzerland", "Schweiz"),
    name("BE", "Belgium", "Belgien"),
    name("ES", "Spain", "Spanien"),
    name("MX", "Mexico", "Mexiko"),
    name("BR", "Brazil", "Brasilien"),
    name("PT", "Portugal", "Portugal"),
    name("CN", "China", "China"),
    name("TW", "Taiwan", "Taiwan"),
];

const SCRIPTS: &[NameEntry] = &[
    name("Hans", "Simplified", "Vereinfacht"),
    name("Hant", "Traditional", "Traditionell"),
    name("Latn", "Latin", "Lateinisch"),
    name("Cyrl", "Cyrillic", "Kyrillisch"),
];

/// Qualified identities shipped in addition to every plain language.
const QUALIFIED: &[(&str, Option<&str>, Option<&str>)] = &[
    ("en", None, Some("US")),
    ("en", None, Some("GB")),
    ("en", None, Some("AU")),
    ("de", None, Some("AT")),
    ("de", None, Some("CH")),
    ("fr", None, Some("CA")),
    ("fr", None, Some("BE")),
    ("es", None, Some("ES")),
    ("es", None, Some("MX")),
    ("pt", None, Some("BR")),
    ("pt", None, Some("PT")),
    ("nl", None, Some("BE")),
    ("zh", Some("Hans"), None),
    ("zh", Some("Hant"), None),
    ("zh", Some("Hans"), Some("CN")),
    ("zh", Some("Hant"), Some("TW")),
    ("sr", Some("Latn"), None),
    ("sr", Some("Cyrl"), None),
];

/// Every shipped identity, plain languages first, in catalog order.
pub fn known_languages() -> impl Iterator<Item = Language> {
    let plain = LANGUAGES.iter().map(|entry| Language::new(entry.code));
    let qualified = QUALIFIED.iter().map(|(code, script, region)| {
        let mut lang = Language::new(code);
        if let Some(script) = script {
            lang = lang.with_script(script);
        }
        if let Some(region) = region {
            lang = lang.with_region(region);
        }
        lang
    });
    plain.chain(qualified)
}

fn language_entry(code: &str) -> Option<&'static LanguageEntry> {
    LANGUAGES.iter().find(|entry| entry.code == code)
}

fn pick(entry: &NameEntry, display: DisplayLanguage) -> &'static str {
    match display {
        DisplayLanguage::English => entry.english,
        DisplayLanguage::German => entry.german,
    }
}

/// Alternate 3-letter code of the identity's language.
pub fn iso3(language: &Language) -> Option<&'static str> {
    language_entry(language.language()).map(|entry| entry.iso3)
}

/// Name of the language alone ("Portuguese"), ignoring script and region.
pub fn display_language(language: &Language, display: DisplayLanguage) -> Option<&'static str> {
    let entry = language_entry(language.language())?;
    Some(match display {
        DisplayLanguage::English => entry.english,
        DisplayLanguage::German => entry.german,
    })
}

/// Full display name ("Portuguese (Brazil)", "Chinese (Traditional, Taiwan)").
///
/// `None` if the language, script or region is not in the catalog.
pub fn display_name(language: &Language, display: DisplayLanguage) -> Option<String> {
    let base = display_language(language, display)?;
    let mut qualifiers = Vec::new();
    if let Some(script) = language.script() {
        let entry = SCRIPTS.iter().find(|s| s.code == script)?;
        qualifiers.push(pick(entry, display));
    }
    if let Some(region) = language.region() {
        let entry = REGIONS.iter().find(|r| r.code == region)?;
        qualifiers.push(pick(entry, display));
    }
    if qualifiers.is_empty() {
        Some(base.to_string())
    } else {
        Some(format!("{base} ({})", qualifiers.join(", ")))
    }
}

/// Every string the catalog accepts for `language` under the given source
/// display languages: code, tag and display names.
pub fn spellings(language: &Language, sources: &[DisplayLanguage]) -> Vec<String> {
    let mut spellings = vec![language.code(), language.tag()];
    spellings.extend(sources.iter().filter_map(|d| display_name(language, *d)));
    spellings
}

/// Finds the first known identity one of whose spellings equals `raw`,
/// ignoring case. A spelling shared by several identities is logged.
pub fn find(raw: &str, sources: &[DisplayLanguage]) -> Option<Language> {
    first_spelled(
        raw,
        known_languages().map(|lang| {
            let spelled = spellings(&lang, sources);
            (lang, spelled)
        }),
    )
}

fn first_spelled(
    raw: &str,
    candidates: impl IntoIterator<Item = (Language, Vec<String>)>,
) -> Option<Language> {
    let needle = raw.trim().to_lowercase();
    let mut hits = candidates
        .into_iter()
        .filter(|(_, spelled)| spelled.iter().any(|s| s.to_lowercase() == needle))
        .map(|(lang, _)| lang);

    let first = hits.next()?;
    let others: Vec<String> = hits.map(|lang| lang.tag()).collect();
    if !others.is_empty() {
        warn!(
            text = raw,
            chosen = %first.tag(),
            others = ?others,
            "language spelling names several catalog identities"
        );
    }
    Some(first)
}

/// Finds the plain language whose 3-letter code equals `raw`, ignoring case.
pub fn find_iso3(raw: &str) -> Option<Language> {
    let raw = raw.trim();
    LANGUAGES
        .iter()
        .find(|entry| entry.iso3.eq_ignore_ascii_case(raw))
        .map(|entry| Language::new(entry.code))
}

/// Resolves `raw` with the default sources: catalog spellings in every
/// display language, then 3-letter codes.
pub fn lookup(raw: &str) -> Option<Language> {
    find(raw, &DisplayLanguage::ALL).or_else(|| find_iso3(raw))
}
