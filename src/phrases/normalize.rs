// Remote quotes come with typographic punctuation nobody can type on a plain
// keyboard; map it to what the keys actually produce.

pub fn normalize_char(c: char) -> char {
    match c {
        // curly single quotes and apostrophes
        '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' | '\u{FF07}' => '\'',
        // curly, angle and full-width double quotes
        '\u{201C}' | '\u{201D}' | '\u{201F}' | '\u{2033}' | '\u{00AB}' | '\u{00BB}' | '\u{2039}'
        | '\u{203A}' | '\u{FF02}' => '"',
        // dashes and minus variants
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{2212}'
        | '\u{FE58}' | '\u{FE63}' | '\u{FF0D}' => '-',
        // unicode spaces
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2000}'..='\u{200A}' | '\u{205F}' | '\u{3000}' => {
            ' '
        }
        _ => c,
    }
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}

/// Make a fetched phrase typeable: plain punctuation, single spaces, no invisible codepoints.
pub fn normalize_phrase(raw: &str) -> String {
    raw.replace('\u{2026}', "...")
        .chars()
        .filter(|c| !is_invisible(*c))
        .map(normalize_char)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
