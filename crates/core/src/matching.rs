//! Answer-matching rules for the review games.
//!
//! Pure string comparison, no I/O: the session engine feeds user input
//! through these and turns the outcome into scores.

/// Outcome of a write-the-meaning answer.
///
/// `Approximate` scores as wrong; it only changes how the answer is
/// presented (a "close" indicator instead of the plain wrong one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeaningMatch {
    Exact,
    Approximate,
    Wrong,
}

impl MeaningMatch {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, MeaningMatch::Exact)
    }
}

/// Compares a free-text meaning answer, case-insensitively and trimmed.
///
/// Approximate means one side contains the other and the input is more
/// than one character, so a single letter never passes as "close".
#[must_use]
pub fn match_meaning(input: &str, expected: &str) -> MeaningMatch {
    let user = input.trim().to_lowercase();
    let correct = expected.trim().to_lowercase();

    if user == correct {
        return MeaningMatch::Exact;
    }
    let contained = correct.contains(&user) || user.contains(&correct);
    if contained && user.chars().count() > 1 {
        MeaningMatch::Approximate
    } else {
        MeaningMatch::Wrong
    }
}

/// Accepts a write-the-hanzi-or-pinyin answer when it matches either the
/// hanzi or the pinyin field, trimmed and lowercased.
///
/// With `fold_tones` set, the input and the pinyin side go through
/// [`fold_diacritics`] first; the hanzi side never does.
#[must_use]
pub fn match_hanzi_or_pinyin(input: &str, hanzi: &str, pinyin: &str, fold_tones: bool) -> bool {
    let user = input.trim().to_lowercase();
    let han = hanzi.trim().to_lowercase();
    let pin = pinyin.trim().to_lowercase();

    let (user, pin) = if fold_tones {
        (fold_diacritics(&user), fold_diacritics(&pin))
    } else {
        (user, pin)
    };

    user == han || user == pin
}

/// Strips Vietnamese diacritics and pinyin tone marks down to base Latin
/// letters; every other character passes through unchanged.
#[must_use]
pub fn fold_diacritics(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ắ' | 'ằ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ấ' | 'ầ' | 'ẩ'
        | 'ẫ' | 'ậ' | 'ā' | 'ǎ' => 'a',
        'é' | 'è' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ế' | 'ề' | 'ể' | 'ễ' | 'ệ' | 'ē' | 'ě' => 'e',
        'í' | 'ì' | 'ỉ' | 'ĩ' | 'ị' | 'ī' | 'ǐ' => 'i',
        'ó' | 'ò' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ố' | 'ồ' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ớ' | 'ờ' | 'ở'
        | 'ỡ' | 'ợ' | 'ō' | 'ǒ' => 'o',
        'ú' | 'ù' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ứ' | 'ừ' | 'ử' | 'ữ' | 'ự' | 'ū' | 'ǔ' | 'ü' | 'ǖ'
        | 'ǘ' | 'ǚ' | 'ǜ' => 'u',
        'ý' | 'ỳ' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        'ń' | 'ň' | 'ǹ' => 'n',
        'đ' => 'd',
        'Đ' => 'D',
        _ => c,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
