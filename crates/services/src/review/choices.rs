use rand::Rng;
use rand::seq::SliceRandom;

use hanyu_core::VocabEntry;

/// One letter-labeled multiple-choice option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: char,
    pub meaning: String,
}

/// Builds the choice set for the word at `index` in the session
/// vocabulary: up to three distractor meanings drawn at random from the
/// other words, plus the correct meaning, shuffled and labeled A–D.
///
/// Distractors are distinct meanings differing from the correct one, so
/// the set size is `min(4, distinct distractor meanings + 1)` and the
/// correct option is always present.
#[must_use]
pub fn build_choices(vocabulary: &[VocabEntry], index: usize, rng: &mut impl Rng) -> Vec<Choice> {
    let correct = vocabulary[index].meaning.as_str();

    let mut pool: Vec<&str> = Vec::new();
    for entry in vocabulary {
        let meaning = entry.meaning.as_str();
        if meaning != correct && !pool.contains(&meaning) {
            pool.push(meaning);
        }
    }
    pool.shuffle(rng);
    pool.truncate(3);

    let mut meanings: Vec<String> = pool.into_iter().map(str::to_owned).collect();
    meanings.push(correct.to_owned());
    meanings.shuffle(rng);

    meanings
        .into_iter()
        .enumerate()
        .map(|(i, meaning)| Choice {
            label: char::from(b'A' + u8::try_from(i).unwrap_or(0)),
            meaning,
        })
        .collect()
}
