//! Spell checking using Levenshtein distance
//!
//! This is used to suggest a defined control sequence when an undefined one is encountered.

/// Computes the Levenshtein distance between two strings.
///
/// Only two rows of the dynamic programming matrix are kept, so the space used is linear
///     in the length of `b`.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current: Vec<usize> = vec![0; b.len() + 1];
    for (i, a_c) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_c) in b.iter().enumerate() {
            current[j + 1] = if a_c == *b_c {
                previous[j]
            } else {
                1 + previous[j].min(previous[j + 1]).min(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Find words in the provided dictionary that are close to the search word.
///
/// Words further than roughly a third of the search word's length are dropped.
/// The result is ordered with the closest matches first; ties are broken alphabetically.
pub fn find_close_words<'a, I>(dictionary: I, word: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let max_distance = word.chars().count() / 3 + 1;
    let mut close: Vec<(usize, &str)> = dictionary
        .into_iter()
        .filter(|candidate| *candidate != word)
        .map(|candidate| (levenshtein_distance(word, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    close.sort();
    close.dedup();
    close.into_iter().map(|(_, w)| w.to_string()).collect()
}
