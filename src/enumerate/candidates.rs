use crate::{JobError, JobResult};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// One query sent to the autocomplete endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Position in the candidate sequence
    pub index: usize,

    /// Full query text (base word, separator and suffix)
    pub text: String,

    /// The generated suffix on its own
    pub suffix: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Deterministic, indexable sequence of candidates
///
/// For a suffix length of 2 the first letter is the outer loop: position `k`
/// maps to letters `(k / n, k % n)` where `n` is the alphabet size.
#[derive(Debug, Clone)]
pub struct CandidateEnumerator {
    base_word: String,
    separator: String,
    alphabet: Arc<[String]>,
    suffix_length: u8,
    len: usize,
}

impl CandidateEnumerator {
    /// Creates an enumerator
    ///
    /// # Errors
    ///
    /// Returns `JobError::InvalidArgument` when `suffix_length` is not 1 or 2,
    /// the alphabet is empty, or the base word is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use autosuggest_explorer::CandidateEnumerator;
    ///
    /// let alphabet = vec!["x".to_string(), "y".to_string()];
    /// let candidates = CandidateEnumerator::new("a", 1, &alphabet, "").unwrap();
    /// let texts: Vec<String> = candidates.iter().map(|c| c.text).collect();
    /// assert_eq!(texts, vec!["ax", "ay"]);
    /// ```
    pub fn new(
        base_word: &str,
        suffix_length: u8,
        alphabet: &[String],
        separator: &str,
    ) -> JobResult<Self> {
        if !(1..=2).contains(&suffix_length) {
            return Err(JobError::InvalidArgument(format!(
                "suffix length must be 1 or 2, got {}",
                suffix_length
            )));
        }

        if alphabet.is_empty() {
            return Err(JobError::InvalidArgument(
                "alphabet must not be empty".to_string(),
            ));
        }

        let base_word = base_word.trim();
        if base_word.is_empty() {
            return Err(JobError::InvalidArgument(
                "base word must not be blank".to_string(),
            ));
        }

        let len = alphabet.len().pow(u32::from(suffix_length));

        Ok(Self {
            base_word: base_word.to_string(),
            separator: separator.to_string(),
            alphabet: alphabet.to_vec().into(),
            suffix_length,
            len,
        })
    }

    /// Total number of candidates
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for a constructed enumerator; provided for completeness
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn base_word(&self) -> &str {
        &self.base_word
    }

    pub fn suffix_length(&self) -> u8 {
        self.suffix_length
    }

    /// Returns the candidate at `index` without generating earlier ones
    pub fn get(&self, index: usize) -> Option<Candidate> {
        if index >= self.len {
            return None;
        }

        let n = self.alphabet.len();
        let suffix = match self.suffix_length {
            1 => self.alphabet[index].clone(),
            _ => {
                let first = &self.alphabet[index / n];
                let second = &self.alphabet[index % n];
                format!("{}{}", first, second)
            }
        };

        Some(Candidate {
            index,
            text: format!("{}{}{}", self.base_word, self.separator, suffix),
            suffix,
        })
    }

    /// Iterates over every candidate in order
    pub fn iter(&self) -> Candidates<'_> {
        self.iter_from(0)
    }

    /// Iterates from `start` to the end of the sequence
    pub fn iter_from(&self, start: usize) -> Candidates<'_> {
        Candidates {
            enumerator: self,
            position: start.min(self.len),
        }
    }
}

/// Iterator over a [`CandidateEnumerator`]
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    enumerator: &'a CandidateEnumerator,
    position: usize,
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.enumerator.get(self.position)?;
        self.position += 1;
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.enumerator.len - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}

impl FusedIterator for Candidates<'_> {}
