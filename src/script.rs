//! Script library: the fixed, ordered list of strings the widget cycles through.

use crate::error::TypewriterError;

/// The messages shown when no scripts are configured.
pub const DEFAULT_SCRIPTS: &[&str] = &[
    "Welcome to My Awesome Website!",
    "I build clean & modern websites.",
    "Let's create something amazing!",
    "Ready to start your project?",
    "Contact me for a free consultation!",
];

/// A non-empty list of non-empty display strings.
///
/// Entries are stored as `char` vectors so the animation can index by
/// character without re-walking UTF-8 on every tick.
#[derive(Debug, Clone)]
pub struct ScriptLibrary {
    entries: Vec<Vec<char>>,
}

impl ScriptLibrary {
    pub fn new<S: AsRef<str>>(scripts: &[S]) -> Result<Self, TypewriterError> {
        if scripts.is_empty() {
            return Err(TypewriterError::EmptyScript);
        }
        let mut entries = Vec::with_capacity(scripts.len());
        for (index, s) in scripts.iter().enumerate() {
            let chars: Vec<char> = s.as_ref().chars().collect();
            if chars.is_empty() {
                return Err(TypewriterError::EmptyScriptEntry { index });
            }
            entries.push(chars);
        }
        Ok(ScriptLibrary { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length in characters of entry `index`.
    pub fn char_len(&self, index: usize) -> usize {
        self.entries[index].len()
    }

    /// The first `count` characters of entry `index`.
    pub fn prefix(&self, index: usize, count: usize) -> String {
        self.entries[index].iter().take(count).collect()
    }

    /// The full text of entry `index`.
    pub fn text(&self, index: usize) -> String {
        self.entries[index].iter().collect()
    }

    /// Index following `index`, wrapping to 0.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_list() {
        let empty: [&str; 0] = [];
        assert_eq!(ScriptLibrary::new(&empty).unwrap_err(), TypewriterError::EmptyScript);
    }

    #[test]
    fn rejects_empty_entry() {
        let err = ScriptLibrary::new(&["ok", ""]).unwrap_err();
        assert_eq!(err, TypewriterError::EmptyScriptEntry { index: 1 });
    }

    #[test]
    fn prefix_counts_chars_not_bytes() {
        let lib = ScriptLibrary::new(&["héllo"]).unwrap();
        assert_eq!(lib.char_len(0), 5);
        assert_eq!(lib.prefix(0, 2), "hé");
    }

    #[test]
    fn next_index_wraps() {
        let lib = ScriptLibrary::new(&["a", "b", "c"]).unwrap();
        assert_eq!(lib.next_index(0), 1);
        assert_eq!(lib.next_index(2), 0);
    }
}
