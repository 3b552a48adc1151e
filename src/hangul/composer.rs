//! Built-in 2-set composer for terminals without a Korean input method.
//!
//! Keys go in, committed characters come out. The syllable still being built
//! is the preedit; it is shown at the cursor but is not part of the typed text
//! until it commits.

use crate::hangul::dubeolsik::{
    Jamo, combine_finals, combine_vowels, final_to_initial, map_key, split_final,
};
use crate::hangul::{CHOSEONG, JUNGSEONG, compose_hangul};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Empty,
    /// Initial consonant only.
    Initial,
    /// Initial + vowel.
    Open,
    /// Initial + vowel + final.
    Closed,
}

#[derive(Clone, Debug)]
pub struct Composer {
    state: State,
    cho: u32,
    jung: u32,
    jong: u32,
    /// Jamo that make up the current preedit, replayed on backspace.
    keys: Vec<Jamo>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            state: State::Empty,
            cho: 0,
            jung: 0,
            jong: 0,
            keys: Vec::new(),
        }
    }

    pub fn is_composing(&self) -> bool {
        self.state != State::Empty
    }

    pub fn preedit(&self) -> Option<char> {
        match self.state {
            State::Empty => None,
            State::Initial => Some(CHOSEONG[self.cho as usize]),
            State::Open => compose_hangul(self.cho, self.jung, 0),
            State::Closed => compose_hangul(self.cho, self.jung, self.jong),
        }
    }

    /// Feed one key. Returns the characters that became final because of it.
    /// Keys outside the layout commit the preedit and pass through unchanged.
    pub fn feed(&mut self, key: char) -> Vec<char> {
        let mut out = Vec::new();
        match map_key(key) {
            Some(jamo) => self.feed_jamo(jamo, &mut out),
            None => {
                out.extend(self.flush());
                out.push(key);
            }
        }
        out
    }

    /// Commit whatever is being composed.
    pub fn flush(&mut self) -> Option<char> {
        let c = self.preedit();
        self.clear();
        c
    }

    /// Remove the last jamo from the preedit. Returns false when there was
    /// nothing to remove, in which case the caller should delete typed text.
    pub fn backspace(&mut self) -> bool {
        if self.keys.pop().is_none() {
            return false;
        }
        let keys = std::mem::take(&mut self.keys);
        self.reset_syllable();
        let mut discarded = Vec::new();
        for jamo in keys {
            self.feed_jamo(jamo, &mut discarded);
        }
        debug_assert!(discarded.is_empty());
        true
    }

    pub fn clear(&mut self) {
        self.reset_syllable();
        self.keys.clear();
    }

    fn reset_syllable(&mut self) {
        self.state = State::Empty;
        self.cho = 0;
        self.jung = 0;
        self.jong = 0;
    }

    fn commit_into(&mut self, out: &mut Vec<char>) {
        if let Some(c) = self.preedit() {
            out.push(c);
        }
        self.reset_syllable();
        self.keys.clear();
    }

    fn start_initial(&mut self, cho: u32, jamo: Jamo) {
        self.state = State::Initial;
        self.cho = cho;
        self.keys.push(jamo);
    }

    fn feed_jamo(&mut self, jamo: Jamo, out: &mut Vec<char>) {
        match jamo {
            Jamo::Consonant { cho, jong } => self.feed_consonant(cho, jong, jamo, out),
            Jamo::Vowel { jung } => self.feed_vowel(jung, jamo, out),
        }
    }

    fn feed_consonant(&mut self, cho: u32, jong: Option<u32>, jamo: Jamo, out: &mut Vec<char>) {
        match (self.state, jong) {
            (State::Open, Some(jong)) => {
                self.jong = jong;
                self.state = State::Closed;
                self.keys.push(jamo);
            }
            (State::Closed, Some(jong)) => match combine_finals(self.jong, jong) {
                Some(combined) => {
                    self.jong = combined;
                    self.keys.push(jamo);
                }
                None => {
                    self.commit_into(out);
                    self.start_initial(cho, jamo);
                }
            },
            (State::Empty, _) => self.start_initial(cho, jamo),
            _ => {
                self.commit_into(out);
                self.start_initial(cho, jamo);
            }
        }
    }

    fn feed_vowel(&mut self, jung: u32, jamo: Jamo, out: &mut Vec<char>) {
        match self.state {
            State::Empty => out.push(JUNGSEONG[jung as usize]),
            State::Initial => {
                self.jung = jung;
                self.state = State::Open;
                self.keys.push(jamo);
            }
            State::Open => match combine_vowels(self.jung, jung) {
                Some(combined) => {
                    self.jung = combined;
                    self.keys.push(jamo);
                }
                None => {
                    self.commit_into(out);
                    out.push(JUNGSEONG[jung as usize]);
                }
            },
            State::Closed => {
                // The final consonant moves over to start the next syllable.
                let moved_key = self.keys.last().copied();
                let (remaining, next_cho) = match split_final(self.jong) {
                    Some(split) => split,
                    None => match final_to_initial(self.jong) {
                        Some(next_cho) => (0, next_cho),
                        None => {
                            self.commit_into(out);
                            out.push(JUNGSEONG[jung as usize]);
                            return;
                        }
                    },
                };
                self.jong = remaining;
                self.state = if remaining == 0 { State::Open } else { State::Closed };
                self.commit_into(out);

                self.state = State::Open;
                self.cho = next_cho;
                self.jung = jung;
                self.keys.extend(moved_key);
                self.keys.push(jamo);
            }
        }
    }
}

/// Run a whole key sequence through a fresh composer and flush at the end.
pub fn compose_keys(keys: &str) -> String {
    let mut composer = Composer::new();
    let mut out: String = keys.chars().flat_map(|k| composer.feed(k)).collect();
    out.extend(composer.flush());
    out
}
