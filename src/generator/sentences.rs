use rand::rngs::SmallRng;

use crate::generator::{GenerateOptions, LanguagePack, TextGenerator, pick_without_repeats};

/// Whole sentences from the pack, already punctuated.
pub struct SentenceGenerator<'a> {
    pack: &'a LanguagePack,
    rng: SmallRng,
}

impl<'a> SentenceGenerator<'a> {
    pub fn new(pack: &'a LanguagePack, rng: SmallRng) -> Self {
        Self { pack, rng }
    }
}

impl TextGenerator for SentenceGenerator<'_> {
    fn generate(&mut self, options: &GenerateOptions) -> String {
        let count = options.length.max(1);
        pick_without_repeats(&self.pack.sentences, count, &mut self.rng).join(" ")
    }
}
