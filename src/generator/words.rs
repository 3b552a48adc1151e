use rand::rngs::SmallRng;

use crate::generator::numbers::apply_numbers;
use crate::generator::punctuate::apply_punctuation;
use crate::generator::{GenerateOptions, LanguagePack, TextGenerator, pick_without_repeats};

pub struct WordGenerator<'a> {
    pack: &'a LanguagePack,
    rng: SmallRng,
}

impl<'a> WordGenerator<'a> {
    pub fn new(pack: &'a LanguagePack, rng: SmallRng) -> Self {
        Self { pack, rng }
    }
}

impl TextGenerator for WordGenerator<'_> {
    fn generate(&mut self, options: &GenerateOptions) -> String {
        let count = options.length.max(1);
        let mut text = pick_without_repeats(&self.pack.words, count, &mut self.rng).join(" ");
        if options.numbers {
            text = apply_numbers(&text, self.pack.language, &mut self.rng);
        }
        if options.punctuation {
            text = apply_punctuation(&text, self.pack.language, &mut self.rng);
        }
        text
    }
}
