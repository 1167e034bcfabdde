//! # VADER-style analyzer
//!
//! Rule-based compound polarity in the manner of VADER (Hutto & Gilbert,
//! 2014): lexicon valences adjusted by boosters, capitalisation, negation,
//! contrastive "but" and punctuation, then squashed into [-1, 1].
//!
//! Runs over a caller-supplied [`Lexicon`]; the default scorer is
//! [`StandardVader`](super::StandardVader).

use super::lexicon::Lexicon;
use super::PolarityScorer;

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
/// Normalisation constant of the compound score.
const ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "ain't", "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't",
    "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
    "don't", "hadn't", "hasn't", "haven't", "isn't", "mightn't", "mustn't",
    "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without",
    "wont", "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably",
    "decidedly", "deeply", "enormously", "entirely", "especially",
    "exceptionally", "extremely", "fabulously", "fully", "greatly", "highly",
    "hugely", "incredibly", "intensely", "majorly", "more", "most",
    "particularly", "purely", "quite", "really", "remarkably", "so",
    "substantially", "sharply", "thoroughly", "totally", "tremendously",
    "unbelievably", "unusually", "utterly", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "less", "little", "marginally",
    "occasionally", "partly", "scarcely", "slightly", "somewhat", "sorta",
];

/// Compound-score analyzer backed by a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct VaderAnalyzer {
    lexicon: Lexicon,
}

impl VaderAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        VaderAnalyzer { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compound polarity of `text` in [-1, 1]; 0.0 when no token carries
    /// sentiment.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return 0.0;
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = is_cap_diff(&tokens);

        let mut sentiments: Vec<f64> = lowered
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if booster(word).is_some() {
                    0.0
                } else {
                    self.valence_at(i, &tokens, &lowered, cap_diff)
                }
            })
            .collect();

        but_check(&lowered, &mut sentiments);

        let mut sum: f64 = sentiments.iter().sum();
        if sum == 0.0 {
            return 0.0;
        }
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else {
            sum -= emphasis;
        }
        normalize(sum)
    }

    fn valence_at(&self, i: usize, tokens: &[&str], lowered: &[String], cap_diff: bool) -> f64 {
        let Some(mut valence) = self.lexicon.valence(&lowered[i]) else {
            return 0.0;
        };

        if cap_diff && is_upper(tokens[i]) {
            valence += C_INCR.copysign(valence);
        }

        for back in 0..3 {
            if i <= back {
                break;
            }
            let prev = i - (back + 1);
            if self.lexicon.contains(&lowered[prev]) {
                continue;
            }
            let mut scalar = scalar_inc_dec(tokens[prev], &lowered[prev], valence, cap_diff);
            scalar *= match back {
                1 => 0.95,
                2 => 0.9,
                _ => 1.0,
            };
            valence += scalar;
            valence = negation_check(valence, lowered, back, i);
        }

        least_check(valence, lowered, i)
    }
}

impl PolarityScorer for VaderAnalyzer {
    fn compound(&self, text: &str) -> anyhow::Result<f64> {
        Ok(self.polarity(text))
    }
}

// -- Rules --

/// Whitespace tokens with surrounding punctuation stripped; single
/// characters are dropped.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|tok| {
            let stripped = tok.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                tok
            } else {
                stripped
            }
        })
        .filter(|tok| tok.chars().count() > 1)
        .collect()
}

fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
}

/// True when some but not all tokens are in capitals.
fn is_cap_diff(tokens: &[&str]) -> bool {
    let upper = tokens.iter().filter(|t| is_upper(t)).count();
    upper > 0 && upper < tokens.len()
}

fn booster(word: &str) -> Option<f64> {
    if BOOSTERS_UP.contains(&word) {
        Some(B_INCR)
    } else if BOOSTERS_DOWN.contains(&word) {
        Some(B_DECR)
    } else {
        None
    }
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// Booster contribution of `word` to a neighbouring valence.
fn scalar_inc_dec(word: &str, lowered: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(lowered) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_upper(word) {
        scalar += C_INCR.copysign(valence);
    }
    scalar
}

fn negation_check(valence: f64, words: &[String], back: usize, i: usize) -> f64 {
    let w = |offset: usize| words[i - offset].as_str();
    match back {
        0 => {
            if is_negation(w(1)) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if w(2) == "never" && matches!(w(1), "so" | "this") {
                return valence * 1.25;
            } else if w(2) == "without" && w(1) == "doubt" {
                return valence;
            } else if is_negation(w(2)) {
                return valence * N_SCALAR;
            }
        }
        _ => {
            if w(3) == "never" && (matches!(w(2), "so" | "this") || matches!(w(1), "so" | "this")) {
                return valence * 1.25;
            } else if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") {
                return valence;
            } else if is_negation(w(3)) {
                return valence * N_SCALAR;
            }
        }
    }
    valence
}

/// "least good" flips, "at least" / "very least" do not.
fn least_check(valence: f64, words: &[String], i: usize) -> f64 {
    if i >= 1 && words[i - 1] == "least" {
        let qualified = i >= 2 && matches!(words[i - 2].as_str(), "at" | "very");
        if !qualified {
            return valence * N_SCALAR;
        }
    }
    valence
}

/// Sentiment before "but" is damped, after it amplified.
fn but_check(words: &[String], sentiments: &mut [f64]) {
    if let Some(bi) = words.iter().position(|w| w == "but") {
        for (idx, s) in sentiments.iter_mut().enumerate() {
            if idx < bi {
                *s *= 0.5;
            } else if idx > bi {
                *s *= 1.5;
            }
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FIXTURE: &str = "\
good\t1.9
great\t3.1
best\t3.2
excellent\t2.7
strong\t2.3
robust\t1.4
profits\t1.2
recovery\t1.4
success\t2.7
win\t2.8
boom\t1.5
bad\t-2.5
bleak\t-2.4
collapse\t-2.2
crisis\t-3.1
recession\t-1.9
disaster\t-3.1
catastrophe\t-3.4
panic\t-3.0
";

    fn analyzer() -> VaderAnalyzer {
        VaderAnalyzer::new(Lexicon::from_reader(FIXTURE.as_bytes()).unwrap())
    }

    #[test]
    fn neutral_text_scores_zero() {
        assert_eq!(analyzer().polarity("The committee met on Tuesday."), 0.0);
        assert_eq!(analyzer().polarity(""), 0.0);
    }

    #[test]
    fn single_word_matches_vader_normalisation() {
        // "good" = 1.9 → 1.9 / sqrt(1.9² + 15)
        assert_abs_diff_eq!(analyzer().polarity("good results"), 0.4404, epsilon = 1e-4);
    }

    #[test]
    fn polarity_direction() {
        let a = analyzer();
        assert!(a.polarity("Strong profits and a robust recovery") > 0.5);
        assert!(a.polarity("Banks collapse as crisis deepens into recession") < -0.5);
    }

    #[test]
    fn negation_flips_sign() {
        let a = analyzer();
        assert!(a.polarity("results were good") > 0.0);
        assert!(a.polarity("results were not good") < 0.0);
        assert!(a.polarity("results weren't good") < 0.0);
    }

    #[test]
    fn boosters_and_caps_amplify() {
        let a = analyzer();
        let plain = a.polarity("a good quarter");
        assert!(a.polarity("a very good quarter") > plain);
        assert!(a.polarity("a slightly good quarter") < plain);
        assert!(a.polarity("a GOOD quarter") > plain);
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        let a = analyzer();
        assert!(a.polarity("profits were good but the outlook is bleak") < 0.0);
    }

    #[test]
    fn exclamations_amplify() {
        let a = analyzer();
        assert!(a.polarity("good news!!!") > a.polarity("good news"));
        assert!(a.polarity("bad news!!!") < a.polarity("bad news"));
    }

    #[test]
    fn compound_stays_in_range() {
        let a = analyzer();
        let euphoric = "GREAT BEST excellent success win win win boom!!!! ".repeat(50);
        let dire = "crisis collapse disaster catastrophe panic!!! ".repeat(50);
        for text in [euphoric.as_str(), dire.as_str()] {
            let s = a.polarity(text);
            assert!((-1.0..=1.0).contains(&s), "{s}");
        }
    }

    #[test]
    fn deterministic() {
        let a = analyzer();
        let text = "Markets tumble as Lehman files for bankruptcy";
        assert_eq!(a.polarity(text), a.polarity(text));
    }

    #[test]
    fn tokenizer_strips_punctuation() {
        assert_eq!(tokenize("Hello, world! a :)"), vec!["Hello", "world", ":)"]);
    }
}
