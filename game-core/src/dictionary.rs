use anyhow::{Result, anyhow, bail};
use game_types::WordPair;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

const BUILTIN_PAIRS: &str = include_str!("../data/word_pairs.txt");

/// How many of the latest pairs stay excluded once the whole table has been played.
pub const RECENT_PAIR_WINDOW: usize = 10;

/// Lowercased, trimmed form used for every word comparison.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct WordDictionary {
    pairs: Vec<WordPair>,
}

impl WordDictionary {
    /// The curated table shipped with the game.
    pub fn builtin() -> Self {
        Self::from_pair_list(BUILTIN_PAIRS).expect("bundled word pair table is valid")
    }

    /// Parse a `civilian | undercover` list, one pair per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_pair_list(pair_list: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        let mut seen_civilians = HashSet::new();

        for (line_number, line) in pair_list.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (civilian, undercover) = line
                .split_once('|')
                .ok_or_else(|| anyhow!("line {}: expected `civilian | undercover`", line_number + 1))?;
            let civilian = civilian.trim();
            let undercover = undercover.trim();

            if civilian.is_empty() || undercover.is_empty() {
                bail!("line {}: both words are required", line_number + 1);
            }
            if normalize_word(civilian) == normalize_word(undercover) {
                bail!("line {}: `{}` is paired with itself", line_number + 1, civilian);
            }
            if !seen_civilians.insert(normalize_word(civilian)) {
                bail!("line {}: civilian word `{}` is listed twice", line_number + 1, civilian);
            }

            pairs.push(WordPair::new(civilian, undercover));
        }

        if pairs.is_empty() {
            bail!("No word pairs available");
        }

        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    /// Draw a pair, avoiding the civilian words already in `used_pairs`.
    ///
    /// Once every pair has been used only the last [`RECENT_PAIR_WINDOW`] stay
    /// excluded, and if even that empties the table any pair may repeat.
    pub fn draw_word_pair<R: Rng + ?Sized>(&self, used_pairs: &[WordPair], rng: &mut R) -> Result<WordPair> {
        let fresh = self.excluding(used_pairs);
        if let Some(pair) = fresh.choose(rng) {
            return Ok((*pair).clone());
        }

        let recent_start = used_pairs.len().saturating_sub(RECENT_PAIR_WINDOW);
        let reusable = self.excluding(&used_pairs[recent_start..]);
        if let Some(pair) = reusable.choose(rng) {
            tracing::debug!("word pairs exhausted, reusing outside the last {}", RECENT_PAIR_WINDOW);
            return Ok((*pair).clone());
        }

        tracing::debug!("word pairs exhausted, drawing from the full table");
        self.pairs
            .choose(rng)
            .cloned()
            .ok_or_else(|| anyhow!("No word pairs available"))
    }

    fn excluding(&self, used_pairs: &[WordPair]) -> Vec<&WordPair> {
        let used: HashSet<&str> = used_pairs.iter().map(|p| p.civilian.as_str()).collect();
        self.pairs
            .iter()
            .filter(|pair| !used.contains(pair.civilian.as_str()))
            .collect()
    }
}

impl Default for WordDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_dictionary() -> WordDictionary {
        WordDictionary::from_pair_list("Chat | Chien\nLion | Tigre\nPomme | Poire").unwrap()
    }

    #[test]
    fn test_builtin_table_parses() {
        let parsed = WordDictionary::from_pair_list(BUILTIN_PAIRS);
        assert!(parsed.is_ok(), "builtin table is invalid: {:?}", parsed.err());
        let dictionary = WordDictionary::builtin();
        assert!(dictionary.len() >= 100);
        assert!(
            dictionary
                .pairs()
                .iter()
                .all(|p| normalize_word(&p.civilian) != normalize_word(&p.undercover))
        );
    }

    #[test]
    fn test_comments_and_whitespace() {
        let list = "# Animals\n\n  Chat |  Chien  \n\t# more\nLion|Tigre\n";
        let dictionary = WordDictionary::from_pair_list(list).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.pairs()[0], WordPair::new("Chat", "Chien"));
        assert_eq!(dictionary.pairs()[1], WordPair::new("Lion", "Tigre"));
    }

    #[test]
    fn test_rejects_malformed_lists() {
        assert!(WordDictionary::from_pair_list("").is_err());
        assert!(WordDictionary::from_pair_list("# only a comment").is_err());

        let err = WordDictionary::from_pair_list("Chat Chien").unwrap_err();
        assert!(err.to_string().contains("line 1"));

        let err = WordDictionary::from_pair_list("Chat | chat ").unwrap_err();
        assert!(err.to_string().contains("paired with itself"));

        let err = WordDictionary::from_pair_list("Chat | Chien\nchat | Tigre").unwrap_err();
        assert!(err.to_string().contains("listed twice"));

        assert!(WordDictionary::from_pair_list("Chat |").is_err());
    }

    #[test]
    fn test_draw_avoids_used_pairs() {
        let dictionary = small_dictionary();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let used = vec![WordPair::new("Chat", "Chien"), WordPair::new("Lion", "Tigre")];

        for _ in 0..20 {
            let pair = dictionary.draw_word_pair(&used, &mut rng).unwrap();
            assert_eq!(pair.civilian, "Pomme");
        }
    }

    #[test]
    fn test_draw_falls_back_to_recent_window() {
        let dictionary = small_dictionary();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // Everything was used, and only Pomme is among the most recent ten.
        let mut used = vec![WordPair::new("Chat", "Chien"), WordPair::new("Lion", "Tigre")];
        used.extend((0..9).map(|i| WordPair::new(format!("Filler{}", i), "x")));
        used.push(WordPair::new("Pomme", "Poire"));

        for _ in 0..20 {
            let pair = dictionary.draw_word_pair(&used, &mut rng).unwrap();
            assert_ne!(pair.civilian, "Pomme");
        }
    }

    #[test]
    fn test_draw_falls_back_to_full_table() {
        let dictionary = small_dictionary();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let used = dictionary.pairs().to_vec();

        let pair = dictionary.draw_word_pair(&used, &mut rng).unwrap();
        assert!(dictionary.pairs().contains(&pair));
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Café "), "café");
        assert_eq!(normalize_word("IPHONE"), "iphone");
    }
}
