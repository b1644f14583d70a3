use shiori_core::language::{DeconjugationResult, Deconjugator};

/// i-column → u-column endings of godan verbs (書き → 書く)
const GODAN_I_TO_U: [(&str, &str); 9] = [
    ("い", "う"),
    ("き", "く"),
    ("ぎ", "ぐ"),
    ("し", "す"),
    ("ち", "つ"),
    ("に", "ぬ"),
    ("び", "ぶ"),
    ("み", "む"),
    ("り", "る"),
];

/// a-column → u-column endings of godan verbs (書か → 書く)
const GODAN_A_TO_U: [(&str, &str); 9] = [
    ("わ", "う"),
    ("か", "く"),
    ("が", "ぐ"),
    ("さ", "す"),
    ("た", "つ"),
    ("な", "ぬ"),
    ("ば", "ぶ"),
    ("ま", "む"),
    ("ら", "る"),
];

/// e-column → u-column endings of godan potential verbs (書け → 書く)
const GODAN_E_TO_U: [(&str, &str); 9] = [
    ("え", "う"),
    ("け", "く"),
    ("げ", "ぐ"),
    ("せ", "す"),
    ("て", "つ"),
    ("ね", "ぬ"),
    ("べ", "ぶ"),
    ("め", "む"),
    ("れ", "る"),
];

/// o-column → u-column endings of godan volitional forms (書こう → 書く)
const GODAN_O_TO_U: [(&str, &str); 9] = [
    ("お", "う"),
    ("こ", "く"),
    ("ご", "ぐ"),
    ("そ", "す"),
    ("と", "つ"),
    ("の", "ぬ"),
    ("ぼ", "ぶ"),
    ("も", "む"),
    ("ろ", "る"),
];

/// Suffix-rewrite rules for common verb and adjective inflections.
///
/// Candidates are returned in rule order; callers keep the first one that is
/// a known word.
pub struct JapaneseDeconjugator;

impl Default for JapaneseDeconjugator {
    fn default() -> Self {
        Self::new()
    }
}

impl JapaneseDeconjugator {
    pub fn new() -> Self {
        Self
    }

    /// Deconjugate a word to its possible base forms
    pub fn deconjugate(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        // Try て-form deconjugation
        results.extend(self.deconjugate_te_form(word));

        // Try た-form deconjugation
        results.extend(self.deconjugate_ta_form(word));

        // Try ます-form deconjugation
        results.extend(self.deconjugate_masu_form(word));

        // Try ている-form deconjugation
        results.extend(self.deconjugate_teiru_form(word));

        // Try negative forms
        results.extend(self.deconjugate_negative(word));

        // Try たい-forms
        results.extend(self.deconjugate_desire(word));

        // Try potential and passive forms
        results.extend(self.deconjugate_potential(word));

        // Try volitional forms
        results.extend(self.deconjugate_volitional(word));

        // Try i-adjective conjugations
        results.extend(self.deconjugate_i_adjective(word));

        results
    }

    fn push(results: &mut Vec<DeconjugationResult>, base: String, kind: &str, confidence: f32) {
        if base.is_empty() || results.iter().any(|r| r.base_form == base) {
            return;
        }
        results.push(DeconjugationResult {
            base_form: base,
            conjugation_type: kind.to_string(),
            confidence,
        });
    }

    /// Deconjugate て/で-form verbs
    fn deconjugate_te_form(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        // Irregular: して → する, 来て → 来る
        if word == "して" {
            Self::push(&mut results, "する".to_string(), "irregular verb する, te-form", 1.0);
        }
        if word == "来て" || word == "きて" {
            Self::push(&mut results, "来る".to_string(), "irregular verb 来る, te-form", 1.0);
        }
        // 勉強して → 勉強する
        if let Some(noun) = word.strip_suffix("して").filter(|n| !n.is_empty()) {
            Self::push(&mut results, format!("{noun}する"), "suru verb, te-form", 0.6);
        }

        if let Some(stem) = word.strip_suffix("て") {
            // 待って → 待つ/買う/取る
            if let Some(base) = stem.strip_suffix("っ") {
                for ending in ["う", "つ", "る"] {
                    Self::push(&mut results, format!("{base}{ending}"), "godan verb, te-form", 0.6);
                }
            }
            // 書いて → 書く
            if let Some(base) = stem.strip_suffix("い") {
                Self::push(&mut results, format!("{base}く"), "godan verb, te-form", 0.7);
            }
            // 話して → 話す
            if let Some(base) = stem.strip_suffix("し") {
                Self::push(&mut results, format!("{base}す"), "godan verb, te-form", 0.7);
            }
            // 行って → 行く
            if stem == "行っ" || stem == "いっ" {
                Self::push(&mut results, format!("{}く", &stem[..stem.len() - "っ".len()]), "godan verb 行く, te-form", 0.8);
            }

            // Ichidan verbs (食べて → 食べる)
            Self::push(&mut results, format!("{stem}る"), "ichidan verb, te-form", 0.8);
        }

        if let Some(stem) = word.strip_suffix("で") {
            // 読んで → 読む/遊ぶ/死ぬ
            if let Some(base) = stem.strip_suffix("ん") {
                for ending in ["む", "ぶ", "ぬ"] {
                    Self::push(&mut results, format!("{base}{ending}"), "godan verb, te-form", 0.6);
                }
            }
            // 泳いで → 泳ぐ
            if let Some(base) = stem.strip_suffix("い") {
                Self::push(&mut results, format!("{base}ぐ"), "godan verb, te-form", 0.7);
            }
        }

        results
    }

    /// Deconjugate た-form verbs
    fn deconjugate_ta_form(&self, word: &str) -> Vec<DeconjugationResult> {
        // Same stems as the て-form
        if let Some(stem) = word.strip_suffix("た") {
            return self.relabel(self.deconjugate_te_form(&format!("{stem}て")), "past");
        }
        if let Some(stem) = word.strip_suffix("だ") {
            return self.relabel(self.deconjugate_te_form(&format!("{stem}で")), "past");
        }
        Vec::new()
    }

    /// Deconjugate ます-form verbs
    fn deconjugate_masu_form(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        let Some(stem) = ["ませんでした", "ましょう", "ました", "ません", "ます"]
            .into_iter()
            .find_map(|suffix| word.strip_suffix(suffix))
        else {
            return results;
        };

        // します → する, 来ます → 来る
        if stem == "し" {
            Self::push(&mut results, "する".to_string(), "irregular verb する, masu-form", 0.8);
        }
        if stem == "来" || stem == "き" {
            Self::push(&mut results, "来る".to_string(), "irregular verb 来る, masu-form", 0.8);
        }

        // Ichidan verbs (食べます → 食べる)
        Self::push(&mut results, format!("{stem}る"), "ichidan verb, masu-form", 0.8);

        // Godan verbs - restore u-column (書きます → 書く)
        for (i_sound, u_sound) in GODAN_I_TO_U {
            if let Some(base) = stem.strip_suffix(i_sound) {
                Self::push(&mut results, format!("{base}{u_sound}"), "godan verb, masu-form", 0.8);
            }
        }

        results
    }

    /// Deconjugate ている/ていた-form verbs, including the contracted てる
    fn deconjugate_teiru_form(&self, word: &str) -> Vec<DeconjugationResult> {
        for (suffix, te) in [
            ("ている", "て"),
            ("ていた", "て"),
            ("てる", "て"),
            ("てた", "て"),
            ("でいる", "で"),
            ("でいた", "で"),
            ("でる", "で"),
            ("でた", "で"),
        ] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return self.relabel(self.deconjugate_te_form(&format!("{stem}{te}")), "continuous");
            }
        }
        Vec::new()
    }

    /// Deconjugate negative forms
    fn deconjugate_negative(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        // ない-form (書かない → 書く)
        let Some(stem) = word
            .strip_suffix("なかった")
            .or_else(|| word.strip_suffix("ない"))
        else {
            return results;
        };

        // しない → する, 来ない → 来る
        if stem == "し" {
            Self::push(&mut results, "する".to_string(), "irregular verb する, negative", 0.8);
        }
        if stem == "来" || stem == "こ" {
            Self::push(&mut results, "来る".to_string(), "irregular verb 来る, negative", 0.8);
        }

        // Godan verbs - a-column to u-column
        for (a_sound, u_sound) in GODAN_A_TO_U {
            if let Some(base) = stem.strip_suffix(a_sound) {
                Self::push(&mut results, format!("{base}{u_sound}"), "godan verb, negative", 0.8);
            }
        }

        // Ichidan verbs (食べない → 食べる)
        Self::push(&mut results, format!("{stem}る"), "ichidan verb, negative", 0.8);

        results
    }

    /// Deconjugate たい/たかった (desire) forms
    fn deconjugate_desire(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        let Some(stem) = ["たくない", "たかった", "たい"]
            .into_iter()
            .find_map(|suffix| word.strip_suffix(suffix))
        else {
            return results;
        };

        Self::push(&mut results, format!("{stem}る"), "ichidan verb, desire", 0.7);
        for (i_sound, u_sound) in GODAN_I_TO_U {
            if let Some(base) = stem.strip_suffix(i_sound) {
                Self::push(&mut results, format!("{base}{u_sound}"), "godan verb, desire", 0.7);
            }
        }

        results
    }

    /// Deconjugate potential and passive forms
    fn deconjugate_potential(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        // 食べられる → 食べる
        if let Some(stem) = word.strip_suffix("られる") {
            Self::push(&mut results, format!("{stem}る"), "ichidan verb, potential/passive", 0.7);
        }
        // 書かれる → 書く
        if let Some(stem) = word.strip_suffix("れる") {
            for (a_sound, u_sound) in GODAN_A_TO_U {
                if let Some(base) = stem.strip_suffix(a_sound) {
                    Self::push(&mut results, format!("{base}{u_sound}"), "godan verb, passive", 0.6);
                }
            }
        }
        // 書ける → 書く
        if let Some(stem) = word.strip_suffix("る") {
            for (e_sound, u_sound) in GODAN_E_TO_U {
                if let Some(base) = stem.strip_suffix(e_sound) {
                    Self::push(&mut results, format!("{base}{u_sound}"), "godan verb, potential", 0.5);
                }
            }
        }

        results
    }

    /// Deconjugate volitional forms
    fn deconjugate_volitional(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        // 食べよう → 食べる
        if let Some(stem) = word.strip_suffix("よう") {
            Self::push(&mut results, format!("{stem}る"), "ichidan verb, volitional", 0.7);
        }
        // 書こう → 書く
        if let Some(stem) = word.strip_suffix("う") {
            for (o_sound, u_sound) in GODAN_O_TO_U {
                if let Some(base) = stem.strip_suffix(o_sound) {
                    Self::push(&mut results, format!("{base}{u_sound}"), "godan verb, volitional", 0.6);
                }
            }
        }

        results
    }

    /// Deconjugate i-adjective forms
    fn deconjugate_i_adjective(&self, word: &str) -> Vec<DeconjugationResult> {
        let mut results = Vec::new();

        for (suffix, kind) in [
            ("くなかった", "i-adjective, past negative"),
            ("くない", "i-adjective, negative"),
            ("かった", "i-adjective, past"),
            ("くて", "i-adjective, te-form"),
            ("ければ", "i-adjective, conditional"),
            ("く", "i-adjective, adverbial"),
            ("さ", "i-adjective, nominal"),
        ] {
            if let Some(stem) = word.strip_suffix(suffix) {
                Self::push(&mut results, format!("{stem}い"), kind, 0.8);
            }
        }

        results
    }

    fn relabel(&self, results: Vec<DeconjugationResult>, label: &str) -> Vec<DeconjugationResult> {
        results
            .into_iter()
            .map(|mut r| {
                r.conjugation_type = format!("{}, {}", r.conjugation_type, label);
                r
            })
            .collect()
    }
}

impl Deconjugator for JapaneseDeconjugator {
    fn deconjugate(&self, word: &str) -> Vec<DeconjugationResult> {
        JapaneseDeconjugator::deconjugate(self, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases(word: &str) -> Vec<String> {
        JapaneseDeconjugator::new()
            .deconjugate(word)
            .into_iter()
            .map(|r| r.base_form)
            .collect()
    }

    fn yields(word: &str, base: &str) -> bool {
        bases(word).iter().any(|b| b == base)
    }

    #[test]
    fn ichidan_past_rewrites_keta_to_keru() {
        assert!(yields("ばけた", "ばける"));
        assert!(yields("借りた", "借りる"));
        assert!(yields("食べて", "食べる"));
    }

    #[test]
    fn godan_te_and_ta_forms() {
        assert!(yields("書いて", "書く"));
        assert!(yields("書いた", "書く"));
        assert!(yields("待った", "待つ"));
        assert!(yields("話した", "話す"));
        assert!(yields("読んで", "読む"));
        assert!(yields("遊んだ", "遊ぶ"));
        assert!(yields("泳いだ", "泳ぐ"));
        assert!(yields("行った", "行く"));
    }

    #[test]
    fn polite_negative_and_continuous_forms() {
        assert!(yields("書きます", "書く"));
        assert!(yields("食べませんでした", "食べる"));
        assert!(yields("書かない", "書く"));
        assert!(yields("書かなかった", "書く"));
        assert!(yields("読んでいる", "読む"));
        assert!(yields("食べてた", "食べる"));
    }

    #[test]
    fn irregular_verbs() {
        assert!(yields("した", "する"));
        assert!(yields("しない", "する"));
        assert!(yields("来ます", "来る"));
        assert!(yields("勉強して", "勉強する"));
    }

    #[test]
    fn adjectives_potential_and_volitional() {
        assert!(yields("高かった", "高い"));
        assert!(yields("高くない", "高い"));
        assert!(yields("高くて", "高い"));
        assert!(yields("食べられる", "食べる"));
        assert!(yields("書ける", "書く"));
        assert!(yields("書こう", "書く"));
        assert!(yields("食べたい", "食べる"));
    }

    #[test]
    fn candidates_are_unique_and_dictionary_words_yield_little() {
        let candidates = bases("待って");
        let mut deduped = candidates.clone();
        deduped.dedup();
        assert_eq!(candidates.len(), deduped.len());

        assert!(bases("本").is_empty());
    }
}
