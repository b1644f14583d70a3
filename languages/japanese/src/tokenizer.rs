use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use shiori_core::dictionary::Lexicon;
use shiori_core::language::{Deconjugator, Morpheme, TokenizeError, Tokenizer};

use crate::deconjugator::JapaneseDeconjugator;

/// Longest surface tried when segmenting
const MAX_WORD_CHARS: usize = 10;

/// Greedy dictionary segmentation.
///
/// At each position the longest prefix that is a known word, or deconjugates
/// to one, becomes a morpheme. Characters between known words are kept
/// together as one unknown morpheme.
pub struct SegmentingTokenizer {
    lexicon: Arc<dyn Lexicon>,
    deconjugator: JapaneseDeconjugator,
}

impl SegmentingTokenizer {
    pub fn new(lexicon: Arc<dyn Lexicon>) -> Self {
        Self {
            lexicon,
            deconjugator: JapaneseDeconjugator::new(),
        }
    }

    fn lookup(&self, surface: &str) -> Option<String> {
        if self.lexicon.contains(surface) {
            return Some(surface.to_string());
        }

        self.deconjugator
            .deconjugate(surface)
            .into_iter()
            .map(|candidate| candidate.base_form)
            .find(|base| self.lexicon.contains(base))
    }
}

impl Tokenizer for SegmentingTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError> {
        let chars: Vec<char> = text.chars().collect();
        let mut morphemes = Vec::new();
        let mut unknown = String::new();
        let mut i = 0;

        while i < chars.len() {
            let longest = chars.len().saturating_sub(i).min(MAX_WORD_CHARS);
            let found = (1..=longest).rev().find_map(|len| {
                let surface: String = chars[i..i + len].iter().collect();
                self.lookup(&surface).map(|base| (len, Morpheme::new(surface, Some(base))))
            });

            match found {
                Some((len, morpheme)) => {
                    if !unknown.is_empty() {
                        morphemes.push(Morpheme::new(std::mem::take(&mut unknown), None));
                    }
                    morphemes.push(morpheme);
                    i += len;
                }
                None => {
                    unknown.push(chars[i]);
                    i += 1;
                }
            }
        }

        if !unknown.is_empty() {
            morphemes.push(Morpheme::new(unknown, None));
        }

        Ok(morphemes)
    }
}

/// External analyzer producing MeCab-style output.
///
/// Each line is `surface\tfeature,feature,...` with the dictionary form in the
/// seventh feature; `EOS` ends the sentence.
pub struct CommandTokenizer {
    command: String,
    args: Vec<String>,
}

/// Index of the base form in a MeCab (IPADIC) feature list
const BASE_FORM_FEATURE: usize = 6;

impl CommandTokenizer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn parse_output(output: &str) -> Vec<Morpheme> {
        output
            .lines()
            .take_while(|line| line.trim() != "EOS")
            .filter_map(|line| {
                let (surface, features) = line.split_once('\t')?;
                let base = features
                    .split(',')
                    .nth(BASE_FORM_FEATURE)
                    .map(str::trim)
                    .filter(|base| !base.is_empty() && *base != "*")
                    .map(str::to_string);
                Some(Morpheme::new(surface, base))
            })
            .collect()
    }
}

impl Tokenizer for CommandTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>, TokenizeError> {
        let spawn_error = |source| TokenizeError::Spawn {
            command: self.command.clone(),
            source,
        };

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "{text}").map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        if !output.status.success() {
            return Err(TokenizeError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| TokenizeError::InvalidOutput)?;
        let morphemes = Self::parse_output(&stdout);
        tracing::debug!("{} segmented {:?} into {} morphemes", self.command, text, morphemes.len());
        Ok(morphemes)
    }
}
