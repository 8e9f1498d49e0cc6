use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Paragraphs this short or shorter are not worth practicing on
pub const MIN_PARAGRAPH_CHARS: usize = 10;

/// Largest text file accepted, 1 MiB
pub const MAX_TEXT_FILE_BYTES: u64 = 1024 * 1024;

const SAMPLE_TEXTS: &[&str] = &[
    "The quick brown fox jumps over the lazy dog. This pangram contains every letter of the English alphabet at least once.",
    "Pack my box with five dozen liquor jugs. How vexingly quick daft zebras jump!",
    "Sphinx of black quartz, judge my vow. The five boxing wizards jump quickly.",
    "In a hole in the ground there lived a hobbit. Not a nasty, dirty, wet hole, filled with the ends of worms and an oozy smell, nor yet a dry, bare, sandy hole with nothing in it to sit down on or to eat.",
    "It was the best of times, it was the worst of times, it was the age of wisdom, it was the age of foolishness, the epoch of belief, the epoch of incredulity.",
    "To be or not to be, that is the question. Whether 'tis nobler in the mind to suffer the slings and arrows of outrageous fortune, or to take arms against a sea of troubles.",
    "All happy families are alike; each unhappy family is unhappy in its own way. Everything was in confusion in the Oblonskys' house.",
    "Call me Ishmael. Some years ago, never mind how long precisely, having little or no money in my purse, and nothing particular to interest me on shore, I thought I would sail about a little and see the watery part of the world.",
    "function calculateFactorial(n) { if (n <= 1) return 1; return n * calculateFactorial(n - 1); }",
    "const users = await fetch('/api/users').then(response => response.json()).catch(error => console.error('Failed to fetch users:', error));",
    "class Rectangle { constructor(width, height) { this.width = width; this.height = height; } getArea() { return this.width * this.height; } }",
    "The early bird catches the worm, but the second mouse gets the cheese. Life is what happens when you're busy making other plans.",
    "Practice makes perfect, but nobody's perfect, so why practice? The only way to do great work is to love what you do.",
    "Innovation distinguishes between a leader and a follower. Stay hungry, stay foolish. Think different.",
    "The mitochondria is the powerhouse of the cell, responsible for producing ATP through cellular respiration. DNA contains the genetic instructions for all living organisms.",
    "Albert Einstein's theory of relativity revolutionized our understanding of space and time. E=mc^2 demonstrates the equivalence of mass and energy.",
    "Climate change refers to long-term shifts in global temperatures and weather patterns. Carbon dioxide levels have increased significantly since the Industrial Revolution.",
    "Effective communication is the foundation of successful teamwork. Clear objectives, regular feedback, and mutual respect create a productive work environment.",
    "Customer satisfaction is paramount to business success. Understanding client needs and exceeding expectations builds long-term relationships and drives growth.",
    "Strategic planning involves setting goals, analyzing market conditions, and allocating resources efficiently to achieve sustainable competitive advantage.",
    "Artificial intelligence and machine learning are transforming industries across the globe. Automation increases efficiency but raises questions about future employment.",
    "Social media platforms have revolutionized how we communicate, share information, and connect with others. Digital privacy has become increasingly important.",
    "Cloud computing enables scalable, on-demand access to computing resources. Cybersecurity measures protect against increasingly sophisticated threats.",
    "Four score and seven years ago our fathers brought forth on this continent, a new nation, conceived in Liberty, and dedicated to the proposition that all men are created equal.",
    "We hold these truths to be self-evident, that all men are created equal, that they are endowed by their Creator with certain unalienable Rights.",
    "Ask not what your country can do for you, ask what you can do for your country. The torch has been passed to a new generation of Americans.",
    "I think, therefore I am. The unexamined life is not worth living. The only true wisdom is in knowing you know nothing.",
    "Man is condemned to be free; because once thrown into the world, he is responsible for everything he does. Hell is other people.",
    "The meaning of life is to find your gift. The purpose of life is to give it away. Happiness is not something ready-made. It comes from your own actions.",
    "Two roads diverged in a yellow wood, and sorry I could not travel both. I took the one less traveled by, and that has made all the difference.",
    "Do not go gentle into that good night. Rage, rage against the dying of the light. The woods are lovely, dark and deep.",
    "It is a truth universally acknowledged, that a single man in possession of a good fortune, must be in want of a wife.",
    "Although the weather was terrible (cold, wet, and windy), the marathon runners persevered through the challenging conditions, demonstrating remarkable resilience and determination.",
    "The conference, which was scheduled for next Tuesday (March 15th), has been postponed indefinitely due to unforeseen circumstances; participants will be notified via email.",
    "She asked, 'Are you coming to the party tonight?' He replied, 'I'm not sure yet, it depends on whether I finish this project on time.'",
];

/// Built-in practice texts
pub fn sample_texts() -> Vec<String> {
    SAMPLE_TEXTS.iter().map(|t| t.to_string()).collect()
}

/// Splits raw file content into practice paragraphs.
///
/// Paragraphs are separated by blank lines. Lines inside a paragraph are
/// joined with single spaces and whitespace runs collapse to one space.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in normalized.lines() {
        if line.trim().is_empty() {
            paragraphs.extend(finish_paragraph(&mut current));
        } else {
            current.push(line);
        }
    }
    paragraphs.extend(finish_paragraph(&mut current));
    paragraphs
}

fn finish_paragraph(lines: &mut Vec<&str>) -> Option<String> {
    let joined = lines
        .drain(..)
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (joined.chars().count() > MIN_PARAGRAPH_CHARS).then_some(joined)
}

/// Reads a UTF-8 text file into practice paragraphs
pub fn load_custom_texts<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let size = fs::metadata(path)
        .with_context(|| format!("failed to read texts from {}", path.display()))?
        .len();
    if size > MAX_TEXT_FILE_BYTES {
        bail!(
            "{} is too large ({} bytes); text files must be at most 1MB",
            path.display(),
            size
        );
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read texts from {}", path.display()))?;

    let paragraphs = split_paragraphs(&content);
    if paragraphs.is_empty() {
        bail!(
            "{} contains no paragraph longer than {} characters",
            path.display(),
            MIN_PARAGRAPH_CHARS
        );
    }
    Ok(paragraphs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TextMode {
    #[strum(serialize = "Sample texts")]
    Sample,
    #[strum(serialize = "Custom texts")]
    Custom,
}

/// Which pool the engine is fed from
#[derive(Debug, Clone)]
pub struct TextSource {
    sample: Vec<String>,
    custom: Vec<String>,
    mode: TextMode,
}

impl TextSource {
    pub fn new(sample: Vec<String>) -> Self {
        Self {
            sample,
            custom: Vec::new(),
            mode: TextMode::Sample,
        }
    }

    /// Installs custom texts and switches to them
    pub fn load_custom(&mut self, texts: Vec<String>) {
        self.custom = texts;
        self.mode = TextMode::Custom;
    }

    pub fn has_custom(&self) -> bool {
        !self.custom.is_empty()
    }

    /// Flips between sample and custom texts; returns false when there is nothing to flip to
    pub fn toggle(&mut self) -> bool {
        match self.mode {
            TextMode::Custom => {
                self.mode = TextMode::Sample;
                true
            }
            TextMode::Sample if self.has_custom() => {
                self.mode = TextMode::Custom;
                true
            }
            TextMode::Sample => false,
        }
    }

    /// Custom mode only counts when custom texts are actually loaded
    pub fn mode(&self) -> TextMode {
        if self.mode == TextMode::Custom && self.has_custom() {
            TextMode::Custom
        } else {
            TextMode::Sample
        }
    }

    pub fn active(&self) -> &[String] {
        match self.mode() {
            TextMode::Custom => &self.custom,
            TextMode::Sample => &self.sample,
        }
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::new(sample_texts())
    }
}
