//! Turns a matched passage into a short, sectioned chat answer.
//!
//! Used for lexical-path answers, where no generation provider has phrased
//! the passage. Headings are detected heuristically and the remaining lines
//! are broken into bullet points.

use crate::domain::models::{AnswerSection, StructuredAnswer};

const OUTRO: &str = "If you need more help, you can contact support.";
const DEFAULT_TITLE: &str = "Knowledge Base";
const DEFAULT_SECTION: &str = "Details";

const HEADING_MAX_CHARS: usize = 50;
const MIN_POINT_CHARS: usize = 5;
const MAX_POINTS_PER_SECTION: usize = 6;
const MAX_SECTIONS: usize = 4;
const MAX_WORDS: usize = 200;

/// Structure `text` under an intro naming `article_title`.
///
/// Returns `None` when no section ends up with at least one point.
pub fn structure(article_title: &str, text: &str) -> Option<StructuredAnswer> {
    if text.trim().is_empty() {
        return None;
    }

    let title = article_title.trim();
    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    let intro = format!("Here’s what our {title} says:");

    let sections = collect_sections(text);
    if sections.is_empty() {
        return None;
    }

    let sections = apply_word_budget(&intro, sections);
    if sections.is_empty() {
        return None;
    }

    Some(StructuredAnswer {
        intro,
        sections,
        outro: OUTRO.to_string(),
    })
}

fn collect_sections(text: &str) -> Vec<AnswerSection> {
    let mut sections = Vec::new();
    let mut current = AnswerSection {
        title: DEFAULT_SECTION.to_string(),
        points: Vec::new(),
    };

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_heading(line) {
            let next = AnswerSection {
                title: line.to_string(),
                points: Vec::new(),
            };
            let finished = std::mem::replace(&mut current, next);
            if !finished.points.is_empty() {
                sections.push(finished);
            }
            continue;
        }

        for candidate in split_bullets(line) {
            let point = clean_point(candidate);
            if point.chars().count() > MIN_POINT_CHARS
                && current.points.len() < MAX_POINTS_PER_SECTION
            {
                current.points.push(point);
            }
        }
    }

    if !current.points.is_empty() {
        sections.push(current);
    }

    sections
}

fn apply_word_budget(intro: &str, sections: Vec<AnswerSection>) -> Vec<AnswerSection> {
    let mut words = word_count(intro) + word_count(OUTRO);
    let mut kept = Vec::new();

    for section in sections.into_iter().take(MAX_SECTIONS) {
        let title_words = word_count(&section.title);
        let mut points = Vec::new();

        for point in section.points {
            let point_words = word_count(&point);
            if words + point_words + title_words > MAX_WORDS {
                break;
            }
            words += point_words;
            points.push(point);
        }

        if !points.is_empty() {
            kept.push(AnswerSection {
                title: section.title,
                points,
            });
            words += title_words;
        }

        if words >= MAX_WORDS {
            break;
        }
    }

    kept
}

fn is_heading(line: &str) -> bool {
    line.chars().count() < HEADING_MAX_CHARS && !line.ends_with(['.', '!', '?', ':'])
}

/// Split on `•` and on whitespace runs that follow sentence punctuation.
fn split_bullets(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '•' {
            pieces.push(&line[start..i]);
            start = i + c.len_utf8();
        } else if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            pieces.push(&line[start..i]);
            let mut end = i + c.len_utf8();
            while let Some((j, ws)) = chars.next_if(|(_, n)| n.is_whitespace()) {
                end = j + ws.len_utf8();
            }
            start = end;
        }
        prev = Some(c);
    }

    pieces.push(&line[start..]);
    pieces
}

fn clean_point(candidate: &str) -> String {
    let trimmed = candidate.trim();
    let unmarked = trimmed
        .strip_prefix(['•', '-', '*'])
        .map_or(trimmed, str::trim_start);
    unmarked.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count().max(1)
}
