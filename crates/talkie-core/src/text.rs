//! Text segmentation for speech synthesis.
//!
//! Segment boundaries depend on nothing but the text and the length limit:
//! paragraphs first, then sentences, then clauses, then words. Short
//! sentences within a paragraph are merged up to the limit.

/// Split text into speakable segments of at most `max_chars` characters.
///
/// A single word longer than `max_chars` is kept whole. Returns an empty
/// vector for blank text.
pub fn split_into_segments(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut segments = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = collapse_whitespace(paragraph);
        if paragraph.is_empty() {
            continue;
        }

        if char_len(&paragraph) <= max_chars {
            segments.push(paragraph);
            continue;
        }

        segments.extend(split_paragraph(&paragraph, max_chars));
    }

    segments
}

fn split_paragraph(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(paragraph) {
        // If adding this sentence would exceed the limit, flush
        if !current.is_empty() && char_len(&current) + 1 + char_len(&sentence) > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if char_len(&sentence) > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_long_sentence(&sentence, max_chars));
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentences at `.` `!` `?` (and their full-width forms)
/// followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        let is_terminator = matches!(c, '.' | '!' | '?' | '。' | '！' | '？');
        if is_terminator && chars.peek().is_some_and(|next| next.is_whitespace()) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Split an overly long sentence at clause boundaries (, ; : — –).
fn split_long_sentence(sentence: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for part in sentence.split_inclusive(&[',', ';', ':', '—', '–'][..]) {
        if !current.is_empty() && char_len(&current) + char_len(part) > max_chars {
            let flushed = std::mem::take(&mut current);
            let flushed = flushed.trim();
            if !flushed.is_empty() {
                chunks.push(flushed.to_string());
            }
        }
        current.push_str(part);
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }

    // Anything still oversized is split at word boundaries
    chunks
        .into_iter()
        .flat_map(|chunk| {
            if char_len(&chunk) > max_chars {
                split_words(&chunk, max_chars)
            } else {
                vec![chunk]
            }
        })
        .collect()
}

fn split_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && char_len(&current) + 1 + char_len(word) > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
