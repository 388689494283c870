//! Sentence-aware text chunking for the retrieval index.
//!
//! Token counts are estimated at roughly four characters per token, which is
//! close enough for sizing retrieval chunks.

/// Splits text into overlapping chunks of approximately `chunk_size`
/// estimated tokens, carrying `overlap` tokens of trailing context into the
/// next chunk so sentences near a boundary stay retrievable.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        let sentences = split_sentences(text);

        let mut chunks: Vec<String> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_size = 0usize;

        for sentence in sentences {
            let sentence_tokens = estimate_tokens(&sentence);

            if current_size + sentence_tokens > self.chunk_size && !current.is_empty() {
                chunks.push(current.join(" "));

                // Keep a tail of sentences as overlap for the next chunk
                let mut overlap_sentences: Vec<String> = Vec::new();
                let mut overlap_size = 0usize;
                for s in current.iter().rev() {
                    let s_tokens = estimate_tokens(s);
                    if overlap_size + s_tokens <= self.overlap {
                        overlap_sentences.insert(0, s.clone());
                        overlap_size += s_tokens;
                    } else {
                        break;
                    }
                }
                current = overlap_sentences;
                current_size = overlap_size;
            }

            current_size += sentence_tokens;
            current.push(sentence);
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        chunks
    }
}

/// Whitespace-normalizing sentence splitter: breaks after `.`, `!`, or `?`
/// followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let normalized: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = normalized.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|n| n.is_whitespace()) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::default();
        let chunks = chunker.chunk("A short resume. Nothing more to say.");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("short resume"));
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\t ").is_empty());
    }

    #[test]
    fn test_long_text_splits_into_multiple_chunks() {
        let chunker = TextChunker::new(50, 10);
        let text = "This sentence describes one professional accomplishment in detail. "
            .repeat(20);
        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1, "expected multiple chunks, got {}", chunks.len());
    }

    #[test]
    fn test_overlap_repeats_boundary_sentence() {
        let chunker = TextChunker::new(50, 20);
        let text = "Sentence one about backend work and systems design in production. "
            .repeat(10);
        let chunks = chunker.chunk(&text);
        assert!(chunks.len() > 1);
        // Each chunk after the first starts with the tail of the previous one
        for pair in chunks.windows(2) {
            let first_sentence = pair[1].split(". ").next().unwrap();
            assert!(
                pair[0].contains(first_sentence.trim_end_matches('.')),
                "no overlap between consecutive chunks"
            );
        }
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let chunker = TextChunker::default();
        let chunks = chunker.chunk("Line one\n\n\twith   gaps. Line two.");
        assert_eq!(chunks[0], "Line one with gaps. Line two.");
    }
}
