//! Bounded, overlapping text chunking.
//!
//! Text is first broken at paragraph breaks, then at line breaks, then at
//! spaces, and finally at hard character boundaries, until every piece fits
//! within `chunk_size` characters. Pieces are then packed greedily into
//! chunks; each new chunk starts with the trailing pieces of the previous
//! one, up to `chunk_overlap` characters.

use std::collections::VecDeque;

use bidbuilder_shared::constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextSplitter {
    /// `chunk_size` is clamped to at least 1 and `chunk_overlap` to below
    /// `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks of at most `chunk_size` characters.
    /// Whitespace-only input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        self.break_down(text, 0, &mut pieces);
        self.pack(pieces)
    }

    fn break_down(&self, text: &str, level: usize, out: &mut Vec<String>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if char_len(text) <= self.chunk_size {
            out.push(text.to_string());
            return;
        }

        match SEPARATORS.get(level) {
            Some(sep) => {
                for part in text.split(sep) {
                    self.break_down(part, level + 1, out);
                }
            }
            None => {
                let chars: Vec<char> = text.chars().collect();
                for window in chars.chunks(self.chunk_size) {
                    out.push(window.iter().collect());
                }
            }
        }
    }

    fn pack(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: VecDeque<String> = VecDeque::new();

        for piece in pieces {
            let piece_len = char_len(&piece);

            if !current.is_empty() && joined_len(&current) + 1 + piece_len > self.chunk_size {
                chunks.push(join(&current));

                // Keep a tail of the finished chunk as overlap, as long as the
                // next piece still fits behind it.
                while !current.is_empty()
                    && (joined_len(&current) > self.chunk_overlap
                        || joined_len(&current) + 1 + piece_len > self.chunk_size)
                {
                    current.pop_front();
                }
            }

            current.push_back(piece);
        }

        if !current.is_empty() {
            chunks.push(join(&current));
        }
        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Length of the pieces joined with single spaces.
fn joined_len(pieces: &VecDeque<String>) -> usize {
    let chars: usize = pieces.iter().map(|p| char_len(p)).sum();
    chars + pieces.len().saturating_sub(1)
}

fn join(pieces: &VecDeque<String>) -> String {
    pieces.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}
