//! Segment queue: pending content waiting to be revealed.
//!
//! Appended text is cut at every `\n` into text runs and break markers. The
//! queue is strictly FIFO and is consumed one unit at a time: a single
//! character (extended grapheme cluster) off the front of the head run, or a
//! whole break marker.

use std::collections::VecDeque;
use unicode_segmentation::UnicodeSegmentation;

/// A non-empty run of characters that shrinks from the front as it is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    text: String,
    /// Byte offset of the first unrevealed character.
    start: usize,
    /// Unrevealed characters.
    remaining: usize,
}

impl TextRun {
    /// Create a run, or `None` for empty text.
    pub fn new(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_owned(),
            start: 0,
            remaining: text.graphemes(true).count(),
        })
    }

    /// The unrevealed text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text[self.start..]
    }

    /// Number of unrevealed characters.
    #[inline]
    pub const fn len(&self) -> usize {
        self.remaining
    }

    /// Whether every character has been revealed.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Byte range of the next character, if any.
    fn front(&self) -> Option<(usize, usize)> {
        let g = self.as_str().graphemes(true).next()?;
        Some((self.start, self.start + g.len()))
    }
}

/// A unit of pending content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal characters.
    Text(TextRun),
    /// A line break.
    Break,
}

impl Segment {
    /// Equivalent character count used for pacing.
    #[inline]
    pub const fn equivalent_len(&self, break_equivalent_chars: usize) -> usize {
        match self {
            Self::Text(run) => run.len(),
            Self::Break => break_equivalent_chars,
        }
    }
}

/// One reveal step taken off the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    /// A single character.
    Glyph(&'a str),
    /// A line break.
    Break,
}

/// Cut `text` into runs and breaks.
///
/// Empty pieces (around leading, trailing or doubled newlines) produce no run.
pub fn split_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (i, piece) in text.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::Break);
        }
        if let Some(run) = TextRun::new(piece) {
            segments.push(Segment::Text(run));
        }
    }
    segments
}

/// FIFO queue of pending segments.
#[derive(Debug, Clone, Default)]
pub struct SegmentQueue {
    segments: VecDeque<Segment>,
}

impl SegmentQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            segments: VecDeque::new(),
        }
    }

    /// Split `text` and append the pieces. Returns how many segments were added.
    pub fn push_text(&mut self, text: &str) -> usize {
        let segments = split_segments(text);
        let added = segments.len();
        self.segments.extend(segments);
        added
    }

    /// Number of pending segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Drop everything pending.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Iterate pending segments front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Total reveal units left (characters plus breaks).
    pub fn unit_count(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(run) => run.len(),
                Segment::Break => 1,
            })
            .sum()
    }

    /// Hand the front unit to `f`, then remove it from the queue.
    ///
    /// Returns `None` without calling `f` if the queue is empty.
    pub fn pop_with<R>(&mut self, f: impl FnOnce(Unit<'_>) -> R) -> Option<R> {
        let result = match self.segments.front_mut()? {
            Segment::Break => {
                let result = f(Unit::Break);
                self.segments.pop_front();
                result
            }
            Segment::Text(run) => {
                let Some((from, to)) = run.front() else {
                    // Exhausted runs are removed eagerly; this is only reachable
                    // if one slipped through, and it costs no reveal time
                    self.segments.pop_front();
                    return self.pop_with(f);
                };
                let result = f(Unit::Glyph(&run.text[from..to]));
                run.start = to;
                run.remaining -= 1;
                if run.is_empty() {
                    self.segments.pop_front();
                }
                result
            }
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment]) -> Vec<Option<&str>> {
        segments
            .iter()
            .map(|s| match s {
                Segment::Text(run) => Some(run.as_str()),
                Segment::Break => None,
            })
            .collect()
    }

    fn drain(queue: &mut SegmentQueue) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(unit) = queue.pop_with(|u| match u {
            Unit::Glyph(g) => g.to_owned(),
            Unit::Break => "⏎".to_owned(),
        }) {
            out.push(unit);
        }
        out
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(texts(&split_segments("hello")), vec![Some("hello")]);
    }

    #[test]
    fn test_split_with_breaks() {
        assert_eq!(
            texts(&split_segments("AB\nCDE")),
            vec![Some("AB"), None, Some("CDE")]
        );
    }

    #[test]
    fn test_split_omits_empty_runs() {
        assert_eq!(texts(&split_segments("\nA\n\n")), vec![None, Some("A"), None, None]);
        assert!(split_segments("").is_empty());
        assert_eq!(texts(&split_segments("\n")), vec![None]);
    }

    #[test]
    fn test_text_run_counts_graphemes() {
        let run = TextRun::new("e\u{301}👍a").unwrap();
        assert_eq!(run.len(), 3);
        assert!(TextRun::new("").is_none());
    }

    #[test]
    fn test_queue_fifo_consumption() {
        let mut queue = SegmentQueue::new();
        queue.push_text("ab\nc");
        queue.push_text("d");
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.unit_count(), 5);

        assert_eq!(drain(&mut queue), vec!["a", "b", "⏎", "c", "d"]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop_with(|_| ()), None);
    }

    #[test]
    fn test_queue_run_shrinks_from_front() {
        let mut queue = SegmentQueue::new();
        queue.push_text("xyz");
        queue.pop_with(|_| ());

        match queue.iter().next() {
            Some(Segment::Text(run)) => {
                assert_eq!(run.as_str(), "yz");
                assert_eq!(run.len(), 2);
            }
            other => panic!("unexpected head {other:?}"),
        };
    }

    #[test]
    fn test_queue_pops_clusters_whole() {
        let mut queue = SegmentQueue::new();
        queue.push_text("e\u{301}x");
        assert_eq!(drain(&mut queue), vec!["e\u{301}", "x"]);
    }

    #[test]
    fn test_segment_equivalent_len() {
        let run = Segment::Text(TextRun::new("abc").unwrap());
        assert_eq!(run.equivalent_len(10), 3);
        assert_eq!(Segment::Break.equivalent_len(10), 10);
    }
}
