use serde::{Deserialize, Serialize};

use crate::transcribe::watson::SpeakerLabel;
use crate::transcribe::whisper::TranscriptSegment;

/// Speaker-turn marker extracted from the diarization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub speaker: u32,
    pub start_time: f64,
}

/// A fragment annotated with the text of the segment containing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedEntry {
    pub speaker: u32,
    pub start_time: f64,
    pub text: String,
}

/// Paragraph-level speaker turn after folding consecutive merged entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedEntry {
    pub speaker: u32,
    pub text: String,
}

/// Reduces the per-word speaker labels to turn boundaries: a fragment is
/// emitted only when speaker or start time differs from the previous one.
/// Input order is preserved; the labels are assumed time-ordered already.
pub fn extract_fragments(labels: &[SpeakerLabel]) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();

    for label in labels {
        let same_as_last = fragments
            .last()
            .is_some_and(|prev| prev.speaker == label.speaker && prev.start_time == label.from);
        if !same_as_last {
            fragments.push(Fragment {
                speaker: label.speaker,
                start_time: label.from,
            });
        }
    }

    fragments
}

/// Aligns each fragment to the first segment whose inclusive [start, end]
/// interval contains its start time. A fragment no segment contains gets an
/// empty text rather than an error. One output entry per fragment, in order.
pub fn merge_transcripts(fragments: &[Fragment], segments: &[TranscriptSegment]) -> Vec<MergedEntry> {
    fragments
        .iter()
        .map(|fragment| {
            let text = segments
                .iter()
                .find(|seg| fragment.start_time >= seg.start && fragment.start_time <= seg.end)
                .map(|seg| seg.text.clone())
                .unwrap_or_default();

            MergedEntry {
                speaker: fragment.speaker,
                start_time: fragment.start_time,
                text,
            }
        })
        .collect()
}

/// Folds consecutive same-speaker entries into one paragraph per turn.
///
/// Two quirks are carried over from the long-standing behavior of this
/// stage and must not be "fixed":
///   - on a speaker change, the accumulated turn is only flushed when its
///     text differs from the incoming entry's text;
///   - the final turn is flushed unconditionally, with no such check.
pub fn consolidate(entries: &[MergedEntry]) -> Vec<ConsolidatedEntry> {
    let mut consolidated = Vec::new();
    let mut current: Option<(u32, String)> = None;

    for entry in entries {
        match current.as_mut() {
            Some((speaker, text)) if *speaker == entry.speaker => {
                // Skip text the accumulator already ends with, so a segment
                // straddling several fragments is not repeated.
                if !text.ends_with(entry.text.trim()) {
                    text.push(' ');
                    text.push_str(&entry.text);
                }
            }
            Some((speaker, text)) => {
                if *text != entry.text {
                    consolidated.push(ConsolidatedEntry {
                        speaker: *speaker,
                        text: text.trim().to_string(),
                    });
                }
                *speaker = entry.speaker;
                *text = entry.text.clone();
            }
            None => current = Some((entry.speaker, entry.text.clone())),
        }
    }

    if let Some((speaker, text)) = current {
        consolidated.push(ConsolidatedEntry {
            speaker,
            text: text.trim().to_string(),
        });
    }

    consolidated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(speaker: u32, from: f64) -> SpeakerLabel {
        SpeakerLabel {
            speaker,
            from,
            to: from + 0.5,
            confidence: 0.9,
        }
    }

    fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            start,
            end,
            text: text.to_string(),
        }
    }

    fn merged(speaker: u32, start_time: f64, text: &str) -> MergedEntry {
        MergedEntry {
            speaker,
            start_time,
            text: text.to_string(),
        }
    }

    #[test]
    fn extract_drops_consecutive_identical_pairs() {
        let labels = vec![
            label(0, 0.1),
            label(0, 0.1),
            label(0, 0.1),
            label(0, 0.4),
            label(1, 0.4),
            label(1, 0.4),
        ];
        let fragments = extract_fragments(&labels);
        assert_eq!(fragments.len(), 3);
        for pair in fragments.windows(2) {
            assert!(
                pair[0].speaker != pair[1].speaker || pair[0].start_time != pair[1].start_time
            );
        }
    }

    #[test]
    fn extract_keeps_repeats_that_are_not_adjacent() {
        let labels = vec![label(0, 0.1), label(1, 0.2), label(0, 0.1)];
        let fragments = extract_fragments(&labels);
        assert_eq!(fragments.len(), 3);
    }

    #[test]
    fn merge_is_total_and_order_preserving() {
        let fragments = vec![
            Fragment { speaker: 0, start_time: 0.2 },
            Fragment { speaker: 1, start_time: 99.0 },
            Fragment { speaker: 0, start_time: 6.1 },
        ];
        let segments = vec![segment(0.0, 5.0, "a"), segment(5.0, 10.0, "b")];

        let entries = merge_transcripts(&fragments, &segments);
        assert_eq!(entries.len(), fragments.len());
        assert_eq!(entries[0].text, "a");
        // Out-of-range fragment degrades to empty text, not an error.
        assert_eq!(entries[1].text, "");
        assert_eq!(entries[2].text, "b");
        assert_eq!(entries[1].speaker, 1);
        assert_eq!(entries[1].start_time, 99.0);
    }

    #[test]
    fn merge_boundary_tie_goes_to_first_segment() {
        // Inclusive upper bound means a fragment at a shared boundary lands
        // in whichever segment is scanned first.
        let fragments = vec![Fragment { speaker: 0, start_time: 5.0 }];
        let segments = vec![segment(0.0, 5.0, "a"), segment(5.0, 10.0, "b")];
        let entries = merge_transcripts(&fragments, &segments);
        assert_eq!(entries[0].text, "a");
    }

    #[test]
    fn consolidate_appends_within_a_turn_and_splits_on_speaker_change() {
        let entries = vec![
            merged(0, 0.0, "Hi"),
            merged(0, 1.0, "Hi there"),
            merged(1, 2.0, "Hello"),
        ];
        let consolidated = consolidate(&entries);
        assert_eq!(
            consolidated,
            vec![
                ConsolidatedEntry { speaker: 0, text: "Hi Hi there".to_string() },
                ConsolidatedEntry { speaker: 1, text: "Hello".to_string() },
            ]
        );
    }

    #[test]
    fn consolidate_skips_duplicate_tail_within_a_turn() {
        let entries = vec![
            merged(0, 0.0, "same words"),
            merged(0, 1.0, "same words"),
            merged(0, 2.0, "and more"),
        ];
        let consolidated = consolidate(&entries);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated[0].text, "same words and more");
    }

    #[test]
    fn consolidate_single_entry_yields_single_turn() {
        let entries = vec![merged(3, 0.0, "only line")];
        let consolidated = consolidate(&entries);
        assert_eq!(
            consolidated,
            vec![ConsolidatedEntry { speaker: 3, text: "only line".to_string() }]
        );
    }

    #[test]
    fn consolidate_drops_turn_when_next_speaker_repeats_its_text() {
        // Mid-stream, a turn whose text equals the incoming entry's text is
        // not flushed; the incoming entry replaces it.
        let entries = vec![merged(0, 0.0, "echo"), merged(1, 1.0, "echo")];
        let consolidated = consolidate(&entries);
        assert_eq!(
            consolidated,
            vec![ConsolidatedEntry { speaker: 1, text: "echo".to_string() }]
        );
    }

    #[test]
    fn consolidate_final_flush_is_unconditional() {
        // The last turn is emitted even when it duplicates the previous
        // one's text, unlike the mid-stream check above.
        let entries = vec![
            merged(0, 0.0, "first"),
            merged(1, 1.0, "again"),
            merged(0, 2.0, "again"),
        ];
        let consolidated = consolidate(&entries);
        assert_eq!(
            consolidated,
            vec![
                ConsolidatedEntry { speaker: 0, text: "first".to_string() },
                // speaker 1's "again" is swallowed by the mid-stream check...
                // ...but speaker 0's trailing "again" still flushes.
                ConsolidatedEntry { speaker: 0, text: "again".to_string() },
            ]
        );
    }

    #[test]
    fn consolidate_empty_input_yields_nothing() {
        assert!(consolidate(&[]).is_empty());
    }
}
