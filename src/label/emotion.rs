//! The emotion label set and its class-index / icon mapping.

use std::fmt;

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// One of the 8 emotions the classifier was trained on, plus a sentinel for
/// indices outside the trained set.
///
/// The discriminants match the artifact's class indices — the mapping is part
/// of the trained model's contract and must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgust,
    Surprised,
    /// The classifier returned an index outside `0..=7`.  Degrades to a
    /// defined fallback display instead of erroring.
    Unknown,
}

impl Emotion {
    /// All trained emotions, in class-index order.
    pub const ALL: [Emotion; 8] = [
        Emotion::Neutral,
        Emotion::Calm,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgust,
        Emotion::Surprised,
    ];

    /// Resolve a classifier output index to its emotion.
    ///
    /// Total over `u32`: out-of-range indices map to [`Emotion::Unknown`].
    pub fn from_class_index(index: u32) -> Emotion {
        match index {
            0 => Emotion::Neutral,
            1 => Emotion::Calm,
            2 => Emotion::Happy,
            3 => Emotion::Sad,
            4 => Emotion::Angry,
            5 => Emotion::Fearful,
            6 => Emotion::Disgust,
            7 => Emotion::Surprised,
            _ => Emotion::Unknown,
        }
    }

    /// Lower-case English name.
    pub fn name(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Calm => "calm",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgust => "disgust",
            Emotion::Surprised => "surprised",
            Emotion::Unknown => "unknown",
        }
    }

    /// Emoji shown next to the name.
    pub fn icon(&self) -> &'static str {
        match self {
            Emotion::Neutral => "😐",
            Emotion::Calm => "😌",
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Fearful => "😨",
            Emotion::Disgust => "🤢",
            Emotion::Surprised => "😲",
            Emotion::Unknown => "❓",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trained_indices_map_to_their_emotions() {
        assert_eq!(Emotion::from_class_index(0), Emotion::Neutral);
        assert_eq!(Emotion::from_class_index(1), Emotion::Calm);
        assert_eq!(Emotion::from_class_index(2), Emotion::Happy);
        assert_eq!(Emotion::from_class_index(3), Emotion::Sad);
        assert_eq!(Emotion::from_class_index(4), Emotion::Angry);
        assert_eq!(Emotion::from_class_index(5), Emotion::Fearful);
        assert_eq!(Emotion::from_class_index(6), Emotion::Disgust);
        assert_eq!(Emotion::from_class_index(7), Emotion::Surprised);
    }

    #[test]
    fn out_of_range_index_is_unknown_not_error() {
        assert_eq!(Emotion::from_class_index(8), Emotion::Unknown);
        assert_eq!(Emotion::from_class_index(99), Emotion::Unknown);
        assert_eq!(Emotion::from_class_index(u32::MAX), Emotion::Unknown);
    }

    #[test]
    fn happy_has_expected_name_and_icon() {
        let e = Emotion::from_class_index(2);
        assert_eq!(e.name(), "happy");
        assert_eq!(e.icon(), "😊");
    }

    #[test]
    fn unknown_has_sentinel_icon() {
        let e = Emotion::from_class_index(99);
        assert_eq!(e.name(), "unknown");
        assert_eq!(e.icon(), "❓");
    }

    #[test]
    fn display_renders_the_name() {
        assert_eq!(Emotion::Sad.to_string(), "sad");
        assert_eq!(Emotion::Unknown.to_string(), "unknown");
    }

    #[test]
    fn all_covers_every_trained_index_in_order() {
        for (i, e) in Emotion::ALL.iter().enumerate() {
            assert_eq!(Emotion::from_class_index(i as u32), *e);
        }
    }

    #[test]
    fn every_emotion_has_a_distinct_icon() {
        let mut icons: Vec<&str> = Emotion::ALL.iter().map(|e| e.icon()).collect();
        icons.push(Emotion::Unknown.icon());
        let count = icons.len();
        icons.sort_unstable();
        icons.dedup();
        assert_eq!(icons.len(), count);
    }
}
