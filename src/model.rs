//! Data model for the elements that make up a score system.
//!
//! These structures capture the musical information the layout pipeline
//! needs: where barlines, tempo markers and endings sit within a system,
//! and what each staff contains.

use serde::{Deserialize, Serialize};

use crate::positioned::{Positioned, PositionedCollection};

/// Position of the end-of-system sentinel barline ("beyond the last beat").
pub const END_POSITION: i32 = i32::MAX;

// ═══════════════════════════════════════════════════════════════════════
// Barlines
// ═══════════════════════════════════════════════════════════════════════

/// Visual style of a barline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarType {
    #[default]
    Single,
    Double,
    FreeTime,
    RepeatStart,
    RepeatEnd,
    DoubleBarFine,
}

/// Key signature attached to a barline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySignature {
    /// Number of sharps (positive) or flats (negative)
    pub accidentals: i8,
}

/// Time signature attached to a barline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Numerator (e.g., 3 in 3/4)
    pub beats: u8,
    /// Denominator (e.g., 4 in 3/4)
    pub beat_value: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self { beats: 4, beat_value: 4 }
    }
}

/// A barline delimiting a measure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barline {
    /// Position index within the system
    pub position: i32,
    /// Visual style
    pub bar_type: BarType,
    /// Number of repeats for a repeat-end bar (0 otherwise)
    pub repeat_count: u8,
    /// Key signature shown after the bar, if any
    pub key_signature: Option<KeySignature>,
    /// Time signature shown after the bar, if any
    pub time_signature: Option<TimeSignature>,
}

impl Barline {
    pub fn new(position: i32, bar_type: BarType) -> Self {
        Self {
            position,
            bar_type,
            ..Self::default()
        }
    }

    pub fn with_key_signature(mut self, key: KeySignature) -> Self {
        self.key_signature = Some(key);
        self
    }

    pub fn with_time_signature(mut self, time: TimeSignature) -> Self {
        self.time_signature = Some(time);
        self
    }
}

impl Positioned for Barline {
    fn position(&self) -> i32 {
        self.position
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tempo markers and alternate endings
// ═══════════════════════════════════════════════════════════════════════

/// Note value a tempo marking refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeatType {
    Half,
    #[default]
    Quarter,
    DottedQuarter,
    Eighth,
}

impl BeatType {
    fn symbol(self) -> &'static str {
        match self {
            BeatType::Half => "h",
            BeatType::Quarter => "q",
            BeatType::DottedQuarter => "q.",
            BeatType::Eighth => "e",
        }
    }
}

/// A metronome marking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoMarker {
    pub position: i32,
    pub beats_per_minute: u16,
    pub beat_type: BeatType,
    /// Free text such as "Moderately"
    pub description: String,
}

impl TempoMarker {
    pub fn new(position: i32, beats_per_minute: u16) -> Self {
        Self {
            position,
            beats_per_minute,
            beat_type: BeatType::Quarter,
            description: String::new(),
        }
    }

    /// Text drawn above the system, e.g. "Moderately q = 120".
    pub fn label(&self) -> String {
        let metronome = format!("{} = {}", self.beat_type.symbol(), self.beats_per_minute);
        if self.description.is_empty() {
            metronome
        } else {
            format!("{} {}", self.description, metronome)
        }
    }
}

impl Positioned for TempoMarker {
    fn position(&self) -> i32 {
        self.position
    }
}

/// A volta bracket (1st/2nd ending), optionally with D.C./D.S. text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateEnding {
    pub position: i32,
    /// Repeat passes this ending applies to (1-based)
    pub numbers: Vec<u8>,
    pub da_capo: bool,
    pub dal_segno: bool,
}

impl AlternateEnding {
    pub fn new(position: i32, numbers: Vec<u8>) -> Self {
        Self {
            position,
            numbers,
            ..Self::default()
        }
    }

    /// Bracket text, e.g. "1., 2." or "D.C.".
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = self.numbers.iter().map(|n| format!("{n}.")).collect();
        if self.da_capo {
            parts.push("D.C.".to_string());
        }
        if self.dal_segno {
            parts.push("D.S.".to_string());
        }
        parts.join(", ")
    }
}

impl Positioned for AlternateEnding {
    fn position(&self) -> i32 {
        self.position
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Staves
// ═══════════════════════════════════════════════════════════════════════

/// Which instrument family's staves are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    #[default]
    Guitar,
    Bass,
}

/// Clef of the standard-notation staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clef {
    #[default]
    Treble,
    Bass,
}

/// A fretted note on the tablature staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub position: i32,
    /// 0-based string index, 0 being the highest string
    pub string: u8,
    pub fret: u8,
}

impl Note {
    pub fn new(position: i32, string: u8, fret: u8) -> Self {
        Self { position, string, fret }
    }
}

impl Positioned for Note {
    fn position(&self) -> i32 {
        self.position
    }
}

/// One instrument's notation line: a standard staff above a tablature staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub clef: Clef,
    /// Number of tablature lines
    pub string_count: u8,
    /// View this staff belongs to
    pub view_type: ViewType,
    pub notes: PositionedCollection<Note>,
}

impl Staff {
    pub fn new(view_type: ViewType, string_count: u8) -> Self {
        Self {
            clef: Clef::Treble,
            string_count,
            view_type,
            notes: PositionedCollection::new(),
        }
    }

    /// A standard six-string guitar staff.
    pub fn guitar() -> Self {
        Self::new(ViewType::Guitar, 6)
    }

    /// A four-string bass staff in bass clef.
    pub fn bass() -> Self {
        Self {
            clef: Clef::Bass,
            ..Self::new(ViewType::Bass, 4)
        }
    }

    pub fn insert_note(&mut self, note: Note) {
        self.notes.insert(note);
    }

    pub fn remove_note(&mut self, note: &Note) {
        self.notes.remove(note);
    }

    /// Highest position used by any note on this staff.
    pub fn last_position(&self) -> Option<i32> {
        self.notes.range().last().map(|n| n.position)
    }
}

impl Default for Staff {
    fn default() -> Self {
        Self::guitar()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Score locations
// ═══════════════════════════════════════════════════════════════════════

/// A caret or selection location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreLocation {
    pub system_index: usize,
    pub staff_index: usize,
    pub position: i32,
}

impl ScoreLocation {
    pub fn new(system_index: usize, staff_index: usize, position: i32) -> Self {
        Self {
            system_index,
            staff_index,
            position,
        }
    }
}

/// A system-level location, delivered for barline and signature clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemLocation {
    pub system_index: usize,
    pub position: i32,
}

/// A staff within a system, delivered for clef clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffLocation {
    pub system_index: usize,
    pub staff_index: usize,
}
