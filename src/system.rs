//! One horizontal line of a score.
//!
//! A [`System`] owns its staves plus three position-ordered collections:
//! barlines, tempo markers and alternate endings. Barlines are wrapped in
//! [`Barlines`], which always holds a start bar at position 0 and an end
//! bar at [`END_POSITION`] and refuses to remove either of them.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{AlternateEnding, Barline, Staff, TempoMarker, END_POSITION};
use crate::positioned::PositionedCollection;

// ═══════════════════════════════════════════════════════════════════════
// Barlines
// ═══════════════════════════════════════════════════════════════════════

/// Barlines of a system, guarded so the two sentinels survive every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Barline>", into = "Vec<Barline>")]
pub struct Barlines {
    items: PositionedCollection<Barline>,
}

impl Barlines {
    /// Only the start and end sentinels.
    pub fn new() -> Self {
        let mut items = PositionedCollection::new();
        items.insert(Barline::default());
        items.insert(Barline {
            position: END_POSITION,
            ..Barline::default()
        });
        Self { items }
    }

    fn is_sentinel_position(position: i32) -> bool {
        position == 0 || position == END_POSITION
    }

    pub fn insert(&mut self, barline: Barline) {
        self.items.insert(barline);
    }

    /// Remove every barline equal to `barline`.
    ///
    /// Refused when it would leave position 0 or `END_POSITION` without a
    /// barline.
    pub fn remove(&mut self, barline: &Barline) -> Result<(), ModelError> {
        let position = barline.position;
        if Self::is_sentinel_position(position)
            && !self.items.iter().any(|b| b.position == position && b != barline)
        {
            return Err(ModelError::SentinelBarline { position });
        }
        self.items.remove(barline);
        Ok(())
    }

    pub fn previous(&self, position: i32) -> Option<&Barline> {
        self.items.find_previous(position)
    }

    pub fn next(&self, position: i32) -> Option<&Barline> {
        self.items.find_next(position)
    }

    pub fn at_position(&self, position: i32) -> Option<&Barline> {
        self.items.find_at(position)
    }

    pub fn start(&self) -> &Barline {
        &self.items.range()[0]
    }

    pub fn end(&self) -> &Barline {
        &self.items.range()[self.items.len() - 1]
    }

    pub fn range(&self) -> &[Barline] {
        self.items.range()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Barlines {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Barline>> for Barlines {
    type Error = ModelError;

    fn try_from(barlines: Vec<Barline>) -> Result<Self, Self::Error> {
        let items = PositionedCollection::from(barlines);
        match (items.range().first(), items.range().last()) {
            (Some(first), _) if first.position != 0 => {
                Err(ModelError::MissingSentinel { which: "start" })
            }
            (None, _) => Err(ModelError::MissingSentinel { which: "start" }),
            (_, Some(last)) if last.position != END_POSITION || items.len() < 2 => {
                Err(ModelError::MissingSentinel { which: "end" })
            }
            _ => Ok(Self { items }),
        }
    }
}

impl From<Barlines> for Vec<Barline> {
    fn from(barlines: Barlines) -> Self {
        barlines.items.into()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// System
// ═══════════════════════════════════════════════════════════════════════

/// One horizontal line of a rendered score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    staves: Vec<Staff>,
    barlines: Barlines,
    #[serde(default)]
    tempo_markers: PositionedCollection<TempoMarker>,
    #[serde(default)]
    alternate_endings: PositionedCollection<AlternateEnding>,
}

impl System {
    /// An empty system holding only the start and end barlines.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Staves ──────────────────────────────────────────────────────────

    /// Staves in top-to-bottom order.
    pub fn staves(&self) -> &[Staff] {
        &self.staves
    }

    pub fn staves_mut(&mut self) -> &mut [Staff] {
        &mut self.staves
    }

    pub fn insert_staff(&mut self, staff: Staff) {
        self.staves.push(staff);
    }

    /// Remove every staff equal to `staff`. No-op if there is none.
    pub fn remove_staff(&mut self, staff: &Staff) {
        self.staves.retain(|s| s != staff);
    }

    // ── Barlines ────────────────────────────────────────────────────────

    pub fn barlines(&self) -> &[Barline] {
        self.barlines.range()
    }

    pub fn insert_barline(&mut self, barline: Barline) {
        self.barlines.insert(barline);
    }

    pub fn remove_barline(&mut self, barline: &Barline) -> Result<(), ModelError> {
        self.barlines.remove(barline)
    }

    /// The last barline before (or at) `position`.
    pub fn previous_barline(&self, position: i32) -> Option<&Barline> {
        self.barlines.previous(position)
    }

    /// The first barline after (or at) `position`.
    pub fn next_barline(&self, position: i32) -> Option<&Barline> {
        self.barlines.next(position)
    }

    pub fn barline_at_position(&self, position: i32) -> Option<&Barline> {
        self.barlines.at_position(position)
    }

    // ── Tempo markers ───────────────────────────────────────────────────

    pub fn tempo_markers(&self) -> &[TempoMarker] {
        self.tempo_markers.range()
    }

    pub fn insert_tempo_marker(&mut self, marker: TempoMarker) {
        self.tempo_markers.insert(marker);
    }

    pub fn remove_tempo_marker(&mut self, marker: &TempoMarker) {
        self.tempo_markers.remove(marker);
    }

    /// The tempo marker in effect at `position`, if any.
    pub fn previous_tempo_marker(&self, position: i32) -> Option<&TempoMarker> {
        self.tempo_markers.find_previous(position)
    }

    // ── Alternate endings ───────────────────────────────────────────────

    pub fn alternate_endings(&self) -> &[AlternateEnding] {
        self.alternate_endings.range()
    }

    pub fn insert_alternate_ending(&mut self, ending: AlternateEnding) {
        self.alternate_endings.insert(ending);
    }

    pub fn remove_alternate_ending(&mut self, ending: &AlternateEnding) {
        self.alternate_endings.remove(ending);
    }

    /// Highest non-sentinel position used by anything in the system.
    pub fn last_used_position(&self) -> i32 {
        let barlines = self
            .barlines()
            .iter()
            .map(|b| b.position)
            .filter(|&p| p != END_POSITION);
        let markers = self.tempo_markers().iter().map(|m| m.position);
        let endings = self.alternate_endings().iter().map(|e| e.position);
        let notes = self.staves.iter().filter_map(Staff::last_position);
        barlines
            .chain(markers)
            .chain(endings)
            .chain(notes)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BarType, Note, TimeSignature};
    use pretty_assertions::assert_eq;

    fn system_with_bars(positions: &[i32]) -> System {
        let mut system = System::new();
        for &p in positions {
            system.insert_barline(Barline::new(p, BarType::Single));
        }
        system
    }

    #[test]
    fn new_system_has_only_sentinels() {
        let system = System::new();
        let positions: Vec<i32> = system.barlines().iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![0, END_POSITION]);
        assert!(system.staves().is_empty());
        assert!(system.tempo_markers().is_empty());
        assert!(system.alternate_endings().is_empty());
    }

    #[test]
    fn previous_and_next_barline() {
        let system = system_with_bars(&[4, 8]);
        assert_eq!(system.previous_barline(6).map(|b| b.position), Some(4));
        assert_eq!(system.next_barline(6).map(|b| b.position), Some(8));
        assert_eq!(system.previous_barline(0).map(|b| b.position), Some(0));
        assert_eq!(system.next_barline(END_POSITION).map(|b| b.position), Some(END_POSITION));
        assert_eq!(system.next_barline(9).map(|b| b.position), Some(END_POSITION));
    }

    #[test]
    fn sentinel_barlines_cannot_be_removed() {
        let mut system = system_with_bars(&[4]);
        let start = system.barlines()[0].clone();
        assert_eq!(
            system.remove_barline(&start),
            Err(ModelError::SentinelBarline { position: 0 })
        );
        let end = Barline {
            position: END_POSITION,
            ..Barline::default()
        };
        assert!(system.remove_barline(&end).is_err());
        assert_eq!(system.barlines().len(), 3);

        system.remove_barline(&Barline::new(4, BarType::Single)).unwrap();
        assert_eq!(system.barlines().len(), 2);
    }

    #[test]
    fn remove_barline_requires_full_equality() {
        let mut system = system_with_bars(&[4]);
        system
            .remove_barline(&Barline::new(4, BarType::Double))
            .unwrap();
        assert_eq!(system.barlines().len(), 3);
    }

    #[test]
    fn barline_at_position_finds_exact_match() {
        let mut system = System::new();
        system.insert_barline(
            Barline::new(12, BarType::RepeatEnd).with_time_signature(TimeSignature::default()),
        );
        assert_eq!(
            system.barline_at_position(12).map(|b| b.bar_type),
            Some(BarType::RepeatEnd)
        );
        assert!(system.barline_at_position(11).is_none());
    }

    #[test]
    fn remove_staff_removes_every_equal_staff() {
        let mut system = System::new();
        let mut first = Staff::guitar();
        first.insert_note(Note::new(1, 0, 5));
        system.insert_staff(first.clone());
        system.insert_staff(Staff::bass());
        system.insert_staff(first.clone());

        system.remove_staff(&first);
        assert_eq!(system.staves(), &[Staff::bass()]);

        system.insert_staff(Staff::guitar());
        system.insert_staff(Staff::guitar());
        system.remove_staff(&Staff::guitar());
        assert_eq!(system.staves(), &[Staff::bass()]);

        system.remove_staff(&Staff::new(crate::model::ViewType::Guitar, 7));
        assert_eq!(system.staves().len(), 1);
    }

    #[test]
    fn extra_barline_on_sentinel_position_can_be_removed() {
        let mut system = System::new();
        let repeat = Barline::new(0, BarType::RepeatStart);
        let closing = Barline::new(END_POSITION, BarType::Double);
        system.insert_barline(repeat.clone());
        system.insert_barline(closing.clone());
        assert_eq!(system.barlines().len(), 4);

        system.remove_barline(&repeat).unwrap();
        system.remove_barline(&closing).unwrap();
        assert_eq!(system.barlines().len(), 2);
        assert_eq!(system.barlines()[0], Barline::default());

        let start = system.barlines()[0].clone();
        assert_eq!(
            system.remove_barline(&start),
            Err(ModelError::SentinelBarline { position: 0 })
        );
        assert_eq!(system.barlines().len(), 2);
    }

    #[test]
    fn equality_covers_every_collection() {
        let mut a = system_with_bars(&[4]);
        a.insert_staff(Staff::guitar());
        let b = a.clone();
        assert_eq!(a, b);

        let mut c = b.clone();
        c.insert_tempo_marker(TempoMarker::new(0, 120));
        assert_ne!(a, c);

        let mut d = b.clone();
        d.insert_alternate_ending(AlternateEnding::new(4, vec![1]));
        assert_ne!(a, d);

        let mut e = b.clone();
        e.insert_barline(Barline::new(6, BarType::Double));
        assert_ne!(a, e);

        let mut f = b;
        f.insert_staff(Staff::bass());
        assert_ne!(a, f);
    }

    #[test]
    fn last_used_position_ignores_end_sentinel() {
        let mut system = system_with_bars(&[8]);
        assert_eq!(system.last_used_position(), 8);
        let mut staff = Staff::guitar();
        staff.insert_note(Note::new(14, 1, 2));
        system.insert_staff(staff);
        assert_eq!(system.last_used_position(), 14);
        assert_eq!(System::new().last_used_position(), 0);
    }

    #[test]
    fn barlines_deserialization_checks_sentinels() {
        let ok = Barlines::try_from(vec![
            Barline::new(END_POSITION, BarType::Single),
            Barline::new(0, BarType::RepeatStart),
        ])
        .unwrap();
        assert_eq!(ok.start().bar_type, BarType::RepeatStart);
        assert_eq!(ok.end().position, END_POSITION);

        assert_eq!(
            Barlines::try_from(vec![Barline::new(END_POSITION, BarType::Single)]),
            Err(ModelError::MissingSentinel { which: "start" })
        );
        assert_eq!(
            Barlines::try_from(vec![Barline::new(0, BarType::Single)]),
            Err(ModelError::MissingSentinel { which: "end" })
        );
        assert!(Barlines::try_from(Vec::new()).is_err());
    }

    #[test]
    fn system_json_round_trip_keeps_sentinels() {
        let mut system = system_with_bars(&[4]);
        system.insert_staff(Staff::guitar());
        let json = serde_json::to_string(&system).unwrap();
        let back: System = serde_json::from_str(&json).unwrap();
        assert_eq!(back, system);
    }
}
