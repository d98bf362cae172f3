//! Conversion of an analyzed score into level data.

use super::score::{NoteObject, Score};
use crate::level::{LevelData, LevelDataEntity};

const TAP_CRITICAL: u32 = 2;
const SLIDE_HIDDEN_STEP: u32 = 5;

/// Lane index of the left edge of the playfield.
const LANE_OFFSET: f64 = 8.0;

pub(crate) fn to_level_data(score: &Score) -> LevelData {
    let mut converter = Converter {
        score,
        taps: score.taps.iter().map(|note| (*note, false)).collect(),
        directionals: score.directionals.iter().map(|note| (*note, false)).collect(),
    };

    let mut level = LevelData::new(score.wave_offset);
    level.push(LevelDataEntity::new("Initialization"));
    level.push(LevelDataEntity::new("Stage"));

    for change in &score.bpm_changes {
        level.push(
            LevelDataEntity::new("BpmChange")
                .with_value("#BEAT", converter.beat(change.tick))
                .with_value("#BPM", change.bpm),
        );
    }

    // Slides claim their coinciding taps before the remaining taps are emitted.
    let mut slide_entities = Vec::new();
    for (index, slide) in score.slides.iter().enumerate() {
        converter.slide(index, slide, &mut slide_entities);
    }

    for (note, _) in converter.taps.clone().into_iter().filter(|(_, used)| !used) {
        let critical = note.kind == TAP_CRITICAL;
        let entity = match converter.take_direction(&note) {
            Some(direction) => converter
                .note(archetype(critical, "FlickNote"), &note)
                .with_value("direction", direction),
            None => converter.note(archetype(critical, "TapNote"), &note),
        };
        level.push(entity);
    }

    level.entities.extend(slide_entities);
    level
}

struct Converter<'a> {
    score: &'a Score,
    taps: Vec<(NoteObject, bool)>,
    directionals: Vec<(NoteObject, bool)>,
}

impl Converter<'_> {
    fn beat(&self, tick: f64) -> f64 {
        tick / f64::from(self.score.ticks_per_beat)
    }

    fn note(&self, archetype: String, note: &NoteObject) -> LevelDataEntity {
        let width = f64::from(note.width);
        LevelDataEntity::new(archetype)
            .with_value("#BEAT", self.beat(note.tick))
            .with_value("lane", f64::from(note.lane) - LANE_OFFSET + width / 2.0)
            .with_value("size", width / 2.0)
    }

    /// Marks the tap at the same position as used and returns its kind.
    fn take_tap(&mut self, at: &NoteObject) -> Option<u32> {
        let (tap, used) = self
            .taps
            .iter_mut()
            .find(|(tap, used)| !*used && same_position(tap, at))?;
        *used = true;
        Some(tap.kind)
    }

    /// Marks the directional at the same position as used and returns its direction.
    fn take_direction(&mut self, at: &NoteObject) -> Option<f64> {
        let (mark, used) = self
            .directionals
            .iter_mut()
            .find(|(mark, used)| !*used && same_position(mark, at))?;
        let direction = match mark.kind {
            1 => 0.0,
            3 => -1.0,
            4 => 1.0,
            _ => return None,
        };
        *used = true;
        Some(direction)
    }

    fn slide(&mut self, index: usize, slide: &[NoteObject], out: &mut Vec<LevelDataEntity>) {
        let Some((start, rest)) = slide.split_first() else {
            return;
        };
        let critical = self.take_tap(start) == Some(TAP_CRITICAL);
        let last = rest.len();

        let mut names = Vec::with_capacity(slide.len());
        let mut previous: Option<String> = None;

        for (position, point) in slide.iter().enumerate() {
            let name = format!("slide{index}-{position}");
            let entity = if position == 0 {
                self.note(archetype(critical, "SlideStart"), point)
            } else if position == last {
                self.take_tap(point);
                match self.take_direction(point) {
                    Some(direction) => self
                        .note(archetype(critical, "SlideEndFlick"), point)
                        .with_value("direction", direction),
                    None => self.note(archetype(critical, "SlideEnd"), point),
                }
            } else {
                self.take_tap(point);
                let base = if point.kind == SLIDE_HIDDEN_STEP {
                    "HiddenSlideTick"
                } else {
                    "SlideTick"
                };
                self.note(archetype(critical, base), point)
            };

            out.push(entity.with_name(name.clone()));
            if let Some(head) = previous.replace(name.clone()) {
                names.push((head, name));
            }
        }

        for (head, tail) in names {
            out.push(
                LevelDataEntity::new(archetype(critical, "SlideConnector"))
                    .with_ref("head", head)
                    .with_ref("tail", tail),
            );
        }
    }
}

fn archetype(critical: bool, base: &str) -> String {
    if critical {
        format!("Critical{base}")
    } else {
        base.to_owned()
    }
}

fn same_position(a: &NoteObject, b: &NoteObject) -> bool {
    (a.tick - b.tick).abs() < 1e-6 && a.lane == b.lane && a.width == b.width
}
