//! Timing analysis: turns SUS lines into tick-positioned score objects.

use std::collections::HashMap;

use super::line::{SusLine, base36, lines, objects, unquote};
use crate::chart::{ParseError, ParseResult};

/// Ticks per beat when the chart does not request a resolution.
pub(crate) const DEFAULT_TICKS_PER_BEAT: u32 = 480;

/// Tempo used when the chart declares no BPM change.
pub(crate) const DEFAULT_BPM: f64 = 120.0;

/// A positioned note object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NoteObject {
    pub tick: f64,
    pub lane: u32,
    pub width: u32,
    pub kind: u32,
}

/// A tempo change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BpmChange {
    pub tick: f64,
    pub bpm: f64,
}

/// Timing-resolved contents of a SUS file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Score {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub designer: Option<String>,
    pub wave_offset: f64,
    pub ticks_per_beat: u32,
    pub bpm_changes: Vec<BpmChange>,
    pub taps: Vec<NoteObject>,
    pub directionals: Vec<NoteObject>,
    pub slides: Vec<Vec<NoteObject>>,
}

/// A bar-length region, resolved to absolute ticks.
#[derive(Debug, Clone, Copy)]
struct Bar {
    measure: u32,
    ticks_per_measure: f64,
    ticks: f64,
}

/// Measure data awaiting bar resolution.
#[derive(Debug, Clone, Copy)]
struct MeasureLine<'a> {
    measure: u32,
    channel: &'a str,
    data: &'a str,
    line: usize,
}

impl Score {
    /// Analyzes SUS text into a score.
    pub(crate) fn analyze(text: &str) -> ParseResult<Self> {
        let mut score = Score {
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            ..Score::default()
        };

        let mut bpm_slots = HashMap::new();
        let mut bar_lengths = Vec::new();
        let mut measure_lines = Vec::new();

        for line in lines(text) {
            match line {
                SusLine::Meta { key, value, line } => score.apply_meta(key, value, line)?,
                SusLine::Data { header, data, line } => {
                    if let Some(slot) = header.strip_prefix("BPM") {
                        bpm_slots.insert(slot.to_owned(), parse_positive(data, line)?);
                        continue;
                    }

                    let Some((measure, channel)) = split_measure(header) else {
                        continue;
                    };

                    if channel == "02" {
                        bar_lengths.push((measure, parse_positive(data, line)?));
                    } else {
                        measure_lines.push(MeasureLine {
                            measure,
                            channel,
                            data,
                            line,
                        });
                    }
                }
            }
        }

        let bars = resolve_bars(bar_lengths, score.ticks_per_beat);
        let mut slide_objects: HashMap<char, Vec<NoteObject>> = HashMap::new();

        for entry in measure_lines {
            let mut channel = entry.channel.chars();
            match (channel.next(), channel.next(), channel.next(), channel.next()) {
                (Some('0'), Some('8'), None, None) => {
                    score.read_bpm_changes(&bars, &bpm_slots, entry)?;
                }
                (Some('1'), Some(lane), None, None) => {
                    let lane = lane_of(lane, entry)?;
                    score.taps.extend(read_notes(&bars, lane, entry)?);
                }
                (Some('5'), Some(lane), None, None) => {
                    let lane = lane_of(lane, entry)?;
                    score.directionals.extend(read_notes(&bars, lane, entry)?);
                }
                (Some('3'), Some(lane), Some(id), None) => {
                    let lane = lane_of(lane, entry)?;
                    slide_objects
                        .entry(id)
                        .or_default()
                        .extend(read_notes(&bars, lane, entry)?);
                }
                _ => {}
            }
        }

        score.bpm_changes.sort_by(|a, b| a.tick.total_cmp(&b.tick));
        if score.bpm_changes.first().is_none_or(|change| change.tick > 0.0) {
            score.bpm_changes.insert(
                0,
                BpmChange {
                    tick: 0.0,
                    bpm: DEFAULT_BPM,
                },
            );
        }

        score.taps.sort_by(|a, b| a.tick.total_cmp(&b.tick));
        score.directionals.sort_by(|a, b| a.tick.total_cmp(&b.tick));
        score.slides = group_slides(slide_objects)?;

        Ok(score)
    }

    fn apply_meta(&mut self, key: &str, value: &str, line: usize) -> ParseResult<()> {
        match key {
            "TITLE" => self.title = Some(unquote(value).to_owned()),
            "ARTIST" => self.artist = Some(unquote(value).to_owned()),
            "DESIGNER" => self.designer = Some(unquote(value).to_owned()),
            "WAVEOFFSET" => self.wave_offset = parse_number(value, line)?,
            "REQUEST" => {
                let mut parts = unquote(value).split_whitespace();
                if parts.next() == Some("ticks_per_beat") {
                    let raw = parts.next().unwrap_or_default();
                    self.ticks_per_beat = match raw.parse::<u32>() {
                        Ok(ticks) if ticks > 0 => ticks,
                        _ => return Err(ParseError::InvalidTicksPerBeat(raw.to_owned())),
                    };
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn read_bpm_changes(
        &mut self,
        bars: &[Bar],
        bpm_slots: &HashMap<String, f64>,
        entry: MeasureLine<'_>,
    ) -> ParseResult<()> {
        let objects = objects(entry.data).ok_or_else(|| malformed(entry))?;
        let count = objects.len();

        for (index, [a, b]) in objects.into_iter().enumerate() {
            if a == '0' && b == '0' {
                continue;
            }

            let slot: String = [a, b].iter().collect();
            let bpm = *bpm_slots.get(&slot).ok_or(ParseError::UnknownBpm {
                slot,
                line: entry.line,
            })?;

            self.bpm_changes.push(BpmChange {
                tick: to_tick(bars, entry, index, count)?,
                bpm,
            });
        }

        Ok(())
    }
}

/// Splits a `mmmCC` header into its measure number and channel.
fn split_measure(header: &str) -> Option<(u32, &str)> {
    let digits = header.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) || header.len() < 5 {
        return None;
    }

    Some((digits.parse().ok()?, &header[3..]))
}

/// Orders bar-length definitions and accumulates their starting ticks.
///
/// The result is sorted by descending measure so lookups can take the first
/// bar at or before a given measure.
fn resolve_bars(mut lengths: Vec<(u32, f64)>, ticks_per_beat: u32) -> Vec<Bar> {
    lengths.sort_by_key(|(measure, _)| *measure);

    let ticks_per_beat = f64::from(ticks_per_beat);
    let mut bars: Vec<Bar> = Vec::with_capacity(lengths.len());

    for (measure, beats) in lengths {
        let ticks = match bars.last() {
            Some(prev) => prev.ticks + f64::from(measure - prev.measure) * prev.ticks_per_measure,
            None => 0.0,
        };

        bars.push(Bar {
            measure,
            ticks_per_measure: beats * ticks_per_beat,
            ticks,
        });
    }

    bars.reverse();
    bars
}

/// Converts object `index` of `count` in a measure line to an absolute tick.
fn to_tick(bars: &[Bar], entry: MeasureLine<'_>, index: usize, count: usize) -> ParseResult<f64> {
    let bar = bars
        .iter()
        .find(|bar| entry.measure >= bar.measure)
        .ok_or(ParseError::MissingBar {
            measure: entry.measure,
            line: entry.line,
        })?;

    Ok(bar.ticks
        + f64::from(entry.measure - bar.measure) * bar.ticks_per_measure
        + (index as f64 * bar.ticks_per_measure) / count as f64)
}

fn read_notes(bars: &[Bar], lane: u32, entry: MeasureLine<'_>) -> ParseResult<Vec<NoteObject>> {
    let objects = objects(entry.data).ok_or_else(|| malformed(entry))?;
    let count = objects.len();
    let mut notes = Vec::new();

    for (index, [kind, width]) in objects.into_iter().enumerate() {
        let kind = base36(kind).ok_or_else(|| malformed(entry))?;
        let width = base36(width).ok_or_else(|| malformed(entry))?;
        if kind == 0 || width == 0 {
            continue;
        }

        notes.push(NoteObject {
            tick: to_tick(bars, entry, index, count)?,
            lane,
            width,
            kind,
        });
    }

    Ok(notes)
}

/// Splits per-channel slide objects into individual slides.
///
/// Kind 1 opens a slide, 3 and 5 are steps, 2 closes it.
fn group_slides(channels: HashMap<char, Vec<NoteObject>>) -> ParseResult<Vec<Vec<NoteObject>>> {
    let mut channels: Vec<_> = channels.into_iter().collect();
    channels.sort_by_key(|(id, _)| *id);

    let mut slides = Vec::new();

    for (channel, mut notes) in channels {
        notes.sort_by(|a, b| a.tick.total_cmp(&b.tick));
        let mut current: Option<Vec<NoteObject>> = None;

        for note in notes {
            match (note.kind, current.as_mut()) {
                (1, None) => current = Some(vec![note]),
                (1, Some(_)) => return Err(ParseError::UnterminatedSlide { channel }),
                (3 | 5, Some(slide)) => slide.push(note),
                (2, Some(slide)) => {
                    slide.push(note);
                    slides.extend(current.take());
                }
                (2 | 3 | 5, None) => {
                    return Err(ParseError::OrphanSlideNote {
                        channel,
                        tick: note.tick,
                    });
                }
                _ => {}
            }
        }

        if current.is_some() {
            return Err(ParseError::UnterminatedSlide { channel });
        }
    }

    slides.sort_by(|a, b| a[0].tick.total_cmp(&b[0].tick));
    Ok(slides)
}

fn lane_of(c: char, entry: MeasureLine<'_>) -> ParseResult<u32> {
    base36(c).ok_or_else(|| malformed(entry))
}

/// Parses a finite number. `NaN` and infinities are rejected.
fn parse_number(value: &str, line: usize) -> ParseResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ParseError::InvalidNumber {
            value: value.to_owned(),
            line,
        }),
    }
}

/// Parses a finite number greater than zero, as bar lengths and tempos must be.
fn parse_positive(value: &str, line: usize) -> ParseResult<f64> {
    match parse_number(value, line)? {
        number if number > 0.0 => Ok(number),
        _ => Err(ParseError::InvalidNumber {
            value: value.to_owned(),
            line,
        }),
    }
}

fn malformed(entry: MeasureLine<'_>) -> ParseError {
    ParseError::MalformedData {
        data: entry.data.to_owned(),
        line: entry.line,
    }
}
