//! SUS chart format.

mod convert;
mod line;
mod score;

use self::score::Score;
use crate::TRACING_TARGET_CHART;
use crate::chart::{ChartParser, ParseResult};
use crate::level::LevelData;

/// Parser for SUS chart files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SusParser;

impl SusParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl ChartParser for SusParser {
    fn parse(&self, text: &str) -> ParseResult<LevelData> {
        let score = Score::analyze(text)?;
        let level = convert::to_level_data(&score);

        tracing::debug!(
            target: TRACING_TARGET_CHART,
            title = score.title.as_deref().unwrap_or_default(),
            ticks_per_beat = score.ticks_per_beat,
            taps = score.taps.len(),
            slides = score.slides.len(),
            entities = level.entities.len(),
            "Parsed SUS chart"
        );

        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelDataEntity;

    const CHART: &str = "\
This line is a comment.
#TITLE \"Test Song\"
#ARTIST \"Nobody\"
#WAVEOFFSET 0.1
#REQUEST \"ticks_per_beat 480\"

#BPM01: 120
#00002: 4
#00008: 01

#00010: 1400
#00014: 0022
#00016: 0014
#00056: 0034
#00130a: 12002200
#00110: 2200
";

    fn beat(entity: &LevelDataEntity) -> f64 {
        entity.value("#BEAT").unwrap()
    }

    #[test]
    fn converts_sample_chart() {
        let level = SusParser.parse(CHART).unwrap();

        assert_eq!(level.bgm_offset, 0.1);
        assert_eq!(level.entities[0].archetype, "Initialization");
        assert_eq!(level.entities[1].archetype, "Stage");

        let bpm: Vec<_> = level.archetype("BpmChange").collect();
        assert_eq!(bpm.len(), 1);
        assert_eq!(bpm[0].value("#BPM"), Some(120.0));

        let tap = level.archetype("TapNote").next().unwrap();
        assert_eq!(beat(tap), 0.0);
        assert_eq!(tap.value("lane"), Some(-6.0));
        assert_eq!(tap.value("size"), Some(2.0));

        let critical = level.archetype("CriticalTapNote").next().unwrap();
        assert_eq!(beat(critical), 2.0);
        assert_eq!(critical.value("lane"), Some(-3.0));

        let flick = level.archetype("FlickNote").next().unwrap();
        assert_eq!(beat(flick), 2.0);
        assert_eq!(flick.value("direction"), Some(-1.0));
        assert_eq!(flick.value("lane"), Some(0.0));
    }

    #[test]
    fn links_slide_points() {
        let level = SusParser.parse(CHART).unwrap();

        let start = level.archetype("CriticalSlideStart").next().unwrap();
        let end = level.archetype("CriticalSlideEnd").next().unwrap();
        assert_eq!(beat(start), 4.0);
        assert_eq!(beat(end), 6.0);

        let connector = level.archetype("CriticalSlideConnector").next().unwrap();
        assert_eq!(connector.reference("head"), start.name.as_deref());
        assert_eq!(connector.reference("tail"), end.name.as_deref());

        // The critical tap under the slide start is absorbed by the slide.
        assert_eq!(level.archetype("CriticalTapNote").count(), 1);
    }

    #[test]
    fn note_before_bar_reports_missing_bar() {
        let err = SusParser.parse("#00102: 4\n#00010: 14\n").unwrap_err();
        assert!(err.is_missing_bar());
        assert!(err.to_string().starts_with("Unexpected missing bar"));
    }

    #[test]
    fn empty_chart_has_default_tempo() {
        let level = SusParser::new().parse("").unwrap();
        let archetypes: Vec<_> = level.entities.iter().map(|e| e.archetype.as_str()).collect();
        assert_eq!(archetypes, vec!["Initialization", "Stage", "BpmChange"]);
    }
}
