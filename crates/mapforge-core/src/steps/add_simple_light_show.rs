use tracing::{debug, info};

use crate::bundle::MapBundle;
use crate::error::Result;
use crate::lightshow::synthesize;
use crate::map::SchemaGeneration;
use crate::pipeline::Step;
use crate::song::Song;

/// Generates lighting from the notes of difficulties that have no events.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddSimpleLightShow;

impl Step for AddSimpleLightShow {
    fn name(&self) -> &'static str {
        "AddSimpleLightShow"
    }

    fn apply(&self, bundle: &mut MapBundle, _song: &Song) -> Result<()> {
        for (name, data) in bundle.difficulties_mut().iter_mut() {
            if data.generation() != SchemaGeneration::Legacy {
                info!(
                    "{} uses the {} note format, which light show generation does not support",
                    name,
                    data.generation()
                );
                continue;
            }
            if data.has_events() {
                continue;
            }

            let events = synthesize(&data.notes()?);
            if events.is_empty() {
                debug!("{} has no notes to light", name);
                continue;
            }
            info!("Adding a simple light show to {}", name);
            data.set_events(&events)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::steps::test_support::*;

    fn single_difficulty(data: serde_json::Value) -> MapBundle {
        bundle(
            info(120.0, json!([{
                "_beatmapCharacteristicName": "Standard",
                "_difficultyBeatmaps": [entry("Expert", 7, "Expert.dat", 16.0, 0.0)]
            }])),
            vec![("Expert.dat", data)],
        )
    }

    #[test]
    fn test_generates_events() {
        let mut bundle = single_difficulty(notes(json!([
            {"_time": 1, "_lineIndex": 0, "_lineLayer": 0, "_type": 0, "_cutDirection": 1},
            {"_time": 2, "_lineIndex": 3, "_lineLayer": 0, "_type": 1, "_cutDirection": 1}
        ])));

        AddSimpleLightShow.apply(&mut bundle, &song()).unwrap();
        let value = bundle.difficulty("Expert.dat").unwrap().to_value();
        let events = value["_events"].as_array().unwrap();
        assert!(!events.is_empty());
        assert_eq!(events[0]["_type"], json!(12));
        assert_eq!(events[1]["_type"], json!(13));
        assert_eq!(value["_obstacles"], json!([]));
    }

    #[test]
    fn test_existing_events_are_kept() {
        let mut data = notes(json!([{"_time": 1, "_lineIndex": 0, "_type": 0}]));
        data["_events"] = json!([{"_time": 0, "_type": 4, "_value": 1}]);
        let mut bundle = single_difficulty(data);
        let before = bundle.clone();

        AddSimpleLightShow.apply(&mut bundle, &song()).unwrap();
        assert_eq!(bundle, before);
    }

    #[test]
    fn test_current_format_is_skipped() {
        let mut bundle = single_difficulty(json!({
            "version": "3.0.0",
            "colorNotes": [{"b": 1, "x": 0, "y": 0, "c": 0, "d": 1}],
            "basicBeatmapEvents": []
        }));
        let before = bundle.clone();

        AddSimpleLightShow.apply(&mut bundle, &song()).unwrap();
        assert_eq!(bundle, before);
    }
}
