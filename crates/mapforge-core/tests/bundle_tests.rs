//! Bundle loading, writing and batch processing against real directories.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mapforge_core::config::{Config, MapsLayout};
use mapforge_core::{
    BatchRunner, BundleStatus, Error, InfoFields, MapBundle, MapSource, SchemaGeneration, Song,
};
use serde_json::{Value, json};

fn legacy_info() -> Value {
    json!({
        "_version": "2.0.0",
        "_songName": "Song",
        "_songSubName": "",
        "_songAuthorName": "Artist",
        "_levelAuthorName": "Mapper",
        "_beatsPerMinute": 150,
        "_songFilename": "song.egg",
        "_coverImageFilename": "cover.jpg",
        "_customData": {"_contributors": []},
        "_difficultyBeatmapSets": [
            {
                "_beatmapCharacteristicName": "Standard",
                "_difficultyBeatmaps": [{
                    "_difficulty": "ExpertPlus",
                    "_difficultyRank": 9,
                    "_beatmapFilename": "ExpertPlusStandard.dat",
                    "_noteJumpMovementSpeed": 18,
                    "_noteJumpStartBeatOffset": 0.25,
                    "_customData": {"_difficultyLabel": "Finale"}
                }]
            },
            {
                "_beatmapCharacteristicName": "Lightshow",
                "_difficultyBeatmaps": [{
                    "_difficulty": "Easy",
                    "_difficultyRank": 1,
                    "_beatmapFilename": "Lightshow.dat",
                    "_noteJumpMovementSpeed": 10,
                    "_noteJumpStartBeatOffset": 0
                }]
            }
        ]
    })
}

fn current_info() -> Value {
    json!({
        "version": "4.0.0",
        "song": {"title": "Song", "subTitle": "", "author": "Artist"},
        "audio": {"songFilename": "song.ogg", "songDuration": 120.5, "bpm": 128},
        "coverImageFilename": "cover.png",
        "difficultyBeatmaps": [
            {
                "characteristic": "Standard",
                "difficulty": "Hard",
                "beatmapAuthors": {"mappers": ["Mapper"], "lighters": []},
                "beatmapDataFilename": "Hard.dat",
                "lightshowDataFilename": "Lights.dat",
                "noteJumpMovementSpeed": 14.5,
                "noteJumpStartBeatOffset": -0.5
            },
            {
                "characteristic": "OneSaber",
                "difficulty": "Expert",
                "beatmapAuthors": {"mappers": ["Mapper"], "lighters": []},
                "beatmapDataFilename": "OneSaber.dat",
                "lightshowDataFilename": "Lights.dat",
                "noteJumpMovementSpeed": 17,
                "noteJumpStartBeatOffset": 0
            }
        ]
    })
}

fn legacy_notes() -> Value {
    json!({
        "_version": "2.2.0",
        "_notes": [{"_time": 8, "_lineIndex": 1, "_lineLayer": 0, "_type": 1, "_cutDirection": 1}],
        "_events": [],
        "_obstacles": [],
        "_customData": {"_bookmarks": [{"_time": 8, "_name": "drop"}]}
    })
}

fn current_notes() -> Value {
    json!({"version": "3.3.0", "colorNotes": [{"b": 2, "x": 1, "y": 0, "c": 0, "d": 1}], "bombNotes": []})
}

fn files(info: &Value, difficulties: &[(&str, Value)]) -> Vec<(String, Vec<u8>)> {
    let mut files = vec![("Info.dat".to_string(), serde_json::to_vec(info).unwrap())];
    for (name, value) in difficulties {
        files.push((name.to_string(), serde_json::to_vec(value).unwrap()));
    }
    files.push(("song.egg".to_string(), vec![1, 2, 3, 4]));
    files
}

fn write_zip(path: &Path, files: &[(String, Vec<u8>)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in files {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
}

mod round_trip {
    use super::*;

    fn assert_round_trip(bundle: MapBundle) {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(bundle.identity());
        bundle.write(&target).unwrap();
        let reloaded = MapBundle::load(&target).unwrap();
        assert_eq!(reloaded, bundle);
    }

    #[test]
    fn test_legacy_bundle_round_trips() {
        let bundle = MapBundle::from_files(
            "legacy",
            files(
                &legacy_info(),
                &[
                    ("ExpertPlusStandard.dat", legacy_notes()),
                    ("Lightshow.dat", json!({"_version": "2.2.0", "_notes": [], "_events": []})),
                ],
            ),
        )
        .unwrap();
        assert_eq!(bundle.info().generation(), SchemaGeneration::Legacy);
        assert_round_trip(bundle);
    }

    #[test]
    fn test_current_bundle_round_trips() {
        let bundle = MapBundle::from_files(
            "current",
            files(
                &current_info(),
                &[("Hard.dat", current_notes()), ("OneSaber.dat", current_notes())],
            ),
        )
        .unwrap();
        assert_eq!(bundle.info().generation(), SchemaGeneration::Current);
        assert_eq!(bundle.info().beatmap_sets().len(), 2);
        assert_round_trip(bundle);
    }

    #[test]
    fn test_edited_bundle_round_trips() {
        let mut bundle = MapBundle::from_files(
            "edited",
            files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]),
        )
        .unwrap();
        bundle.info_mut().set_song_title("Renamed");
        for entry in bundle.info_mut().difficulties_mut() {
            entry.set_note_jump_speed(19.25);
        }
        assert_round_trip(bundle);
    }

    #[test]
    fn test_info_is_written_pretty_and_notes_compact() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = MapBundle::from_files(
            "layout",
            vec![
                ("INFO.DAT".to_string(), serde_json::to_vec(&legacy_info()).unwrap()),
                ("ExpertPlusStandard.dat".to_string(), serde_json::to_vec(&legacy_notes()).unwrap()),
            ],
        )
        .unwrap();
        bundle.write(dir.path()).unwrap();

        let info = fs::read_to_string(dir.path().join("Info.dat")).unwrap();
        assert!(info.starts_with("{\n    \"_version\""));
        let notes = fs::read_to_string(dir.path().join("ExpertPlusStandard.dat")).unwrap();
        assert!(!notes.contains('\n'));
        assert!(!notes.contains(": "));
    }
}

mod idempotent_write {
    use super::*;

    #[test]
    fn test_rewrite_performs_no_writes() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = MapBundle::from_files(
            "stable",
            files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]),
        )
        .unwrap();

        let first = bundle.write(dir.path()).unwrap();
        assert!(!first.written.is_empty());
        let modified = fs::metadata(dir.path().join("Info.dat")).unwrap().modified().unwrap();

        let second = bundle.write(dir.path()).unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged.len(), first.written.len());
        let unchanged = fs::metadata(dir.path().join("Info.dat")).unwrap().modified().unwrap();
        assert_eq!(modified, unchanged);
    }

    #[test]
    fn test_reformatted_output_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = MapBundle::from_files(
            "stable",
            files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]),
        )
        .unwrap();
        bundle.write(dir.path()).unwrap();

        // Same content, different key order and whitespace, plus a null member.
        let mut notes = legacy_notes();
        notes["_waypoints"] = Value::Null;
        fs::write(
            dir.path().join("ExpertPlusStandard.dat"),
            serde_json::to_vec_pretty(&notes).unwrap(),
        )
        .unwrap();

        let report = bundle.write(dir.path()).unwrap();
        assert!(report.written.is_empty());
    }

    #[test]
    fn test_changed_asset_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = MapBundle::from_files(
            "assets",
            files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]),
        )
        .unwrap();
        bundle.write(dir.path()).unwrap();

        bundle.insert_asset("song.egg", vec![9, 9, 9]);
        let report = bundle.write(dir.path()).unwrap();
        assert_eq!(report.written, ["song.egg"]);
        assert_eq!(fs::read(dir.path().join("song.egg")).unwrap(), [9, 9, 9]);
    }
}

mod loading {
    use super::*;

    #[test]
    fn test_load_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("1a2b (Song - Mapper).zip");
        write_zip(
            &archive,
            &files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]),
        );

        let bundle = MapBundle::load(&archive).unwrap();
        assert_eq!(bundle.identity(), "1a2b (Song - Mapper)");
        assert!(bundle.difficulty("ExpertPlusStandard.dat").is_some());
        assert_eq!(bundle.assets().get("song.egg"), Some(&vec![1, 2, 3, 4]));
        assert_eq!(bundle.dangling_references(), ["Lightshow.dat"]);
    }

    #[test]
    fn test_duplicate_info_files_are_rejected() {
        let mut raw = files(&legacy_info(), &[]);
        raw.push(("info.dat".to_string(), serde_json::to_vec(&legacy_info()).unwrap()));
        assert!(matches!(
            MapBundle::from_files("dup", raw),
            Err(Error::MissingInfoFile { found: 2 })
        ));
    }

    #[test]
    fn test_archive_with_case_colliding_assets_fails() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("clash.zip");
        let mut raw = files(&legacy_info(), &[]);
        raw.push(("Cover.jpg".to_string(), vec![1]));
        raw.push(("cover.jpg".to_string(), vec![2]));
        write_zip(&archive, &raw);

        let result = MapBundle::load(&archive);
        assert!(matches!(result, Err(Error::FileNameCollision { .. })));
    }

    #[test]
    fn test_nested_assets_are_kept() {
        let mut raw = files(&legacy_info(), &[]);
        raw.push(("sub/notes.txt".to_string(), vec![]));
        let bundle = MapBundle::from_files("nested", raw).unwrap();
        assert!(bundle.assets().contains("sub/notes.txt"));
        assert!(!bundle.assets().contains("Info.dat"));
    }

    #[test]
    fn test_missing_info_file() {
        let raw = vec![("song.egg".to_string(), vec![1u8])];
        assert!(matches!(
            MapBundle::from_files("none", raw),
            Err(Error::MissingInfoFile { found: 0 })
        ));
    }

    #[test]
    fn test_malformed_info() {
        let mut info = legacy_info();
        info.as_object_mut().unwrap().remove("_songAuthorName");
        let result = MapBundle::from_files("bad", files(&info, &[]));
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.rar");
        fs::write(&path, [0u8]).unwrap();
        assert!(matches!(MapBundle::load(&path), Err(Error::InvalidSource(_))));
    }

    #[test]
    fn test_byte_order_mark_is_accepted() {
        let mut raw = files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]);
        let mut with_bom = vec![0xef, 0xbb, 0xbf];
        with_bom.extend_from_slice(&raw[0].1);
        raw[0].1 = with_bom;
        let bundle = MapBundle::from_files("bom", raw).unwrap();
        assert_eq!(bundle.info().song_title(), "Song");
    }
}

mod batch {
    use super::*;

    fn song_archive(dir: &Path, name: &str, validated: bool) -> Song {
        let path: PathBuf = dir.join(format!("{}.zip", name));
        write_zip(
            &path,
            &files(
                &legacy_info(),
                &[
                    ("ExpertPlusStandard.dat", legacy_notes()),
                    ("Lightshow.dat", json!({"_version": "2.2.0", "_notes": [], "_events": []})),
                ],
            ),
        );
        let mut song = Song::new("Artist", name, MapSource::BeatSaver, path);
        song.validated = validated;
        song
    }

    #[test]
    fn test_batch_routes_isolates_and_prunes() {
        let downloads = tempfile::tempdir().unwrap();
        let maps = tempfile::tempdir().unwrap();
        let layout = MapsLayout::new(maps.path());
        fs::create_dir_all(layout.validated_dir().join("stale")).unwrap();

        let good = song_archive(downloads.path(), "good", true);
        let pending = song_archive(downloads.path(), "pending", false);
        let missing = Song::new(
            "Artist",
            "Missing",
            MapSource::BeatSaver,
            downloads.path().join("missing.zip"),
        );

        let mut runner = BatchRunner::new(Config::default(), layout.clone());
        let report = runner.run(&[good, pending, missing]).unwrap();

        assert_eq!(report.processed_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(layout.validated_dir().join("good").join("Info.dat").is_file());
        assert!(layout.unvalidated_dir().join("pending").join("Info.dat").is_file());
        assert!(!layout.validated_dir().join("stale").exists());
        assert_eq!(report.pruned, [layout.validated_dir().join("stale")]);
    }

    #[test]
    fn test_second_batch_run_writes_nothing() {
        let downloads = tempfile::tempdir().unwrap();
        let maps = tempfile::tempdir().unwrap();
        let songs = [song_archive(downloads.path(), "again", true)];

        let mut runner = BatchRunner::new(Config::default(), MapsLayout::new(maps.path()));
        runner.run(&songs).unwrap();
        let report = runner.run(&songs).unwrap();

        match &report.outcomes[0].status {
            BundleStatus::Processed { written, unchanged } => {
                assert_eq!(*written, 0);
                assert!(*unchanged > 0);
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_disabled_source_is_skipped_but_kept() {
        let downloads = tempfile::tempdir().unwrap();
        let maps = tempfile::tempdir().unwrap();
        let layout = MapsLayout::new(maps.path());
        fs::create_dir_all(layout.validated_dir().join("sage")).unwrap();

        let mut song = song_archive(downloads.path(), "sage", true);
        song.source = MapSource::BeatSage;
        let config = Config {
            enabled_sources: Some(vec![MapSource::BeatSaver]),
            ..Config::default()
        };

        let mut runner = BatchRunner::new(config, layout.clone());
        let report = runner.run(&[song]).unwrap();
        assert_eq!(report.skipped_count(), 1);
        assert!(layout.validated_dir().join("sage").is_dir());
    }
}

mod hash_mapping {
    use super::*;
    use mapforge_core::batch::{HASH_MAPPING_FILE_NAME, create_hash_mapping, write_hash_mapping};
    use mapforge_core::{content_hash, hash_bundle};

    fn bundle_files(title: &str) -> Vec<(String, Vec<u8>)> {
        let mut info = legacy_info();
        info["_songName"] = json!(title);
        files(
            &info,
            &[
                ("ExpertPlusStandard.dat", legacy_notes()),
                ("Lightshow.dat", legacy_notes()),
            ],
        )
    }

    fn write_dir(dir: &Path, files: &[(String, Vec<u8>)]) {
        fs::create_dir_all(dir).unwrap();
        for (name, bytes) in files {
            fs::write(dir.join(name), bytes).unwrap();
        }
    }

    #[test]
    fn test_directory_and_archive_hash_alike() {
        let dir = tempfile::tempdir().unwrap();
        let raw = bundle_files("Song");
        write_dir(&dir.path().join("loose"), &raw);
        write_zip(&dir.path().join("packed.zip"), &raw);

        let expected = content_hash(&raw).unwrap();
        assert_eq!(hash_bundle(&dir.path().join("loose")).unwrap(), expected);
        assert_eq!(hash_bundle(&dir.path().join("packed.zip")).unwrap(), expected);
    }

    #[test]
    fn test_mapping_pairs_outputs_with_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let layout = MapsLayout::new(dir.path());
        let downloads = layout.download_dir(MapSource::BeatSaver);
        fs::create_dir_all(&downloads).unwrap();

        let download = bundle_files("Song");
        let processed = bundle_files("Title (Remix)");
        write_zip(&downloads.join("abc.zip"), &download);
        write_dir(&layout.validated_dir().join("abc"), &processed);
        write_dir(&layout.unvalidated_dir().join("no-download"), &processed);

        let mapping = create_hash_mapping(&layout).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.get(&content_hash(&processed).unwrap()),
            Some(&content_hash(&download).unwrap())
        );

        let report = write_hash_mapping(&layout).unwrap();
        assert_eq!(report.written, [HASH_MAPPING_FILE_NAME]);
        let written: Value =
            serde_json::from_slice(&fs::read(layout.validated_dir().join(HASH_MAPPING_FILE_NAME)).unwrap())
                .unwrap();
        assert_eq!(
            written[content_hash(&processed).unwrap()],
            json!(content_hash(&download).unwrap())
        );

        assert!(write_hash_mapping(&layout).unwrap().is_unchanged());
    }

    #[test]
    fn test_unhashable_bundle_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let layout = MapsLayout::new(dir.path());
        let downloads = layout.download_dir(MapSource::BeatSaver);
        fs::create_dir_all(&downloads).unwrap();
        write_zip(&downloads.join("broken.zip"), &bundle_files("Song"));
        // References Lightshow.dat, which this output lacks.
        write_dir(
            &layout.validated_dir().join("broken"),
            &files(&legacy_info(), &[("ExpertPlusStandard.dat", legacy_notes())]),
        );

        assert!(create_hash_mapping(&layout).unwrap().is_empty());
    }
}
