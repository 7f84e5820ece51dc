use super::*;

#[test]
fn sanitize_replaces_everything_outside_the_safe_set() {
    assert_eq!(sanitize_component("HQ Bldg/2nd.floor"), "HQ_Bldg_2nd_floor");
    assert_eq!(sanitize_component("a-b_c9"), "a-b_c9");
    assert_eq!(sanitize_component("Étage"), "_tage");
}

#[test]
fn namer_is_deterministic_and_suffixes_collisions() {
    let mut n = ArtifactNamer::new();
    assert_eq!(n.file_name("hq", "1"), "hq_1.png");
    assert_eq!(n.file_name("hq", "1"), "hq_1-2.png");
    // different ids that sanitize to the same stem
    assert_eq!(n.file_name("hq", "1/"), "hq_1_.png");
    assert_eq!(n.file_name("hq", "1?"), "hq_1_-2.png");
    assert_eq!(n.file_name("hq", "1"), "hq_1-3.png");
}

#[test]
fn write_manifest_serializes_report() {
    let dir = std::env::temp_dir().join(format!(
        "floorplan_overlay_manifest_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let path = dir.join("report.json");

    let report = RenderReport {
        artifacts: vec![FloorArtifact {
            floor_id: "f1".to_owned(),
            floor_name: "Ground".to_owned(),
            path: PathBuf::from("out/hq_f1.png"),
            markers_drawn: 3,
            markers_rejected: 0,
        }],
        skipped: vec![SkippedFloor {
            floor_id: "f2".to_owned(),
            reason: "data error: floor image unavailable".to_owned(),
        }],
    };
    report.write_manifest(&path).unwrap();

    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(v["artifacts"][0]["floor_id"], "f1");
    assert_eq!(v["artifacts"][0]["markers_drawn"], 3);
    assert_eq!(v["skipped"][0]["reason"], "data error: floor image unavailable");
    assert_eq!(report.paths(), vec![Path::new("out/hq_f1.png")]);

    let _ = std::fs::remove_dir_all(&dir);
}
