// crates/mp_io/tests/emit_roundtrip.rs

//! 端到端输出测试
//!
//! 快照写盘 -> 读取流场 -> 追踪 -> 写出汇总表与轨迹。

use glam::DVec3;
use mp_io::{load_case, CaseSnapshot, ResultEmitter, SUMMARY_HEADER};
use mp_mesh::{BoxMeshGenerator, FlowField};
use mp_track::{SeedStrategy, TrackSettings, TrackingSession};

fn write_channel_case(dir: &std::path::Path) -> std::path::PathBuf {
    let mesh = BoxMeshGenerator::new([4, 1, 1], DVec3::ZERO, DVec3::new(4.0, 1.0, 1.0))
        .build()
        .unwrap();
    let field = FlowField::uniform(mesh, DVec3::new(2.0, 0.0, 0.0)).unwrap();
    let path = dir.join("snapshot.json");
    CaseSnapshot::from_flow_field(&field).save(&path).unwrap();
    path
}

#[test]
fn test_track_and_emit() {
    let dir = tempfile::tempdir().unwrap();
    let case = write_channel_case(dir.path());
    let field = load_case(&case).unwrap();

    let report = TrackingSession::new(&field, TrackSettings::default())
        .run(&SeedStrategy::PatchAuto {
            patch: "xmin".into(),
        })
        .unwrap();
    assert_eq!(report.summary.exited, 1);

    let summary_path = dir.path().join("postProcessing/particlesData.csv");
    let vtk_dir = dir.path().join("VTK");
    let files = ResultEmitter::new(&summary_path)
        .with_vtk_dir(&vtk_dir)
        .emit(&report.particles)
        .unwrap();

    assert_eq!(files.summary, summary_path);
    assert_eq!(files.trajectories, vec![vtk_dir.join("particle_1_path.vtk")]);

    let csv = std::fs::read_to_string(&summary_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(SUMMARY_HEADER));
    let row: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(row[0], "1");
    assert_eq!(&row[3..], &["no", "yes", "xmax"]);
    assert!(lines.next().is_none());

    let vtk = std::fs::read_to_string(&files.trajectories[0]).unwrap();
    let n = report.particles[0].trajectory().len();
    assert!(vtk.starts_with("# vtk DataFile Version 2.1\nparticle_1_path\nASCII\nDATASET POLYDATA\n"));
    assert!(vtk.contains(&format!("POINTS {} DOUBLE", n)));
    assert!(vtk.contains(&format!("LINES 1 {}\n{}\n", n + 1, n)));
}

#[test]
fn test_summary_only_when_vtk_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let case = write_channel_case(dir.path());
    let field = load_case(&case).unwrap();

    let report = TrackingSession::new(&field, TrackSettings::default())
        .run(&SeedStrategy::points(vec![DVec3::new(0.5, 0.5, 0.5)]))
        .unwrap();

    let out = dir.path().join("out/summary.csv");
    let files = ResultEmitter::new(&out).emit(&report.particles).unwrap();
    assert!(out.exists());
    assert!(files.trajectories.is_empty());
    assert!(!dir.path().join("VTK").exists());
}

#[test]
fn test_missing_case_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_case(dir.path().join("nope.json")).err().unwrap();
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_malformed_case_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ \"mesh\": 3 }").unwrap();
    let err = load_case(&path).err().unwrap();
    assert!(matches!(err, mp_io::IoError::ParseError { .. }));
}
