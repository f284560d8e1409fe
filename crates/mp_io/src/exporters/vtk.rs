// crates/mp_io/src/exporters/vtk.rs

//! VTK 折线导出器
//!
//! 每个粒子导出一个 legacy VTK POLYDATA 文件：一个 `POINTS` 块和一条 `LINES` 折线，
//! 顶点数等于轨迹长度，不重采样也不去重。可直接在 ParaView 中打开。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;

use crate::error::{IoError, IoResult};

/// VTK 文件版本行
const VTK_VERSION: &str = "# vtk DataFile Version 2.1";

/// 粒子轨迹文件名
pub fn trajectory_file_name(id: usize) -> String {
    format!("particle_{}_path.vtk", id)
}

/// VTK 折线导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct VtkPolylineExporter;

impl VtkPolylineExporter {
    /// 创建导出器
    pub fn new() -> Self {
        Self
    }

    /// 导出单条折线到文件
    pub fn export(&self, path: impl AsRef<Path>, title: &str, points: &[DVec3]) -> IoResult<()> {
        let path = path.as_ref();
        if points.is_empty() {
            return Err(IoError::Export {
                path: path.to_path_buf(),
                message: "折线至少需要一个点".to_string(),
            });
        }

        let file = File::create(path).map_err(|e| IoError::file(path, e))?;
        let mut w = BufWriter::new(file);
        self.write(&mut w, title, points)
            .and_then(|_| w.flush())
            .map_err(|e| IoError::file(path, e))
    }

    /// 写出折线
    pub fn write<W: Write>(&self, w: &mut W, title: &str, points: &[DVec3]) -> std::io::Result<()> {
        let n = points.len();

        writeln!(w, "{}", VTK_VERSION)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET POLYDATA")?;
        writeln!(w)?;

        writeln!(w, "POINTS {} DOUBLE", n)?;
        for p in points {
            writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(w)?;

        writeln!(w, "LINES 1 {}", n + 1)?;
        writeln!(w, "{}", n)?;
        for i in 0..n {
            writeln!(w, "{}", i)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_layout() {
        let points = vec![DVec3::ZERO, DVec3::new(0.5, 0.0, 0.0), DVec3::new(1.0, 0.25, 0.0)];
        let mut buf = Vec::new();
        VtkPolylineExporter::new()
            .write(&mut buf, "particle_1_path", &points)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();

        let expected = "\
# vtk DataFile Version 2.1
particle_1_path
ASCII
DATASET POLYDATA

POINTS 3 DOUBLE
0 0 0
0.5 0 0
1 0.25 0

LINES 1 4
3
0
1
2
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_single_point_polyline() {
        let mut buf = Vec::new();
        VtkPolylineExporter::new()
            .write(&mut buf, "p", &[DVec3::ONE])
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("POINTS 1 DOUBLE\n1 1 1\n"));
        assert!(text.ends_with("LINES 1 2\n1\n0\n"));
    }

    #[test]
    fn test_empty_polyline_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.vtk");
        let err = VtkPolylineExporter::new().export(&path, "empty", &[]).unwrap_err();
        assert!(matches!(err, IoError::Export { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(trajectory_file_name(12), "particle_12_path.vtk");
    }
}
