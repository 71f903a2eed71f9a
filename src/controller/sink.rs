//! Persistence of improved tours.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::models::{Cost, Instance};

/// Which file a written tour is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourIdentity {
    /// The tour file updated while the run is in progress.
    Working,
    /// The final output tour file.
    Output,
}

/// Receives every new best tour as soon as it is found.
///
/// All hooks default to doing nothing. Errors abort the run.
pub trait TourSink {
    fn record_better_tour(&mut self, _order: &[usize], _cost: Cost) -> Result<()> {
        Ok(())
    }

    fn record_best_tour(&mut self, _order: &[usize], _cost: Cost) -> Result<()> {
        Ok(())
    }

    fn write_tour(
        &mut self,
        _identity: TourIdentity,
        _instance: &Instance,
        _order: &[usize],
        _cost: Cost,
    ) -> Result<()> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TourSink for NullSink {}

/// Writes tours in the TSPLIB `TOUR` format.
///
/// A `$` in a file name is replaced by the tour cost, so every improvement
/// can be kept in its own file.
///
/// # Examples
///
/// ```
/// use u_tsp::controller::{TourIdentity, TourSink, TsplibTourWriter};
/// use u_tsp::models::{Cost, Instance, Point};
///
/// let dir = tempfile::tempdir().unwrap();
/// let points: Vec<Point> = (0..4).map(|i| Point::new(i as f64, 0.0)).collect();
/// let inst = Instance::from_points("line4", &points).unwrap();
///
/// let mut writer = TsplibTourWriter::new().with_output(dir.path().join("best.$.tour"));
/// writer
///     .write_tour(TourIdentity::Output, &inst, &[0, 1, 2, 3], Cost::new(6))
///     .unwrap();
/// assert!(dir.path().join("best.6.tour").exists());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TsplibTourWriter {
    working: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl TsplibTourWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working(mut self, path: impl Into<PathBuf>) -> Self {
        self.working = Some(path.into());
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    fn path_for(&self, identity: TourIdentity) -> Option<&Path> {
        match identity {
            TourIdentity::Working => self.working.as_deref(),
            TourIdentity::Output => self.output.as_deref(),
        }
    }
}

impl TourSink for TsplibTourWriter {
    fn write_tour(
        &mut self,
        identity: TourIdentity,
        instance: &Instance,
        order: &[usize],
        cost: Cost,
    ) -> Result<()> {
        let Some(template) = self.path_for(identity) else {
            return Ok(());
        };
        let path = expand_cost(template, cost);
        info!("Writing tour to {}", path.display());

        let mut out = BufWriter::new(File::create(&path)?);
        write_tsplib_tour(&mut out, instance.name(), order, cost)?;
        out.flush()?;
        Ok(())
    }
}

/// Replaces every `$` in the file name with the cost value.
fn expand_cost(template: &Path, cost: Cost) -> PathBuf {
    let text = template.to_string_lossy();
    if text.contains('$') {
        PathBuf::from(text.replace('$', &cost.value().to_string()))
    } else {
        template.to_path_buf()
    }
}

/// Serializes one tour; node ids are written 1-based.
fn write_tsplib_tour<W: Write>(out: &mut W, name: &str, order: &[usize], cost: Cost) -> Result<()> {
    writeln!(out, "NAME : {name}.{}.tour", cost.value())?;
    writeln!(out, "COMMENT : Length = {}", cost.value())?;
    writeln!(out, "COMMENT : Found by u-tsp")?;
    writeln!(out, "TYPE : TOUR")?;
    writeln!(out, "DIMENSION : {}", order.len())?;
    writeln!(out, "TOUR_SECTION")?;
    for &v in order {
        writeln!(out, "{}", v + 1)?;
    }
    writeln!(out, "-1")?;
    writeln!(out, "EOF")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn inst() -> Instance {
        let points: Vec<Point> = (0..3).map(|i| Point::new(i as f64, 1.0)).collect();
        Instance::from_points("tri", &points).expect("valid")
    }

    #[test]
    fn test_tsplib_layout() {
        let mut buf = Vec::new();
        write_tsplib_tour(&mut buf, "tri", &[0, 2, 1], Cost::new(4)).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "NAME : tri.4.tour\nCOMMENT : Length = 4\nCOMMENT : Found by u-tsp\n\
             TYPE : TOUR\nDIMENSION : 3\nTOUR_SECTION\n1\n3\n2\n-1\nEOF\n"
        );
    }

    #[test]
    fn test_expand_cost() {
        assert_eq!(
            expand_cost(Path::new("out/run.$.tour"), Cost::new(42)),
            PathBuf::from("out/run.42.tour")
        );
        assert_eq!(
            expand_cost(Path::new("plain.tour"), Cost::new(42)),
            PathBuf::from("plain.tour")
        );
    }

    #[test]
    fn test_writes_only_configured_identities() {
        let dir = tempfile::tempdir().expect("tempdir");
        let working = dir.path().join("work.tour");
        let mut writer = TsplibTourWriter::new().with_working(&working);
        writer
            .write_tour(TourIdentity::Output, &inst(), &[0, 1, 2], Cost::new(4))
            .expect("skip");
        assert!(!working.exists());
        writer
            .write_tour(TourIdentity::Working, &inst(), &[0, 1, 2], Cost::new(4))
            .expect("write");
        let text = std::fs::read_to_string(&working).expect("read");
        assert!(text.starts_with("NAME : tri.4.tour"));
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let mut writer = TsplibTourWriter::new().with_output("/nonexistent/dir/best.tour");
        let result = writer.write_tour(TourIdentity::Output, &inst(), &[0, 1, 2], Cost::new(4));
        assert!(result.is_err());
    }
}
