use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Roc,
    Precision,
}

impl CurveKind {
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Roc => "roc",
            CurveKind::Precision => "precision",
        }
    }

    /// Column headers for the x and y coordinates.
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self {
            CurveKind::Roc => ("False Positive Rate", "True Positive Rate"),
            CurveKind::Precision => ("Coverage", "Precision"),
        }
    }
}

impl std::str::FromStr for CurveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roc" => Ok(CurveKind::Roc),
            "precision" => Ok(CurveKind::Precision),
            other => Err(format!("unknown curve '{}' (expected roc|precision)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Lowest confidence admitted at this point.
    pub threshold: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub kind: CurveKind,
    pub points: Vec<CurvePoint>,
}

impl Curve {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Writes `Threshold, <x label>, <y label>` rows with a header.
    pub fn write_to<W: Write>(&self, w: W, delimiter: u8) -> anyhow::Result<()> {
        let (x, y) = self.kind.labels();
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(w);
        wtr.write_record(["Threshold", x, y])?;
        for p in &self.points {
            wtr.write_record([p.threshold.to_string(), p.x.to_string(), p.y.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_header_and_rows() -> anyhow::Result<()> {
        let curve = Curve {
            kind: CurveKind::Precision,
            points: vec![CurvePoint {
                threshold: 0.9,
                x: 0.5,
                y: 1.0,
            }],
        };
        let mut buf = Vec::new();
        curve.write_to(&mut buf, b',')?;
        assert_eq!(
            String::from_utf8(buf)?,
            "Threshold,Coverage,Precision\n0.9,0.5,1\n"
        );
        Ok(())
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("roc".parse::<CurveKind>(), Ok(CurveKind::Roc));
        assert!("pr".parse::<CurveKind>().is_err());
    }
}
