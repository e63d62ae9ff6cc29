//! Accuracy curves over a marked evaluation table.

use themis_core::model::EvaluationRow;

mod curve;
mod precision;
mod roc;
mod sweep;

pub use curve::{Curve, CurveKind, CurvePoint};
pub use precision::precision_curve;
pub use roc::roc_curve;

pub fn compute(kind: CurveKind, rows: &[EvaluationRow]) -> Curve {
    let curve = match kind {
        CurveKind::Roc => roc_curve(rows),
        CurveKind::Precision => precision_curve(rows),
    };
    tracing::debug!(curve = kind.name(), rows = rows.len(), points = curve.points.len(), "computed curve");
    curve
}
