use std::fmt::{Display, Formatter, Result as FmtResult};

/// Summary of one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub items_seen: u64,
    pub items_skipped: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub seconds: f64,
}

impl Snapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, acc={}, kappa={}, t={:.6}s",
            self.items_seen,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.seconds
        )?;
        if self.items_skipped > 0 {
            write!(f, ", skipped={}", self.items_skipped)?;
        }
        Ok(())
    }
}
