use serde::{Deserialize, Serialize};

/// One threshold of a descending ladder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rung {
    pub min: f64,
    pub points: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Rung {
    pub fn new(min: f64, points: f64) -> Self {
        Self { min, points, label: None }
    }

    pub fn labeled(min: f64, points: f64, label: &str) -> Self {
        Self { min, points, label: Some(label.to_string()) }
    }
}

/// Result of evaluating a ladder or band table.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub points: f64,
    pub label: Option<String>,
}

impl Step {
    fn none() -> Self {
        Self { points: 0.0, label: None }
    }
}

/// Descending thresholds, evaluated top-down; the first rung whose `min` the
/// value reaches wins. Values below every rung score zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Ladder {
    pub rungs: Vec<Rung>,
}

impl Ladder {
    pub fn new(rungs: Vec<Rung>) -> Self {
        Self { rungs }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|(min, points)| Rung::new(*min, *points)).collect())
    }

    pub fn step(&self, value: f64) -> Step {
        self.rungs
            .iter()
            .find(|rung| value >= rung.min)
            .map(|rung| Step { points: rung.points, label: rung.label.clone() })
            .unwrap_or_else(Step::none)
    }

    pub fn evaluate(&self, value: f64) -> f64 {
        self.step(value).points
    }

    pub fn max_points(&self) -> f64 {
        self.rungs.iter().map(|r| r.points).fold(0.0, f64::max)
    }

    pub fn validate(&self, name: &str) -> Result<(), String> {
        for pair in self.rungs.windows(2) {
            if pair[0].min <= pair[1].min {
                return Err(format!(
                    "Ladder {} must have strictly descending thresholds ({} then {})",
                    name, pair[0].min, pair[1].min
                ));
            }
        }
        if self.rungs.iter().any(|r| !r.min.is_finite() || !r.points.is_finite()) {
            return Err(format!("Ladder {} contains a non-finite value", name));
        }
        Ok(())
    }
}

/// Inclusive upper bound of one band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Band {
    pub up_to: f64,
    pub points: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Band {
    pub fn labeled(up_to: f64, points: f64, label: &str) -> Self {
        Self { up_to, points, label: Some(label.to_string()) }
    }
}

/// Ascending bands, evaluated bottom-up; the first band whose `up_to` covers the
/// value wins, and values above every band take `otherwise`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandLadder {
    pub bands: Vec<Band>,
    pub otherwise: f64,
    #[serde(default)]
    pub otherwise_label: Option<String>,
}

impl BandLadder {
    pub fn step(&self, value: f64) -> Step {
        self.bands
            .iter()
            .find(|band| value <= band.up_to)
            .map(|band| Step { points: band.points, label: band.label.clone() })
            .unwrap_or_else(|| Step { points: self.otherwise, label: self.otherwise_label.clone() })
    }

    pub fn evaluate(&self, value: f64) -> f64 {
        self.step(value).points
    }

    pub fn max_points(&self) -> f64 {
        self.bands.iter().map(|b| b.points).fold(self.otherwise, f64::max)
    }

    pub fn validate(&self, name: &str) -> Result<(), String> {
        for pair in self.bands.windows(2) {
            if pair[0].up_to >= pair[1].up_to {
                return Err(format!(
                    "Bands {} must have strictly ascending bounds ({} then {})",
                    name, pair[0].up_to, pair[1].up_to
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_first_match_wins() {
        let ladder = Ladder::from_pairs(&[(3.0, 10.0), (2.0, 7.0), (1.0, 2.0)]);
        assert_eq!(ladder.evaluate(5.0), 10.0);
        assert_eq!(ladder.evaluate(2.0), 7.0);
        assert_eq!(ladder.evaluate(1.2), 2.0);
        assert_eq!(ladder.evaluate(0.5), 0.0);
        assert_eq!(ladder.max_points(), 10.0);
    }

    #[test]
    fn test_ladder_rejects_ascending_thresholds() {
        let ladder = Ladder::from_pairs(&[(1.0, 1.0), (2.0, 2.0)]);
        assert!(ladder.validate("broken").is_err());
    }

    #[test]
    fn test_bands_inclusive_upper_bound() {
        let bands = BandLadder {
            bands: vec![Band::labeled(5.0, 6.0, "A"), Band::labeled(15.0, 5.0, "B")],
            otherwise: -1.0,
            otherwise_label: Some("LATE".to_string()),
        };
        assert_eq!(bands.step(5.0).label.as_deref(), Some("A"));
        assert_eq!(bands.evaluate(5.1), 5.0);
        assert_eq!(bands.step(99.0), Step { points: -1.0, label: Some("LATE".to_string()) });
    }
}
