use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::loss::{BinaryCrossEntropy, Loss, MeanSquaredError};
use crate::math::matrix::Matrix;

/// The closed set of loss functions a model can train against.
///
/// Parses from, and serializes to, exactly `"BinaryCrossEntropy"` and
/// `"MeanSquaredError"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossType {
    BinaryCrossEntropy,
    MeanSquaredError,
}

impl LossType {
    pub const ALL: [LossType; 2] = [LossType::BinaryCrossEntropy, LossType::MeanSquaredError];

    pub fn as_str(&self) -> &'static str {
        match self {
            LossType::BinaryCrossEntropy => "BinaryCrossEntropy",
            LossType::MeanSquaredError => "MeanSquaredError",
        }
    }

    /// Constructs the loss unit for one epoch's output and targets.
    pub fn build<'a>(&self, predicted: &'a Matrix, expected: &'a Matrix) -> Result<Box<dyn Loss + 'a>> {
        Ok(match self {
            LossType::BinaryCrossEntropy => Box::new(BinaryCrossEntropy::new(predicted, expected)?),
            LossType::MeanSquaredError => Box::new(MeanSquaredError::new(predicted, expected)?),
        })
    }
}

impl FromStr for LossType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LossType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnsupportedLoss(s.to_string()))
    }
}

impl fmt::Display for LossType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_names_only() {
        assert_eq!("BinaryCrossEntropy".parse::<LossType>().unwrap(), LossType::BinaryCrossEntropy);
        assert_eq!("MeanSquaredError".parse::<LossType>().unwrap(), LossType::MeanSquaredError);

        for bad in ["meansquarederror", "MSE", "", "MeanSquaredError "] {
            match bad.parse::<LossType>() {
                Err(Error::UnsupportedLoss(name)) => assert_eq!(name, bad),
                other => panic!("expected UnsupportedLoss for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in LossType::ALL {
            assert_eq!(kind.to_string().parse::<LossType>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_uses_selector_names() {
        let json = serde_json::to_string(&LossType::MeanSquaredError).unwrap();
        assert_eq!(json, "\"MeanSquaredError\"");
    }

    #[test]
    fn build_dispatches_to_matching_unit() {
        let p = Matrix::from_data(vec![vec![0.5]]);
        let y = Matrix::from_data(vec![vec![1.0]]);
        assert_eq!(LossType::MeanSquaredError.build(&p, &y).unwrap().forward(), 0.25);
        let bce = LossType::BinaryCrossEntropy.build(&p, &y).unwrap().forward();
        assert!((bce - std::f64::consts::LN_2).abs() < 1e-9);
    }

    #[test]
    fn build_rejects_shape_mismatch() {
        let p = Matrix::zeros(1, 2);
        let y = Matrix::zeros(1, 1);
        assert!(matches!(
            LossType::MeanSquaredError.build(&p, &y),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
