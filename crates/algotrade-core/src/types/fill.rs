//! Replacement of undefined values before signal detection.

use serde::{Deserialize, Serialize};

/// How undefined (`NaN`) values are replaced.
///
/// Configured as `fill_value`: a number, the string `"mean"`, or `null`
/// (represented as `Option::<FillPolicy>::None`, which leaves values
/// undefined).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FillValue", into = "FillValue")]
pub enum FillPolicy {
    /// Mean of the defined values in the same sequence.
    Mean,
    /// A fixed constant.
    Constant(f64),
}

impl FillPolicy {
    /// Replace every `NaN` in `values`, returning how many were replaced.
    ///
    /// `Mean` over a sequence with no defined value leaves it untouched.
    pub fn apply(&self, values: &mut [f64]) -> usize {
        let replacement = match *self {
            FillPolicy::Constant(value) => value,
            FillPolicy::Mean => {
                let (sum, count) = values
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
                if count == 0 {
                    return 0;
                }
                sum / count as f64
            }
        };

        let mut filled = 0;
        for value in values.iter_mut().filter(|v| v.is_nan()) {
            *value = replacement;
            filled += 1;
        }
        filled
    }
}

/// Apply an optional policy; `None` keeps undefined values.
pub fn fill_undefined(values: &mut [f64], policy: Option<FillPolicy>) -> usize {
    policy.map_or(0, |p| p.apply(values))
}

/// Wire representation of [`FillPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FillValue {
    Number(f64),
    Keyword(String),
}

impl TryFrom<FillValue> for FillPolicy {
    type Error = String;

    fn try_from(value: FillValue) -> Result<Self, Self::Error> {
        match value {
            FillValue::Number(n) if n.is_finite() => Ok(FillPolicy::Constant(n)),
            FillValue::Number(n) => Err(format!("fill_value must be finite, got {n}")),
            FillValue::Keyword(k) if k.eq_ignore_ascii_case("mean") => Ok(FillPolicy::Mean),
            FillValue::Keyword(k) => Err(format!(
                "fill_value must be a number, \"mean\" or null, got \"{k}\""
            )),
        }
    }
}

impl From<FillPolicy> for FillValue {
    fn from(policy: FillPolicy) -> Self {
        match policy {
            FillPolicy::Mean => FillValue::Keyword("mean".to_string()),
            FillPolicy::Constant(n) => FillValue::Number(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_fill() {
        let mut values = vec![f64::NAN, 1.0, f64::NAN];
        assert_eq!(FillPolicy::Constant(0.0).apply(&mut values), 2);
        assert_eq!(values, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_mean_fill() {
        let mut values = vec![f64::NAN, 2.0, 4.0];
        assert_eq!(FillPolicy::Mean.apply(&mut values), 1);
        assert!((values[0] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_mean_fill_all_undefined() {
        let mut values = vec![f64::NAN, f64::NAN];
        assert_eq!(FillPolicy::Mean.apply(&mut values), 0);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_none_leaves_values() {
        let mut values = vec![f64::NAN, 1.0];
        assert_eq!(fill_undefined(&mut values, None), 0);
        assert!(values[0].is_nan());
    }

    #[test]
    fn test_deserialize_variants() {
        let constant: Option<FillPolicy> = serde_json::from_str("-1.5").unwrap();
        assert_eq!(constant, Some(FillPolicy::Constant(-1.5)));

        let integer: Option<FillPolicy> = serde_json::from_str("0").unwrap();
        assert_eq!(integer, Some(FillPolicy::Constant(0.0)));

        let mean: Option<FillPolicy> = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(mean, Some(FillPolicy::Mean));

        let none: Option<FillPolicy> = serde_json::from_str("null").unwrap();
        assert_eq!(none, None);

        assert!(serde_json::from_str::<FillPolicy>("\"median\"").is_err());
    }

    #[test]
    fn test_serialize_mean() {
        let json = serde_json::to_value(FillPolicy::Mean).unwrap();
        assert_eq!(json, serde_json::json!("mean"));
    }
}
