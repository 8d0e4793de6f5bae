//! Named boolean switches that change how model parameters are represented.
use std::str::FromStr;

use crate::function_approximators::errors::ParamError;

/// Representation switch accepted by `ModelParameters::set_modifier`.
///
/// - `LinesPivotAtMaxActivation`: offsets are stored relative to the basis
///   centers instead of the origin (predictions unchanged).
/// - `SlopesAsAngles`: the flat vector exposes slopes as `atan(slope)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterModifier {
    LinesPivotAtMaxActivation,
    SlopesAsAngles,
}

impl ParameterModifier {
    pub fn name(self) -> &'static str {
        match self {
            ParameterModifier::LinesPivotAtMaxActivation => "lines_pivot_at_max_activation",
            ParameterModifier::SlopesAsAngles => "slopes_as_angles",
        }
    }
}

impl FromStr for ParameterModifier {
    type Err = ParamError;

    /// Parse an exact modifier name; anything else is
    /// [`ParamError::UnknownModifier`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lines_pivot_at_max_activation" => Ok(ParameterModifier::LinesPivotAtMaxActivation),
            "slopes_as_angles" => Ok(ParameterModifier::SlopesAsAngles),
            _ => Err(ParamError::UnknownModifier { name: s.to_string() }),
        }
    }
}
