//! Command implementations for pienoonctl

pub mod cubic;
pub mod load;
pub mod roots;

use clap::ValueEnum;
use pienoon_motive::CurveValueType;

/// Which value of a curve to plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PlotValue {
    /// f(x)
    #[default]
    Value,
    /// f'(x)
    Derivative,
    /// f''(x)
    SecondDerivative,
    /// f'''(x)
    ThirdDerivative,
}

impl From<PlotValue> for CurveValueType {
    fn from(value: PlotValue) -> Self {
        match value {
            PlotValue::Value => CurveValueType::Value,
            PlotValue::Derivative => CurveValueType::Derivative,
            PlotValue::SecondDerivative => CurveValueType::SecondDerivative,
            PlotValue::ThirdDerivative => CurveValueType::ThirdDerivative,
        }
    }
}
