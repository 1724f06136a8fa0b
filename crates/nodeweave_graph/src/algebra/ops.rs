// SPDX-License-Identifier: MIT OR Apache-2.0
//! Math and vector-math operations.

/// Operation of a scalar math node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    MultiplyAdd,
    Power,
    Logarithm,
    Sqrt,
    InverseSqrt,
    Absolute,
    Exponent,
    Minimum,
    Maximum,
    LessThan,
    GreaterThan,
    Sign,
    Compare,
    SmoothMin,
    SmoothMax,
    Round,
    Floor,
    Ceil,
    Truncate,
    Fraction,
    Modulo,
    Wrap,
    Snap,
    PingPong,
    Sine,
    Cosine,
    Tangent,
    Arcsine,
    Arccosine,
    Arctangent,
    Arctan2,
    Sinh,
    Cosh,
    Tanh,
    Radians,
    Degrees,
}

impl MathOp {
    /// Value of the node's `operation` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::MultiplyAdd => "MULTIPLY_ADD",
            Self::Power => "POWER",
            Self::Logarithm => "LOGARITHM",
            Self::Sqrt => "SQRT",
            Self::InverseSqrt => "INVERSE_SQRT",
            Self::Absolute => "ABSOLUTE",
            Self::Exponent => "EXPONENT",
            Self::Minimum => "MINIMUM",
            Self::Maximum => "MAXIMUM",
            Self::LessThan => "LESS_THAN",
            Self::GreaterThan => "GREATER_THAN",
            Self::Sign => "SIGN",
            Self::Compare => "COMPARE",
            Self::SmoothMin => "SMOOTH_MIN",
            Self::SmoothMax => "SMOOTH_MAX",
            Self::Round => "ROUND",
            Self::Floor => "FLOOR",
            Self::Ceil => "CEIL",
            Self::Truncate => "TRUNC",
            Self::Fraction => "FRACT",
            Self::Modulo => "MODULO",
            Self::Wrap => "WRAP",
            Self::Snap => "SNAP",
            Self::PingPong => "PINGPONG",
            Self::Sine => "SINE",
            Self::Cosine => "COSINE",
            Self::Tangent => "TANGENT",
            Self::Arcsine => "ARCSINE",
            Self::Arccosine => "ARCCOSINE",
            Self::Arctangent => "ARCTANGENT",
            Self::Arctan2 => "ARCTAN2",
            Self::Sinh => "SINH",
            Self::Cosh => "COSH",
            Self::Tanh => "TANH",
            Self::Radians => "RADIANS",
            Self::Degrees => "DEGREES",
        }
    }
}

/// Operation of a vector math node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum VectorOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    CrossProduct,
    Project,
    Reflect,
    DotProduct,
    Distance,
    Length,
    Scale,
    Normalize,
    Absolute,
    Minimum,
    Maximum,
    Floor,
    Ceil,
    Fraction,
    Modulo,
    Wrap,
    Snap,
    Sine,
    Cosine,
    Tangent,
}

impl VectorOp {
    /// Value of the node's `operation` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::CrossProduct => "CROSS_PRODUCT",
            Self::Project => "PROJECT",
            Self::Reflect => "REFLECT",
            Self::DotProduct => "DOT_PRODUCT",
            Self::Distance => "DISTANCE",
            Self::Length => "LENGTH",
            Self::Scale => "SCALE",
            Self::Normalize => "NORMALIZE",
            Self::Absolute => "ABSOLUTE",
            Self::Minimum => "MINIMUM",
            Self::Maximum => "MAXIMUM",
            Self::Floor => "FLOOR",
            Self::Ceil => "CEIL",
            Self::Fraction => "FRACT",
            Self::Modulo => "MODULO",
            Self::Wrap => "WRAP",
            Self::Snap => "SNAP",
            Self::Sine => "SINE",
            Self::Cosine => "COSINE",
            Self::Tangent => "TANGENT",
        }
    }

    /// Index of the output carrying the result.
    ///
    /// Operations producing a scalar write it to the `Value` output.
    pub fn result_output(&self) -> usize {
        match self {
            Self::DotProduct | Self::Distance | Self::Length => 1,
            _ => 0,
        }
    }
}

/// Binary operators of the expression algebra
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Dot,
    Cross,
    Project,
    Reflect,
    Gt,
    Lt,
}
