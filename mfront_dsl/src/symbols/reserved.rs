//! Names no declaration may take

use super::glossary::is_glossary_name;

/// Names of the C++ standard library used by generated code
const STANDARD_LIBRARY_NAMES: &[&str] = &[
    "std", "cout", "cerr", "endl", "cos", "sin", "tan", "acos", "asin", "atan", "atan2", "cosh",
    "sinh", "tanh", "acosh", "asinh", "atanh", "exp", "frexp", "ldexp", "log", "log10", "modf",
    "exp2", "expm1", "ilogb", "log1p", "log2", "logb", "scalbn", "scalbln", "pow", "sqrt", "cbrt",
    "hypot", "erf", "erfc", "tgamma", "lgamma", "abs", "string", "ofstream", "ostringstream",
    "ifstream",
];

const TFEL_NAMESPACES: &[&str] = &["tfel", "math", "material", "utilities", "exception", "glossary"];

/// Scalar and tensorial types understood in variable declarations
pub const SUPPORTED_TYPES: &[&str] = &[
    "real",
    "frequency",
    "length",
    "time",
    "stressrate",
    "strainrate",
    "temperature",
    "thermalexpansion",
    "massdensity",
    "energydensity",
    "TVector",
    "Stensor",
    "Stensor4",
    "Tensor",
    "StressStensor",
    "StrainStensor",
    "FrequencyStensor",
    "DeformationGradientTensor",
    "int",
    "ushort",
];

const ERROR_HANDLING_NAMES: &[&str] = &["policy", "errno", "mfront_errno", "mfront_errno_old"];

pub fn is_supported_type(name: &str) -> bool {
    SUPPORTED_TYPES.contains(&name)
}

/// Reserved names shared by every dialect
pub fn default_reserved_names() -> Vec<&'static str> {
    STANDARD_LIBRARY_NAMES
        .iter()
        .chain(TFEL_NAMESPACES)
        .chain(SUPPORTED_TYPES.iter().filter(|t| !is_glossary_name(t)))
        .chain(ERROR_HANDLING_NAMES)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reserved_names() {
        let names = default_reserved_names();
        for name in ["std", "sqrt", "tfel", "real", "mfront_errno"] {
            assert!(names.contains(&name), "{name}");
        }
        assert!(!names.contains(&"E"));
        assert!(is_supported_type("ushort"));
        assert!(!is_supported_type("double"));
    }
}
