//! Glossary of physical quantities
//!
//! A variable bound to one of these names is exposed under it by every
//! interface, instead of under its own name.

/// Glossary entries, sorted
pub const GLOSSARY_NAMES: &[&str] = &[
    "AxialDeformationGradient",
    "AxialGrowth",
    "AxialStrain",
    "AxialStress",
    "B10BurnUp",
    "Broken",
    "BulkModulus",
    "CohesiveForce",
    "ConvectiveHeatTransferCoefficient",
    "CrossSectionArea",
    "CylindricalStress",
    "Damage",
    "DeformationGradient",
    "Displacement",
    "DualStress",
    "ElasticStrain",
    "Emissivity",
    "EquivalentPlasticStrain",
    "EquivalentStrain",
    "EquivalentViscoplasticStrain",
    "FirstAxisSecondMomentArea",
    "FirstLameCoefficient",
    "FissionDensity",
    "GaseousSwelling",
    "GrainSize",
    "HeatFlux",
    "HeatTransferCoefficient",
    "HillStress",
    "HydrostaticPressure",
    "IrradiationDamage",
    "IrradiationInducedSwelling",
    "IrradiationSwelling",
    "IrradiationTemperature",
    "KelvinTemperature",
    "MassDensity",
    "MeanIrradiationTemperature",
    "MeanTemperature",
    "NeutronFluence",
    "NeutronFlux",
    "NormalStiffness",
    "NumberOfMoles",
    "OpeningDisplacement",
    "OrthotropicAxisX1",
    "OrthotropicAxisX2",
    "OrthotropicAxisY1",
    "OrthotropicAxisY2",
    "OrthotropicAxisZ1",
    "OrthotropicAxisZ2",
    "PlasticStrain",
    "PlateWidth",
    "PoissonRatio",
    "PoissonRatio12",
    "PoissonRatio13",
    "PoissonRatio23",
    "Porosity",
    "PorosityIncreaseDueToInelasticFlow",
    "PorosityIncreaseDueToNucleation",
    "PowerDensity",
    "Pressure",
    "PrincipalStress1",
    "PrincipalStress2",
    "PrincipalStress3",
    "SecondAxisSecondMomentArea",
    "ShearModulus",
    "ShearModulus12",
    "ShearModulus13",
    "ShearModulus23",
    "SolidSwelling",
    "SpecificHeat",
    "SphericalStress",
    "Strain",
    "StrainMeasure",
    "Stress",
    "Swelling",
    "TangentialStiffness",
    "Temperature",
    "TemperatureGradient",
    "ThermalConductivity",
    "ThermalConductivity1",
    "ThermalConductivity2",
    "ThermalConductivity3",
    "ThermalExpansion",
    "ThermalExpansion1",
    "ThermalExpansion2",
    "ThermalExpansion3",
    "TorsionConstant",
    "TrescaStress",
    "UltimateTensileStrength",
    "UltimateTensileStress",
    "ViscoplasticStrain",
    "VolumetricStrain",
    "VonMisesStress",
    "YieldStrength",
    "YieldStress",
    "YoungModulus",
    "YoungModulus1",
    "YoungModulus2",
    "YoungModulus3",
];

pub fn is_glossary_name(name: &str) -> bool {
    GLOSSARY_NAMES.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glossary_is_sorted_for_lookup() {
        assert!(GLOSSARY_NAMES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_known_entries() {
        for name in ["Strain", "Stress", "Temperature", "YoungModulus", "PoissonRatio"] {
            assert!(is_glossary_name(name), "{name}");
        }
        assert!(!is_glossary_name("strain"));
        assert!(!is_glossary_name("T"));
    }
}
