//! Production recipe table
//!
//! Order matters: `Bridge Rectifiers` must be tried before `Rectifiers`, and
//! `PTC Resettable Fuses` before `Fuses`.

use super::units::{case_rated_current, case_rated_power, compact_join, first_listed, format_resistance};
use super::{ParamLookup, Recipe};
use crate::error::RecipeError;
use crate::types::CategoryPath;

/// Join whichever of the key parameters are present
///
/// Missing ones are skipped; only a part with none of them fails.
fn join_params(find: &ParamLookup<'_>, names: &[&str]) -> Result<String, RecipeError> {
    present(compact_join(names.iter().map(|name| find.get(name))), names)
}

fn present(joined: String, names: &[&str]) -> Result<String, RecipeError> {
    if joined.is_empty() {
        Err(RecipeError::NoKeyParameters(names.join(", ")))
    } else {
        Ok(joined)
    }
}

fn leaf_name(path: &CategoryPath) -> String {
    path.last().unwrap_or_default().to_string()
}

fn top_contains(path: &CategoryPath, needle: &str) -> bool {
    path.first().is_some_and(|s| s.contains(needle))
}

fn third_contains(path: &CategoryPath, needle: &str) -> bool {
    path.get(2).is_some_and(|s| s.contains(needle))
}

fn circuit_protection(path: &CategoryPath, needle: &str) -> bool {
    path.first() == Some("Circuit Protection") && path.get(1).is_some_and(|s| s.contains(needle))
}

fn resistor_value(find: &ParamLookup<'_>, _: &CategoryPath) -> Result<String, RecipeError> {
    let resistance = format_resistance(find.get("Resistance").as_deref());
    let power = find.get("Power (Watts)").map(|p| first_listed(&p).to_string());
    present(
        compact_join([Some(resistance), find.get("Tolerance"), power]),
        &["Resistance", "Tolerance", "Power (Watts)"],
    )
}

fn mosfet_value(find: &ParamLookup<'_>, _: &CategoryPath) -> Result<String, RecipeError> {
    let current = find
        .get("Current - Continuous Drain (Id) @ 25°C")
        .and_then(|c| case_rated_current(&c));
    let power = find
        .get("Power Dissipation (Max)")
        .and_then(|p| case_rated_power(&p));
    present(
        compact_join([find.get("Drain to Source Voltage (Vdss)"), current, power]),
        &[
            "Drain to Source Voltage (Vdss)",
            "Current - Continuous Drain (Id) @ 25°C",
            "Power Dissipation (Max)",
        ],
    )
}

const RESISTORS_PARAMS: &[&str] = &[
    "Composition",
    "Resistance",
    "Tolerance",
    "Power (Watts)",
    "Temperature Coefficient",
    "Package / Case",
    "Features",
    "Ratings",
];

const CAPACITORS_PARAMS: &[&str] = &[
    "Capacitance",
    "Tolerance",
    "Voltage - Rated",
    "Temperature Coefficient",
    "Package / Case",
    "Features",
    "Ratings",
];

const FREQUENCY_CONTROL_PARAMS: &[&str] = &[
    "Frequency",
    "Frequency Stability",
    "Frequency Tolerance",
    "Load Capacitance",
    "Package / Case",
    "Features",
    "Ratings",
    "Applications",
];

const INDUCTORS_PARAMS: &[&str] = &[
    "Inductance",
    "Tolerance",
    "Current Rating (Amps)",
    "DC Resistance (DCR)",
    "Package / Case",
    "Features",
    "Ratings",
];

const BRIDGE_RECTIFIERS_PARAMS: &[&str] = &[
    "Diode Type",
    "Technology",
    "Voltage - Peak Reverse (Max)",
    "Current - Average Rectified (Io)",
    "Package / Case",
    "Features",
    "Ratings",
    "Applications",
];

const RECTIFIERS_PARAMS: &[&str] = &[
    "Voltage - DC Reverse (Vr) (Max)",
    "Current - Average Rectified (Io)",
    "Reverse Recovery Time (trr)",
    "Package / Case",
    "Features",
    "Ratings",
    "Applications",
];

const ZENER_PARAMS: &[&str] = &[
    "Voltage - Zener (Nom) (Vz)",
    "Tolerance",
    "Power - Max",
    "Impedance (Max) (Zzt)",
    "Package / Case",
    "Features",
    "Ratings",
    "Applications",
];

const BIPOLAR_TRANSISTORS_PARAMS: &[&str] = &[
    "Transistor Type",
    "Voltage - Collector Emitter Breakdown (Max)",
    "Current - Collector (Ic) (Max)",
    "Power - Max",
    "Frequency - Transition",
    "Package / Case",
    "Grade",
    "Qualification",
];

const MOSFETS_PARAMS: &[&str] = &[
    "FET Type",
    "Technology",
    "Drain to Source Voltage (Vdss)",
    "Current - Continuous Drain (Id) @ 25°C",
    "Power Dissipation (Max)",
    "Vgs (Max)",
    "Package / Case",
    "Grade",
    "Qualification",
];

const INDICATOR_LEDS_PARAMS: &[&str] = &[
    "Lens Transparency",
    "Color",
    "Wavelength - Dominant",
    "Voltage - Forward (Vf) (Typ)",
    "Current - Test",
    "Package / Case",
    "Features",
];

const PTC_FUSES_PARAMS: &[&str] = &[
    "Type",
    "Current - Hold (Ih) (Max)",
    "Voltage - Max",
    "Current - Max",
    "Time to Trip",
    "Package / Case",
    "Ratings",
    "Approval Agency",
];

const FUSES_PARAMS: &[&str] = &[
    "Fuse Type",
    "Current Rating (Amps)",
    "Voltage Rating - DC",
    "Response Time",
    "Package / Case",
    "Approval Agency",
];

const TVS_DIODES_PARAMS: &[&str] = &[
    "Type",
    "Voltage - Clamping (Max) @ Ipp",
    "Current - Peak Pulse (10/1000µs)",
    "Power - Peak Pulse",
    "Package / Case",
    "Applications",
];

const VARISTORS_PARAMS: &[&str] = &[
    "Varistor Voltage (Typ)",
    "Current - Surge",
    "Energy",
    "Capacitance @ Frequency",
    "Package / Case",
    "Grade",
    "Qualification",
];

/// The ordered production recipes
pub fn recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            name: "resistors",
            trigger: |path| top_contains(path, "Resistors"),
            description_prefix: |path| leaf_name(path).replace(" - Surface Mount", ""),
            description_params: |_| RESISTORS_PARAMS,
            value_generator: resistor_value,
        },
        Recipe {
            name: "capacitors",
            trigger: |path| top_contains(path, "Capacitors"),
            description_prefix: |path| {
                path.get(1)
                    .or_else(|| path.first())
                    .unwrap_or_default()
                    .to_string()
            },
            description_params: |_| CAPACITORS_PARAMS,
            value_generator: |find, _| {
                join_params(find, &["Capacitance", "Voltage - Rated", "Temperature Coefficient"])
            },
        },
        Recipe {
            name: "frequency_control",
            trigger: |path| top_contains(path, "Crystals, Oscillators, Resonators"),
            description_prefix: leaf_name,
            description_params: |_| FREQUENCY_CONTROL_PARAMS,
            value_generator: |find, _| {
                join_params(find, &["Frequency", "Frequency Tolerance", "Load Capacitance"])
            },
        },
        Recipe {
            name: "inductors",
            trigger: |path| top_contains(path, "Inductors, Coils, Chokes"),
            description_prefix: leaf_name,
            description_params: |_| INDUCTORS_PARAMS,
            value_generator: |find, _| {
                join_params(find, &["Inductance", "Tolerance", "Current Rating (Amps)"])
            },
        },
        Recipe {
            name: "bridge_rectifiers",
            trigger: |path| third_contains(path, "Bridge Rectifiers"),
            description_prefix: leaf_name,
            description_params: |_| BRIDGE_RECTIFIERS_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Voltage - Peak Reverse (Max)",
                        "Current - Average Rectified (Io)",
                    ],
                )
            },
        },
        Recipe {
            name: "rectifiers",
            trigger: |path| third_contains(path, "Rectifiers"),
            description_prefix: leaf_name,
            description_params: |_| RECTIFIERS_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Voltage - DC Reverse (Vr) (Max)",
                        "Current - Average Rectified (Io)",
                    ],
                )
            },
        },
        Recipe {
            name: "zener",
            trigger: |path| third_contains(path, "Zener"),
            description_prefix: leaf_name,
            description_params: |_| ZENER_PARAMS,
            value_generator: |find, _| {
                join_params(find, &["Voltage - Zener (Nom) (Vz)", "Tolerance", "Power - Max"])
            },
        },
        Recipe {
            name: "bipolar_transistors",
            trigger: |path| third_contains(path, "Bipolar (BJT)"),
            description_prefix: leaf_name,
            description_params: |_| BIPOLAR_TRANSISTORS_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Voltage - Collector Emitter Breakdown (Max)",
                        "Current - Collector (Ic) (Max)",
                        "Power - Max",
                    ],
                )
            },
        },
        Recipe {
            name: "mosfets",
            trigger: |path| third_contains(path, "FETs, MOSFETs"),
            description_prefix: leaf_name,
            description_params: |_| MOSFETS_PARAMS,
            value_generator: mosfet_value,
        },
        Recipe {
            name: "indicator_leds",
            trigger: |path| {
                path.first() == Some("Optoelectronics")
                    && path.get(1).is_some_and(|s| s.contains("LED Indication"))
            },
            description_prefix: leaf_name,
            description_params: |_| INDICATOR_LEDS_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Color",
                        "Voltage - Forward (Vf) (Typ)",
                        "Current - Test",
                    ],
                )
            },
        },
        Recipe {
            name: "ptc_fuses",
            trigger: |path| circuit_protection(path, "PTC Resettable Fuses"),
            description_prefix: leaf_name,
            description_params: |_| PTC_FUSES_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Current - Hold (Ih) (Max)",
                        "Voltage - Max",
                        "Time to Trip",
                    ],
                )
            },
        },
        Recipe {
            name: "fuses",
            trigger: |path| circuit_protection(path, "Fuses"),
            description_prefix: leaf_name,
            description_params: |_| FUSES_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Current Rating (Amps)",
                        "Voltage Rating - DC",
                        "Response Time",
                    ],
                )
            },
        },
        Recipe {
            name: "tvs_diodes",
            trigger: |path| {
                path.get(1) == Some("Transient Voltage Suppressors (TVS)")
                    && third_contains(path, "TVS Diodes")
            },
            description_prefix: leaf_name,
            description_params: |_| TVS_DIODES_PARAMS,
            value_generator: |find, _| {
                join_params(
                    find,
                    &[
                        "Voltage - Clamping (Max) @ Ipp",
                        "Current - Peak Pulse (10/1000µs)",
                    ],
                )
            },
        },
        Recipe {
            name: "varistors",
            trigger: |path| circuit_protection(path, "Varistors, MOVs"),
            description_prefix: leaf_name,
            description_params: |_| VARISTORS_PARAMS,
            value_generator: |find, _| {
                join_params(find, &["Varistor Voltage (Typ)", "Current - Surge", "Energy"])
            },
        },
    ]
}
