use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same wire labels, so serialized records match the
/// intake collector's exact option strings.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Duration {
    Under24Hours => "Less than 24 hours",
    OneToThreeDays => "1-3 days",
    FourToSevenDays => "4-7 days",
    OverAWeek => "More than a week",
});

str_enum!(Severity {
    Mild => "Mild (I can work)",
    Moderate => "Moderate (Uncomfortable)",
    Severe => "Severe (Can't do anything)",
    Unbearable => "Unbearable",
});

str_enum!(History {
    None => "None",
    Hypertension => "Hypertension",
    Diabetes => "Diabetes",
    Asthma => "Asthma",
    Ulcer => "Ulcer",
    Pregnancy => "Pregnancy",
    Other => "Other",
});

str_enum!(Signal {
    Red => "Red",
    Yellow => "Yellow",
    Green => "Green",
});

str_enum!(SpeakerRole {
    Patient => "patient",
    Assistant => "assistant",
});

str_enum!(UserRole {
    Patient => "patient",
    Hospital => "hospital",
});

str_enum!(VerificationConfidence {
    High => "high",
    Medium => "medium",
    Low => "low",
});
