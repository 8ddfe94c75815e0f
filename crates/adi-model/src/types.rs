// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ADI enumerations.
//!
//! Enumerations are stored as `Int32` in variables declared with the
//! `Enumeration` data type; each type here converts to and from that value
//! and can be used with [`TypedVariable`](adi_core::TypedVariable).

use std::fmt;

use adi_core::{DataType, Variant, VariantValue};
use serde::{Deserialize, Serialize};

macro_rules! adi_enumeration {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr => $label:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),*
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Returns the `Int32` value.
            pub const fn value(&self) -> i32 {
                match self {
                    $($name::$variant => $value),*
                }
            }

            /// Looks up a value.
            pub fn from_value(value: i32) -> Option<Self> {
                match value {
                    $(v if v == $value => Some($name::$variant),)*
                    _ => None,
                }
            }

            /// Returns the symbolic name.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", self.as_str(), self.value())
            }
        }

        impl TryFrom<i32> for $name {
            type Error = i32;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::from_value(value).ok_or(value)
            }
        }

        impl From<$name> for Variant {
            fn from(value: $name) -> Self {
                Variant::Int32(value.value())
            }
        }

        impl VariantValue for $name {
            fn data_type() -> DataType {
                DataType::Enumeration
            }

            fn from_variant(value: &Variant) -> Option<Self> {
                match value {
                    Variant::Int32(v) => Self::from_value(*v),
                    _ => None,
                }
            }

            fn into_variant(self) -> Variant {
                Variant::Int32(self.value())
            }
        }
    };
}

adi_enumeration! {
    /// Kind of work a channel or stream is doing.
    ///
    /// The `*_WITH_GRAB_SAMPLE` values set bit 15 on top of the base cycle.
    pub enum ExecutionCycle {
        /// No acquisition.
        Idle = 0 => "IDLE",
        /// Diagnostic cycle.
        Diagnostic = 1 => "DIAGNOSTIC",
        /// Cleaning cycle.
        Cleaning = 2 => "CLEANING",
        /// Calibration cycle.
        Calibration = 4 => "CALIBRATION",
        /// Validation cycle.
        Validation = 8 => "VALIDATION",
        /// Sampling cycle.
        Sampling = 16 => "SAMPLING",
        /// Diagnostic cycle with grab sample.
        DiagnosticWithGrabSample = 32769 => "DIAGNOSTIC_WITH_GRAB_SAMPLE",
        /// Cleaning cycle with grab sample.
        CleaningWithGrabSample = 32770 => "CLEANING_WITH_GRAB_SAMPLE",
        /// Calibration cycle with grab sample.
        CalibrationWithGrabSample = 32772 => "CALIBRATION_WITH_GRAB_SAMPLE",
        /// Validation cycle with grab sample.
        ValidationWithGrabSample = 32776 => "VALIDATION_WITH_GRAB_SAMPLE",
        /// Sampling cycle with grab sample.
        SamplingWithGrabSample = 32784 => "SAMPLING_WITH_GRAB_SAMPLE",
    }
}

impl ExecutionCycle {
    const GRAB_SAMPLE_BIT: i32 = 0x8000;

    /// Returns `true` for the grab-sample variants.
    pub const fn is_grab_sample(&self) -> bool {
        self.value() & Self::GRAB_SAMPLE_BIT != 0
    }

    /// Returns the cycle without the grab-sample bit.
    pub fn base_cycle(&self) -> Self {
        Self::from_value(self.value() & !Self::GRAB_SAMPLE_BIT).unwrap_or(*self)
    }
}

impl Default for ExecutionCycle {
    fn default() -> Self {
        Self::Idle
    }
}

adi_enumeration! {
    /// Quality of the last acquisition.
    pub enum AcquisitionResultStatus {
        /// Not used.
        NotUsed = 0 => "NOT_USED",
        /// Good result.
        Good = 1 => "GOOD",
        /// Bad result.
        Bad = 2 => "BAD",
        /// Unknown quality.
        Unknown = 3 => "UNKNOWN",
        /// Partial result.
        Partial = 4 => "PARTIAL",
    }
}

adi_enumeration! {
    /// Alarm state of a monitored value.
    pub enum AlarmState {
        /// In range.
        Normal = 0 => "NORMAL",
        /// Below the low warning limit.
        WarningLow = 1 => "WARNING_LOW",
        /// Above the high warning limit.
        WarningHigh = 2 => "WARNING_HIGH",
        /// Warning without direction.
        Warning = 4 => "WARNING",
        /// Below the low alarm limit.
        AlarmLow = 8 => "ALARM_LOW",
        /// Above the high alarm limit.
        AlarmHigh = 16 => "ALARM_HIGH",
        /// Alarm without direction.
        Alarm = 32 => "ALARM",
    }
}
