//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! digit-only CNPJ/CPF, validated email) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// CNPJ did not contain exactly 14 digits.
    #[error("invalid CNPJ")]
    InvalidCnpj,
    /// CPF did not contain exactly 11 digits.
    #[error("invalid CPF")]
    InvalidCpf,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a client institution.");
id_newtype!(UnitId, "Unique identifier for a facility unit.");
id_newtype!(EquipmentId, "Unique identifier for a piece of equipment.");
id_newtype!(AppointmentId, "Unique identifier for an appointment.");
id_newtype!(ServiceOrderId, "Unique identifier for a service order.");
id_newtype!(ReportId, "Unique identifier for a report.");
id_newtype!(ProposalId, "Unique identifier for a commercial proposal.");
id_newtype!(MaterialId, "Unique identifier for a material.");
id_newtype!(UserId, "Unique identifier for a dashboard user.");

/// Keeps only the ASCII digits of `value`.
fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Brazilian company registry number, stored as 14 digits without punctuation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj(String);

impl Cnpj {
    /// Strips punctuation and checks the digit count.
    pub fn new<S: AsRef<str>>(value: S) -> Result<Self, TypeConstraintError> {
        let digits = digits_only(value.as_ref());
        if digits.len() == 14 {
            Ok(Self(digits))
        } else {
            Err(TypeConstraintError::InvalidCnpj)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats as `00.000.000/0000-00`.
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }
}

impl Display for Cnpj {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Cnpj {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cnpj> for String {
    fn from(value: Cnpj) -> Self {
        value.0
    }
}

/// Brazilian individual taxpayer number, stored as 11 digits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    pub fn new<S: AsRef<str>>(value: S) -> Result<Self, TypeConstraintError> {
        let digits = digits_only(value.as_ref());
        if digits.len() == 11 {
            Ok(Self(digits))
        } else {
            Err(TypeConstraintError::InvalidCpf)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Cpf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Cpf {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cpf> for String {
    fn from(value: Cpf) -> Self {
        value.0
    }
}

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(ClientName, "Institution name enforcing non-empty values.");
non_empty_string_newtype!(UnitName, "Facility unit name enforcing non-empty values.");
non_empty_string_newtype!(
    ContactName,
    "Proposal contact name enforcing non-empty values."
);

/// Dashboard role as issued by the auth service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    /// Prophy manager.
    #[serde(rename = "GP")]
    ProphyManager,
    /// Internal medical physicist.
    #[serde(rename = "FMI")]
    InternalPhysicist,
    /// External medical physicist.
    #[serde(rename = "FME")]
    ExternalPhysicist,
    /// Client general manager.
    #[serde(rename = "GGC")]
    ClientManager,
    /// Unit manager.
    #[serde(rename = "GU")]
    UnitManager,
    /// Commercial staff.
    #[serde(rename = "C")]
    Commercial,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::ProphyManager,
        Role::InternalPhysicist,
        Role::ExternalPhysicist,
        Role::ClientManager,
        Role::UnitManager,
        Role::Commercial,
    ];

    /// Backend code of the role.
    pub const fn code(self) -> &'static str {
        match self {
            Role::ProphyManager => "GP",
            Role::InternalPhysicist => "FMI",
            Role::ExternalPhysicist => "FME",
            Role::ClientManager => "GGC",
            Role::UnitManager => "GU",
            Role::Commercial => "C",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::ProphyManager => "Gerente Prophy",
            Role::InternalPhysicist => "Físico Médico Interno",
            Role::ExternalPhysicist => "Físico Médico Externo",
            Role::ClientManager => "Gerente Geral de Cliente",
            Role::UnitManager => "Gerente de Unidade",
            Role::Commercial => "Comercial",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.code() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}
