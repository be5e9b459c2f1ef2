use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed string enum whose variants render as their form labels.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(AppError::SchemaMismatch(format!(
                        "'{}' is not a valid {}; expected one of [{}]",
                        other,
                        stringify!($name),
                        [$($label),+].join(", ")
                    ))),
                }
            }
        }
    };
}

labelled_enum!(BranchStatus {
    Active => "Active",
    Inactive => "Inactive",
});

labelled_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

labelled_enum!(
    /// Adult or child membership.
    MemberStatus {
        Adult => "Adult",
        Child => "Child",
    }
);

labelled_enum!(
    /// Staff role; drives the PCF Pastor and Cell Leader dropdowns.
    StaffRole {
        PcfPastor => "PCF Pastor",
        HeadOfDepartments => "Head of Departments",
        CellLeader => "Cell Leader",
        Worker => "Worker",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BRANCH_STATUSES, GENDERS, MEMBER_STATUSES, STAFF_ROLES};

    fn labels<T: fmt::Display>(all: &[T]) -> Vec<String> {
        all.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_labels_match_registry_choices() {
        assert_eq!(labels(BranchStatus::ALL), BRANCH_STATUSES);
        assert_eq!(labels(Gender::ALL), GENDERS);
        assert_eq!(labels(MemberStatus::ALL), MEMBER_STATUSES);
        assert_eq!(labels(StaffRole::ALL), STAFF_ROLES);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("Cell Leader".parse::<StaffRole>().unwrap(), StaffRole::CellLeader);
        assert!("cell leader".parse::<StaffRole>().is_err());
        assert!("Pastor".parse::<StaffRole>().is_err());
    }
}
