//! `define_port_error!` builds the error enums shared across ports and
//! adapters.
//!
//! A variant is either a unit or carries a single `String` field. Each gets a
//! `thiserror` message and a snake_case constructor, so callers write
//! `UserPersistenceError::query(msg)` rather than a struct literal.

macro_rules! define_port_error {
    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident $field:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($field: impl Into<String>) -> Self {
                Self::$variant { $field: $field.into() }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$doc:meta])*
                $variant:ident $({ $field:ident: String })? => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$doc])*
                #[error($message)]
                $variant $({ $field: String })?,
            )+
        }

        impl $name {
            $(define_port_error!(@constructor $variant $($field)?);)+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum LookupError {
            Gone => "gone",
            Refused { reason: String } => "refused: {reason}",
        }
    }

    #[rstest]
    fn unit_variant_constructor_takes_no_arguments() {
        assert_eq!(LookupError::gone(), LookupError::Gone);
        assert_eq!(LookupError::gone().to_string(), "gone");
    }

    #[rstest]
    #[case(LookupError::refused("timeout"))]
    #[case(LookupError::refused(String::from("timeout")))]
    fn field_constructor_accepts_any_string_like(#[case] error: LookupError) {
        assert_eq!(
            error,
            LookupError::Refused {
                reason: "timeout".to_owned()
            }
        );
        assert_eq!(error.to_string(), "refused: timeout");
    }
}
