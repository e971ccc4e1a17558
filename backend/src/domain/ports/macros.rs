//! `define_port_error!` generates port error enums with snake_case
//! constructors, so adapters write `UserRepositoryError::query(msg)`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use super::super::{MeetingRepositoryError, UserRepositoryError};

    define_port_error! {
        pub enum StoreProbeError {
            Unreachable { message: String } => "unreachable: {message}",
            Retries { attempts: u32 } => "gave up after {attempts} attempts",
            Timeout => "timed out",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = UserRepositoryError::duplicate("email dana@example.org");
        assert_eq!(
            err.to_string(),
            "user repository duplicate key: email dana@example.org"
        );
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        assert_eq!(
            StoreProbeError::retries(3_u32).to_string(),
            "gave up after 3 attempts"
        );
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(StoreProbeError::timeout(), StoreProbeError::Timeout);
    }

    #[test]
    fn generated_variants_compare_by_value() {
        assert_eq!(
            MeetingRepositoryError::query("missing"),
            MeetingRepositoryError::Query {
                message: "missing".into()
            }
        );
        assert_ne!(
            StoreProbeError::unreachable("a"),
            StoreProbeError::unreachable("b")
        );
    }
}
