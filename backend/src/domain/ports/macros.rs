//! Macro for declaring port error enums.
//!
//! Each variant becomes a `thiserror` variant plus a snake_case constructor
//! whose fields accept anything convertible into the declared type, so
//! adapters can write `ListingRepositoryError::query(err.to_string())`.

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant $( $($field : $ty),* )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident $($field:ident : $ty:ty),+) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SampleStoreError {
            Connection { message: String } => "store unreachable: {message}",
            Gone => "store closed",
            Quota { used: u64, limit: u64 } => "quota {used}/{limit}",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SampleStoreError::connection("refused");
        assert_eq!(err.to_string(), "store unreachable: refused");
        assert_eq!(
            err,
            SampleStoreError::Connection {
                message: "refused".to_owned()
            }
        );
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SampleStoreError::gone().to_string(), "store closed");
    }

    #[test]
    fn numeric_fields_keep_their_types() {
        let err = SampleStoreError::quota(3_u64, 5_u64);
        assert_eq!(err.to_string(), "quota 3/5");
    }
}
