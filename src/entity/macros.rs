/// Declare the field enum for one entity variant.
///
/// Emits the enum plus its [`EntityField`](crate::entity::EntityField) impl,
/// so the property table exists exactly once, as a compile-time constant:
///
/// ```
/// formcore::entity_fields! {
///     pub enum ContactField {
///         FirstName("first_name") => "1.3",
///         LastName("last_name") => "1.6",
///         ReferrerId("referrer_id") => "3",
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity_fields {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident ( $prop:literal ) => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $( $variant ),+
        }

        impl $crate::entity::EntityField for $name {
            const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];
            const PAIRS: &'static [(&'static str, &'static str)] = &[ $( ($prop, $key) ),+ ];

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $prop ),+
                }
            }

            fn key(self) -> &'static str {
                match self {
                    $( Self::$variant => $key ),+
                }
            }
        }
    };
}
