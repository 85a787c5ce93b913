//! Macros for declaring event keys.

/// Declare a closed set of event keys.
///
/// Generates a fieldless enum usable as an [`EventKey`](crate::core::EventKey):
/// it derives the comparison traits and `serde`, displays as the variant
/// name, parses back from it, and lists every variant in `ALL`.
///
/// # Example
///
/// ```
/// use statewise::event_keys;
///
/// event_keys! {
///     pub enum Signal {
///         Tick,
///         Loop,
///         Continue,
///     }
/// }
///
/// assert_eq!(Signal::Tick.to_string(), "Tick");
/// assert_eq!("Loop".parse::<Signal>().unwrap(), Signal::Loop);
/// assert_eq!(Signal::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! event_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every key, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            #[allow(dead_code)]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::core::UnknownEventKey;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Self::$variant),)*
                    _ => Err($crate::core::UnknownEventKey(s.to_string())),
                }
            }
        }
    };
}
