//! Macros for ergonomic command declaration.

/// Declare a command enum and implement `Command` for it.
///
/// Each variant names its verb; the kind becomes `"<prefix>/<verb>"`.
/// Variants may be unit or tuple variants.
///
/// # Example
///
/// ```
/// use reductor::action_enum;
/// use reductor::core::Command;
///
/// action_enum! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub enum TaskAction {
///         Add(String) => "add",
///         Delete(usize) => "delete",
///         Clear => "clear",
///     }
///     prefix: "task"
/// }
///
/// assert_eq!(TaskAction::Add("Buy milk".into()).kind(), "task/add");
/// assert_eq!(TaskAction::Clear.kind(), "task/clear");
/// ```
#[macro_export]
macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( ( $($field:ty),* $(,)? ) )? => $verb:literal
            ),* $(,)?
        }

        prefix: $prefix:literal
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $( ( $($field),* ) )?
            ),*
        }

        impl $crate::core::Command for $name {
            fn kind(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => concat!($prefix, "/", $verb)),*
                }
            }
        }
    };
}
