//! Macros for ergonomic state definitions.

/// Generate a `StateValue` implementation for a simple enum.
///
/// Each variant's state name defaults to the variant identifier; `as "label"`
/// overrides it and also becomes the serialized form.
///
/// # Example
///
/// ```
/// use statefield::core::StateValue;
/// use statefield::state_enum;
///
/// state_enum! {
///     pub enum ArticleStatus {
///         Draft as "draft",
///         InReview as "in_review",
///         Published,
///     }
/// }
///
/// assert_eq!(ArticleStatus::InReview.name(), "in_review");
/// assert_eq!(ArticleStatus::Published.name(), "Published");
/// ```
#[macro_export]
macro_rules! state_enum {
    (@label $variant:ident) => {
        stringify!($variant)
    };
    (@label $variant:ident $label:literal) => {
        $label
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(as $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $(#[serde(rename = $label)])?
                $variant
            ),*
        }

        impl $crate::core::StateValue for $name {
            fn name(&self) -> ::std::borrow::Cow<'_, str> {
                match self {
                    $(Self::$variant => ::std::borrow::Cow::Borrowed(
                        $crate::state_enum!(@label $variant $($label)?)
                    )),*
                }
            }
        }
    };
}
