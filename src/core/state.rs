//! The value a state field holds.
//!
//! The engine only ever compares state values for equality. Everything else
//! on this trait exists for naming (rule names, hook identifiers) and for
//! carrying states through notifications and snapshots.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;

/// Trait for values stored in a state field.
///
/// # Required Traits
///
/// - `Clone`: values are copied into notifications and records
/// - `PartialEq`: rule matching is plain equality
/// - `Debug`: values are debuggable for diagnostics
/// - `Serialize` + `Deserialize`: values appear in snapshots and records
///
/// # Example
///
/// ```rust
/// use statefield::core::StateValue;
/// use serde::{Deserialize, Serialize};
/// use std::borrow::Cow;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum OrderStatus {
///     Pending,
///     Shipped,
/// }
///
/// impl StateValue for OrderStatus {
///     fn name(&self) -> Cow<'_, str> {
///         match self {
///             Self::Pending => Cow::Borrowed("pending"),
///             Self::Shipped => Cow::Borrowed("shipped"),
///         }
///     }
/// }
///
/// assert_eq!(OrderStatus::Shipped.name(), "shipped");
/// ```
pub trait StateValue:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Display name of the value.
    ///
    /// Used to derive rule names and in error messages; never used for
    /// equality.
    fn name(&self) -> Cow<'_, str>;
}

impl StateValue for String {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

macro_rules! integer_state_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl StateValue for $ty {
                fn name(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

integer_state_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Draft,
        Published,
    }

    impl StateValue for TestState {
        fn name(&self) -> Cow<'_, str> {
            match self {
                Self::Draft => Cow::Borrowed("draft"),
                Self::Published => Cow::Borrowed("published"),
            }
        }
    }

    #[test]
    fn enum_name_returns_label() {
        assert_eq!(TestState::Draft.name(), "draft");
        assert_eq!(TestState::Published.name(), "published");
    }

    #[test]
    fn string_name_borrows_contents() {
        let state = String::from("in_review");
        assert!(matches!(state.name(), Cow::Borrowed("in_review")));
    }

    #[test]
    fn integer_name_is_decimal() {
        assert_eq!(42i32.name(), "42");
        assert_eq!(7u8.name(), "7");
        assert_eq!((-3i64).name(), "-3");
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Published;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
