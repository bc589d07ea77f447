//! Declarative plot definitions.
//!
//! A [`Plot`] is a tree of [`Pad`]s, each holding an ordered list of
//! [`DataEntry`]s, an ordered list of [`PadBox`]es and a map of [`Axis`]
//! overrides. Nearly every field is optional so that a partial definition can be
//! completed from a template via [`Overlay`].
//!
//! All types derive `serde` traits; unset optional fields are omitted from the
//! serialized form so a definition round-trips through any self-describing format.

pub mod axis;
pub mod boxes;
pub mod data;
pub mod plot;

pub use axis::{Axis, AxisLetter, AxisRange};
pub use boxes::{BoxPosition, BoxStyle, LegendBox, LegendEntry, PadBox, TextBox};
pub use data::{Data, DataEntry, DataRef, Ratio};
pub use plot::{Pad, Plot};

/// Literal token joining a data name and its input identifier into a unique identity.
///
/// It must not occur in user-supplied names or input identifiers.
pub const IDENTITY_SEPARATOR: &str = "_IN_";

/// Token separating lines inside text boxes.
pub const LINE_DELIMITER: &str = "//";

/// Additive merge of a partially specified definition with a more complete one.
///
/// Fields set on `self` win; unset fields are inherited from `base`. The operation
/// recurses through nested definitions instead of replacing whole objects.
pub trait Overlay {
    /// Fill every unset field of `self` from `base`.
    fn overlay(&mut self, base: &Self);
}

/// Copies `base.field` into `target.field` for every listed `Option` field that is unset.
macro_rules! overlay_options {
    ($target:expr, $base:expr; $($field:ident),+ $(,)?) => {
        $(
            if $target.$field.is_none() {
                $target.$field = $base.$field.clone();
            }
        )+
    };
}
pub(crate) use overlay_options;

/// Overlay two ordered lists position by position; surplus base entries are appended.
pub(crate) fn overlay_list<T: Overlay + Clone>(target: &mut Vec<T>, base: &[T]) {
    for (index, base_item) in base.iter().enumerate() {
        match target.get_mut(index) {
            Some(item) => item.overlay(base_item),
            None => target.push(base_item.clone()),
        }
    }
}

/// Join a name and an input identifier into the unique identity of a loaded object.
pub fn identity(name: &str, input: &str) -> String {
    format!("{name}{IDENTITY_SEPARATOR}{input}")
}

/// Whether `text` is free of the reserved identity separator.
pub fn is_valid_identifier(text: &str) -> bool {
    !text.contains(IDENTITY_SEPARATOR)
}
