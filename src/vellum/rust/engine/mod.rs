// SPDX-License-Identifier: GPL-3.0-or-later

mod context;
mod pattern;
mod surface;
mod transform;
mod types;

pub use context::{Context, ForeignContext};
pub use pattern::{ForeignPattern, Pattern};
pub use surface::{ForeignSurface, Surface};
pub use transform::{ForeignTransform, Transform};
pub use types::{
    ColorStop, Extend, FillRule, Filter, Format, LineCap, LineJoin, Matrix, PatternKind,
};
