pub mod colors;
pub mod style;

pub use colors::{Color, Colormap};
pub use style::PlotStyle;
