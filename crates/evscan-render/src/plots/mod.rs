pub mod axes_draw;
pub mod histogram;
