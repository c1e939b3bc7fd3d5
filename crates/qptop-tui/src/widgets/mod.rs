pub mod bar_chart;
pub mod bytes_fmt;
