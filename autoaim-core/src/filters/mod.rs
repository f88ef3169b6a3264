//! Small generic low-pass filter shared by the robot clusterer and the
//! beyblade identifier.

mod low_pass_filter;

pub use low_pass_filter::LowPassFilter;
