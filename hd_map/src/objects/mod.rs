pub mod boundary;
pub mod features;
pub mod lane;
pub mod overlap;
pub mod road;
