pub mod constants;
pub mod epoch;
pub mod frames;
