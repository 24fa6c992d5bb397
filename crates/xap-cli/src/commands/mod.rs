pub mod solve;
pub mod zones;
