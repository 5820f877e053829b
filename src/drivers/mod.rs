#[cfg(feature = "atmega2560")]
pub mod atmega2560;

#[cfg(any(test, feature = "sim"))]
pub mod sim;
