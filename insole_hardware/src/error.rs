use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("spi error: {0}")]
    Spi(String),
    #[error("uart error: {0}")]
    Uart(String),
    #[error("unsupported adc resolution: {0} bits")]
    Resolution(u8),
    #[error("adc read failed on pin {0}")]
    ReadFailed(u8),
    #[error("pin {0} is not mapped to an adc input")]
    UnknownPin(u8),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
